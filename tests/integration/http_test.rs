//! End-to-end HTTP tests against a running server

use std::net::SocketAddr;
use std::thread::{self, JoinHandle};

use reqwest::blocking::Client;
use serde_json::{Value, json};
use signet::server::ShutdownHandle;
use signet::{AttestationStore, HttpServer, MemoryBackend, ServerConfig, SledBackend};
use tempfile::TempDir;

/// Server running on an ephemeral port, stopped on drop
struct TestServer {
    addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: Option<JoinHandle<anyhow::Result<()>>>,
    client: Client,
}

impl TestServer {
    fn start() -> Self {
        Self::start_with(ServerConfig::default())
    }

    fn start_with(config: ServerConfig) -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: 2,
            ..config
        };
        let server =
            HttpServer::bind(&config, AttestationStore::new(MemoryBackend::new())).unwrap();
        Self::spawn(server)
    }

    fn spawn<B>(server: HttpServer<B>) -> Self
    where
        B: signet::core::ports::KeyValueBackend + 'static,
    {
        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle();
        let thread = thread::spawn(move || server.run());
        Self {
            addr,
            shutdown,
            thread: Some(thread),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().unwrap();
        (resp.status().as_u16(), resp.json().unwrap())
    }

    fn post_json(&self, body: &Value) -> (u16, Value) {
        let resp = self.client.post(self.url("/sig")).json(body).send().unwrap();
        (resp.status().as_u16(), resp.json().unwrap())
    }

    fn post_raw(&self, content_type: Option<&str>, body: &'static str) -> (u16, Value) {
        let mut req = self.client.post(self.url("/sig")).body(body);
        if let Some(content_type) = content_type {
            req = req.header("Content-Type", content_type);
        }
        let resp = req.send().unwrap();
        (resp.status().as_u16(), resp.json().unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.shutdown();
        if let Some(thread) = self.thread.take() {
            thread.join().unwrap().unwrap();
        }
    }
}

// =============================================================================
// LOOKUP
// =============================================================================

#[test]
fn test_get_unknown_id_is_empty_list() {
    let server = TestServer::start();
    let (status, body) = server.get("/sig/nobody");
    assert_eq!(status, 200);
    assert_eq!(body, json!({"ok": true, "attestations": []}));
}

#[test]
fn test_get_decodes_percent_encoding() {
    let server = TestServer::start();
    server.post_json(&json!({"attestations": [{"data": {"id": "did:ex:1", "ok": true}}]}));

    let (status, body) = server.get("/sig/did%3Aex%3A1");
    assert_eq!(status, 200);
    assert_eq!(body["attestations"].as_array().unwrap().len(), 1);
}

#[test]
fn test_query_string_is_ignored() {
    let server = TestServer::start();
    let (status, body) = server.get("/sig/x?verbose=1");
    assert_eq!(status, 200);
    assert_eq!(body["ok"], json!(true));
}

// =============================================================================
// SUBMISSION
// =============================================================================

#[test]
fn test_post_then_get_per_identifier() {
    let server = TestServer::start();

    let (status, body) = server.post_json(&json!({"attestations": [
        {"data": {"id": "x", "ok": true}},
        {"data": {"id": "y", "ok": false}},
    ]}));
    assert_eq!(status, 200);
    assert_eq!(body, json!({"ok": true}));

    assert_eq!(
        server.get("/sig/x").1,
        json!({"ok": true, "attestations": [{"data": {"id": "x", "ok": true}}]})
    );
    assert_eq!(
        server.get("/sig/y").1,
        json!({"ok": true, "attestations": [{"data": {"id": "y", "ok": false}}]})
    );
}

#[test]
fn test_missing_ok_is_invalid_data_with_200() {
    let server = TestServer::start();

    let (status, body) = server.post_json(&json!({"attestations": [{"data": {"id": "x"}}]}));
    assert_eq!(status, 200);
    assert_eq!(body, json!({"ok": false, "error": "invalid data"}));

    assert_eq!(server.get("/sig/x").1, json!({"ok": true, "attestations": []}));
}

#[test]
fn test_batch_with_one_bad_element_writes_nothing() {
    let server = TestServer::start();

    let (_, body) = server.post_json(&json!({"attestations": [
        {"data": {"id": "a", "ok": true}},
        {"data": {"ok": true}},
    ]}));
    assert_eq!(body, json!({"ok": false, "error": "invalid data"}));
    assert_eq!(server.get("/sig/a").1["attestations"], json!([]));
}

#[test]
fn test_non_json_content_type_is_invalid_data() {
    let server = TestServer::start();
    let (status, body) = server.post_raw(
        Some("text/plain"),
        r#"{"attestations":[{"data":{"id":"x","ok":true}}]}"#,
    );
    assert_eq!(status, 200);
    assert_eq!(body, json!({"ok": false, "error": "invalid data"}));
}

#[test]
fn test_empty_body_is_invalid_data() {
    let server = TestServer::start();
    let (status, body) = server.post_raw(Some("application/json"), "");
    assert_eq!(status, 200);
    assert_eq!(body, json!({"ok": false, "error": "invalid data"}));
}

#[test]
fn test_whitespace_only_json_body_is_internal_error() {
    let server = TestServer::start();
    let (status, body) = server.post_raw(Some("application/json"), " \n\t ");
    assert_eq!(status, 500);
    assert_eq!(body, json!({"ok": false, "error": "internal error"}));
}

#[test]
fn test_malformed_json_is_internal_error() {
    let server = TestServer::start();
    let (status, body) = server.post_raw(Some("application/json"), "{\"attestations\": [");
    assert_eq!(status, 500);
    assert_eq!(body, json!({"ok": false, "error": "internal error"}));
}

#[test]
fn test_oversized_body_is_internal_error() {
    let server = TestServer::start_with(ServerConfig {
        max_body_bytes: 64,
        ..ServerConfig::default()
    });
    let pad = "x".repeat(200);
    let big = json!({"attestations": [{"data": {"id": "x", "ok": true, "pad": pad}}]});

    let (status, body) = server.post_json(&big);
    assert_eq!(status, 500);
    assert_eq!(body, json!({"ok": false, "error": "internal error"}));
    assert_eq!(server.get("/sig/x").1["attestations"], json!([]));
}

#[test]
fn test_appends_across_requests() {
    let server = TestServer::start();
    server.post_json(&json!({"attestations": [{"data": {"id": "x", "ok": 1}}]}));
    server.post_json(&json!({"attestations": [{"data": {"id": "x", "ok": 2}}]}));

    let (_, body) = server.get("/sig/x");
    let oks: Vec<Value> = body["attestations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["data"]["ok"].clone())
        .collect();
    assert_eq!(oks, vec![json!(1), json!(2)]);
}

#[test]
fn test_concurrent_posts_to_same_identifier() {
    let server = TestServer::start();

    thread::scope(|scope| {
        for caller in 0..6 {
            let server = &server;
            scope.spawn(move || {
                let body = json!({"attestations": [
                    {"data": {"id": "z", "ok": true, "caller": caller}}
                ]});
                let (status, _) = server.post_json(&body);
                assert_eq!(status, 200);
            });
        }
    });

    let (_, body) = server.get("/sig/z");
    assert_eq!(body["attestations"].as_array().unwrap().len(), 6);
}

// =============================================================================
// ROUTING & PERSISTENCE
// =============================================================================

#[test]
fn test_unknown_route_is_404() {
    let server = TestServer::start();
    for path in ["/", "/sig", "/sig/", "/sig/a/b", "/other"] {
        let (status, body) = server.get(path);
        assert_eq!(status, 404, "GET {path}");
        assert_eq!(body, json!({"ok": false, "error": "not found"}));
    }
}

#[test]
fn test_sled_backed_server_persists() {
    let dir = TempDir::new().unwrap();
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        workers: 2,
        ..ServerConfig::default()
    };

    {
        let store = AttestationStore::new(SledBackend::open(dir.path()).unwrap());
        let server = TestServer::spawn(HttpServer::bind(&config, store).unwrap());
        let (_, body) =
            server.post_json(&json!({"attestations": [{"data": {"id": "x", "ok": true}}]}));
        assert_eq!(body, json!({"ok": true}));
    }

    let store = AttestationStore::new(SledBackend::open(dir.path()).unwrap());
    let server = TestServer::spawn(HttpServer::bind(&config, store).unwrap());
    assert_eq!(
        server.get("/sig/x").1,
        json!({"ok": true, "attestations": [{"data": {"id": "x", "ok": true}}]})
    );
}
