//! tiny_http server adapter
//!
//! Handles routing, body parsing, response conversion and the worker pool.

use std::io::{self, Read as _};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::Context;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::{Map, Value};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use super::access_log::AccessEntry;
use crate::api::{self, ApiError, ApiResponse, ErrorCode};
use crate::config::ServerConfig;
use crate::core::ports::KeyValueBackend;
use crate::core::services::AttestationStore;

/// HTTP front end for an attestation store
pub struct HttpServer<B> {
    server: Arc<Server>,
    store: AttestationStore<B>,
    workers: usize,
    max_body_bytes: usize,
    stopping: Arc<AtomicBool>,
}

impl<B> std::fmt::Debug for HttpServer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer")
            .field("addr", &self.server.server_addr().to_ip())
            .field("workers", &self.workers)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

/// Stops a running [`HttpServer`] from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    server: Arc<Server>,
    stopping: Arc<AtomicBool>,
    workers: usize,
}

impl std::fmt::Debug for ShutdownHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownHandle")
            .field("stopping", &self.stopping.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl ShutdownHandle {
    /// Ask every worker to exit once it finishes its current request
    pub fn shutdown(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        // Each unblock releases exactly one worker blocked in `recv`.
        for _ in 0..self.workers {
            self.server.unblock();
        }
    }
}

impl<B: KeyValueBackend> HttpServer<B> {
    /// Bind the listener described by `config`
    pub fn bind(config: &ServerConfig, store: AttestationStore<B>) -> anyhow::Result<Self> {
        config.validate()?;
        let addr = config.bind_addr();
        let server = Server::http(&addr)
            .map_err(|e| anyhow::anyhow!("Failed to start server on {addr}: {e}"))?;

        Ok(Self {
            server: Arc::new(server),
            store,
            workers: config.workers,
            max_body_bytes: config.max_body_bytes,
            stopping: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Handle that stops [`HttpServer::run`]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            server: Arc::clone(&self.server),
            stopping: Arc::clone(&self.stopping),
            workers: self.workers,
        }
    }

    /// Serve requests until shut down, then flush the backend
    pub fn run(&self) -> anyhow::Result<()> {
        if let Some(addr) = self.local_addr() {
            log::info!("Listening on http://{addr} with {} workers", self.workers);
        }

        thread::scope(|scope| -> io::Result<()> {
            for worker in 0..self.workers {
                let spawned = thread::Builder::new()
                    .name(format!("signet-worker-{worker}"))
                    .spawn_scoped(scope, move || self.serve(worker));
                if let Err(err) = spawned {
                    self.shutdown_handle().shutdown();
                    return Err(err);
                }
            }
            Ok(())
        })
        .context("Failed to spawn request workers")?;

        self.store.backend().flush().context("Failed to flush storage")?;
        log::info!("Server stopped");
        Ok(())
    }

    fn serve(&self, worker: usize) {
        loop {
            match self.server.recv() {
                Ok(request) => self.handle(request),
                Err(_) if self.stopping.load(Ordering::SeqCst) => break,
                Err(err) => log::warn!("Worker {worker} failed to receive request: {err}"),
            }
        }
        log::debug!("Worker {worker} exiting");
    }

    fn handle(&self, mut request: Request) {
        let entry = AccessEntry::from_request(&request);
        let reply = self.route(&mut request);
        entry.log(reply.status, reply.body.len());

        if let Err(err) = request.respond(reply.into_response()) {
            log::warn!("Failed to send response: {err}");
        }
    }

    // =========================================================================
    // ROUTING
    // =========================================================================

    fn route(&self, request: &mut Request) -> JsonReply {
        let url = request.url().to_string();
        let path = url.split_once('?').map_or(url.as_str(), |(path, _)| path);
        let method = request.method().clone();

        match (&method, path) {
            // POST /sig - append attestations
            (&Method::Post, "/sig" | "/sig/") => {
                match read_json_body(request, self.max_body_bytes) {
                    Ok(body) => handle_result(
                        api::save_attestations(&self.store, body).map(|()| None::<()>),
                    ),
                    Err(e) => error_response(&e),
                }
            },

            // GET /sig/{id} - attestation history
            _ if method == Method::Get && path.starts_with("/sig/") => {
                let raw = path.strip_prefix("/sig/").unwrap_or("");
                match decode_id(raw) {
                    Ok(Some(id)) => {
                        handle_result(api::get_attestations(&self.store, &id).map(Some))
                    },
                    Ok(None) => not_found_response(&method, path),
                    Err(e) => error_response(&e),
                }
            },

            _ => not_found_response(&method, path),
        }
    }
}

/// Decode the `{id}` path segment
///
/// Returns `Ok(None)` when the remainder is not a single non-empty segment.
fn decode_id(raw: &str) -> Result<Option<String>, ApiError> {
    let segment = raw.strip_suffix('/').unwrap_or(raw);
    if segment.is_empty() || segment.contains('/') {
        return Ok(None);
    }
    percent_decode_str(segment)
        .decode_utf8()
        .map(|id| Some(id.into_owned()))
        .map_err(|e| ApiError::internal(format!("Failed to decode path segment {raw:?}: {e}")))
}

// =============================================================================
// BODY PARSING
// =============================================================================

/// Read and parse the JSON body of a POST
///
/// A zero-length body or a non-JSON content type reads as `{}`. Oversized or
/// unparseable bodies, whitespace-only ones included, are request-handling
/// failures.
fn read_json_body(request: &mut Request, limit: usize) -> Result<Value, ApiError> {
    let empty = || Value::Object(Map::new());

    if !is_json(request) {
        return Ok(empty());
    }
    if request.body_length().is_some_and(|len| len > limit) {
        return Err(ApiError::internal(format!("Request body exceeds {limit} bytes")));
    }

    let mut body = Vec::new();
    request
        .as_reader()
        .take(u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| ApiError::internal(format!("Failed to read request body: {e}")))?;
    if body.len() > limit {
        return Err(ApiError::internal(format!("Request body exceeds {limit} bytes")));
    }
    if body.is_empty() {
        return Ok(empty());
    }

    match serde_json::from_slice(&body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(_) => Err(ApiError::internal("JSON body is neither an object nor an array")),
        Err(e) => Err(ApiError::internal(format!("Invalid JSON: {e}"))),
    }
}

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .is_some_and(|h| {
            let media_type = h.value.as_str().split(';').next().unwrap_or("");
            media_type.trim().eq_ignore_ascii_case("application/json")
        })
}

// =============================================================================
// RESPONSE CONVERSION
// =============================================================================

/// Status and serialized JSON body of a response
#[derive(Debug)]
struct JsonReply {
    status: u16,
    body: Vec<u8>,
}

impl JsonReply {
    fn into_response(self) -> Response<io::Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        if let Ok(header) = Header::from_bytes("Content-Type", "application/json; charset=utf-8") {
            response.add_header(header);
        }
        response
    }
}

/// Convert a handler result to a reply; `None` is a bare `{"ok":true}`
fn handle_result<T: Serialize>(result: Result<Option<T>, ApiError>) -> JsonReply {
    match result {
        Ok(Some(data)) => json_response(&ApiResponse::success(data), 200),
        Ok(None) => json_response(&ApiResponse::empty(), 200),
        Err(e) => error_response(&e),
    }
}

/// Create an error reply; internal details only go to the log
fn error_response(error: &ApiError) -> JsonReply {
    match error.code {
        ErrorCode::Internal => log::error!("{error}"),
        ErrorCode::InvalidData | ErrorCode::NotFound => log::debug!("{error}"),
    }
    json_response(&ApiResponse::error(error), error.status_code())
}

fn not_found_response(method: &Method, path: &str) -> JsonReply {
    error_response(&ApiError::not_found(format!("No route for {method} {path}")))
}

/// Serialize data to a reply with status code
fn json_response<T: Serialize>(data: &T, status: u16) -> JsonReply {
    let body = serde_json::to_vec(data)
        .unwrap_or_else(|_| br#"{"ok":false,"error":"internal error"}"#.to_vec());
    JsonReply { status, body }
}
