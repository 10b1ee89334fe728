//! Access logging in Apache combined format
//!
//! One line per request on the `signet::access` log target:
//!
//! ```text
//! 127.0.0.1 - - [18/Oct/2026:09:12:44 +0000] "GET /sig/x HTTP/1.1" 200 42 "-" "curl/8.5.0"
//! ```

use chrono::{DateTime, Utc};
use tiny_http::Request;

/// Log target for access lines
pub const ACCESS_TARGET: &str = "signet::access";

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Request fields captured before the request is consumed by `respond`
#[derive(Debug, Clone)]
pub struct AccessEntry {
    remote: Option<String>,
    method: String,
    url: String,
    http_version: String,
    referrer: Option<String>,
    user_agent: Option<String>,
    received_at: DateTime<Utc>,
}

impl AccessEntry {
    /// Capture the loggable parts of `request`
    #[must_use]
    pub fn from_request(request: &Request) -> Self {
        let header = |name: &'static str| {
            request
                .headers()
                .iter()
                .find(|h| h.field.equiv(name))
                .map(|h| h.value.as_str().to_string())
        };
        let version = request.http_version();

        Self {
            remote: request.remote_addr().map(|addr| addr.ip().to_string()),
            method: request.method().to_string(),
            url: request.url().to_string(),
            http_version: format!("{}.{}", version.0, version.1),
            referrer: header("Referer"),
            user_agent: header("User-Agent"),
            received_at: Utc::now(),
        }
    }

    /// Render the combined-format line for a finished response
    #[must_use]
    pub fn format(&self, status: u16, length: usize) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {} \"{}\" \"{}\"",
            self.remote.as_deref().unwrap_or("-"),
            self.received_at.format(CLF_TIME),
            self.method,
            self.url,
            self.http_version,
            status,
            length,
            self.referrer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// Emit the access line
    pub fn log(&self, status: u16, length: usize) {
        log::info!(target: ACCESS_TARGET, "{}", self.format(status, length));
    }
}
