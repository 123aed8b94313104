// crates/survey-dash-source/tests/common/mod.rs
// ============================================================================
// Module: Source Test Support
// Description: Scripted local HTTP server and recording audit sink.
// Purpose: Observe exactly what the client sends and logs.
// Dependencies: survey-dash-source, tiny_http
// ============================================================================

//! ## Overview
//! [`StubServer`] answers a fixed script of responses on a loopback port and
//! records every request it receives. [`RecordingSink`] captures audit events.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use survey_dash_source::AuditSink;
use survey_dash_source::FetchAuditEvent;
use survey_dash_source::RemoteSourceClient;
use survey_dash_source::RemoteSourceConfig;
use survey_dash_source::ServiceAuditEvent;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Stub Server
// ============================================================================

/// API key used by test clients.
pub const TEST_API_KEY: &str = "test-secret-token";

/// One scripted response.
pub struct StubResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
    /// Extra headers as `(name, value)` pairs.
    pub headers: Vec<(String, String)>,
}

impl StubResponse {
    /// A JSON response with the given status.
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: Vec::new(),
        }
    }

    /// A raw text response with the given status.
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: Vec::new(),
        }
    }
}

/// A request observed by the stub server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Raw request target (path and query).
    pub url: String,
    /// Headers with lower-cased names.
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Returns the first value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers.iter().find(|(field, _)| *field == name).map(|(_, value)| value.as_str())
    }
}

/// Loopback server answering a fixed script of responses.
pub struct StubServer {
    /// Base URL of the server (no trailing slash).
    pub base_url: String,
    /// Requests observed so far.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Server thread.
    handle: JoinHandle<()>,
}

impl StubServer {
    /// Starts a server that answers `script` in order, then stops.
    pub fn start(script: Vec<StubResponse>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            for scripted in script {
                let Ok(Some(request)) = server.recv_timeout(Duration::from_secs(5)) else {
                    return;
                };
                recorded.lock().unwrap().push(RecordedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    headers: request
                        .headers()
                        .iter()
                        .map(|header| {
                            (header.field.to_string().to_ascii_lowercase(), header.value.to_string())
                        })
                        .collect(),
                });
                let mut response =
                    Response::from_string(scripted.body).with_status_code(scripted.status);
                response.add_header(
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
                );
                for (name, value) in scripted.headers {
                    response.add_header(Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap());
                }
                let _ = request.respond(response);
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            requests,
            handle,
        }
    }

    /// Waits for the script to finish and returns the observed requests.
    pub fn finish(self) -> Vec<RecordedRequest> {
        self.handle.join().unwrap();
        let requests = self.requests.lock().unwrap();
        requests.clone()
    }
}

/// Returns a configuration pointing at `base_url`.
pub fn config_for(base_url: &str) -> RemoteSourceConfig {
    RemoteSourceConfig {
        timeout_ms: Some(5_000),
        ..RemoteSourceConfig::new(base_url, TEST_API_KEY)
    }
}

/// Returns a client pointing at `base_url`.
pub fn client_for(base_url: &str) -> RemoteSourceClient {
    RemoteSourceClient::new(config_for(base_url)).unwrap()
}

// ============================================================================
// SECTION: Audit Capture
// ============================================================================

/// Audit sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingSink {
    /// Fetch events in arrival order.
    pub fetches: Mutex<Vec<FetchAuditEvent>>,
    /// Service events in arrival order.
    pub services: Mutex<Vec<ServiceAuditEvent>>,
}

impl AuditSink for RecordingSink {
    fn record_fetch(&self, event: &FetchAuditEvent) {
        self.fetches.lock().unwrap().push(event.clone());
    }

    fn record_service(&self, event: &ServiceAuditEvent) {
        self.services.lock().unwrap().push(event.clone());
    }
}
