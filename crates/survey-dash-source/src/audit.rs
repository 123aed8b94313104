// crates/survey-dash-source/src/audit.rs
// ============================================================================
// Module: Survey Dash Audit Logging
// Description: Structured audit events for remote fetches and service requests.
// Purpose: Emit redacted JSON-lines audit records without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks. Events are plain serde
//! structs written as JSON lines, so deployments can route them to their
//! preferred logging pipeline. Credentials never appear in any event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome label shared by all audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The operation succeeded.
    Ok,
    /// The operation failed.
    Error,
}

/// Remote endpoint classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchEndpoint {
    /// Project form listing.
    Forms,
    /// Single form lookup.
    Form,
    /// One page of a form's submissions.
    Submissions,
}

/// Remote fetch audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct FetchAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Endpoint classification.
    pub endpoint: FetchEndpoint,
    /// Form identifier when the endpoint is form-scoped.
    pub form_id: Option<String>,
    /// Zero-based page index for submission pages.
    pub page: Option<usize>,
    /// HTTP status when the platform answered.
    pub status: Option<u16>,
    /// Request outcome.
    pub outcome: AuditOutcome,
    /// Number of items decoded from the response.
    pub item_count: usize,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

/// Inputs required to construct a fetch audit event.
pub struct FetchAuditEventParams {
    /// Endpoint classification.
    pub endpoint: FetchEndpoint,
    /// Form identifier when the endpoint is form-scoped.
    pub form_id: Option<String>,
    /// Zero-based page index for submission pages.
    pub page: Option<usize>,
    /// HTTP status when the platform answered.
    pub status: Option<u16>,
    /// Request outcome.
    pub outcome: AuditOutcome,
    /// Number of items decoded from the response.
    pub item_count: usize,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

impl FetchAuditEvent {
    /// Creates a new fetch audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: FetchAuditEventParams) -> Self {
        Self {
            event: "remote_fetch",
            timestamp_ms: now_ms(),
            endpoint: params.endpoint,
            form_id: params.form_id,
            page: params.page,
            status: params.status,
            outcome: params.outcome,
            item_count: params.item_count,
            error_kind: params.error_kind,
        }
    }
}

/// Service request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Service operation label.
    pub operation: &'static str,
    /// Request outcome.
    pub outcome: AuditOutcome,
    /// Number of items returned.
    pub item_count: usize,
    /// Forms whose fetch failed during a fan-out listing.
    pub failed_forms: Vec<String>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

/// Inputs required to construct a service audit event.
pub struct ServiceAuditEventParams {
    /// Service operation label.
    pub operation: &'static str,
    /// Request outcome.
    pub outcome: AuditOutcome,
    /// Number of items returned.
    pub item_count: usize,
    /// Forms whose fetch failed during a fan-out listing.
    pub failed_forms: Vec<String>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

impl ServiceAuditEvent {
    /// Creates a new service audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ServiceAuditEventParams) -> Self {
        Self {
            event: "service_request",
            timestamp_ms: now_ms(),
            operation: params.operation,
            outcome: params.outcome,
            item_count: params.item_count,
            failed_forms: params.failed_forms,
            error_kind: params.error_kind,
        }
    }
}

/// Milliseconds since the Unix epoch; zero if the clock is before it.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for Survey Dash events.
pub trait AuditSink: Send + Sync {
    /// Record a remote fetch event.
    fn record_fetch(&self, event: &FetchAuditEvent);

    /// Record a service request event.
    fn record_service(&self, _event: &ServiceAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_fetch(&self, event: &FetchAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_service(&self, event: &ServiceAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_fetch(&self, event: &FetchAuditEvent) {
        self.append(event);
    }

    fn record_service(&self, event: &ServiceAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_fetch(&self, _event: &FetchAuditEvent) {}

    fn record_service(&self, _event: &ServiceAuditEvent) {}
}
