// crates/survey-dash-source/src/lib.rs
// ============================================================================
// Module: Survey Dash Source
// Description: Remote survey platform client and audit sinks.
// Purpose: Provide the HTTP-backed form source used by Survey Dash services.
// Dependencies: survey-dash-core, reqwest, serde, url
// ============================================================================

//! ## Overview
//! This crate ships [`RemoteSourceClient`], the blocking HTTP implementation
//! of [`survey_dash_core::FormSource`], together with the structured audit
//! events and sinks shared by the client and the service layer.
//! Invariants:
//! - Requests are bounded by explicit configuration; there is no ambient state.
//! - Credentials never reach logs, audit events, or `Debug` output.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditOutcome;
pub use audit::AuditSink;
pub use audit::FetchAuditEvent;
pub use audit::FetchAuditEventParams;
pub use audit::FetchEndpoint;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::ServiceAuditEvent;
pub use audit::ServiceAuditEventParams;
pub use audit::StderrAuditSink;
pub use client::DEFAULT_MAX_RESPONSE_BYTES;
pub use client::DEFAULT_PROJECT_ID;
pub use client::DEFAULT_USER_AGENT;
pub use client::RemoteSourceClient;
pub use client::RemoteSourceConfig;
pub use client::SourceConfigError;
