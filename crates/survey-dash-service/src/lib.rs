// crates/survey-dash-service/src/lib.rs
// ============================================================================
// Module: Survey Dash Service Library
// Description: Presentation-facing request/response surface.
// Purpose: Expose form listing, submission listing, and dashboard data operations.
// Dependencies: survey-dash-core, survey-dash-source
// ============================================================================

//! ## Overview
//! `survey-dash-service` is the thin layer a presentation shell calls into. It
//! fetches through any [`survey_dash_core::FormSource`], normalizes what it
//! receives, and hands normalized records to the core computations.
//!
//! ## Invariants
//! - One form's failure during a project-wide listing never aborts the others.
//! - Every operation emits exactly one service audit event.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod requests;
pub mod service;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use requests::FormFailure;
pub use requests::ServiceRequest;
pub use requests::ServiceResponse;
pub use requests::SubmissionListing;
pub use service::DEFAULT_MAX_CONCURRENCY;
pub use service::DashboardService;
pub use service::ServiceError;
