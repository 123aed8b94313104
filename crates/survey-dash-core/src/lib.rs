// crates/survey-dash-core/src/lib.rs
// ============================================================================
// Module: Survey Dash Core Library
// Description: Public API surface for the Survey Dash core.
// Purpose: Expose record types, dashboard model, interfaces, and computations.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Survey Dash core normalizes survey-platform forms and submissions, models
//! dashboard configurations, and computes chart rows and scalar metrics from
//! normalized records. It performs no I/O: remote platforms plug in through
//! the [`FormSource`] interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::CompletenessPolicy;
pub use interfaces::DEFAULT_MAX_PAGES;
pub use interfaces::DEFAULT_PAGE_SIZE;
pub use interfaces::FormSource;
pub use interfaces::NonEmptyPayload;
pub use interfaces::PageRequest;
pub use interfaces::RemoteError;
pub use interfaces::SubmissionPage;
pub use interfaces::SubmissionPages;
pub use runtime::ChangeDirection;
pub use runtime::ChartRow;
pub use runtime::DEFAULT_TIME_FIELD;
pub use runtime::MetricEngine;
pub use runtime::MetricValue;
pub use runtime::normalize_form;
pub use runtime::normalize_submission;
pub use runtime::normalize_submission_with;
pub use runtime::process_chart_data;
pub use runtime::project_table;
