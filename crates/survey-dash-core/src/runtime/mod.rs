// crates/survey-dash-core/src/runtime/mod.rs
// ============================================================================
// Module: Survey Dash Runtime
// Description: Normalization and computation over record values.
// Purpose: Turn raw platform records into chart rows, table rows, and metrics.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime functions are pure: each call operates on the values passed in and
//! returns new values, so they are safe to call from any number of threads.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod chart;
pub mod metric;
pub mod normalize;
pub mod period;
pub mod table;
pub mod values;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use chart::ChartRow;
pub use chart::DEFAULT_PIE_FIELD;
pub use chart::process_chart_data;
pub use metric::ChangeDirection;
pub use metric::DEFAULT_TIME_FIELD;
pub use metric::MetricEngine;
pub use metric::MetricValue;
pub use normalize::normalize_form;
pub use normalize::normalize_submission;
pub use normalize::normalize_submission_with;
pub use period::ComparisonWindows;
pub use period::TimeWindow;
pub use table::project_table;
pub use values::matches_filters;
