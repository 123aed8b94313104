// crates/survey-dash-core/src/core/mod.rs
// ============================================================================
// Module: Survey Dash Core Types
// Description: Canonical record, dashboard, and identifier structures.
// Purpose: Provide stable, serializable types shared by every Survey Dash crate.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Survey Dash core types define raw and normalized platform records, the
//! dashboard configuration model, and the validation error taxonomy. These
//! types are the canonical source of truth for any derived API surface.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod dashboard;
pub mod identifiers;
pub mod records;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dashboard::Calculation;
pub use dashboard::ChartConfig;
pub use dashboard::ChartType;
pub use dashboard::Comparison;
pub use dashboard::ComparisonPeriod;
pub use dashboard::DashboardConfig;
pub use dashboard::DashboardDraft;
pub use dashboard::DashboardPatch;
pub use dashboard::Filters;
pub use dashboard::ItemContent;
pub use dashboard::ItemKind;
pub use dashboard::LayoutItem;
pub use dashboard::MetricConfig;
pub use dashboard::TableConfig;
pub use dashboard::TextConfig;
pub use identifiers::DASHBOARD_ID_PREFIX;
pub use identifiers::DashboardId;
pub use identifiers::FormId;
pub use identifiers::LayoutItemId;
pub use identifiers::SubmissionId;
pub use records::Form;
pub use records::FormStatus;
pub use records::RawForm;
pub use records::RawIdentifier;
pub use records::RawSubmission;
pub use records::Record;
pub use records::Submission;
pub use records::SubmissionStatus;
pub use validation::ValidationError;
pub use validation::ValidationErrorKind;
