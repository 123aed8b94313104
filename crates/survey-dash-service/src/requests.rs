// crates/survey-dash-service/src/requests.rs
// ============================================================================
// Module: Service Requests
// Description: Request and response payloads for the dashboard service.
// Purpose: Let a presentation layer dispatch operations as JSON data.
// Dependencies: survey-dash-core, serde, time
// ============================================================================

//! ## Overview
//! Requests are tagged by `operation`; responses are tagged by `type`. Field
//! names use camelCase on the wire, matching the dashboard configuration model.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use survey_dash_core::ChartConfig;
use survey_dash_core::ChartRow;
use survey_dash_core::Form;
use survey_dash_core::FormId;
use survey_dash_core::MetricConfig;
use survey_dash_core::MetricValue;
use survey_dash_core::Record;
use survey_dash_core::Submission;
use survey_dash_core::TableConfig;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Operation requested by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServiceRequest {
    /// List every form of the project.
    ListForms,
    /// List submissions, optionally for a single form.
    ListSubmissions {
        /// Restricts the listing to one form when present.
        #[serde(default)]
        form_id: Option<FormId>,
    },
    /// Compute chart rows for a data source.
    Visualize {
        /// Chart settings, including the data source.
        chart: ChartConfig,
    },
    /// Compute a scalar metric anchored at `as_of`.
    ComputeMetric {
        /// Metric settings, including the data source.
        metric: MetricConfig,
        /// Instant that anchors comparison windows.
        #[serde(with = "time::serde::rfc3339")]
        as_of: OffsetDateTime,
    },
    /// Project a data source onto table columns.
    Table {
        /// Table settings, including the data source.
        table: TableConfig,
    },
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Result of a submission listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListing {
    /// Normalized submissions in form order, then platform order.
    pub submissions: Vec<Submission>,
    /// Forms whose submissions could not be listed.
    pub failures: Vec<FormFailure>,
}

/// One form that failed during a project-wide listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFailure {
    /// Form whose listing failed.
    pub form_id: FormId,
    /// Stable error label.
    pub error_kind: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Whether a retry with backoff may succeed.
    pub retryable: bool,
}

/// Response payload for a [`ServiceRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceResponse {
    /// Normalized forms.
    Forms {
        /// Forms in platform order.
        forms: Vec<Form>,
    },
    /// Normalized submissions with per-form failures.
    Submissions(SubmissionListing),
    /// Chart rows.
    Chart {
        /// Rows in chart order.
        data: Vec<ChartRow>,
    },
    /// Scalar metric.
    Metric {
        /// Computed value.
        metric: MetricValue,
    },
    /// Projected table rows.
    Table {
        /// Rows keyed by column.
        rows: Vec<Record>,
    },
}
