// crates/survey-dash-service/src/service.rs
// ============================================================================
// Module: Dashboard Service
// Description: Fetch, normalize, and compute dashboard data on request.
// Purpose: Provide the request/response surface consumed by the presentation layer.
// Dependencies: survey-dash-core, survey-dash-source, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`DashboardService`] wraps a [`FormSource`] and turns presentation requests
//! into normalized forms, submissions, chart rows, metrics, and table rows. A
//! data source key is a form identifier; its records are the form's
//! normalized submissions flattened with [`Submission::to_record`].
//!
//! Project-wide submission listings fetch forms on scoped worker threads, a
//! bounded number at a time. A failing form is reported in
//! [`SubmissionListing::failures`] and the remaining forms still complete.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::thread;

use serde_json::Value;
use survey_dash_core::ChartConfig;
use survey_dash_core::ChartRow;
use survey_dash_core::DEFAULT_TIME_FIELD;
use survey_dash_core::Form;
use survey_dash_core::FormId;
use survey_dash_core::FormSource;
use survey_dash_core::MetricConfig;
use survey_dash_core::MetricEngine;
use survey_dash_core::MetricValue;
use survey_dash_core::RawSubmission;
use survey_dash_core::Record;
use survey_dash_core::RemoteError;
use survey_dash_core::Submission;
use survey_dash_core::TableConfig;
use survey_dash_core::ValidationError;
use survey_dash_core::normalize_form;
use survey_dash_core::normalize_submission;
use survey_dash_core::process_chart_data;
use survey_dash_core::project_table;
use survey_dash_source::AuditOutcome;
use survey_dash_source::AuditSink;
use survey_dash_source::NoopAuditSink;
use survey_dash_source::ServiceAuditEvent;
use survey_dash_source::ServiceAuditEventParams;
use thiserror::Error;
use time::OffsetDateTime;

use crate::requests::FormFailure;
use crate::requests::ServiceRequest;
use crate::requests::ServiceResponse;
use crate::requests::SubmissionListing;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of forms fetched in parallel during a project-wide listing.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Form listing label.
const OP_LIST_FORMS: &str = "list_forms";
/// Submission listing label.
const OP_LIST_SUBMISSIONS: &str = "list_submissions";
/// Chart computation label.
const OP_VISUALIZE: &str = "visualize";
/// Metric computation label.
const OP_COMPUTE_METRIC: &str = "compute_metric";
/// Table projection label.
const OP_TABLE: &str = "table";
/// Request decoding label.
const OP_DECODE_REQUEST: &str = "decode_request";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Dashboard service errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Remote failures are surfaced, never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The remote platform call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// Input or configuration failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The requested form does not exist.
    #[error("form not found: {form_id}")]
    FormNotFound {
        /// Requested form identifier.
        form_id: FormId,
    },
    /// A JSON request could not be decoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// A response could not be encoded as JSON.
    #[error("response serialization failed: {0}")]
    Serialization(String),
}

impl ServiceError {
    /// Returns a stable label for audit records and failure reports.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Remote(err) => err.kind_label(),
            Self::Validation(err) => err.kind().as_str(),
            Self::FormNotFound {
                ..
            } => "form_not_found",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Returns true when a retry with backoff may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Remote(err) => err.is_retryable(),
            _ => false,
        }
    }
}

// ============================================================================
// SECTION: Audit Summaries
// ============================================================================

/// Shapes a successful result into audit fields.
trait AuditSummary {
    /// Number of items returned.
    fn item_count(&self) -> usize;

    /// Forms that failed while producing the result.
    fn failed_forms(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<T> AuditSummary for Vec<T> {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl AuditSummary for SubmissionListing {
    fn item_count(&self) -> usize {
        self.submissions.len()
    }

    fn failed_forms(&self) -> Vec<String> {
        self.failures.iter().map(|failure| failure.form_id.to_string()).collect()
    }
}

impl AuditSummary for MetricValue {
    fn item_count(&self) -> usize {
        1
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Presentation-facing dashboard service.
///
/// # Invariants
/// - Holds no mutable state; every call fetches fresh data.
/// - Metric comparisons are anchored at the caller's `as_of`, never the clock.
pub struct DashboardService<S> {
    /// Source of raw forms and submissions.
    source: S,
    /// Audit sink for service events.
    audit: Arc<dyn AuditSink>,
    /// Record field read for metric comparison timestamps.
    time_field: String,
    /// Forms fetched in parallel during project-wide listings.
    max_concurrency: usize,
}

impl<S: FormSource + Sync> DashboardService<S> {
    /// Creates a service over `source` with a no-op audit sink.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            audit: Arc::new(NoopAuditSink),
            time_field: DEFAULT_TIME_FIELD.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Returns the service reporting requests to `audit`.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the service reading metric timestamps from `field`.
    #[must_use]
    pub fn with_time_field(mut self, field: impl Into<String>) -> Self {
        self.time_field = field.into();
        self
    }

    /// Returns the service fetching at most `limit` forms at once (minimum 1).
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    /// Returns the wrapped source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Lists every form of the project.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the fetch or normalization fails.
    pub fn list_forms(&self) -> Result<Vec<Form>, ServiceError> {
        let result = self.fetch_forms();
        self.audited(OP_LIST_FORMS, result)
    }

    /// Lists submissions for one form, or for every form when `form_id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::FormNotFound`] for an unknown form and other
    /// [`ServiceError`] values when a single-form listing fails. A
    /// project-wide listing only fails when the form listing itself fails.
    pub fn list_submissions(
        &self,
        form_id: Option<&FormId>,
    ) -> Result<SubmissionListing, ServiceError> {
        let result = match form_id {
            Some(form_id) => self.form_submissions(form_id).map(|submissions| SubmissionListing {
                submissions,
                failures: Vec::new(),
            }),
            None => self.project_submissions(),
        };
        self.audited(OP_LIST_SUBMISSIONS, result)
    }

    /// Computes chart rows for the chart's data source.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the data source cannot be loaded or the
    /// chart settings are invalid.
    pub fn visualize(&self, chart: &ChartConfig) -> Result<Vec<ChartRow>, ServiceError> {
        let result = self
            .records(&chart.data_source)
            .and_then(|records| process_chart_data(&records, chart).map_err(ServiceError::from));
        self.audited(OP_VISUALIZE, result)
    }

    /// Computes a metric over its data source anchored at `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for invalid metric settings (checked
    /// before any fetch) and other [`ServiceError`] values when loading fails.
    pub fn compute_metric(
        &self,
        metric: &MetricConfig,
        as_of: OffsetDateTime,
    ) -> Result<MetricValue, ServiceError> {
        let result = metric
            .validate()
            .map_err(ServiceError::from)
            .and_then(|()| self.records(&metric.data_source))
            .and_then(|records| {
                let engine = MetricEngine::new(as_of).with_time_field(self.time_field.as_str());
                engine.compute(&records, metric).map_err(ServiceError::from)
            });
        self.audited(OP_COMPUTE_METRIC, result)
    }

    /// Projects the table's data source onto its columns.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the data source cannot be loaded.
    pub fn table(&self, table: &TableConfig) -> Result<Vec<Record>, ServiceError> {
        let result = self.records(&table.data_source).map(|records| project_table(&records, table));
        self.audited(OP_TABLE, result)
    }

    /// Dispatches a typed request.
    ///
    /// # Errors
    ///
    /// Returns the error of the dispatched operation.
    pub fn handle(&self, request: &ServiceRequest) -> Result<ServiceResponse, ServiceError> {
        match request {
            ServiceRequest::ListForms => Ok(ServiceResponse::Forms {
                forms: self.list_forms()?,
            }),
            ServiceRequest::ListSubmissions {
                form_id,
            } => Ok(ServiceResponse::Submissions(self.list_submissions(form_id.as_ref())?)),
            ServiceRequest::Visualize {
                chart,
            } => Ok(ServiceResponse::Chart {
                data: self.visualize(chart)?,
            }),
            ServiceRequest::ComputeMetric {
                metric,
                as_of,
            } => Ok(ServiceResponse::Metric {
                metric: self.compute_metric(metric, *as_of)?,
            }),
            ServiceRequest::Table {
                table,
            } => Ok(ServiceResponse::Table {
                rows: self.table(table)?,
            }),
        }
    }

    /// Decodes a JSON request, dispatches it, and encodes the response.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidRequest`] for undecodable payloads and
    /// the error of the dispatched operation otherwise.
    pub fn handle_json(&self, payload: Value) -> Result<Value, ServiceError> {
        let request: ServiceRequest = match serde_json::from_value(payload) {
            Ok(request) => request,
            Err(err) => {
                let err = ServiceError::InvalidRequest(err.to_string());
                self.record(OP_DECODE_REQUEST, 0, Vec::new(), Some(&err));
                return Err(err);
            }
        };
        let response = self.handle(&request)?;
        serde_json::to_value(response).map_err(|err| ServiceError::Serialization(err.to_string()))
    }

    // ------------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------------

    /// Fetches and normalizes every form.
    fn fetch_forms(&self) -> Result<Vec<Form>, ServiceError> {
        let raw_forms = self.source.fetch_forms()?;
        raw_forms.iter().map(|raw| normalize_form(raw).map_err(ServiceError::from)).collect()
    }

    /// Fetches one form's submissions, labelled with the form title.
    fn form_submissions(&self, form_id: &FormId) -> Result<Vec<Submission>, ServiceError> {
        let raw_form = self.source.fetch_form(form_id).map_err(|err| {
            if err.is_not_found() {
                ServiceError::FormNotFound {
                    form_id: form_id.clone(),
                }
            } else {
                ServiceError::Remote(err)
            }
        })?;
        let form = normalize_form(&raw_form)?;
        self.titled_submissions(form_id, &form.title)
    }

    /// Fetches and normalizes a form's submissions under a known title.
    fn titled_submissions(
        &self,
        form_id: &FormId,
        title: &str,
    ) -> Result<Vec<Submission>, ServiceError> {
        let raw_submissions = self.source.fetch_submissions(form_id)?;
        normalize_all(form_id, title, raw_submissions)
    }

    /// Lists submissions of every form, isolating per-form failures.
    fn project_submissions(&self) -> Result<SubmissionListing, ServiceError> {
        let forms = self.fetch_forms()?;
        let mut listing = SubmissionListing::default();
        for batch in forms.chunks(self.max_concurrency) {
            let outcomes: Vec<Result<Vec<Submission>, ServiceError>> = thread::scope(|scope| {
                let workers: Vec<_> = batch
                    .iter()
                    .map(|form| scope.spawn(move || self.titled_submissions(&form.id, &form.title)))
                    .collect();
                workers
                    .into_iter()
                    .map(|worker| {
                        worker.join().unwrap_or_else(|_| {
                            Err(ServiceError::Remote(RemoteError::Transport(
                                "form worker panicked".to_string(),
                            )))
                        })
                    })
                    .collect()
            });
            for (form, outcome) in batch.iter().zip(outcomes) {
                match outcome {
                    Ok(submissions) => listing.submissions.extend(submissions),
                    Err(err) => listing.failures.push(FormFailure {
                        form_id: form.id.clone(),
                        error_kind: err.kind_label(),
                        message: err.to_string(),
                        retryable: err.is_retryable(),
                    }),
                }
            }
        }
        Ok(listing)
    }

    /// Loads a data source as flattened submission records.
    fn records(&self, data_source: &str) -> Result<Vec<Record>, ServiceError> {
        if data_source.trim().is_empty() {
            return Err(ValidationError::missing("dataSource").into());
        }
        let submissions = self.form_submissions(&FormId::new(data_source))?;
        Ok(submissions.iter().map(Submission::to_record).collect())
    }

    // ------------------------------------------------------------------------
    // Audit
    // ------------------------------------------------------------------------

    /// Records the outcome of an operation and passes the result through.
    fn audited<T: AuditSummary>(
        &self,
        operation: &'static str,
        result: Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        match &result {
            Ok(value) => self.record(operation, value.item_count(), value.failed_forms(), None),
            Err(err) => self.record(operation, 0, Vec::new(), Some(err)),
        }
        result
    }

    /// Emits one service audit event.
    fn record(
        &self,
        operation: &'static str,
        item_count: usize,
        failed_forms: Vec<String>,
        error: Option<&ServiceError>,
    ) {
        let event = ServiceAuditEvent::new(ServiceAuditEventParams {
            operation,
            outcome: if error.is_some() { AuditOutcome::Error } else { AuditOutcome::Ok },
            item_count,
            failed_forms,
            error_kind: error.map(ServiceError::kind_label),
        });
        self.audit.record_service(&event);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Normalizes raw submissions fetched from `form_id`.
///
/// Records that omit `formId` inherit the form they were listed under.
fn normalize_all(
    form_id: &FormId,
    title: &str,
    raw_submissions: Vec<RawSubmission>,
) -> Result<Vec<Submission>, ServiceError> {
    raw_submissions
        .into_iter()
        .map(|mut raw| {
            if raw.form_id.as_deref().is_none_or(str::is_empty) {
                raw.form_id = Some(form_id.to_string());
            }
            normalize_submission(&raw, Some(title)).map_err(ServiceError::from)
        })
        .collect()
}
