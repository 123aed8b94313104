// crates/survey-dash-core/src/core/records.rs
// ============================================================================
// Module: Survey Dash Records
// Description: Raw platform records and their normalized internal shapes.
// Purpose: Keep raw and normalized data as distinct types so they cannot be confused.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Raw records mirror the remote platform's JSON exactly as received; every
//! field is optional so that absent data surfaces as a validation error during
//! normalization rather than as a decode failure. Normalized [`Form`] and
//! [`Submission`] values are immutable snapshots produced by the normalizer.
//! Invariants:
//! - Raw and normalized shapes are different types; re-normalizing a
//!   normalized record is not expressible.
//! - A later fetch produces new values; nothing here is mutated in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use time::Date;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::identifiers::FormId;
use crate::core::identifiers::SubmissionId;

// ============================================================================
// SECTION: Shared Types
// ============================================================================

/// A flat record consumed by the chart processor and metric engine.
pub type Record = Map<String, Value>;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// ============================================================================
// SECTION: Raw Records
// ============================================================================

/// Form metadata exactly as returned by the remote platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawForm {
    /// Platform form identifier (`xmlFormId` on the wire).
    #[serde(default, alias = "xmlFormId")]
    pub id: Option<String>,
    /// Form name; used as the title fallback.
    #[serde(default)]
    pub name: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Form version label.
    #[serde(default)]
    pub version: Option<String>,
    /// Platform state (`open`, `closing`, `closed`).
    #[serde(default)]
    pub state: Option<String>,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
    /// Submission count reported with extended metadata.
    #[serde(default)]
    pub submissions: Option<u64>,
}

/// Submitter identifier, which the platform may encode as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawIdentifier {
    /// Numeric actor identifier.
    Number(u64),
    /// Textual actor identifier.
    Text(String),
}

impl fmt::Display for RawIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => value.fmt(f),
            Self::Text(value) => value.fmt(f),
        }
    }
}

/// Submission exactly as returned by the remote platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    /// Platform instance identifier.
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Submitter actor identifier.
    #[serde(default)]
    pub submitter_id: Option<RawIdentifier>,
    /// Submitter display name.
    #[serde(default)]
    pub submitter_name: Option<String>,
    /// Submission timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Owning form identifier.
    #[serde(default)]
    pub form_id: Option<String>,
    /// Answers keyed by question identifier; values are opaque.
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

// ============================================================================
// SECTION: Normalized Records
// ============================================================================

/// Normalized form status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStatus {
    /// The form accepts submissions.
    Active,
    /// The form is closing or closed.
    Inactive,
}

impl FormStatus {
    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Normalized submission completeness status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// The completeness policy accepted the payload.
    Complete,
    /// The completeness policy rejected the payload.
    Incomplete,
}

impl SubmissionStatus {
    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
        }
    }
}

/// Normalized form metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Form identifier.
    pub id: FormId,
    /// Display title.
    pub title: String,
    /// Calendar date of creation (UTC, time of day discarded).
    #[serde(with = "iso_date")]
    pub created: Date,
    /// Active iff the platform state is `open`.
    pub status: FormStatus,
    /// Number of submissions reported by the platform.
    pub submission_count: u64,
}

/// Normalized submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Submission identifier.
    pub id: SubmissionId,
    /// Owning form identifier.
    pub form_id: FormId,
    /// Form label: the caller's title hint, else the form identifier.
    pub form: String,
    /// Submitter display label.
    pub submitted_by: String,
    /// Submission timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    /// Completeness status.
    pub status: SubmissionStatus,
    /// Answers keyed by question identifier.
    pub payload: Map<String, Value>,
}

impl Submission {
    /// Flattens the submission into a [`Record`].
    ///
    /// Payload fields come first; the metadata fields `id`, `formId`, `form`,
    /// `submittedBy`, `submittedAt`, and `status` overwrite payload keys of the
    /// same name.
    #[must_use]
    pub fn to_record(&self) -> Record {
        let mut record = self.payload.clone();
        record.insert("id".to_string(), Value::String(self.id.to_string()));
        record.insert("formId".to_string(), Value::String(self.form_id.to_string()));
        record.insert("form".to_string(), Value::String(self.form.clone()));
        record.insert("submittedBy".to_string(), Value::String(self.submitted_by.clone()));
        if let Ok(submitted_at) = self.submitted_at.format(&Rfc3339) {
            record.insert("submittedAt".to_string(), Value::String(submitted_at));
        }
        record.insert("status".to_string(), Value::String(self.status.as_str().to_string()));
        record
    }
}
