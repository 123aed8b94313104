// crates/survey-dash-core/src/runtime/normalize.rs
// ============================================================================
// Module: Survey Dash Normalizer
// Description: Pure conversion of raw platform records into normalized shapes.
// Purpose: Give downstream processing one stable record shape.
// Dependencies: crate::core, crate::interfaces, time
// ============================================================================

//! ## Overview
//! Normalization is pure and total over well-formed input: it performs no
//! I/O and fails only when a required raw field is absent or unparseable.
//! Empty strings count as absent, matching the platform's convention of
//! sending blank optional labels.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::OffsetDateTime;
use time::UtcOffset;
use time::format_description::well_known::Rfc3339;

use crate::core::Form;
use crate::core::FormId;
use crate::core::FormStatus;
use crate::core::RawForm;
use crate::core::RawSubmission;
use crate::core::Submission;
use crate::core::SubmissionId;
use crate::core::SubmissionStatus;
use crate::core::ValidationError;
use crate::interfaces::CompletenessPolicy;
use crate::interfaces::NonEmptyPayload;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Platform state that maps to [`FormStatus::Active`].
const OPEN_STATE: &str = "open";

// ============================================================================
// SECTION: Forms
// ============================================================================

/// Normalizes a raw form.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when `id`, `createdAt`, or both
/// `title` and `name` are absent, and [`ValidationError::InvalidValue`] when
/// `createdAt` is not RFC 3339.
pub fn normalize_form(raw: &RawForm) -> Result<Form, ValidationError> {
    let id = present(raw.id.as_deref()).ok_or_else(|| ValidationError::missing("id"))?;
    let title = present(raw.title.as_deref())
        .or_else(|| present(raw.name.as_deref()))
        .ok_or_else(|| ValidationError::missing("title"))?;
    let created_at =
        present(raw.created_at.as_deref()).ok_or_else(|| ValidationError::missing("createdAt"))?;
    let created = parse_timestamp("createdAt", created_at)?.to_offset(UtcOffset::UTC).date();
    let status = if raw.state.as_deref() == Some(OPEN_STATE) {
        FormStatus::Active
    } else {
        FormStatus::Inactive
    };
    Ok(Form {
        id: FormId::new(id),
        title: title.to_string(),
        created,
        status,
        submission_count: raw.submissions.unwrap_or(0),
    })
}

// ============================================================================
// SECTION: Submissions
// ============================================================================

/// Normalizes a raw submission with the default [`NonEmptyPayload`] policy.
///
/// # Errors
///
/// See [`normalize_submission_with`].
pub fn normalize_submission(
    raw: &RawSubmission,
    form_title_hint: Option<&str>,
) -> Result<Submission, ValidationError> {
    normalize_submission_with(raw, form_title_hint, &NonEmptyPayload)
}

/// Normalizes a raw submission with an explicit completeness policy.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when `instanceId`, `formId`,
/// `createdAt`, or both submitter fields are absent, and
/// [`ValidationError::InvalidValue`] when `createdAt` is not RFC 3339.
pub fn normalize_submission_with<P>(
    raw: &RawSubmission,
    form_title_hint: Option<&str>,
    policy: &P,
) -> Result<Submission, ValidationError>
where
    P: CompletenessPolicy + ?Sized,
{
    let id = present(raw.instance_id.as_deref())
        .ok_or_else(|| ValidationError::missing("instanceId"))?;
    let form_id =
        present(raw.form_id.as_deref()).ok_or_else(|| ValidationError::missing("formId"))?;
    let submitted_by = match present(raw.submitter_name.as_deref()) {
        Some(name) => name.to_string(),
        None => {
            let submitter_id =
                raw.submitter_id.as_ref().ok_or_else(|| ValidationError::missing("submitterId"))?;
            format!("User {submitter_id}")
        }
    };
    let created_at =
        present(raw.created_at.as_deref()).ok_or_else(|| ValidationError::missing("createdAt"))?;
    let submitted_at = parse_timestamp("createdAt", created_at)?;
    let payload = raw.data.clone().unwrap_or_default();
    let status = if policy.is_complete(&payload) {
        SubmissionStatus::Complete
    } else {
        SubmissionStatus::Incomplete
    };
    let form = present(form_title_hint).unwrap_or(form_id).to_string();
    Ok(Submission {
        id: SubmissionId::new(id),
        form_id: FormId::new(form_id),
        form,
        submitted_by,
        submitted_at,
        status,
        payload,
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Treats empty strings as absent.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Parses an RFC 3339 timestamp for the named field.
fn parse_timestamp(field: &str, value: &str) -> Result<OffsetDateTime, ValidationError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|err| ValidationError::invalid(field, err.to_string()))
}
