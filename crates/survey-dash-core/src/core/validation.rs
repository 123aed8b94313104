// crates/survey-dash-core/src/core/validation.rs
// ============================================================================
// Module: Survey Dash Validation Errors
// Description: Error taxonomy for configuration misuse and malformed raw input.
// Purpose: Classify programmer errors so callers can fix rather than retry them.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Validation errors cover dashboard construction misuse (duplicate item ids,
//! out-of-range dimensions, missing metric fields) and malformed raw platform
//! records. They are never retried; the caller must correct the input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Validation failures raised by the normalizer, the dashboard model, and the
/// computation engines.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A layout item with the same identifier already exists.
    #[error("duplicate layout item id: {id}")]
    DuplicateId {
        /// Conflicting item identifier.
        id: String,
    },
    /// Layout item dimensions fall outside the supported grid.
    #[error("invalid layout item dimensions: width {width}, height {height}")]
    InvalidDimensions {
        /// Requested width (valid: 1 through 4).
        width: u8,
        /// Requested height (valid: 1 through 3).
        height: u8,
    },
    /// A required field is absent.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },
    /// A field is present but its value cannot be used.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// Human-readable reason.
        reason: String,
    },
}

impl ValidationError {
    /// Builds a [`ValidationError::MissingField`] for the named field.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Builds a [`ValidationError::InvalidValue`] for the named field.
    #[must_use]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable classification tag for this error.
    #[must_use]
    pub const fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::DuplicateId {
                ..
            } => ValidationErrorKind::DuplicateId,
            Self::InvalidDimensions {
                ..
            } => ValidationErrorKind::InvalidDimensions,
            Self::MissingField {
                ..
            } => ValidationErrorKind::MissingField,
            Self::InvalidValue {
                ..
            } => ValidationErrorKind::InvalidValue,
        }
    }
}

/// Classification tag for [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Duplicate layout item identifier.
    DuplicateId,
    /// Layout dimensions out of range.
    InvalidDimensions,
    /// Required field absent.
    MissingField,
    /// Field value unusable.
    InvalidValue,
}

impl ValidationErrorKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateId => "duplicate_id",
            Self::InvalidDimensions => "invalid_dimensions",
            Self::MissingField => "missing_field",
            Self::InvalidValue => "invalid_value",
        }
    }
}
