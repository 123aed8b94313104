// crates/survey-dash-core/src/interfaces/mod.rs
// ============================================================================
// Module: Survey Dash Interfaces
// Description: Backend-agnostic interfaces for remote form sources and policies.
// Purpose: Define the contract surfaces used by Survey Dash consumers.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Survey Dash integrates with a remote data-collection
//! platform without embedding transport details. [`FormSource`] is the
//! capability interface implemented by the HTTP client and by test doubles;
//! [`CompletenessPolicy`] decides submission completeness during
//! normalization.
//!
//! Sources never retry, cache, or time out internally; those concerns belong
//! to the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::FormId;
use crate::core::RawForm;
use crate::core::RawSubmission;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of submissions requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 250;
/// Default upper bound on pages fetched for one form.
pub const DEFAULT_MAX_PAGES: usize = 1_000;

// ============================================================================
// SECTION: Remote Errors
// ============================================================================

/// Remote platform failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Cancellation and timeouts surface as [`RemoteError::Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The platform answered with a non-2xx status.
    #[error("remote request failed: {status} {status_text}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },
    /// The request never produced a response.
    #[error("remote transport error: {0}")]
    Transport(String),
    /// The response body was oversized or not the expected JSON shape.
    #[error("remote response decode error: {0}")]
    Decode(String),
    /// Pagination did not terminate within the configured bound.
    #[error("remote pagination exceeded {max_pages} pages")]
    PageLimit {
        /// Configured page bound.
        max_pages: usize,
    },
}

impl RemoteError {
    /// Returns the HTTP status when the platform answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status {
                status, ..
            } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when the platform reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    /// Returns true when a retry with backoff may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Status {
                status, ..
            } => matches!(*status, 408 | 429 | 500..=599),
            Self::Transport(_) => true,
            Self::Decode(_) | Self::PageLimit {
                ..
            } => false,
        }
    }

    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Status {
                ..
            } => "status",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::PageLimit {
                ..
            } => "page_limit",
        }
    }
}

// ============================================================================
// SECTION: Pagination
// ============================================================================

/// Request for one page of submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Opaque cursor from the previous page; `None` for the first page.
    pub cursor: Option<String>,
    /// Maximum items requested.
    pub limit: usize,
}

impl PageRequest {
    /// Returns a request for the first page.
    #[must_use]
    pub const fn first(limit: usize) -> Self {
        Self {
            cursor: None,
            limit,
        }
    }
}

/// One page of raw submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPage {
    /// Submissions in the page.
    pub items: Vec<RawSubmission>,
    /// Cursor for the next page; `None` when the listing is exhausted.
    pub next_token: Option<String>,
}

// ============================================================================
// SECTION: Form Source
// ============================================================================

/// Capability interface for fetching raw forms and submissions.
pub trait FormSource {
    /// Fetches every form of the configured project.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the platform call fails.
    fn fetch_forms(&self) -> Result<Vec<RawForm>, RemoteError>;

    /// Fetches one form; a 404 means the form does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the platform call fails.
    fn fetch_form(&self, form_id: &FormId) -> Result<RawForm, RemoteError>;

    /// Fetches one page of submissions for a form.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when the platform call fails.
    fn fetch_submissions_page(
        &self,
        form_id: &FormId,
        page: &PageRequest,
    ) -> Result<SubmissionPage, RemoteError>;

    /// Items requested per page when draining a listing.
    fn page_size(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }

    /// Upper bound on pages fetched when draining a listing.
    fn max_pages(&self) -> usize {
        DEFAULT_MAX_PAGES
    }

    /// Fetches every submission for a form by draining all pages.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] when any page fails or pagination exceeds
    /// [`FormSource::max_pages`].
    fn fetch_submissions(&self, form_id: &FormId) -> Result<Vec<RawSubmission>, RemoteError> {
        let mut submissions = Vec::new();
        for page in SubmissionPages::new(self, form_id) {
            submissions.extend(page?);
        }
        Ok(submissions)
    }
}

/// Auto-paginating iterator over a form's submission pages.
///
/// # Invariants
/// - Iteration stops after the first error.
/// - At most [`FormSource::max_pages`] pages are fetched; a further page
///   yields [`RemoteError::PageLimit`].
pub struct SubmissionPages<'a, S: FormSource + ?Sized> {
    /// Source queried for pages.
    source: &'a S,
    /// Form whose submissions are listed.
    form_id: &'a FormId,
    /// Cursor for the next page.
    cursor: Option<String>,
    /// Pages fetched so far.
    fetched: usize,
    /// Set once the listing is exhausted or failed.
    done: bool,
}

impl<'a, S: FormSource + ?Sized> SubmissionPages<'a, S> {
    /// Starts iterating a form's submission pages.
    #[must_use]
    pub const fn new(source: &'a S, form_id: &'a FormId) -> Self {
        Self {
            source,
            form_id,
            cursor: None,
            fetched: 0,
            done: false,
        }
    }
}

impl<S: FormSource + ?Sized> Iterator for SubmissionPages<'_, S> {
    type Item = Result<Vec<RawSubmission>, RemoteError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let max_pages = self.source.max_pages();
        if self.fetched >= max_pages {
            self.done = true;
            return Some(Err(RemoteError::PageLimit {
                max_pages,
            }));
        }
        let request = PageRequest {
            cursor: self.cursor.take(),
            limit: self.source.page_size(),
        };
        match self.source.fetch_submissions_page(self.form_id, &request) {
            Ok(page) => {
                self.fetched += 1;
                self.done = page.next_token.is_none();
                self.cursor = page.next_token;
                Some(Ok(page.items))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

// ============================================================================
// SECTION: Completeness Policy
// ============================================================================

/// Decides whether a submission payload counts as complete.
pub trait CompletenessPolicy {
    /// Returns true when the payload is complete.
    fn is_complete(&self, payload: &Map<String, Value>) -> bool;
}

impl<F> CompletenessPolicy for F
where
    F: Fn(&Map<String, Value>) -> bool,
{
    fn is_complete(&self, payload: &Map<String, Value>) -> bool {
        self(payload)
    }
}

/// Default policy: a payload with at least one key is complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonEmptyPayload;

impl CompletenessPolicy for NonEmptyPayload {
    fn is_complete(&self, payload: &Map<String, Value>) -> bool {
        !payload.is_empty()
    }
}
