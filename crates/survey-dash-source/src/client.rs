// crates/survey-dash-source/src/client.rs
// ============================================================================
// Module: Survey Dash Remote Source Client
// Description: Authenticated HTTP client for the survey platform REST API.
// Purpose: Fetch raw forms and paginated submissions with strict limits.
// Dependencies: survey-dash-core, reqwest, serde, url
// ============================================================================

//! ## Overview
//! [`RemoteSourceClient`] implements [`FormSource`] over blocking HTTP. Every
//! request carries bearer authentication and a JSON content type. Non-2xx
//! responses fail with [`RemoteError::Status`]; nothing is retried or cached.
//! Invariants:
//! - Configuration is explicit and validated at construction.
//! - Redirects are not followed.
//! - Response bodies are capped at `max_response_bytes`.
//! - The API key never appears in `Debug` output or audit events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use survey_dash_core::DEFAULT_MAX_PAGES;
use survey_dash_core::DEFAULT_PAGE_SIZE;
use survey_dash_core::FormId;
use survey_dash_core::FormSource;
use survey_dash_core::PageRequest;
use survey_dash_core::RawForm;
use survey_dash_core::RawSubmission;
use survey_dash_core::RemoteError;
use survey_dash_core::SubmissionPage;
use thiserror::Error;
use url::Url;

use crate::audit::AuditOutcome;
use crate::audit::AuditSink;
use crate::audit::FetchAuditEvent;
use crate::audit::FetchAuditEventParams;
use crate::audit::FetchEndpoint;
use crate::audit::NoopAuditSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Project used when none is configured.
pub const DEFAULT_PROJECT_ID: u64 = 1;
/// Default cap on a single response body (16 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;
/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "survey-dash/0.1";
/// Header asking the platform to include per-form submission counts.
const EXTENDED_METADATA_HEADER: &str = "X-Extended-Metadata";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the remote source client.
///
/// # Invariants
/// - `base_url` is an absolute `http` or `https` URL without credentials.
/// - `api_key` is non-empty and is redacted from `Debug` output.
/// - `project_id`, `page_size`, `max_pages`, and `max_response_bytes` are non-zero.
/// - `timeout_ms = None` disables the client-side timeout; callers own cancellation.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteSourceConfig {
    /// Platform base URL; API paths are appended to it.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Project whose forms are listed.
    #[serde(default = "default_project_id")]
    pub project_id: u64,
    /// Submissions requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Upper bound on pages fetched for one form.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Maximum response size allowed, in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Optional request timeout in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// User agent string for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl RemoteSourceConfig {
    /// Creates a configuration with default limits.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            project_id: DEFAULT_PROJECT_ID,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            timeout_ms: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Validates the configuration and returns the parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SourceConfigError`] when any invariant is violated.
    pub fn validate(&self) -> Result<Url, SourceConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| SourceConfigError::InvalidUrl(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SourceConfigError::InvalidUrl(format!(
                "unsupported url scheme: {}",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() {
            return Err(SourceConfigError::InvalidUrl("url cannot carry a path".to_string()));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(SourceConfigError::InvalidUrl(
                "url credentials are not allowed".to_string(),
            ));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(SourceConfigError::InvalidUrl(
                "url must not carry a query or fragment".to_string(),
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(SourceConfigError::MissingApiKey);
        }
        require_non_zero("project_id", self.project_id)?;
        require_non_zero("page_size", self.page_size)?;
        require_non_zero("max_pages", self.max_pages)?;
        require_non_zero("max_response_bytes", self.max_response_bytes)?;
        if let Some(timeout_ms) = self.timeout_ms {
            require_non_zero("timeout_ms", timeout_ms)?;
        }
        Ok(url)
    }
}

impl fmt::Debug for RemoteSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSourceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("max_response_bytes", &self.max_response_bytes)
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Invalid client configuration.
///
/// # Invariants
/// - Messages never include the API key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceConfigError {
    /// The base URL is malformed or unsupported.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    /// The API key is empty.
    #[error("api key is required")]
    MissingApiKey,
    /// A numeric setting is out of range.
    #[error("invalid {field}: {reason}")]
    InvalidSetting {
        /// Setting name.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
    /// The HTTP client could not be built.
    #[error("http client build failed: {0}")]
    ClientBuild(String),
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking HTTP implementation of [`FormSource`].
///
/// # Invariants
/// - One request per call; pagination is driven through [`FormSource`].
/// - Every request is reported to the audit sink exactly once.
pub struct RemoteSourceClient {
    /// Validated configuration.
    config: RemoteSourceConfig,
    /// Parsed base URL.
    base_url: Url,
    /// HTTP client used for outbound requests.
    client: Client,
    /// Audit sink for fetch events.
    audit: Arc<dyn AuditSink>,
}

impl RemoteSourceClient {
    /// Creates a client with the given configuration and a no-op audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`SourceConfigError`] when the configuration is invalid or the
    /// HTTP client cannot be created.
    pub fn new(config: RemoteSourceConfig) -> Result<Self, SourceConfigError> {
        let base_url = config.validate()?;
        let client = build_http_client(&config)?;
        Ok(Self {
            config,
            base_url,
            client,
            audit: Arc::new(NoopAuditSink),
        })
    }

    /// Returns the client reporting fetches to `audit`.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &RemoteSourceConfig {
        &self.config
    }

    /// Builds `{base}/v1/projects/{projectId}/{tail...}` with encoded segments.
    fn endpoint_url(&self, tail: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| RemoteError::Transport("base url cannot carry a path".to_string()))?;
            segments.pop_if_empty().push("v1").push("projects");
            segments.push(&self.config.project_id.to_string());
            segments.extend(tail);
        }
        Ok(url)
    }

    /// Issues one GET, decodes the body, and records the audit event.
    fn fetch<T: DeserializeOwned>(
        &self,
        target: FetchTarget<'_>,
        count: fn(&T) -> usize,
    ) -> Result<T, RemoteError> {
        let mut status = None;
        let result = self.execute(&target, &mut status);
        let (outcome, item_count, error_kind) = match &result {
            Ok(value) => (AuditOutcome::Ok, count(value), None),
            Err(err) => (AuditOutcome::Error, 0, Some(err.kind_label())),
        };
        self.audit.record_fetch(&FetchAuditEvent::new(FetchAuditEventParams {
            endpoint: target.endpoint,
            form_id: target.form_id.map(|form_id| form_id.to_string()),
            page: target.page,
            status,
            outcome,
            item_count,
            error_kind,
        }));
        result
    }

    /// Sends the request and decodes a successful body.
    fn execute<T: DeserializeOwned>(
        &self,
        target: &FetchTarget<'_>,
        status: &mut Option<u16>,
    ) -> Result<T, RemoteError> {
        let mut request = self
            .client
            .get(target.url.as_str())
            .bearer_auth(&self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if target.endpoint != FetchEndpoint::Submissions {
            request = request.header(EXTENDED_METADATA_HEADER, "true");
        }
        let mut response =
            request.send().map_err(|err| RemoteError::Transport(transport_reason(&err)))?;
        let code = response.status();
        *status = Some(code.as_u16());
        if !code.is_success() {
            return Err(RemoteError::Status {
                status: code.as_u16(),
                status_text: code.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        let body = read_response_limited(&mut response, self.config.max_response_bytes)?;
        serde_json::from_slice(&body).map_err(|err| RemoteError::Decode(err.to_string()))
    }
}

impl FormSource for RemoteSourceClient {
    fn fetch_forms(&self) -> Result<Vec<RawForm>, RemoteError> {
        let url = self.endpoint_url(&["forms"])?;
        self.fetch(
            FetchTarget {
                url,
                endpoint: FetchEndpoint::Forms,
                form_id: None,
                page: None,
            },
            Vec::len,
        )
    }

    fn fetch_form(&self, form_id: &FormId) -> Result<RawForm, RemoteError> {
        let url = self.endpoint_url(&["forms", form_id.as_str()])?;
        self.fetch(
            FetchTarget {
                url,
                endpoint: FetchEndpoint::Form,
                form_id: Some(form_id),
                page: None,
            },
            |_| 1,
        )
    }

    fn fetch_submissions_page(
        &self,
        form_id: &FormId,
        page: &PageRequest,
    ) -> Result<SubmissionPage, RemoteError> {
        let offset = parse_cursor(page.cursor.as_deref())?;
        let limit = page.limit.max(1);
        let next_offset = offset
            .checked_add(limit)
            .ok_or_else(|| RemoteError::Decode("invalid page cursor".to_string()))?;
        let mut url = self.endpoint_url(&["forms", form_id.as_str(), "submissions"])?;
        url.set_query(Some(&format!("$top={limit}&$skip={offset}")));
        let items: Vec<RawSubmission> = self.fetch(
            FetchTarget {
                url,
                endpoint: FetchEndpoint::Submissions,
                form_id: Some(form_id),
                page: Some(offset / limit),
            },
            Vec::len,
        )?;
        let next_token = (items.len() == limit).then(|| next_offset.to_string());
        Ok(SubmissionPage {
            items,
            next_token,
        })
    }

    fn page_size(&self) -> usize {
        self.config.page_size
    }

    fn max_pages(&self) -> usize {
        self.config.max_pages
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// One outbound request and its audit labels.
struct FetchTarget<'a> {
    /// Fully built request URL.
    url: Url,
    /// Endpoint classification.
    endpoint: FetchEndpoint,
    /// Form scope, when any.
    form_id: Option<&'a FormId>,
    /// Page index for submission pages.
    page: Option<usize>,
}

/// Default project identifier for serde.
const fn default_project_id() -> u64 {
    DEFAULT_PROJECT_ID
}

/// Default page size for serde.
const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Default page bound for serde.
const fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

/// Default response cap for serde.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default user agent for serde.
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Rejects zero for a numeric setting.
fn require_non_zero<T>(field: &'static str, value: T) -> Result<(), SourceConfigError>
where
    T: Default + PartialEq,
{
    if value == T::default() {
        return Err(SourceConfigError::InvalidSetting {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Builds the HTTP client with redirects disabled.
fn build_http_client(config: &RemoteSourceConfig) -> Result<Client, SourceConfigError> {
    Client::builder()
        .timeout(config.timeout_ms.map(Duration::from_millis))
        .user_agent(config.user_agent.clone())
        .redirect(Policy::none())
        .build()
        .map_err(|err| SourceConfigError::ClientBuild(err.to_string()))
}

/// Parses a submissions cursor (the next offset).
fn parse_cursor(cursor: Option<&str>) -> Result<usize, RemoteError> {
    cursor.map_or(Ok(0), |cursor| {
        cursor.parse().map_err(|_| RemoteError::Decode(format!("invalid page cursor: {cursor}")))
    })
}

/// Describes a transport failure without echoing request headers.
fn transport_reason(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "connection failed".to_string()
    } else {
        "http request failed".to_string()
    }
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, RemoteError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| RemoteError::Decode("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(RemoteError::Decode("response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle
        .read_to_end(&mut buf)
        .map_err(|_| RemoteError::Transport("failed to read response".to_string()))?;
    if buf.len() > max_bytes {
        return Err(RemoteError::Decode("response exceeds size limit".to_string()));
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected)
            .map_err(|_| RemoteError::Decode("invalid response length".to_string()))?;
        if buf.len() < expected {
            return Err(RemoteError::Transport("response truncated".to_string()));
        }
    }
    Ok(buf)
}
