// crates/survey-dash-config/src/config.rs
// ============================================================================
// Module: Survey Dash Configuration
// Description: Configuration loading and validation for Survey Dash.
// Purpose: Provide strict, fail-closed config parsing with explicit limits.
// Dependencies: survey-dash-core, survey-dash-source, serde, toml
// ============================================================================

//! ## Overview
//! This module loads `survey-dash.toml`, applies defaults, and validates every
//! section before any component is built from it. Invalid configurations fail
//! closed with a [`ConfigError`].
//!
//! Security posture: config inputs are untrusted. The API key is never echoed
//! in errors or `Debug` output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use survey_dash_core::DEFAULT_TIME_FIELD;
use survey_dash_source::AuditSink;
use survey_dash_source::FileAuditSink;
use survey_dash_source::NoopAuditSink;
use survey_dash_source::RemoteSourceClient;
use survey_dash_source::RemoteSourceConfig;
use survey_dash_source::StderrAuditSink;
use thiserror::Error;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Default config file name used when no path is supplied.
pub const DEFAULT_CONFIG_NAME: &str = "survey-dash.toml";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of the metric time field name.
pub(crate) const MAX_TIME_FIELD_LENGTH: usize = 256;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Survey Dash configuration loaded from TOML.
///
/// # Invariants
/// - Unknown keys are rejected in every section.
/// - A loaded config has passed [`SurveyDashConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyDashConfig {
    /// Remote survey platform connection.
    pub source: RemoteSourceConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Metric computation defaults.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl SurveyDashConfig {
    /// Loads configuration from `path`, or [`DEFAULT_CONFIG_NAME`] when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, exceeds limits,
    /// fails to parse, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), Path::to_path_buf);
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source.validate().map_err(|err| ConfigError::Invalid(format!("source: {err}")))?;
        self.audit.validate()?;
        self.metrics.validate()?;
        Ok(())
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn audit_sink(&self) -> Result<Arc<dyn AuditSink>, ConfigError> {
        self.audit.build_sink()
    }

    /// Builds a remote source client wired to the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the sink or the client cannot be built.
    pub fn source_client(&self) -> Result<RemoteSourceClient, ConfigError> {
        let client = RemoteSourceClient::new(self.source.clone())
            .map_err(|err| ConfigError::Invalid(format!("source: {err}")))?;
        Ok(client.with_audit_sink(self.audit_sink()?))
    }
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Audit sink kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard audit events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// Append JSON lines to a file.
    File,
}

/// Audit sink configuration.
///
/// # Invariants
/// - `path` is required exactly when `sink = "file"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates sink selection against the path setting.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }

    /// Builds the sink described by this section.
    fn build_sink(&self) -> Result<Arc<dyn AuditSink>, ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
            (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(path).map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Metrics Config
// ============================================================================

/// Metric computation defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Record field read for comparison timestamps.
    #[serde(default = "default_time_field")]
    pub time_field: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            time_field: default_time_field(),
        }
    }
}

impl MetricsConfig {
    /// Validates the time field name.
    fn validate(&self) -> Result<(), ConfigError> {
        let field = self.time_field.trim();
        if field.is_empty() {
            return Err(ConfigError::Invalid("metrics.time_field must be non-empty".to_string()));
        }
        if field.len() > MAX_TIME_FIELD_LENGTH {
            return Err(ConfigError::Invalid("metrics.time_field exceeds max length".to_string()));
        }
        Ok(())
    }
}

/// Default comparison time field for serde.
fn default_time_field() -> String {
    DEFAULT_TIME_FIELD.to_string()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Messages never include the API key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the resolved config path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
