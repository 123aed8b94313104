// crates/survey-dash-core/src/runtime/metric.rs
// ============================================================================
// Module: Survey Dash Metric Engine
// Description: Scalar aggregates with optional period-over-period comparison.
// Purpose: Compute metric item values over filtered records.
// Dependencies: crate::core, serde, time
// ============================================================================

//! ## Overview
//! The engine filters records, then computes `count`, `sum`, `average`,
//! `min`, or `max`. Field-based aggregates consider only records whose field
//! holds a JSON number; anything else is excluded, never coerced to zero.
//!
//! Comparisons are anchored at an explicit `as_of` instant and read each
//! record's timestamp from a configurable field. Records without a parseable
//! timestamp take no part in either comparison window.
//! Invariants:
//! - Computation never yields `NaN` and never fails on an empty prior window.
//! - `change` is reported only when both windows have a defined aggregate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::core::Calculation;
use crate::core::MetricConfig;
use crate::core::Record;
use crate::core::ValidationError;
use crate::runtime::period::ComparisonWindows;
use crate::runtime::values::filter_records;
use crate::runtime::values::numeric_value;
use crate::runtime::values::temporal_value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Record field holding the timestamp used by comparisons.
pub const DEFAULT_TIME_FIELD: &str = "submittedAt";

// ============================================================================
// SECTION: Results
// ============================================================================

/// Direction of a period-over-period change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeDirection {
    /// The current value exceeds the prior value.
    #[serde(rename = "up")]
    Up,
    /// The current value is below the prior value.
    #[serde(rename = "down")]
    Down,
    /// No change, or no usable baseline.
    #[serde(rename = "none")]
    Unchanged,
}

/// Computed metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    /// Aggregate over the filtered records (current window when comparing).
    pub value: f64,
    /// `value` minus the prior-window aggregate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    /// Sign of `change`; present whenever a comparison is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_direction: Option<ChangeDirection>,
}

/// Aggregate over one record set.
struct Aggregate {
    /// Records that contributed to the aggregate.
    eligible: usize,
    /// Aggregate value; `None` for average/min/max over no eligible records.
    value: Option<f64>,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Metric engine anchored at a host-supplied instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricEngine {
    /// Instant that anchors comparison windows.
    as_of: OffsetDateTime,
    /// Record field read for comparison timestamps.
    time_field: String,
}

impl MetricEngine {
    /// Creates an engine anchored at `as_of` reading [`DEFAULT_TIME_FIELD`].
    #[must_use]
    pub fn new(as_of: OffsetDateTime) -> Self {
        Self {
            as_of,
            time_field: DEFAULT_TIME_FIELD.to_string(),
        }
    }

    /// Returns the engine reading comparison timestamps from `field`.
    #[must_use]
    pub fn with_time_field(mut self, field: impl Into<String>) -> Self {
        self.time_field = field.into();
        self
    }

    /// Returns the anchoring instant.
    #[must_use]
    pub const fn as_of(&self) -> OffsetDateTime {
        self.as_of
    }

    /// Computes the configured metric over `records`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when a field-based calculation
    /// has no `field`, and [`ValidationError::InvalidValue`] for unusable
    /// comparison settings.
    pub fn compute(
        &self,
        records: &[Record],
        config: &MetricConfig,
    ) -> Result<MetricValue, ValidationError> {
        config.validate()?;
        let filtered = filter_records(records, config.filters.as_ref());
        let Some(comparison) = config.comparison else {
            let aggregate = aggregate(&filtered, config)?;
            return Ok(MetricValue {
                value: aggregate.value.unwrap_or(0.0),
                change: None,
                change_direction: None,
            });
        };

        let windows = ComparisonWindows::anchored(self.as_of, comparison)?;
        let mut current = Vec::new();
        let mut prior = Vec::new();
        for record in filtered {
            let Some(instant) = record.get(&self.time_field).and_then(temporal_value) else {
                continue;
            };
            if windows.current.contains(instant) {
                current.push(record);
            } else if windows.prior.contains(instant) {
                prior.push(record);
            }
        }
        let current = aggregate(&current, config)?;
        let prior = aggregate(&prior, config)?;
        let change = match (current.value, prior.value) {
            (Some(current_value), Some(prior_value)) if prior.eligible > 0 => {
                Some(current_value - prior_value)
            }
            _ => None,
        };
        Ok(MetricValue {
            value: current.value.unwrap_or(0.0),
            change,
            change_direction: Some(direction_of(change)),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Computes the configured calculation over a record set.
#[allow(clippy::cast_precision_loss, reason = "Record counts stay far below 2^52.")]
fn aggregate(records: &[&Record], config: &MetricConfig) -> Result<Aggregate, ValidationError> {
    if config.calculation == Calculation::Count {
        return Ok(Aggregate {
            eligible: records.len(),
            value: Some(records.len() as f64),
        });
    }
    let field = config.field.as_deref().ok_or_else(|| ValidationError::missing("field"))?;
    let values: Vec<f64> =
        records.iter().filter_map(|record| record.get(field).and_then(numeric_value)).collect();
    let value = match config.calculation {
        Calculation::Count | Calculation::Sum => Some(values.iter().sum::<f64>()),
        Calculation::Average => {
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
        Calculation::Min => values.iter().copied().reduce(f64::min),
        Calculation::Max => values.iter().copied().reduce(f64::max),
    };
    Ok(Aggregate {
        eligible: values.len(),
        value,
    })
}

/// Classifies a change by sign; absent or zero change is `Unchanged`.
fn direction_of(change: Option<f64>) -> ChangeDirection {
    match change {
        Some(delta) if delta > 0.0 => ChangeDirection::Up,
        Some(delta) if delta < 0.0 => ChangeDirection::Down,
        _ => ChangeDirection::Unchanged,
    }
}
