// crates/survey-dash-core/src/runtime/chart.rs
// ============================================================================
// Module: Survey Dash Chart Data Processor
// Description: Grouping and ordering of records into chart rows.
// Purpose: Produce the row shape each chart family renders.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! The processor filters records, groups them by a bucket field, aggregates
//! each bucket, and orders the rows for the chart family:
//! - bar: `{ <xAxis>: bucket, count }` in first-seen bucket order;
//! - line: the same row shape in natural ascending bucket order;
//! - pie: `{ name, value }` by descending count, ties in first-seen order.
//!
//! When `yAxis` names a field that is numeric in at least one filtered
//! record, bar and line rows carry `{ <yAxis>: sum }` instead of `count`.
//! Records without the bucket field are skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Map;
use serde_json::Value;

use crate::core::ChartConfig;
use crate::core::ChartType;
use crate::core::Record;
use crate::core::ValidationError;
use crate::runtime::values::filter_records;
use crate::runtime::values::group_key;
use crate::runtime::values::key_text;
use crate::runtime::values::number_value;
use crate::runtime::values::numeric_value;
use crate::runtime::values::temporal_value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Bucket field used by pie charts without an explicit `xAxis`.
pub const DEFAULT_PIE_FIELD: &str = "form";
/// Row field carrying bucket counts.
const COUNT_FIELD: &str = "count";

// ============================================================================
// SECTION: Types
// ============================================================================

/// One chart row, keyed by output field name.
pub type ChartRow = Map<String, Value>;

/// Aggregated bucket.
struct Bucket {
    /// Bucket value as found in the first record of the group.
    key: Value,
    /// Records in the bucket.
    count: u64,
    /// Sum of the measured field over records where it is numeric.
    sum: f64,
}

/// Per-bucket measure.
#[derive(Clone, Copy)]
enum Measure<'a> {
    /// Count records.
    Count,
    /// Sum the named numeric field.
    Sum(&'a str),
}

// ============================================================================
// SECTION: Processing
// ============================================================================

/// Transforms records into the rows the configured chart expects.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when a bar or line chart has no `xAxis`.
pub fn process_chart_data(
    records: &[Record],
    config: &ChartConfig,
) -> Result<Vec<ChartRow>, ValidationError> {
    let filtered = filter_records(records, config.filters.as_ref());
    match config.chart_type {
        ChartType::Bar => {
            let x_axis = require_x_axis(config)?;
            let measure = select_measure(&filtered, config.y_axis.as_deref());
            let buckets = group_records(&filtered, x_axis, measure);
            Ok(buckets.iter().map(|bucket| axis_row(x_axis, bucket, measure)).collect())
        }
        ChartType::Line => {
            let x_axis = require_x_axis(config)?;
            let measure = select_measure(&filtered, config.y_axis.as_deref());
            let buckets = sort_naturally(group_records(&filtered, x_axis, measure));
            Ok(buckets.iter().map(|bucket| axis_row(x_axis, bucket, measure)).collect())
        }
        ChartType::Pie => {
            let field = config.x_axis.as_deref().unwrap_or(DEFAULT_PIE_FIELD);
            let mut buckets = group_records(&filtered, field, Measure::Count);
            buckets.sort_by(|left, right| right.count.cmp(&left.count));
            Ok(buckets.iter().map(pie_row).collect())
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the configured `xAxis` or a missing-field error.
fn require_x_axis(config: &ChartConfig) -> Result<&str, ValidationError> {
    config.x_axis.as_deref().ok_or_else(|| ValidationError::missing("xAxis"))
}

/// Sums `yAxis` when it is numeric somewhere in the input; counts otherwise.
fn select_measure<'a>(records: &[&Record], y_axis: Option<&'a str>) -> Measure<'a> {
    match y_axis {
        Some(field)
            if records.iter().any(|record| record.get(field).and_then(numeric_value).is_some()) =>
        {
            Measure::Sum(field)
        }
        _ => Measure::Count,
    }
}

/// Groups records by `field` in first-seen order; numbers group by decimal value.
fn group_records(records: &[&Record], field: &str, measure: Measure<'_>) -> Vec<Bucket> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();
    for record in records {
        let Some(key) = record.get(field) else {
            continue;
        };
        let slot = *index.entry(group_key(key)).or_insert_with(|| {
            buckets.push(Bucket {
                key: key.clone(),
                count: 0,
                sum: 0.0,
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[slot];
        bucket.count += 1;
        if let Measure::Sum(sum_field) = measure
            && let Some(value) = record.get(sum_field).and_then(numeric_value)
        {
            bucket.sum += value;
        }
    }
    buckets
}

/// Orders buckets chronologically, numerically, or lexicographically.
///
/// The first interpretation that covers every bucket key wins.
fn sort_naturally(buckets: Vec<Bucket>) -> Vec<Bucket> {
    let temporal: Option<Vec<_>> = buckets.iter().map(|bucket| temporal_value(&bucket.key)).collect();
    if let Some(keys) = temporal {
        return reorder(buckets, keys, |left, right| left.cmp(right));
    }
    let numeric: Option<Vec<f64>> =
        buckets.iter().map(|bucket| numeric_value(&bucket.key)).collect();
    if let Some(keys) = numeric {
        return reorder(buckets, keys, f64::total_cmp);
    }
    let text: Vec<String> = buckets.iter().map(|bucket| key_text(&bucket.key)).collect();
    reorder(buckets, text, |left, right| left.cmp(right))
}

/// Stable-sorts buckets by precomputed keys.
fn reorder<K>(buckets: Vec<Bucket>, keys: Vec<K>, compare: impl Fn(&K, &K) -> Ordering) -> Vec<Bucket> {
    let mut pairs: Vec<(K, Bucket)> = keys.into_iter().zip(buckets).collect();
    pairs.sort_by(|left, right| compare(&left.0, &right.0));
    pairs.into_iter().map(|(_, bucket)| bucket).collect()
}

/// Builds a bar or line row.
fn axis_row(x_axis: &str, bucket: &Bucket, measure: Measure<'_>) -> ChartRow {
    let mut row = ChartRow::new();
    row.insert(x_axis.to_string(), bucket.key.clone());
    match measure {
        Measure::Count => {
            row.insert(COUNT_FIELD.to_string(), Value::from(bucket.count));
        }
        Measure::Sum(field) => {
            row.insert(field.to_string(), number_value(bucket.sum));
        }
    }
    row
}

/// Builds a pie row.
fn pie_row(bucket: &Bucket) -> ChartRow {
    let mut row = ChartRow::new();
    row.insert("name".to_string(), Value::String(key_text(&bucket.key)));
    row.insert("value".to_string(), Value::from(bucket.count));
    row
}
