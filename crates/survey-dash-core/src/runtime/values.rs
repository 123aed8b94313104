// crates/survey-dash-core/src/runtime/values.rs
// ============================================================================
// Module: Survey Dash Record Values
// Description: Equality, numeric, and temporal interpretation of record values.
// Purpose: Share one set of value semantics across filters, charts, and metrics.
// Dependencies: bigdecimal, serde_json, time
// ============================================================================

//! ## Overview
//! Record values are opaque JSON. These helpers interpret them without
//! coercion: only JSON numbers are numeric, only RFC 3339 strings are
//! temporal. Filters use exact equality, except that numbers compare by
//! decimal value so `1` and `1.0` are equal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Number;
use serde_json::Value;
use time::Date;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::Filters;
use crate::core::Record;

// ============================================================================
// SECTION: Filters
// ============================================================================

/// Returns true when the record satisfies every filter.
///
/// A filter whose field is absent from the record excludes the record.
#[must_use]
pub fn matches_filters(record: &Record, filters: Option<&Filters>) -> bool {
    let Some(filters) = filters else {
        return true;
    };
    filters.iter().all(|(field, expected)| {
        record.get(field).is_some_and(|actual| values_equal(actual, expected))
    })
}

/// Applies filters and returns the surviving records in input order.
#[must_use]
pub fn filter_records<'a>(records: &'a [Record], filters: Option<&Filters>) -> Vec<&'a Record> {
    records.iter().filter(|record| matches_filters(record, filters)).collect()
}

/// Compares two values for filter equality.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => {
            match (decimal_from_number(left), decimal_from_number(right)) {
                (Some(left), Some(right)) => left == right,
                _ => left == right,
            }
        }
        _ => left == right,
    }
}

/// Returns the text that groups values equal under [`values_equal`].
///
/// Numbers render as their normalized decimal, so `1` and `1.0` share a key;
/// other values render as JSON text.
#[must_use]
pub fn group_key(value: &Value) -> String {
    match value {
        Value::Number(number) => decimal_from_number(number)
            .map_or_else(|| number.to_string(), |decimal| format!("#{}", decimal.normalized())),
        other => other.to_string(),
    }
}

/// Parses a JSON number into `BigDecimal` through its canonical rendering.
fn decimal_from_number(number: &Number) -> Option<BigDecimal> {
    BigDecimal::from_str(&number.to_string()).ok()
}

// ============================================================================
// SECTION: Interpretation
// ============================================================================

/// Returns the value as a finite number; non-numbers are never coerced.
#[must_use]
pub fn numeric_value(value: &Value) -> Option<f64> {
    value.as_f64().filter(|number| number.is_finite())
}

/// Parses an RFC 3339 date-time or a date-only (`YYYY-MM-DD`) string.
///
/// Date-only values are interpreted as midnight UTC.
#[must_use]
pub fn temporal_value(value: &Value) -> Option<OffsetDateTime> {
    let text = value.as_str()?;
    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(timestamp);
    }
    parse_date_only(text).map(|date| date.midnight().assume_utc())
}

/// Parses a date-only value (`YYYY-MM-DD`).
fn parse_date_only(text: &str) -> Option<Date> {
    let mut parts = text.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u8 = parts.next()?.parse().ok()?;
    let day: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let month = time::Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// Renders a value as grouping text: strings verbatim, others as JSON.
#[must_use]
pub fn key_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Converts an aggregate into a JSON number, or `null` when not finite.
#[must_use]
pub fn number_value(number: f64) -> Value {
    Number::from_f64(number).map_or(Value::Null, Value::Number)
}
