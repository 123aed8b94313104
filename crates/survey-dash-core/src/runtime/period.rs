// crates/survey-dash-core/src/runtime/period.rs
// ============================================================================
// Module: Survey Dash Comparison Periods
// Description: Calendar-aligned current and prior windows for metric comparisons.
// Purpose: Resolve a comparison setting into concrete half-open time ranges.
// Dependencies: crate::core, time
// ============================================================================

//! ## Overview
//! Windows are anchored at an explicit `as_of` instant supplied by the host;
//! nothing here reads the wall clock. Periods align to calendar boundaries in
//! the offset of `as_of` (weeks start on Monday). The current window covers
//! the `value` periods ending with the one containing `as_of`; the prior
//! window covers the `value` periods immediately before it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;
use time::Duration;
use time::Month;
use time::OffsetDateTime;

use crate::core::Comparison;
use crate::core::ComparisonPeriod;
use crate::core::ValidationError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive start.
    pub start: OffsetDateTime,
    /// Exclusive end.
    pub end: OffsetDateTime,
}

impl TimeWindow {
    /// Returns true when `instant` falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Current and prior windows of equal calendar length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonWindows {
    /// Window ending with the period that contains `as_of`.
    pub current: TimeWindow,
    /// Window immediately preceding `current`.
    pub prior: TimeWindow,
}

impl ComparisonWindows {
    /// Resolves comparison windows anchored at `as_of`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] when the comparison spans zero
    /// periods or the windows fall outside the representable calendar.
    pub fn anchored(as_of: OffsetDateTime, comparison: Comparison) -> Result<Self, ValidationError> {
        if comparison.value == 0 {
            return Err(ValidationError::invalid(
                "comparison.value",
                "comparison must span at least one period",
            ));
        }
        let period = comparison.period;
        let span = i64::from(comparison.value);
        let anchor = period_start(as_of, period).ok_or_else(out_of_range)?;
        let current_start = shift(anchor, period, 1 - span).ok_or_else(out_of_range)?;
        let current_end = shift(anchor, period, 1).ok_or_else(out_of_range)?;
        let prior_start = shift(current_start, period, -span).ok_or_else(out_of_range)?;
        Ok(Self {
            current: TimeWindow {
                start: current_start,
                end: current_end,
            },
            prior: TimeWindow {
                start: prior_start,
                end: current_start,
            },
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Error for windows outside the supported calendar range.
fn out_of_range() -> ValidationError {
    ValidationError::invalid("comparison.value", "comparison window is out of range")
}

/// Returns the start of the period containing `instant`, in its offset.
fn period_start(instant: OffsetDateTime, period: ComparisonPeriod) -> Option<OffsetDateTime> {
    let date = instant.date();
    let start = match period {
        ComparisonPeriod::Day => date,
        ComparisonPeriod::Week => {
            let back = i64::from(date.weekday().number_days_from_monday());
            date.checked_sub(Duration::days(back))?
        }
        ComparisonPeriod::Month => Date::from_calendar_date(date.year(), date.month(), 1).ok()?,
        ComparisonPeriod::Year => Date::from_calendar_date(date.year(), Month::January, 1).ok()?,
    };
    Some(start.midnight().assume_offset(instant.offset()))
}

/// Moves a period-aligned instant by `count` periods.
fn shift(start: OffsetDateTime, period: ComparisonPeriod, count: i64) -> Option<OffsetDateTime> {
    match period {
        ComparisonPeriod::Day => start.checked_add(Duration::days(count)),
        ComparisonPeriod::Week => start.checked_add(Duration::weeks(count)),
        ComparisonPeriod::Month => shift_months(start, count),
        ComparisonPeriod::Year => shift_months(start, count.checked_mul(12)?),
    }
}

/// Moves a month-aligned instant by `count` months.
fn shift_months(start: OffsetDateTime, count: i64) -> Option<OffsetDateTime> {
    let date = start.date();
    let month_index = i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1;
    let target = month_index.checked_add(count)?;
    let year = i32::try_from(target.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(target.rem_euclid(12) + 1).ok()?).ok()?;
    let shifted = Date::from_calendar_date(year, month, 1).ok()?;
    Some(start.replace_date(shifted))
}
