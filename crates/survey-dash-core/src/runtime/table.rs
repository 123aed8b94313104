// crates/survey-dash-core/src/runtime/table.rs
// ============================================================================
// Module: Survey Dash Table Projection
// Description: Column projection of filtered records for table items.
// Purpose: Give the presentation layer rows with exactly the configured columns.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! Table rows keep the filtered records' input order and carry exactly the
//! configured columns. A column missing from a record projects to `null`.
//! Pagination is left to the presentation layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::Record;
use crate::core::TableConfig;
use crate::runtime::values::filter_records;

// ============================================================================
// SECTION: Projection
// ============================================================================

/// Filters records and projects them onto the configured columns.
#[must_use]
pub fn project_table(records: &[Record], config: &TableConfig) -> Vec<Record> {
    filter_records(records, config.filters.as_ref())
        .into_iter()
        .map(|record| {
            config
                .columns
                .iter()
                .map(|column| (column.clone(), record.get(column).cloned().unwrap_or(Value::Null)))
                .collect()
        })
        .collect()
}
