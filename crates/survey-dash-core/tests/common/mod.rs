// crates/survey-dash-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared fixtures for Survey Dash core tests.
// Purpose: Provide reusable raw records, layout items, and record builders.
// Dependencies: survey-dash-core, serde_json
// ============================================================================

//! ## Overview
//! Shared fixtures keep individual test files focused on behavior rather than
//! on constructing raw platform payloads.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use survey_dash_core::ChartConfig;
use survey_dash_core::ChartType;
use survey_dash_core::ItemContent;
use survey_dash_core::LayoutItem;
use survey_dash_core::LayoutItemId;
use survey_dash_core::RawForm;
use survey_dash_core::RawIdentifier;
use survey_dash_core::RawSubmission;
use survey_dash_core::Record;
use survey_dash_core::TextConfig;

// ============================================================================
// SECTION: Raw Records
// ============================================================================

/// Returns a complete, open raw form.
#[must_use]
pub fn raw_form() -> RawForm {
    RawForm {
        id: Some("health_survey".to_string()),
        name: Some("health_survey_v2".to_string()),
        title: Some("Health Survey".to_string()),
        version: Some("2".to_string()),
        state: Some("open".to_string()),
        created_at: Some("2023-12-01T10:15:00.000Z".to_string()),
        submissions: Some(540),
    }
}

/// Returns a complete raw submission with a two-field payload.
#[must_use]
pub fn raw_submission() -> RawSubmission {
    let data = match serde_json::json!({"region": "North", "age": 30}) {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    RawSubmission {
        instance_id: Some("uuid:0001".to_string()),
        submitter_id: Some(RawIdentifier::Number(7)),
        submitter_name: Some("Jane Smith".to_string()),
        created_at: Some("2023-12-14T14:22:00Z".to_string()),
        updated_at: None,
        form_id: Some("health_survey".to_string()),
        data: Some(data),
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Converts a JSON object literal into a record.
#[must_use]
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("record fixture must be an object, got {other}"),
    }
}

/// Converts JSON object literals into records.
#[must_use]
pub fn records(values: Vec<Value>) -> Vec<Record> {
    values.into_iter().map(record).collect()
}

// ============================================================================
// SECTION: Layout Items
// ============================================================================

/// Returns a valid text item with the given identifier.
#[must_use]
pub fn text_item(id: &str) -> LayoutItem {
    LayoutItem {
        id: LayoutItemId::new(id),
        title: format!("Item {id}"),
        description: None,
        width: 2,
        height: 1,
        content: ItemContent::Text(TextConfig {
            content: "notes".to_string(),
        }),
    }
}

/// Returns a valid bar chart item with the given identifier.
#[must_use]
pub fn chart_item(id: &str) -> LayoutItem {
    LayoutItem {
        id: LayoutItemId::new(id),
        title: "Responses by region".to_string(),
        description: Some("Bar chart".to_string()),
        width: 4,
        height: 3,
        content: ItemContent::Chart(ChartConfig {
            chart_type: ChartType::Bar,
            data_source: "health_survey".to_string(),
            x_axis: Some("region".to_string()),
            y_axis: None,
            filters: None,
        }),
    }
}
