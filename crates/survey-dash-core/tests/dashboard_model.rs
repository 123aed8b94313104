// crates/survey-dash-core/tests/dashboard_model.rs
// ============================================================================
// Module: Dashboard Model Tests
// Description: Creation, update, and layout editing of dashboard configurations.
// Purpose: Validate identifier generation, immutability, and layout checks.
// Dependencies: survey-dash-core, serde_json
// ============================================================================

//! Creation, update, and layout editing of dashboard configurations.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use serde_json::json;
use survey_dash_core::Calculation;
use survey_dash_core::DashboardConfig;
use survey_dash_core::DashboardDraft;
use survey_dash_core::DashboardId;
use survey_dash_core::DashboardPatch;
use survey_dash_core::ItemContent;
use survey_dash_core::ItemKind;
use survey_dash_core::LayoutItem;
use survey_dash_core::LayoutItemId;
use survey_dash_core::MetricConfig;
use survey_dash_core::ValidationError;
use survey_dash_core::DASHBOARD_ID_PREFIX;

use crate::common::chart_item;
use crate::common::text_item;

fn empty_dashboard() -> DashboardConfig {
    DashboardConfig::create(DashboardDraft {
        id: Some(DashboardId::new("dash-1")),
        title: "Field Operations".to_string(),
        description: None,
        layout: None,
    })
}

// ============================================================================
// SECTION: Create and Update
// ============================================================================

#[test]
fn create_keeps_supplied_identifier() {
    let dashboard = empty_dashboard();
    assert_eq!(dashboard.id.as_str(), "dash-1");
    assert_eq!(dashboard.title, "Field Operations");
    assert!(dashboard.layout.is_empty());
}

#[test]
fn create_generates_distinct_identifiers_when_absent() {
    let first = DashboardConfig::create(DashboardDraft::default());
    let second = DashboardConfig::create(DashboardDraft {
        id: Some(DashboardId::new("")),
        ..DashboardDraft::default()
    });
    assert!(first.id.as_str().starts_with(DASHBOARD_ID_PREFIX));
    assert!(second.id.as_str().starts_with(DASHBOARD_ID_PREFIX));
    assert_ne!(first.id, second.id);
}

#[test]
fn update_merges_fields_and_preserves_identifier() {
    let dashboard = empty_dashboard().add_item(text_item("a")).unwrap();
    let updated = dashboard.update(DashboardPatch {
        title: Some("Renamed".to_string()),
        description: Some(Some("Weekly view".to_string())),
        layout: None,
    });
    assert_eq!(updated.id, dashboard.id);
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.description.as_deref(), Some("Weekly view"));
    assert_eq!(updated.layout, dashboard.layout);
    assert_eq!(dashboard.title, "Field Operations");
}

#[test]
fn update_clears_description_only_when_requested() {
    let described = empty_dashboard().update(DashboardPatch {
        description: Some(Some("d".to_string())),
        ..DashboardPatch::default()
    });
    let kept = described.update(DashboardPatch::default());
    assert_eq!(kept.description.as_deref(), Some("d"));
    let cleared = described.update(DashboardPatch {
        description: Some(None),
        ..DashboardPatch::default()
    });
    assert_eq!(cleared.description, None);
}

#[test]
fn patch_json_distinguishes_null_from_absent() {
    let absent: DashboardPatch = serde_json::from_value(json!({ "title": "T" })).unwrap();
    assert_eq!(absent.description, None);
    let null: DashboardPatch = serde_json::from_value(json!({ "description": null })).unwrap();
    assert_eq!(null.description, Some(None));
    let set: DashboardPatch = serde_json::from_value(json!({ "description": "x" })).unwrap();
    assert_eq!(set.description, Some(Some("x".to_string())));
}

#[test]
fn update_replaces_layout_wholesale() {
    let dashboard = empty_dashboard().add_item(text_item("a")).unwrap();
    let updated = dashboard.update(DashboardPatch {
        layout: Some(vec![chart_item("b")]),
        ..DashboardPatch::default()
    });
    assert_eq!(updated.layout.len(), 1);
    assert_eq!(updated.layout[0].id.as_str(), "b");
}

// ============================================================================
// SECTION: Layout Editing
// ============================================================================

#[test]
fn add_item_appends_in_order_without_mutating_source() {
    let base = empty_dashboard();
    let one = base.add_item(text_item("a")).unwrap();
    let two = one.add_item(chart_item("b")).unwrap();
    assert!(base.layout.is_empty());
    assert_eq!(one.layout.len(), 1);
    let ids: Vec<&str> = two.layout.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(two.item(&LayoutItemId::new("b")).unwrap().kind(), ItemKind::Chart);
}

#[test]
fn add_item_rejects_duplicate_identifier() {
    let dashboard = empty_dashboard().add_item(text_item("a")).unwrap();
    let err = dashboard.add_item(chart_item("a")).unwrap_err();
    assert_eq!(
        err,
        ValidationError::DuplicateId {
            id: "a".to_string()
        }
    );
    assert_eq!(dashboard.layout.len(), 1);
}

#[test]
fn add_item_rejects_out_of_range_dimensions() {
    let dashboard = empty_dashboard();
    for (width, height) in [(0, 1), (5, 1), (1, 0), (1, 4)] {
        let item = LayoutItem {
            width,
            height,
            ..text_item("a")
        };
        assert_eq!(
            dashboard.add_item(item).unwrap_err(),
            ValidationError::InvalidDimensions {
                width,
                height
            }
        );
    }
    let corner = LayoutItem {
        width: 4,
        height: 3,
        ..text_item("a")
    };
    assert!(dashboard.add_item(corner).is_ok());
}

#[test]
fn remove_item_is_noop_for_unknown_identifier() {
    let dashboard = empty_dashboard().add_item(text_item("a")).unwrap();
    assert_eq!(dashboard.remove_item(&LayoutItemId::new("missing")), dashboard);
    let removed = dashboard.remove_item(&LayoutItemId::new("a"));
    assert!(removed.layout.is_empty());
    assert_eq!(dashboard.layout.len(), 1);
}

#[test]
fn validate_reports_metric_without_field() {
    let metric = LayoutItem {
        id: LayoutItemId::new("m"),
        title: "Average age".to_string(),
        description: None,
        width: 1,
        height: 1,
        content: ItemContent::Metric(MetricConfig {
            data_source: "health_survey".to_string(),
            calculation: Calculation::Average,
            field: None,
            filters: None,
            comparison: None,
        }),
    };
    let dashboard = empty_dashboard().add_item(metric).unwrap();
    assert_eq!(dashboard.validate().unwrap_err(), ValidationError::missing("field"));
}

#[test]
fn validate_reports_duplicates_in_loaded_layout() {
    let dashboard = empty_dashboard().update(DashboardPatch {
        layout: Some(vec![text_item("a"), text_item("a")]),
        ..DashboardPatch::default()
    });
    assert!(matches!(dashboard.validate(), Err(ValidationError::DuplicateId { .. })));
}

// ============================================================================
// SECTION: Wire Shape
// ============================================================================

#[test]
fn layout_item_serializes_type_and_config_side_by_side() {
    let value = serde_json::to_value(chart_item("c1")).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "c1",
            "title": "Responses by region",
            "description": "Bar chart",
            "width": 4,
            "height": 3,
            "type": "chart",
            "config": {
                "chartType": "bar",
                "dataSource": "health_survey",
                "xAxis": "region"
            }
        })
    );
}

#[test]
fn dashboard_roundtrips_through_json() {
    let dashboard = empty_dashboard().add_item(text_item("a")).unwrap().add_item(chart_item("b")).unwrap();
    let text = serde_json::to_string(&dashboard).unwrap();
    let decoded: DashboardConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(decoded, dashboard);
}
