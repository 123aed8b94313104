// crates/survey-dash-core/tests/chart_processor.rs
// ============================================================================
// Module: Chart Processor Tests
// Description: Grouping, summing, and ordering of chart rows.
// Purpose: Validate bar, line, and pie row shapes and orderings.
// Dependencies: survey-dash-core, serde_json
// ============================================================================

//! Grouping, summing, and ordering of chart rows.

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

use serde_json::Value;
use serde_json::json;
use survey_dash_core::ChartConfig;
use survey_dash_core::ChartRow;
use survey_dash_core::ChartType;
use survey_dash_core::Filters;
use survey_dash_core::ValidationError;
use survey_dash_core::process_chart_data;

use crate::common::records;

fn chart(chart_type: ChartType, x_axis: Option<&str>, y_axis: Option<&str>) -> ChartConfig {
    ChartConfig {
        chart_type,
        data_source: "health_survey".to_string(),
        x_axis: x_axis.map(str::to_string),
        y_axis: y_axis.map(str::to_string),
        filters: None,
    }
}

fn rows_json(rows: Vec<ChartRow>) -> Value {
    Value::Array(rows.into_iter().map(Value::Object).collect())
}

// ============================================================================
// SECTION: Bar
// ============================================================================

#[test]
fn bar_counts_groups_in_first_seen_order() {
    let input = records(vec![
        json!({"region": "North"}),
        json!({"region": "North"}),
        json!({"region": "South"}),
    ]);
    let rows = process_chart_data(&input, &chart(ChartType::Bar, Some("region"), None)).unwrap();
    assert_eq!(
        rows_json(rows),
        json!([
            {"region": "North", "count": 2},
            {"region": "South", "count": 1}
        ])
    );
}

#[test]
fn bar_sums_numeric_y_axis_and_skips_non_numbers() {
    let input = records(vec![
        json!({"region": "South", "households": 4}),
        json!({"region": "North", "households": 3}),
        json!({"region": "South", "households": "unknown"}),
        json!({"region": "North", "households": 2.5}),
    ]);
    let rows =
        process_chart_data(&input, &chart(ChartType::Bar, Some("region"), Some("households")))
            .unwrap();
    assert_eq!(
        rows_json(rows),
        json!([
            {"region": "South", "households": 4.0},
            {"region": "North", "households": 5.5}
        ])
    );
}

#[test]
fn bar_counts_when_y_axis_never_numeric() {
    let input = records(vec![json!({"region": "North", "notes": "ok"})]);
    let rows =
        process_chart_data(&input, &chart(ChartType::Bar, Some("region"), Some("notes"))).unwrap();
    assert_eq!(rows_json(rows), json!([{"region": "North", "count": 1}]));
}

#[test]
fn bar_skips_records_without_group_field() {
    let input = records(vec![json!({"region": "North"}), json!({"district": "East"})]);
    let rows = process_chart_data(&input, &chart(ChartType::Bar, Some("region"), None)).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn bar_without_x_axis_is_missing_field() {
    let err = process_chart_data(&[], &chart(ChartType::Bar, None, None)).unwrap_err();
    assert_eq!(err, ValidationError::missing("xAxis"));
    let err = process_chart_data(&[], &chart(ChartType::Line, None, None)).unwrap_err();
    assert_eq!(err, ValidationError::missing("xAxis"));
}

#[test]
fn filters_apply_before_grouping_with_decimal_number_equality() {
    let input = records(vec![
        json!({"region": "North", "round": 1}),
        json!({"region": "South", "round": 1.0}),
        json!({"region": "East", "round": 2}),
        json!({"region": "West"}),
    ]);
    let mut filters = Filters::new();
    filters.insert("round".to_string(), json!(1));
    let config = ChartConfig {
        filters: Some(filters),
        ..chart(ChartType::Bar, Some("region"), None)
    };
    let rows = process_chart_data(&input, &config).unwrap();
    assert_eq!(
        rows_json(rows),
        json!([
            {"region": "North", "count": 1},
            {"region": "South", "count": 1}
        ])
    );
}

#[test]
fn numeric_buckets_group_by_decimal_value() {
    let input = records(vec![json!({"score": 1}), json!({"score": 1.0}), json!({"score": 2})]);
    let mut filters = Filters::new();
    filters.insert("score".to_string(), json!(1));
    let config = ChartConfig {
        filters: Some(filters),
        ..chart(ChartType::Bar, Some("score"), None)
    };
    let rows = process_chart_data(&input, &config).unwrap();
    assert_eq!(rows_json(rows), json!([{"score": 1, "count": 2}]));

    let pie = process_chart_data(&input, &chart(ChartType::Pie, Some("score"), None)).unwrap();
    assert_eq!(rows_json(pie), json!([{"name": "1", "value": 2}, {"name": "2", "value": 1}]));
}

#[test]
fn empty_input_yields_no_rows() {
    for chart_type in [ChartType::Bar, ChartType::Line, ChartType::Pie] {
        let rows = process_chart_data(&[], &chart(chart_type, Some("region"), None)).unwrap();
        assert!(rows.is_empty(), "{chart_type:?}");
    }
}

// ============================================================================
// SECTION: Line
// ============================================================================

#[test]
fn line_orders_dates_chronologically() {
    let input = records(vec![
        json!({"day": "2024-02-01"}),
        json!({"day": "2024-01-15T09:00:00Z"}),
        json!({"day": "2024-02-01"}),
    ]);
    let rows = process_chart_data(&input, &chart(ChartType::Line, Some("day"), None)).unwrap();
    assert_eq!(
        rows_json(rows),
        json!([
            {"day": "2024-01-15T09:00:00Z", "count": 1},
            {"day": "2024-02-01", "count": 2}
        ])
    );
}

#[test]
fn line_orders_numbers_numerically() {
    let input = records(vec![json!({"week": 10}), json!({"week": 2}), json!({"week": 1})]);
    let rows = process_chart_data(&input, &chart(ChartType::Line, Some("week"), None)).unwrap();
    let weeks: Vec<Value> = rows.iter().map(|row| row["week"].clone()).collect();
    assert_eq!(weeks, vec![json!(1), json!(2), json!(10)]);
}

#[test]
fn line_falls_back_to_lexicographic_order() {
    let input = records(vec![json!({"k": "b"}), json!({"k": 3}), json!({"k": "a"})]);
    let rows = process_chart_data(&input, &chart(ChartType::Line, Some("k"), None)).unwrap();
    let keys: Vec<Value> = rows.iter().map(|row| row["k"].clone()).collect();
    assert_eq!(keys, vec![json!(3), json!("a"), json!("b")]);
}

// ============================================================================
// SECTION: Pie
// ============================================================================

#[test]
fn pie_defaults_to_form_and_sorts_by_descending_value() {
    let input = records(vec![
        json!({"form": "Water"}),
        json!({"form": "Health"}),
        json!({"form": "Health"}),
        json!({"form": "Education"}),
    ]);
    let rows = process_chart_data(&input, &chart(ChartType::Pie, None, None)).unwrap();
    assert_eq!(
        rows_json(rows),
        json!([
            {"name": "Health", "value": 2},
            {"name": "Water", "value": 1},
            {"name": "Education", "value": 1}
        ])
    );
}

#[test]
fn pie_groups_by_x_axis_and_renders_names_as_text() {
    let input = records(vec![json!({"age": 30}), json!({"age": 30}), json!({"age": true})]);
    let rows = process_chart_data(&input, &chart(ChartType::Pie, Some("age"), None)).unwrap();
    assert_eq!(
        rows_json(rows),
        json!([
            {"name": "30", "value": 2},
            {"name": "true", "value": 1}
        ])
    );
}
