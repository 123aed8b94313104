// crates/survey-dash-core/src/core/dashboard.rs
// ============================================================================
// Module: Survey Dash Dashboard Model
// Description: Dashboard configuration, layout items, and their update operations.
// Purpose: Describe what a dashboard displays and enforce layout invariants.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`DashboardConfig`] owns an ordered layout of [`LayoutItem`] values; the
//! layout order is the render order. Every operation takes the config by
//! reference and returns a new config, so the input is never mutated and a
//! failed operation leaves it untouched.
//! Invariants:
//! - `id` never changes after [`DashboardConfig::create`].
//! - Item ids are unique within a layout when items arrive through
//!   [`DashboardConfig::add_item`].
//! - Item widths are 1 through 4 and heights 1 through 3.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::DashboardId;
use crate::core::identifiers::LayoutItemId;
use crate::core::validation::ValidationError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Smallest permitted layout item width.
pub const MIN_ITEM_WIDTH: u8 = 1;
/// Largest permitted layout item width.
pub const MAX_ITEM_WIDTH: u8 = 4;
/// Smallest permitted layout item height.
pub const MIN_ITEM_HEIGHT: u8 = 1;
/// Largest permitted layout item height.
pub const MAX_ITEM_HEIGHT: u8 = 3;

// ============================================================================
// SECTION: Item Configurations
// ============================================================================

/// Exact-match filters keyed by record field name.
pub type Filters = BTreeMap<String, Value>;

/// Chart rendering family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// Grouped bars in first-seen order.
    Bar,
    /// Buckets in natural ascending order.
    Line,
    /// Name/value slices by descending value.
    Pie,
}

impl ChartType {
    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
        }
    }
}

/// Chart item configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    /// Chart family.
    #[serde(alias = "type")]
    pub chart_type: ChartType,
    /// Data source key (a form identifier).
    pub data_source: String,
    /// Grouping field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<String>,
    /// Optional numeric field summed per group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<String>,
    /// Exact-match filters applied before grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
}

/// Table item configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    /// Data source key (a form identifier).
    pub data_source: String,
    /// Projected columns in display order.
    pub columns: Vec<String>,
    /// Exact-match filters applied before projection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
    /// Whether the presentation layer paginates the table.
    #[serde(default, alias = "pagination", skip_serializing_if = "Option::is_none")]
    pub paginated: Option<bool>,
}

/// Scalar aggregate computed by a metric item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Calculation {
    /// Number of filtered records.
    Count,
    /// Sum of a numeric field.
    Sum,
    /// Arithmetic mean of a numeric field.
    Average,
    /// Minimum of a numeric field.
    Min,
    /// Maximum of a numeric field.
    Max,
}

impl Calculation {
    /// Returns true when the calculation reads a numeric field.
    #[must_use]
    pub const fn requires_field(self) -> bool {
        !matches!(self, Self::Count)
    }
}

/// Calendar period unit used by metric comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonPeriod {
    /// Calendar day.
    Day,
    /// ISO week starting on Monday.
    Week,
    /// Calendar month.
    Month,
    /// Calendar year.
    Year,
}

/// Period-over-period comparison settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// Period unit.
    pub period: ComparisonPeriod,
    /// Number of periods in each window (at least 1).
    pub value: u32,
}

/// Metric item configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricConfig {
    /// Data source key (a form identifier).
    pub data_source: String,
    /// Aggregate to compute.
    pub calculation: Calculation,
    /// Numeric field; required unless `calculation` is `count`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Exact-match filters applied before aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
    /// Optional period-over-period comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
}

impl MetricConfig {
    /// Validates field and comparison requirements.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when a field-based calculation
    /// has no `field`, and [`ValidationError::InvalidValue`] when a comparison
    /// spans zero periods.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.calculation.requires_field() && self.field.is_none() {
            return Err(ValidationError::missing("field"));
        }
        if let Some(comparison) = &self.comparison
            && comparison.value == 0
        {
            return Err(ValidationError::invalid(
                "comparison.value",
                "comparison must span at least one period",
            ));
        }
        Ok(())
    }
}

/// Free-text item configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Text body rendered by the presentation layer.
    #[serde(default)]
    pub content: String,
}

// ============================================================================
// SECTION: Layout Items
// ============================================================================

/// Layout item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Chart item.
    Chart,
    /// Table item.
    Table,
    /// Metric item.
    Metric,
    /// Text item.
    Text,
}

/// Item kind paired with its configuration.
///
/// Serialized as `"type"` and `"config"` fields on the owning item, so the
/// kind and configuration can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum ItemContent {
    /// Chart configuration.
    Chart(ChartConfig),
    /// Table configuration.
    Table(TableConfig),
    /// Metric configuration.
    Metric(MetricConfig),
    /// Text configuration.
    Text(TextConfig),
}

/// One renderable unit placed on a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Item identifier, unique within the dashboard.
    pub id: LayoutItemId,
    /// Display title.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Grid width (1 through 4).
    pub width: u8,
    /// Grid height (1 through 3).
    pub height: u8,
    /// Kind and configuration.
    #[serde(flatten)]
    pub content: ItemContent,
}

impl LayoutItem {
    /// Returns the item kind derived from its configuration.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self.content {
            ItemContent::Chart(_) => ItemKind::Chart,
            ItemContent::Table(_) => ItemKind::Table,
            ItemContent::Metric(_) => ItemKind::Metric,
            ItemContent::Text(_) => ItemKind::Text,
        }
    }

    /// Validates grid dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDimensions`] when width or height is out of range.
    pub const fn validate_dimensions(&self) -> Result<(), ValidationError> {
        let width_ok = self.width >= MIN_ITEM_WIDTH && self.width <= MAX_ITEM_WIDTH;
        let height_ok = self.height >= MIN_ITEM_HEIGHT && self.height <= MAX_ITEM_HEIGHT;
        if width_ok && height_ok {
            Ok(())
        } else {
            Err(ValidationError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
        }
    }
}

// ============================================================================
// SECTION: Dashboard Configuration
// ============================================================================

/// Partial dashboard accepted by [`DashboardConfig::create`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardDraft {
    /// Identifier; generated when absent or empty.
    #[serde(default)]
    pub id: Option<DashboardId>,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Initial layout; empty when absent.
    #[serde(default)]
    pub layout: Option<Vec<LayoutItem>>,
}

/// Top-level fields merged by [`DashboardConfig::update`].
///
/// The identifier is deliberately absent: it is immutable after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardPatch {
    /// Replacement title.
    #[serde(default)]
    pub title: Option<String>,
    /// Description change: `None` keeps it, `Some(None)` clears it.
    #[serde(
        default,
        deserialize_with = "present_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    /// Replacement layout; replaces the prior layout wholesale.
    #[serde(default)]
    pub layout: Option<Vec<LayoutItem>>,
}

/// Marks a present field, so an explicit `null` deserializes as `Some(None)`.
fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Dashboard identifier.
    pub id: DashboardId,
    /// Display title.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered layout; order is render order.
    #[serde(default)]
    pub layout: Vec<LayoutItem>,
}

impl DashboardConfig {
    /// Creates a dashboard from a draft, generating an identifier when needed.
    #[must_use]
    pub fn create(draft: DashboardDraft) -> Self {
        let id = draft.id.filter(|id| !id.as_str().is_empty()).unwrap_or_else(DashboardId::generate);
        Self {
            id,
            title: draft.title,
            description: draft.description,
            layout: draft.layout.unwrap_or_default(),
        }
    }

    /// Returns a copy with the patch's top-level fields merged in.
    #[must_use]
    pub fn update(&self, patch: DashboardPatch) -> Self {
        Self {
            id: self.id.clone(),
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
            layout: patch.layout.unwrap_or_else(|| self.layout.clone()),
        }
    }

    /// Returns a copy with `item` appended to the layout.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateId`] when the layout already holds
    /// an item with the same id, or [`ValidationError::InvalidDimensions`]
    /// when the item does not fit the grid.
    pub fn add_item(&self, item: LayoutItem) -> Result<Self, ValidationError> {
        if self.item(&item.id).is_some() {
            return Err(ValidationError::DuplicateId {
                id: item.id.to_string(),
            });
        }
        item.validate_dimensions()?;
        let mut next = self.clone();
        next.layout.push(item);
        Ok(next)
    }

    /// Returns a copy without the item named `item_id`; unchanged when absent.
    #[must_use]
    pub fn remove_item(&self, item_id: &LayoutItemId) -> Self {
        let mut next = self.clone();
        next.layout.retain(|item| &item.id != item_id);
        next
    }

    /// Looks up a layout item by identifier.
    #[must_use]
    pub fn item(&self, item_id: &LayoutItemId) -> Option<&LayoutItem> {
        self.layout.iter().find(|item| &item.id == item_id)
    }

    /// Validates a complete layout, e.g. one loaded from storage.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in layout order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = BTreeSet::new();
        for item in &self.layout {
            if !seen.insert(&item.id) {
                return Err(ValidationError::DuplicateId {
                    id: item.id.to_string(),
                });
            }
            item.validate_dimensions()?;
            if let ItemContent::Metric(metric) = &item.content {
                metric.validate()?;
            }
        }
        Ok(())
    }
}
