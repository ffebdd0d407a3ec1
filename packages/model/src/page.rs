//! # Page1 template configuration
//!
//! Declarative description of a templated page: top bar options, filter area,
//! actions area, card area and data table. Everything here is plain data and
//! round-trips through JSON; runtime-only pieces (mock row producers) live in
//! [`MockData`](crate::MockData).

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_FILTER_COLUMNS: u32 = 4;
pub const DEFAULT_CARD_COLUMNS: u32 = 4;
pub const DEFAULT_GAP: &str = "16px";

/// Template tag carried by sub-items that render a page config.
pub const PAGE_TEMPLATE: &str = "Page1";

/// Full configuration of a Page1 template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_bar: Option<TopBar>,

    #[serde(default)]
    pub filter_area: FilterArea,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions_area: Option<ActionsArea>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_area: Option<CardArea>,

    #[serde(default)]
    pub table_area: TableArea,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterArea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,

    /// Filters per row, always >= 1
    #[serde(default = "default_filter_columns")]
    pub columns: u32,

    #[serde(default = "default_gap")]
    pub gap: String,

    #[serde(default)]
    pub filters: Vec<FilterField>,
}

impl Default for FilterArea {
    fn default() -> Self {
        Self {
            show: None,
            columns: DEFAULT_FILTER_COLUMNS,
            gap: default_gap(),
            filters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    #[default]
    Input,
    Select,
    DateRange,
    TreeSelect,
}

impl FilterKind {
    pub const ALL: [&'static str; 4] = ["input", "select", "date-range", "tree-select"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Input => "input",
            FilterKind::Select => "select",
            FilterKind::DateRange => "date-range",
            FilterKind::TreeSelect => "tree-select",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterField {
    pub key: String,

    #[serde(rename = "type", default)]
    pub kind: FilterKind,

    #[serde(default)]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_options: Option<Vec<TreeNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Node of a tree-select option list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionsArea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default)]
    pub buttons: Vec<ActionButton>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    Default,
    Outline,
    Secondary,
    Ghost,
}

impl ButtonVariant {
    pub const ALL: [&'static str; 4] = ["default", "outline", "secondary", "ghost"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonVariant::Default => "default",
            ButtonVariant::Outline => "outline",
            ButtonVariant::Secondary => "secondary",
            ButtonVariant::Ghost => "ghost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionButton {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ButtonVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardArea {
    #[serde(default = "default_true")]
    pub show: bool,

    /// Cards per row, always >= 1
    #[serde(default = "default_card_columns")]
    pub columns: u32,

    #[serde(default = "default_gap")]
    pub gap: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_height: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_width: Option<String>,

    #[serde(default)]
    pub cards: Vec<CardItem>,
}

impl Default for CardArea {
    fn default() -> Self {
        Self {
            show: true,
            columns: DEFAULT_CARD_COLUMNS,
            gap: default_gap(),
            card_height: None,
            card_width: None,
            cards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardItem {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub data: CardValue,
}

/// Card payload: either display text or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardValue {
    Number(serde_json::Number),
    Text(String),
}

impl Default for CardValue {
    fn default() -> Self {
        CardValue::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableArea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_x: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_y: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_checkbox: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_layout: Option<bool>,
    #[serde(default)]
    pub columns: Vec<TableColumn>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnKind {
    Text,
    Badge,
    StatusBadge,
}

impl ColumnKind {
    pub const ALL: [&'static str; 3] = ["text", "badge", "status-badge"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Badge => "badge",
            ColumnKind::StatusBadge => "status-badge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnFixed {
    Left,
    Right,
}

impl ColumnFixed {
    pub const ALL: [&'static str; 2] = ["left", "right"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnFixed::Left => "left",
            ColumnFixed::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ColumnKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<ColumnFixed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

fn default_filter_columns() -> u32 {
    DEFAULT_FILTER_COLUMNS
}

fn default_card_columns() -> u32 {
    DEFAULT_CARD_COLUMNS
}

fn default_gap() -> String {
    DEFAULT_GAP.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_page_config_uses_defaults() {
        let config: PageConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.filter_area.columns, DEFAULT_FILTER_COLUMNS);
        assert_eq!(config.filter_area.gap, DEFAULT_GAP);
        assert!(config.table_area.columns.is_empty());
        assert!(config.card_area.is_none());
    }

    #[test]
    fn test_filter_kind_uses_kebab_case() {
        let field: FilterField = serde_json::from_value(json!({
            "key": "date",
            "type": "date-range",
            "label": "日期"
        }))
        .unwrap();
        assert_eq!(field.kind, FilterKind::DateRange);

        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], "date-range");
        assert!(value.get("placeholder").is_none());
    }

    #[test]
    fn test_card_value_keeps_numbers_and_text() {
        let cards: Vec<CardItem> = serde_json::from_value(json!([
            { "key": "a", "title": "总数", "data": 12 },
            { "key": "b", "title": "比例", "data": "45%" }
        ]))
        .unwrap();

        assert!(matches!(cards[0].data, CardValue::Number(_)));
        assert_eq!(cards[1].data, CardValue::Text("45%".to_string()));
        assert_eq!(serde_json::to_value(&cards[0]).unwrap()["data"], json!(12));
    }
}
