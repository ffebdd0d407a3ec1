//! # Patch normalization
//!
//! Free-form configuration (assistant output, legacy exports, hand-written
//! files) goes through one explicit normalization step before it is decoded
//! into typed structures. The accepted legacy shapes:
//!
//! ```text
//! item.label (no title)                   → item.title
//! main.navItems | navitems | subItems     → main.items
//! main.isActive (no isOpen)               → main.isOpen
//! sub.component                           → pageConfigs[sub.id]
//! pageConfigs | page1Configs              → pageConfigs
//! page.actions [..]                       → page.actionsArea.buttons
//! filter.type unknown                     → "input"
//! area.columns missing / non-numeric      → default, clamped to >= 1
//! item.id missing                         → gen-<content seed>-<n>
//! item.url missing                        → "#"
//! ```
//!
//! Structural problems (non-object top level, missing `navGroups`, a group
//! without `items`, duplicate ids, undecodable page configs) are
//! [`ValidationError`]s; nothing is mutated when validation fails.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::document::ConfigDocument;
use crate::error::{ValidationError, ValidationResult};
use crate::id_generator::IdGenerator;
use crate::page::{
    ButtonVariant, ColumnFixed, ColumnKind, FilterKind, PageConfig, DEFAULT_CARD_COLUMNS,
    DEFAULT_FILTER_COLUMNS,
};
use crate::patch::{ConfigPatch, GroupPatch, MainItemPatch, SubItemPatch};

const GENERATED_PREFIX: &str = "gen";
const SUB_ITEM_KEYS: [&str; 4] = ["items", "navItems", "navitems", "subItems"];
const PAGE_CONFIG_KEYS: [&str; 2] = ["pageConfigs", "page1Configs"];

/// Validate and normalize a raw document into a complete [`ConfigDocument`]
pub fn validate(raw: &Value) -> ValidationResult<ConfigDocument> {
    normalize_patch(raw).map(|patch| patch.to_document())
}

/// Validate and normalize a raw value into a [`ConfigPatch`], keeping track
/// of which fields the source actually set
pub fn normalize_patch(raw: &Value) -> ValidationResult<ConfigPatch> {
    let root = raw.as_object().ok_or(ValidationError::NotAnObject {
        found: kind_name(raw),
    })?;

    let groups = match root.get("navGroups") {
        Some(Value::Array(groups)) => groups,
        Some(_) => return Err(ValidationError::wrong_type("$", "navGroups", "an array")),
        None => return Err(ValidationError::missing("$", "navGroups")),
    };

    let mut ids = IdGenerator::for_content(raw);
    for id in explicit_ids(groups) {
        ids.reserve(id);
    }

    let nav_groups = groups
        .iter()
        .enumerate()
        .map(|(index, group)| normalize_group(index, group, &mut ids))
        .collect::<ValidationResult<Vec<_>>>()?;

    let mut page_configs = IndexMap::new();
    for key in PAGE_CONFIG_KEYS {
        if let Some(map) = root.get(key) {
            page_configs.extend(normalize_page_config_map(map)?);
        }
    }

    let patch = ConfigPatch {
        nav_groups,
        page_configs,
    };
    check_unique_ids(&patch)?;

    Ok(patch)
}

/// Normalize a `{ sub id → page config }` map
pub fn normalize_page_config_map(raw: &Value) -> ValidationResult<IndexMap<String, PageConfig>> {
    let map = raw
        .as_object()
        .ok_or_else(|| ValidationError::wrong_type("$", "pageConfigs", "an object"))?;

    map.iter()
        .map(|(id, value)| normalize_page_config(id, value).map(|config| (id.clone(), config)))
        .collect()
}

/// Normalize a single page config owned by sub-item `id`
pub fn normalize_page_config(id: &str, raw: &Value) -> ValidationResult<PageConfig> {
    let mut page = raw
        .as_object()
        .cloned()
        .ok_or_else(|| ValidationError::InvalidPageConfig {
            id: id.to_string(),
            message: format!("expected an object, found {}", kind_name(raw)),
        })?;

    if let Some(actions) = page.remove("actions") {
        if !page.contains_key("actionsArea") {
            let mut area = Map::new();
            area.insert("buttons".to_string(), actions);
            page.insert("actionsArea".to_string(), Value::Object(area));
        }
    }

    if let Some(Value::Object(area)) = page.get_mut("filterArea") {
        fix_columns(area, DEFAULT_FILTER_COLUMNS);
        for filter in objects_in(area, "filters") {
            let known = filter
                .get("type")
                .and_then(Value::as_str)
                .is_some_and(|kind| FilterKind::ALL.contains(&kind));
            if !known {
                filter.insert("type".to_string(), FilterKind::Input.as_str().into());
            }
        }
    }

    if let Some(Value::Object(area)) = page.get_mut("cardArea") {
        fix_columns(area, DEFAULT_CARD_COLUMNS);
    }

    if let Some(Value::Object(area)) = page.get_mut("actionsArea") {
        for button in objects_in(area, "buttons") {
            drop_unknown(button, "variant", &ButtonVariant::ALL);
        }
    }

    if let Some(Value::Object(area)) = page.get_mut("tableArea") {
        for column in objects_in(area, "columns") {
            drop_unknown(column, "type", &ColumnKind::ALL);
            drop_unknown(column, "fixed", &ColumnFixed::ALL);
        }
    }

    serde_json::from_value(Value::Object(page)).map_err(|err| ValidationError::InvalidPageConfig {
        id: id.to_string(),
        message: err.to_string(),
    })
}

fn normalize_group(
    index: usize,
    raw: &Value,
    ids: &mut IdGenerator,
) -> ValidationResult<GroupPatch> {
    let path = format!("navGroups[{}]", index);
    let group = raw
        .as_object()
        .ok_or_else(|| ValidationError::wrong_type(&path, "group", "an object"))?;

    let items = match group.get("items") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ValidationError::wrong_type(&path, "items", "an array")),
        None => return Err(ValidationError::missing(&path, "items")),
    };

    let items = items
        .iter()
        .enumerate()
        .map(|(i, item)| normalize_main_item(&format!("{}.items[{}]", path, i), item, ids))
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(GroupPatch {
        id: id_of(group),
        label: string_field(group, "label")
            .or_else(|| string_field(group, "title"))
            .unwrap_or_default(),
        show_label: group.get("showLabel").and_then(Value::as_bool),
        items,
    })
}

fn normalize_main_item(
    path: &str,
    raw: &Value,
    ids: &mut IdGenerator,
) -> ValidationResult<MainItemPatch> {
    let item = raw
        .as_object()
        .ok_or_else(|| ValidationError::wrong_type(path, "item", "an object"))?;

    let id = id_of(item).unwrap_or_else(|| ids.new_id(GENERATED_PREFIX));

    let subs = match SUB_ITEM_KEYS.iter().find_map(|key| item.get(*key)) {
        Some(Value::Array(subs)) => subs.as_slice(),
        Some(_) => return Err(ValidationError::wrong_type(path, "items", "an array")),
        None => &[],
    };

    let items = subs
        .iter()
        .enumerate()
        .map(|(i, sub)| normalize_sub_item(&format!("{}.items[{}]", path, i), sub, ids))
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(MainItemPatch {
        id,
        title: string_field(item, "title").or_else(|| string_field(item, "label")),
        url: string_field(item, "url"),
        is_open: item
            .get("isOpen")
            .or_else(|| item.get("isActive"))
            .and_then(Value::as_bool),
        items,
    })
}

fn normalize_sub_item(
    path: &str,
    raw: &Value,
    ids: &mut IdGenerator,
) -> ValidationResult<SubItemPatch> {
    let item = raw
        .as_object()
        .ok_or_else(|| ValidationError::wrong_type(path, "item", "an object"))?;

    let id = id_of(item).unwrap_or_else(|| ids.new_id(GENERATED_PREFIX));

    let component = match item.get("component") {
        Some(Value::Null) | None => None,
        Some(raw) => Some(normalize_page_config(&id, raw)?),
    };

    Ok(SubItemPatch {
        title: string_field(item, "title").or_else(|| string_field(item, "label")),
        url: string_field(item, "url"),
        badge: scalar_string(item.get("badge")),
        template: string_field(item, "template"),
        component,
        id,
    })
}

fn check_unique_ids(patch: &ConfigPatch) -> ValidationResult<()> {
    let mut seen = HashSet::new();
    for main in patch.main_items() {
        if !seen.insert(main.id.as_str()) {
            return Err(ValidationError::duplicate("main item", main.id.clone()));
        }
    }

    let mut seen = HashSet::new();
    for sub in patch.sub_items() {
        if !seen.insert(sub.id.as_str()) {
            return Err(ValidationError::duplicate("sub item", sub.id.clone()));
        }
    }

    Ok(())
}

/// Ids spelled out in the source, reserved before any are generated
fn explicit_ids(groups: &[Value]) -> Vec<String> {
    let mut found = Vec::new();
    for group in groups.iter().filter_map(Value::as_object) {
        let Some(Value::Array(items)) = group.get("items") else {
            continue;
        };
        for item in items.iter().filter_map(Value::as_object) {
            found.extend(id_of(item));
            if let Some(Value::Array(subs)) = SUB_ITEM_KEYS.iter().find_map(|key| item.get(*key)) {
                found.extend(subs.iter().filter_map(Value::as_object).filter_map(id_of));
            }
        }
    }
    found
}

/// Numeric ids are accepted and kept as their decimal text
fn id_of(object: &Map<String, Value>) -> Option<String> {
    scalar_string(object.get("id")).filter(|id| !id.is_empty())
}

fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

fn fix_columns(area: &mut Map<String, Value>, default: u32) {
    let columns = match area.get("columns") {
        Some(Value::Number(n)) => n.as_f64().map(|n| n.max(1.0).min(u32::MAX as f64) as u32),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok().map(|n| n.max(1)),
        _ => None,
    };
    area.insert("columns".to_string(), columns.unwrap_or(default).into());
}

fn drop_unknown(object: &mut Map<String, Value>, key: &str, known: &[&str]) {
    let keep = match object.get(key) {
        Some(Value::String(value)) => known.contains(&value.as_str()),
        Some(_) => false,
        None => true,
    };
    if !keep {
        object.remove(key);
    }
}

fn objects_in<'a>(
    area: &'a mut Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    area.get_mut(key)
        .and_then(Value::as_array_mut)
        .into_iter()
        .flat_map(|entries| entries.iter_mut())
        .filter_map(Value::as_object_mut)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
