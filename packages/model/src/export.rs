//! Wire form of a [`ConfigDocument`].
//!
//! On the wire, page configs are embedded in their sub-item as `component`.
//! Configs without a matching sub-item travel in a trailing `pageConfigs`
//! map so nothing is lost between export and import.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{ConfigDocument, NavGroup, NavMainItem, NavSubItem};
use crate::error::{ValidationError, ValidationResult};
use crate::normalize;
use crate::page::PageConfig;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableDocument {
    pub nav_groups: Vec<SerializableGroup>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub page_configs: IndexMap<String, PageConfig>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_label: Option<bool>,
    pub items: Vec<SerializableMainItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableMainItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub is_open: bool,
    pub items: Vec<SerializableSubItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableSubItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<PageConfig>,
}

/// Project a document into its wire form
pub fn export_document(doc: &ConfigDocument) -> SerializableDocument {
    let nav_groups = doc
        .nav_groups
        .iter()
        .map(|group| SerializableGroup {
            id: group.id.clone(),
            label: group.label.clone(),
            show_label: group.show_label,
            items: group
                .items
                .iter()
                .map(|main| export_main_item(doc, main))
                .collect(),
        })
        .collect();

    let page_configs = doc
        .orphan_page_configs()
        .map(|(id, config)| (id.clone(), config.clone()))
        .collect();

    SerializableDocument {
        nav_groups,
        page_configs,
    }
}

fn export_main_item(doc: &ConfigDocument, main: &NavMainItem) -> SerializableMainItem {
    SerializableMainItem {
        id: main.id.clone(),
        title: main.title.clone(),
        url: main.url.clone(),
        is_open: main.is_open,
        items: main
            .items
            .iter()
            .map(|sub| SerializableSubItem {
                id: sub.id.clone(),
                title: sub.title.clone(),
                url: sub.url.clone(),
                badge: sub.badge.clone(),
                template: sub.template.clone(),
                component: doc.page_configs.get(&sub.id).cloned(),
            })
            .collect(),
    }
}

/// Export straight to a JSON value
pub fn export_value(doc: &ConfigDocument) -> ValidationResult<Value> {
    serde_json::to_value(export_document(doc))
        .map_err(|err| ValidationError::Serialize(err.to_string()))
}

/// Import a raw value, tolerating every legacy shape normalization accepts
pub fn import_value(raw: &Value) -> ValidationResult<ConfigDocument> {
    normalize::validate(raw)
}

impl SerializableDocument {
    /// Fold the wire form back into a document as is. Untrusted input goes
    /// through [`import_value`] instead, which enforces document invariants.
    pub fn into_document(self) -> ConfigDocument {
        let mut page_configs = self.page_configs;
        let nav_groups = self
            .nav_groups
            .into_iter()
            .map(|group| NavGroup {
                id: group.id,
                label: group.label,
                show_label: group.show_label,
                items: group
                    .items
                    .into_iter()
                    .map(|main| NavMainItem {
                        id: main.id,
                        title: main.title,
                        url: main.url,
                        is_open: main.is_open,
                        items: main
                            .items
                            .into_iter()
                            .map(|sub| {
                                if let Some(component) = sub.component {
                                    page_configs.insert(sub.id.clone(), component);
                                }
                                NavSubItem {
                                    id: sub.id,
                                    title: sub.title,
                                    url: sub.url,
                                    badge: sub.badge,
                                    template: sub.template,
                                }
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        ConfigDocument {
            nav_groups,
            page_configs,
        }
    }
}
