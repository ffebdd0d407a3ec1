//! # Configuration Patches
//!
//! A patch is an incoming, possibly partial, configuration. Unlike
//! [`ConfigDocument`], scalar fields are optional so that a merge can tell
//! "set to this value" apart from "not mentioned".
//!
//! Patches are produced by [`normalize_patch`](crate::normalize_patch); every item
//! already carries an id (back-filled when the source omitted it).

use indexmap::IndexMap;

use crate::document::{ConfigDocument, NavGroup, NavMainItem, NavSubItem};
use crate::page::PageConfig;

pub const DEFAULT_URL: &str = "#";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigPatch {
    pub nav_groups: Vec<GroupPatch>,
    /// Legacy side-map entries (`pageConfigs`)
    pub page_configs: IndexMap<String, PageConfig>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupPatch {
    pub id: Option<String>,
    pub label: String,
    pub show_label: Option<bool>,
    pub items: Vec<MainItemPatch>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MainItemPatch {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub is_open: Option<bool>,
    pub items: Vec<SubItemPatch>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubItemPatch {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub badge: Option<String>,
    pub template: Option<String>,
    /// Embedded page config (current wire shape)
    pub component: Option<PageConfig>,
}

impl ConfigPatch {
    pub fn main_items(&self) -> impl Iterator<Item = &MainItemPatch> {
        self.nav_groups.iter().flat_map(|g| g.items.iter())
    }

    pub fn sub_items(&self) -> impl Iterator<Item = &SubItemPatch> {
        self.main_items().flat_map(|m| m.items.iter())
    }

    /// Every page config the patch carries, side map first, then embedded
    /// components in tree order. Later entries with the same id win.
    pub fn page_configs(&self) -> IndexMap<&str, &PageConfig> {
        let mut all: IndexMap<&str, &PageConfig> = self
            .page_configs
            .iter()
            .map(|(id, config)| (id.as_str(), config))
            .collect();

        for sub in self.sub_items() {
            if let Some(component) = &sub.component {
                all.insert(sub.id.as_str(), component);
            }
        }

        all
    }

    /// The page a preview should show: first side-map entry, else the first
    /// embedded component
    pub fn first_page(&self) -> Option<(&str, &PageConfig)> {
        if let Some((id, config)) = self.page_configs.first() {
            return Some((id.as_str(), config));
        }

        self.sub_items()
            .find_map(|sub| sub.component.as_ref().map(|c| (sub.id.as_str(), c)))
    }

    pub fn sub_item(&self, id: &str) -> Option<&SubItemPatch> {
        self.sub_items().find(|sub| sub.id == id)
    }

    /// Use the patch as a complete document
    pub fn to_document(&self) -> ConfigDocument {
        let nav_groups = self
            .nav_groups
            .iter()
            .map(|group| NavGroup {
                id: group.id.clone(),
                label: group.label.clone(),
                show_label: group.show_label,
                items: group
                    .items
                    .iter()
                    .map(|main| {
                        let mut item = main.to_main_item();
                        item.items = main.items.iter().map(SubItemPatch::to_sub_item).collect();
                        item
                    })
                    .collect(),
            })
            .collect();

        let page_configs = self
            .page_configs()
            .into_iter()
            .map(|(id, config)| (id.to_string(), config.clone()))
            .collect();

        ConfigDocument {
            nav_groups,
            page_configs,
        }
    }
}

impl GroupPatch {
    /// Empty group carrying this patch's label and flags
    pub fn to_group(&self) -> NavGroup {
        NavGroup {
            id: self.id.clone(),
            label: self.label.clone(),
            show_label: self.show_label,
            items: Vec::new(),
        }
    }
}

impl MainItemPatch {
    /// New main item without sub-items
    pub fn to_main_item(&self) -> NavMainItem {
        NavMainItem {
            id: self.id.clone(),
            title: self.title.clone().unwrap_or_else(|| self.id.clone()),
            url: self.url.clone().unwrap_or_else(|| DEFAULT_URL.to_string()),
            is_open: self.is_open.unwrap_or(false),
            items: Vec::new(),
        }
    }

    /// Overwrite the scalar fields this patch mentions
    pub fn apply_to(&self, item: &mut NavMainItem) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(url) = &self.url {
            item.url = url.clone();
        }
        if let Some(is_open) = self.is_open {
            item.is_open = is_open;
        }
    }
}

impl SubItemPatch {
    pub fn to_sub_item(&self) -> NavSubItem {
        NavSubItem {
            id: self.id.clone(),
            title: self.title.clone().unwrap_or_else(|| self.id.clone()),
            url: self.url.clone().unwrap_or_else(|| DEFAULT_URL.to_string()),
            badge: self.badge.clone(),
            template: self.template.clone(),
        }
    }

    pub fn apply_to(&self, sub: &mut NavSubItem) {
        if let Some(title) = &self.title {
            sub.title = title.clone();
        }
        if let Some(url) = &self.url {
            sub.url = url.clone();
        }
        if let Some(badge) = &self.badge {
            sub.badge = Some(badge.clone());
        }
        if let Some(template) = &self.template {
            sub.template = Some(template.clone());
        }
    }
}
