//! # Configuration Document
//!
//! The committed unit of configuration: an ordered navigation tree plus the
//! page configurations of its leaves.
//!
//! Page configs are stored canonically in a side map keyed by sub-item id.
//! The embedded shape (`component` on a sub-item) only exists on the wire and
//! is produced by [`export_document`](crate::export_document).
//!
//! ```text
//! ConfigDocument
//!   ├── nav_groups: [NavGroup]            (render order)
//!   │     └── items: [NavMainItem]        (id unique among main items)
//!   │           └── items: [NavSubItem]   (id unique among sub items)
//!   └── page_configs: { sub id → PageConfig }
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::{ValidationError, ValidationResult};
use crate::page::PageConfig;

/// Navigation tree plus page configurations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigDocument {
    pub nav_groups: Vec<NavGroup>,
    pub page_configs: IndexMap<String, PageConfig>,
}

/// Labelled group of top-level navigation entries
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavGroup {
    pub id: Option<String>,
    pub label: String,
    pub show_label: Option<bool>,
    pub items: Vec<NavMainItem>,
}

/// First-level navigation entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavMainItem {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Whether the entry starts expanded
    pub is_open: bool,
    pub items: Vec<NavSubItem>,
}

/// Second-level navigation entry, the only level that renders pages
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavSubItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub badge: Option<String>,
    pub template: Option<String>,
}

/// Position of a navigation item inside the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPath {
    pub group: usize,
    pub main: usize,
    pub sub: Option<usize>,
}

impl NavSubItem {
    pub fn has_template(&self) -> bool {
        self.template.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nav_groups.is_empty() && self.page_configs.is_empty()
    }

    pub fn group_by_label(&self, label: &str) -> Option<&NavGroup> {
        self.nav_groups.iter().find(|g| g.label == label)
    }

    /// Find a main item anywhere in the tree
    pub fn locate_main(&self, id: &str) -> Option<ItemPath> {
        self.nav_groups.iter().enumerate().find_map(|(g, group)| {
            group
                .items
                .iter()
                .position(|item| item.id == id)
                .map(|m| ItemPath {
                    group: g,
                    main: m,
                    sub: None,
                })
        })
    }

    /// Find a sub item anywhere in the tree
    pub fn locate_sub(&self, id: &str) -> Option<ItemPath> {
        for (g, group) in self.nav_groups.iter().enumerate() {
            for (m, main) in group.items.iter().enumerate() {
                if let Some(s) = main.items.iter().position(|sub| sub.id == id) {
                    return Some(ItemPath {
                        group: g,
                        main: m,
                        sub: Some(s),
                    });
                }
            }
        }
        None
    }

    pub fn main_item(&self, id: &str) -> Option<&NavMainItem> {
        self.locate_main(id)
            .map(|path| &self.nav_groups[path.group].items[path.main])
    }

    pub fn sub_item(&self, id: &str) -> Option<&NavSubItem> {
        let path = self.locate_sub(id)?;
        let sub = path.sub?;
        Some(&self.nav_groups[path.group].items[path.main].items[sub])
    }

    pub fn sub_item_mut(&mut self, id: &str) -> Option<&mut NavSubItem> {
        let path = self.locate_sub(id)?;
        let sub = path.sub?;
        Some(&mut self.nav_groups[path.group].items[path.main].items[sub])
    }

    pub fn main_ids(&self) -> impl Iterator<Item = &str> {
        self.nav_groups
            .iter()
            .flat_map(|g| g.items.iter())
            .map(|item| item.id.as_str())
    }

    pub fn sub_ids(&self) -> impl Iterator<Item = &str> {
        self.nav_groups
            .iter()
            .flat_map(|g| g.items.iter())
            .flat_map(|item| item.items.iter())
            .map(|sub| sub.id.as_str())
    }

    /// Every main and sub item id in the tree
    pub fn nav_ids(&self) -> HashSet<&str> {
        self.main_ids().chain(self.sub_ids()).collect()
    }

    /// A sub-item is a page leaf when it names a template or owns a page config
    pub fn is_page_leaf(&self, sub: &NavSubItem) -> bool {
        sub.has_template() || self.page_configs.contains_key(&sub.id)
    }

    /// Page configs whose owning sub-item does not exist (yet)
    pub fn orphan_page_configs(&self) -> impl Iterator<Item = (&String, &PageConfig)> {
        let subs: HashSet<&str> = self.sub_ids().collect();
        self.page_configs
            .iter()
            .filter(move |(id, _)| !subs.contains(id.as_str()))
    }

    pub fn nav_item_count(&self) -> usize {
        self.main_ids().count() + self.sub_ids().count()
    }

    /// Ids must be unique among main items and among sub items
    pub fn check_unique_ids(&self) -> ValidationResult<()> {
        let mut seen = HashSet::new();
        for id in self.main_ids() {
            if !seen.insert(id) {
                return Err(ValidationError::duplicate("main item", id));
            }
        }

        let mut seen = HashSet::new();
        for id in self.sub_ids() {
            if !seen.insert(id) {
                return Err(ValidationError::duplicate("sub item", id));
            }
        }

        Ok(())
    }
}
