//! # Store Mutations
//!
//! Every change to the committed configuration goes through one of these
//! operations. Each mutation validates its target before touching the
//! document, so a failed mutation leaves the document unchanged.
//!
//! ## Addressing
//!
//! Navigation mutations address their target the way the sidebar editor does:
//! a group index, then main item id, then sub item id. Page-config mutations
//! address the owning sub-item id only; the config may exist before its
//! sub-item does.
//!
//! ## Semantics
//!
//! - `Add*` carries a fully-built item; the store generates the id
//! - `Update*` overwrites only the fields present in the change set
//! - `Delete*` removes the item and everything under it, page configs stay
//! - `SetTemplate` is usually produced by a post-effect, not by callers

use navboard_model::{
    ActionsArea, CardArea, ConfigDocument, FilterArea, FilterField, NavGroup, NavMainItem,
    NavSubItem, PageConfig, TableArea, TableColumn, TopBar,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    AddGroup {
        group: NavGroupSeed,
    },

    AddMainItem {
        group_index: usize,
        item: NavMainItemSeed,
    },

    UpdateMainItem {
        group_index: usize,
        item_id: String,
        changes: MainItemChanges,
    },

    DeleteMainItem {
        group_index: usize,
        item_id: String,
    },

    AddSubItem {
        group_index: usize,
        main_id: String,
        item: NavSubItemSeed,
    },

    UpdateSubItem {
        group_index: usize,
        main_id: String,
        sub_id: String,
        changes: SubItemChanges,
    },

    DeleteSubItem {
        group_index: usize,
        main_id: String,
        sub_id: String,
    },

    /// Insert or replace the page config of a sub-item
    SetPageConfig {
        sub_id: String,
        config: PageConfig,
    },

    /// Shallow update of an existing page config
    UpdatePageConfig {
        sub_id: String,
        changes: PageConfigChanges,
    },

    DeletePageConfig {
        sub_id: String,
    },

    UpdateFilterArea {
        sub_id: String,
        changes: FilterAreaChanges,
    },

    UpdateTableArea {
        sub_id: String,
        changes: TableAreaChanges,
    },

    /// Set or clear the template tag of a sub-item wherever it lives
    SetTemplate {
        sub_id: String,
        template: Option<String>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Navigation group not found at index {0}")]
    GroupNotFound(usize),

    #[error("Main navigation item not found: {0}")]
    MainItemNotFound(String),

    #[error("Sub navigation item not found: {0}")]
    SubItemNotFound(String),

    #[error("Page config not found: {0}")]
    PageConfigNotFound(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Group as supplied by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NavGroupSeed {
    pub id: Option<String>,
    pub label: String,
    pub show_label: Option<bool>,
}

/// Main item with its generated id, sub-items are added separately
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NavMainItemSeed {
    pub id: String,
    pub title: String,
    pub url: String,
    pub is_open: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NavSubItemSeed {
    pub id: String,
    pub title: String,
    pub url: String,
    pub badge: Option<String>,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MainItemChanges {
    pub title: Option<String>,
    pub url: Option<String>,
    pub is_open: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubItemChanges {
    pub title: Option<String>,
    pub url: Option<String>,
    pub badge: Option<String>,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageConfigChanges {
    pub top_bar: Option<TopBar>,
    pub filter_area: Option<FilterArea>,
    pub actions_area: Option<ActionsArea>,
    pub card_area: Option<CardArea>,
    pub table_area: Option<TableArea>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterAreaChanges {
    pub show: Option<bool>,
    pub columns: Option<u32>,
    pub gap: Option<String>,
    pub filters: Option<Vec<FilterField>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TableAreaChanges {
    pub show: Option<bool>,
    pub height: Option<String>,
    pub scroll_x: Option<bool>,
    pub scroll_y: Option<bool>,
    pub show_checkbox: Option<bool>,
    pub fixed_layout: Option<bool>,
    pub columns: Option<Vec<TableColumn>>,
}

impl Mutation {
    /// Apply mutation to the document with validation
    pub fn apply(&self, doc: &mut ConfigDocument) -> Result<(), MutationError> {
        self.validate(doc)?;

        match self {
            Mutation::AddGroup { group } => {
                doc.nav_groups.push(NavGroup {
                    id: group.id.clone(),
                    label: group.label.clone(),
                    show_label: group.show_label,
                    items: Vec::new(),
                });
                Ok(())
            }

            Mutation::AddMainItem { group_index, item } => {
                let group = group_mut(doc, *group_index)?;
                group.items.push(NavMainItem {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    url: item.url.clone(),
                    is_open: item.is_open,
                    items: Vec::new(),
                });
                Ok(())
            }

            Mutation::UpdateMainItem {
                group_index,
                item_id,
                changes,
            } => {
                let item = main_mut(doc, *group_index, item_id)?;
                if let Some(title) = &changes.title {
                    item.title = title.clone();
                }
                if let Some(url) = &changes.url {
                    item.url = url.clone();
                }
                if let Some(is_open) = changes.is_open {
                    item.is_open = is_open;
                }
                Ok(())
            }

            Mutation::DeleteMainItem {
                group_index,
                item_id,
            } => {
                let group = group_mut(doc, *group_index)?;
                let index = group
                    .items
                    .iter()
                    .position(|item| &item.id == item_id)
                    .ok_or_else(|| MutationError::MainItemNotFound(item_id.clone()))?;
                group.items.remove(index);
                Ok(())
            }

            Mutation::AddSubItem {
                group_index,
                main_id,
                item,
            } => {
                let main = main_mut(doc, *group_index, main_id)?;
                main.items.push(NavSubItem {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    url: item.url.clone(),
                    badge: item.badge.clone(),
                    template: item.template.clone(),
                });
                Ok(())
            }

            Mutation::UpdateSubItem {
                group_index,
                main_id,
                sub_id,
                changes,
            } => {
                let sub = sub_mut(doc, *group_index, main_id, sub_id)?;
                if let Some(title) = &changes.title {
                    sub.title = title.clone();
                }
                if let Some(url) = &changes.url {
                    sub.url = url.clone();
                }
                if let Some(badge) = &changes.badge {
                    sub.badge = Some(badge.clone());
                }
                if let Some(template) = &changes.template {
                    sub.template = Some(template.clone());
                }
                Ok(())
            }

            Mutation::DeleteSubItem {
                group_index,
                main_id,
                sub_id,
            } => {
                let main = main_mut(doc, *group_index, main_id)?;
                let index = main
                    .items
                    .iter()
                    .position(|sub| &sub.id == sub_id)
                    .ok_or_else(|| MutationError::SubItemNotFound(sub_id.clone()))?;
                main.items.remove(index);
                Ok(())
            }

            Mutation::SetPageConfig { sub_id, config } => {
                doc.page_configs.insert(sub_id.clone(), config.clone());
                Ok(())
            }

            Mutation::UpdatePageConfig { sub_id, changes } => {
                let config = page_mut(doc, sub_id)?;
                if let Some(top_bar) = &changes.top_bar {
                    config.top_bar = Some(top_bar.clone());
                }
                if let Some(filter_area) = &changes.filter_area {
                    config.filter_area = filter_area.clone();
                }
                if let Some(actions_area) = &changes.actions_area {
                    config.actions_area = Some(actions_area.clone());
                }
                if let Some(card_area) = &changes.card_area {
                    config.card_area = Some(card_area.clone());
                }
                if let Some(table_area) = &changes.table_area {
                    config.table_area = table_area.clone();
                }
                Ok(())
            }

            Mutation::DeletePageConfig { sub_id } => {
                doc.page_configs
                    .shift_remove(sub_id)
                    .map(|_| ())
                    .ok_or_else(|| MutationError::PageConfigNotFound(sub_id.clone()))
            }

            Mutation::UpdateFilterArea { sub_id, changes } => {
                let area = &mut page_mut(doc, sub_id)?.filter_area;
                if let Some(show) = changes.show {
                    area.show = Some(show);
                }
                if let Some(columns) = changes.columns {
                    area.columns = columns;
                }
                if let Some(gap) = &changes.gap {
                    area.gap = gap.clone();
                }
                if let Some(filters) = &changes.filters {
                    area.filters = filters.clone();
                }
                Ok(())
            }

            Mutation::UpdateTableArea { sub_id, changes } => {
                let area = &mut page_mut(doc, sub_id)?.table_area;
                if let Some(show) = changes.show {
                    area.show = Some(show);
                }
                if let Some(height) = &changes.height {
                    area.height = Some(height.clone());
                }
                if let Some(scroll_x) = changes.scroll_x {
                    area.scroll_x = Some(scroll_x);
                }
                if let Some(scroll_y) = changes.scroll_y {
                    area.scroll_y = Some(scroll_y);
                }
                if let Some(show_checkbox) = changes.show_checkbox {
                    area.show_checkbox = Some(show_checkbox);
                }
                if let Some(fixed_layout) = changes.fixed_layout {
                    area.fixed_layout = Some(fixed_layout);
                }
                if let Some(columns) = &changes.columns {
                    area.columns = columns.clone();
                }
                Ok(())
            }

            Mutation::SetTemplate { sub_id, template } => {
                let sub = doc
                    .sub_item_mut(sub_id)
                    .ok_or_else(|| MutationError::SubItemNotFound(sub_id.clone()))?;
                sub.template = template.clone();
                Ok(())
            }
        }
    }

    /// Structural checks that do not need a mutable borrow
    fn validate(&self, doc: &ConfigDocument) -> Result<(), MutationError> {
        match self {
            Mutation::AddMainItem { item, .. } if doc.locate_main(&item.id).is_some() => {
                Err(MutationError::DuplicateId(item.id.clone()))
            }

            Mutation::AddSubItem { item, .. } if doc.locate_sub(&item.id).is_some() => {
                Err(MutationError::DuplicateId(item.id.clone()))
            }

            Mutation::SetPageConfig { config, .. } => check_columns(config),

            Mutation::UpdatePageConfig { changes, .. } => {
                if let Some(area) = &changes.filter_area {
                    non_zero("filterArea.columns", area.columns)?;
                }
                if let Some(area) = &changes.card_area {
                    non_zero("cardArea.columns", area.columns)?;
                }
                Ok(())
            }

            Mutation::UpdateFilterArea { changes, .. } => match changes.columns {
                Some(columns) => non_zero("filterArea.columns", columns),
                None => Ok(()),
            },

            _ => Ok(()),
        }
    }

    /// Sub-item whose page config this mutation touches, if any
    pub fn page_target(&self) -> Option<&str> {
        match self {
            Mutation::SetPageConfig { sub_id, .. }
            | Mutation::UpdatePageConfig { sub_id, .. }
            | Mutation::DeletePageConfig { sub_id }
            | Mutation::UpdateFilterArea { sub_id, .. }
            | Mutation::UpdateTableArea { sub_id, .. } => Some(sub_id),
            _ => None,
        }
    }
}

fn check_columns(config: &PageConfig) -> Result<(), MutationError> {
    non_zero("filterArea.columns", config.filter_area.columns)?;
    if let Some(area) = &config.card_area {
        non_zero("cardArea.columns", area.columns)?;
    }
    Ok(())
}

fn non_zero(field: &str, columns: u32) -> Result<(), MutationError> {
    if columns == 0 {
        return Err(MutationError::InvalidValue(format!(
            "{} must be at least 1",
            field
        )));
    }
    Ok(())
}

fn group_mut(doc: &mut ConfigDocument, index: usize) -> Result<&mut NavGroup, MutationError> {
    doc.nav_groups
        .get_mut(index)
        .ok_or(MutationError::GroupNotFound(index))
}

fn main_mut<'a>(
    doc: &'a mut ConfigDocument,
    group_index: usize,
    main_id: &str,
) -> Result<&'a mut NavMainItem, MutationError> {
    group_mut(doc, group_index)?
        .items
        .iter_mut()
        .find(|item| item.id == main_id)
        .ok_or_else(|| MutationError::MainItemNotFound(main_id.to_string()))
}

fn sub_mut<'a>(
    doc: &'a mut ConfigDocument,
    group_index: usize,
    main_id: &str,
    sub_id: &str,
) -> Result<&'a mut NavSubItem, MutationError> {
    main_mut(doc, group_index, main_id)?
        .items
        .iter_mut()
        .find(|sub| sub.id == sub_id)
        .ok_or_else(|| MutationError::SubItemNotFound(sub_id.to_string()))
}

fn page_mut<'a>(
    doc: &'a mut ConfigDocument,
    sub_id: &str,
) -> Result<&'a mut PageConfig, MutationError> {
    doc.page_configs
        .get_mut(sub_id)
        .ok_or_else(|| MutationError::PageConfigNotFound(sub_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_main() -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        Mutation::AddGroup {
            group: NavGroupSeed {
                label: "平台".to_string(),
                ..Default::default()
            },
        }
        .apply(&mut doc)
        .unwrap();
        Mutation::AddMainItem {
            group_index: 0,
            item: NavMainItemSeed {
                id: "workspace".to_string(),
                title: "工作台".to_string(),
                url: "#".to_string(),
                is_open: false,
            },
        }
        .apply(&mut doc)
        .unwrap();
        doc
    }

    #[test]
    fn test_update_main_item_partial() {
        let mut doc = doc_with_main();
        Mutation::UpdateMainItem {
            group_index: 0,
            item_id: "workspace".to_string(),
            changes: MainItemChanges {
                is_open: Some(true),
                ..Default::default()
            },
        }
        .apply(&mut doc)
        .unwrap();

        let item = doc.main_item("workspace").unwrap();
        assert!(item.is_open);
        assert_eq!(item.title, "工作台");
    }

    #[test]
    fn test_missing_targets_are_errors() {
        let mut doc = doc_with_main();

        let result = Mutation::DeleteMainItem {
            group_index: 3,
            item_id: "workspace".to_string(),
        }
        .apply(&mut doc);
        assert_eq!(result, Err(MutationError::GroupNotFound(3)));

        let result = Mutation::DeleteSubItem {
            group_index: 0,
            main_id: "workspace".to_string(),
            sub_id: "nope".to_string(),
        }
        .apply(&mut doc);
        assert_eq!(result, Err(MutationError::SubItemNotFound("nope".to_string())));

        let result = Mutation::UpdateFilterArea {
            sub_id: "nope".to_string(),
            changes: FilterAreaChanges::default(),
        }
        .apply(&mut doc);
        assert_eq!(
            result,
            Err(MutationError::PageConfigNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_zero_columns_rejected_without_change() {
        let mut doc = doc_with_main();
        doc.page_configs
            .insert("1".to_string(), PageConfig::default());
        let before = doc.clone();

        let result = Mutation::UpdateFilterArea {
            sub_id: "1".to_string(),
            changes: FilterAreaChanges {
                columns: Some(0),
                ..Default::default()
            },
        }
        .apply(&mut doc);

        assert!(matches!(result, Err(MutationError::InvalidValue(_))));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_duplicate_main_id_rejected() {
        let mut doc = doc_with_main();
        let result = Mutation::AddMainItem {
            group_index: 0,
            item: NavMainItemSeed {
                id: "workspace".to_string(),
                ..Default::default()
            },
        }
        .apply(&mut doc);
        assert_eq!(
            result,
            Err(MutationError::DuplicateId("workspace".to_string()))
        );
    }
}
