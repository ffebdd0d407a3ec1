//! # Config Store
//!
//! Owner of the committed configuration. All changes go through
//! [`ConfigStore::apply`] (or one of the CRUD helpers built on it), which runs
//! post-effects, bumps the version and keeps the runtime mock producers in
//! step with the page-config map.
//!
//! ## Lifecycle
//!
//! ```text
//! new (empty) → replace / import_value → CRUD mutations → export
//!                       ↑                                   │
//!                       └──────────── reset ◄───────────────┘
//! ```

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use navboard_model::{
    export_document, export_value, import_value, ConfigDocument, IdGenerator, MockData,
    PageConfig, SerializableDocument,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::EditorError;
use crate::mutations::{
    FilterAreaChanges, MainItemChanges, Mutation, NavGroupSeed, NavMainItemSeed, NavSubItemSeed,
    PageConfigChanges, SubItemChanges, TableAreaChanges,
};
use crate::post_effects::PostEffectEngine;

const MAIN_ID_PREFIX: &str = "nav";
const SUB_ID_PREFIX: &str = "sub";

/// Committed configuration plus its runtime-only attachments
#[derive(Debug)]
pub struct ConfigStore {
    document: ConfigDocument,

    /// Mock row producers by sub-item id, never serialized
    mock_data: HashMap<String, MockData>,

    /// Increments on every successful change
    version: u64,

    effects: PostEffectEngine,
    ids: IdGenerator,
}

/// Page config together with its attached mock producer
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub config: &'a PageConfig,
    pub mock_data: MockData,
}

impl ConfigStore {
    /// Empty store. There is no default content.
    pub fn new() -> Self {
        Self {
            document: ConfigDocument::new(),
            mock_data: HashMap::new(),
            version: 0,
            effects: PostEffectEngine::new(),
            ids: IdGenerator::from_seed(session_seed()),
        }
    }

    pub fn with_document(document: ConfigDocument) -> Self {
        let mut store = Self::new();
        store.replace(document);
        store
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Independent copy of the committed document
    pub fn snapshot(&self) -> ConfigDocument {
        self.document.clone()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /// Apply a mutation and its post-effects atomically
    pub fn apply(&mut self, mutation: Mutation) -> Result<Vec<Mutation>, EditorError> {
        let mut next = self.document.clone();
        let applied = self.effects.apply_with_effects(mutation, &mut next)?;
        self.document = next;

        for mutation in &applied {
            match mutation {
                Mutation::SetPageConfig { sub_id, .. } => {
                    self.mock_data.insert(sub_id.clone(), MockData::empty());
                }
                Mutation::DeletePageConfig { sub_id } => {
                    self.mock_data.remove(sub_id);
                }
                _ => {}
            }
        }

        self.version += 1;
        debug!(
            "[ConfigStore] Applied {} mutation(s), version {}",
            applied.len(),
            self.version
        );

        Ok(applied)
    }

    /// Replace the committed document wholesale. Mock producers are reset.
    pub fn replace(&mut self, document: ConfigDocument) {
        self.document = document;
        self.reattach_mock_data();
        self.version += 1;
        info!(
            "[ConfigStore] Committed document: {} nav item(s), {} page config(s)",
            self.document.nav_item_count(),
            self.document.page_configs.len()
        );
    }

    /// Validate, normalize and commit a raw document
    pub fn import_value(&mut self, raw: &Value) -> Result<(), EditorError> {
        let document = import_value(raw)?;
        self.replace(document);
        Ok(())
    }

    pub fn export(&self) -> SerializableDocument {
        export_document(&self.document)
    }

    pub fn export_value(&self) -> Result<Value, EditorError> {
        Ok(export_value(&self.document)?)
    }

    /// Back to the empty document
    pub fn reset(&mut self) {
        self.document = ConfigDocument::new();
        self.mock_data.clear();
        self.version += 1;
        info!("[ConfigStore] Reset to empty document");
    }

    pub fn set_mock_data(&mut self, sub_id: impl Into<String>, mock_data: MockData) {
        self.mock_data.insert(sub_id.into(), mock_data);
    }

    /// Attached producer, or one that yields no rows
    pub fn mock_data(&self, sub_id: &str) -> MockData {
        self.mock_data.get(sub_id).cloned().unwrap_or_default()
    }

    pub fn page_config(&self, sub_id: &str) -> Option<&PageConfig> {
        self.document.page_configs.get(sub_id)
    }

    pub fn page(&self, sub_id: &str) -> Option<PageView<'_>> {
        self.page_config(sub_id).map(|config| PageView {
            config,
            mock_data: self.mock_data(sub_id),
        })
    }

    // Navigation CRUD

    pub fn add_group(
        &mut self,
        label: impl Into<String>,
        show_label: Option<bool>,
    ) -> Result<usize, EditorError> {
        self.apply(Mutation::AddGroup {
            group: NavGroupSeed {
                id: None,
                label: label.into(),
                show_label,
            },
        })?;
        Ok(self.document.nav_groups.len() - 1)
    }

    /// Add a main item to a group, returning its generated id
    pub fn add_main_item(
        &mut self,
        group_index: usize,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<String, EditorError> {
        let id = self.next_id(MAIN_ID_PREFIX);
        self.apply(Mutation::AddMainItem {
            group_index,
            item: NavMainItemSeed {
                id: id.clone(),
                title: title.into(),
                url: url.into(),
                is_open: false,
            },
        })?;
        Ok(id)
    }

    pub fn update_main_item(
        &mut self,
        group_index: usize,
        item_id: &str,
        changes: MainItemChanges,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::UpdateMainItem {
            group_index,
            item_id: item_id.to_string(),
            changes,
        })
        .map(|_| ())
    }

    pub fn delete_main_item(&mut self, group_index: usize, item_id: &str) -> Result<(), EditorError> {
        self.apply(Mutation::DeleteMainItem {
            group_index,
            item_id: item_id.to_string(),
        })
        .map(|_| ())
    }

    /// Add a sub item under a main item, returning its generated id
    pub fn add_sub_item(
        &mut self,
        group_index: usize,
        main_id: &str,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<String, EditorError> {
        let id = self.next_id(SUB_ID_PREFIX);
        self.apply(Mutation::AddSubItem {
            group_index,
            main_id: main_id.to_string(),
            item: NavSubItemSeed {
                id: id.clone(),
                title: title.into(),
                url: url.into(),
                badge: None,
                template: None,
            },
        })?;
        Ok(id)
    }

    pub fn update_sub_item(
        &mut self,
        group_index: usize,
        main_id: &str,
        sub_id: &str,
        changes: SubItemChanges,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::UpdateSubItem {
            group_index,
            main_id: main_id.to_string(),
            sub_id: sub_id.to_string(),
            changes,
        })
        .map(|_| ())
    }

    pub fn delete_sub_item(
        &mut self,
        group_index: usize,
        main_id: &str,
        sub_id: &str,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::DeleteSubItem {
            group_index,
            main_id: main_id.to_string(),
            sub_id: sub_id.to_string(),
        })
        .map(|_| ())
    }

    // Page config CRUD

    pub fn set_page_config(&mut self, sub_id: &str, config: PageConfig) -> Result<(), EditorError> {
        self.apply(Mutation::SetPageConfig {
            sub_id: sub_id.to_string(),
            config,
        })
        .map(|_| ())
    }

    pub fn update_page_config(
        &mut self,
        sub_id: &str,
        changes: PageConfigChanges,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::UpdatePageConfig {
            sub_id: sub_id.to_string(),
            changes,
        })
        .map(|_| ())
    }

    pub fn delete_page_config(&mut self, sub_id: &str) -> Result<(), EditorError> {
        self.apply(Mutation::DeletePageConfig {
            sub_id: sub_id.to_string(),
        })
        .map(|_| ())
    }

    pub fn update_filter_area(
        &mut self,
        sub_id: &str,
        changes: FilterAreaChanges,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::UpdateFilterArea {
            sub_id: sub_id.to_string(),
            changes,
        })
        .map(|_| ())
    }

    pub fn update_table_area(
        &mut self,
        sub_id: &str,
        changes: TableAreaChanges,
    ) -> Result<(), EditorError> {
        self.apply(Mutation::UpdateTableArea {
            sub_id: sub_id.to_string(),
            changes,
        })
        .map(|_| ())
    }

    fn next_id(&mut self, prefix: &str) -> String {
        let taken: Vec<String> = self
            .document
            .nav_ids()
            .into_iter()
            .map(str::to_string)
            .collect();
        for id in taken {
            self.ids.reserve(id);
        }
        self.ids.new_id(prefix)
    }

    fn reattach_mock_data(&mut self) {
        self.mock_data = self
            .document
            .page_configs
            .keys()
            .map(|id| (id.clone(), MockData::empty()))
            .collect();
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn session_seed() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_store_is_empty() {
        let store = ConfigStore::new();
        assert!(store.is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_crud_generates_prefixed_ids() {
        let mut store = ConfigStore::new();
        let group = store.add_group("平台", Some(true)).unwrap();
        let main = store.add_main_item(group, "工作台", "#").unwrap();
        let sub = store.add_sub_item(group, &main, "提现", "#").unwrap();

        assert!(main.starts_with("nav-"));
        assert!(sub.starts_with("sub-"));
        assert_ne!(main, sub);
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn test_failed_mutation_keeps_version() {
        let mut store = ConfigStore::new();
        let result = store.delete_main_item(0, "nope");

        assert!(matches!(result, Err(EditorError::Mutation(_))));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_import_reattaches_empty_mock_data() {
        let mut store = ConfigStore::new();
        store.set_mock_data("1", MockData::new(|| vec![json!({ "id": 1 })]));
        store
            .import_value(&json!({
                "navGroups": [{
                    "label": "平台",
                    "items": [{ "id": "workspace", "items": [
                        { "id": "1", "title": "提现", "component": {} }
                    ]}]
                }]
            }))
            .unwrap();

        let page = store.page("1").unwrap();
        assert!(page.mock_data.rows().is_empty());
    }

    #[test]
    fn test_reset_clears_document() {
        let mut store = ConfigStore::new();
        store.add_group("平台", None).unwrap();
        store.reset();
        assert!(store.is_empty());
    }
}
