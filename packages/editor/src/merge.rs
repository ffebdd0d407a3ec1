//! # Merge Engine
//!
//! Reconciles an incoming patch with the committed document. Both candidate
//! results are computed up front and neither touches the committed document.
//!
//! ## Override
//! The patch becomes the whole document.
//!
//! ## Append
//! A deep copy of the committed document with the patch folded in:
//! - groups matched by label, created at the end when missing
//! - main items matched by id anywhere in the tree, created in the matched
//!   group when missing; `title`, `url` and `isOpen` overwritten when set
//! - sub items matched by id anywhere in the tree, created under the matched
//!   main item when missing; scalar fields overwritten when set
//! - page configs overwritten by key
//!
//! Append never removes anything.

use navboard_model::{ConfigDocument, ConfigPatch};
use tracing::debug;

use crate::summary::ChangeSummary;

/// Both candidate documents plus the change summary for a patch
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub override_document: ConfigDocument,
    pub append_document: ConfigDocument,
    pub summary: ChangeSummary,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MergeEngine;

impl MergeEngine {
    pub fn compute(current: &ConfigDocument, patch: &ConfigPatch) -> MergeOutcome {
        let outcome = MergeOutcome {
            override_document: Self::override_candidate(patch),
            append_document: Self::append_candidate(current, patch),
            summary: ChangeSummary::compute(current, patch),
        };

        debug!(
            "[MergeEngine] +{} ~{} nav item(s), +{} ~{} page config(s)",
            outcome.summary.added_nav_items,
            outcome.summary.modified_nav_items,
            outcome.summary.added_page_configs,
            outcome.summary.modified_page_configs
        );

        outcome
    }

    pub fn override_candidate(patch: &ConfigPatch) -> ConfigDocument {
        patch.to_document()
    }

    pub fn append_candidate(current: &ConfigDocument, patch: &ConfigPatch) -> ConfigDocument {
        let mut doc = current.clone();

        for group_patch in &patch.nav_groups {
            let group_index = match doc
                .nav_groups
                .iter()
                .position(|group| group.label == group_patch.label)
            {
                Some(index) => {
                    if let Some(show_label) = group_patch.show_label {
                        doc.nav_groups[index].show_label = Some(show_label);
                    }
                    index
                }
                None => {
                    doc.nav_groups.push(group_patch.to_group());
                    doc.nav_groups.len() - 1
                }
            };

            for main_patch in &group_patch.items {
                let (g, m) = match doc.locate_main(&main_patch.id) {
                    Some(path) => {
                        main_patch.apply_to(&mut doc.nav_groups[path.group].items[path.main]);
                        (path.group, path.main)
                    }
                    None => {
                        let items = &mut doc.nav_groups[group_index].items;
                        items.push(main_patch.to_main_item());
                        (group_index, items.len() - 1)
                    }
                };

                for sub_patch in &main_patch.items {
                    match doc.locate_sub(&sub_patch.id) {
                        Some(path) => {
                            if let Some(s) = path.sub {
                                sub_patch
                                    .apply_to(&mut doc.nav_groups[path.group].items[path.main].items[s]);
                            }
                        }
                        None => doc.nav_groups[g].items[m]
                            .items
                            .push(sub_patch.to_sub_item()),
                    }
                }
            }
        }

        for (id, config) in patch.page_configs() {
            doc.page_configs.insert(id.to_string(), config.clone());
        }

        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navboard_model::{import_value, normalize_patch};
    use serde_json::json;

    fn current() -> ConfigDocument {
        import_value(&json!({
            "navGroups": [{ "label": "平台", "items": [
                { "id": "workspace", "title": "工作台", "url": "/ws", "isOpen": true, "items": [
                    { "id": "1", "title": "提现", "badge": "3" }
                ]}
            ]}]
        }))
        .unwrap()
    }

    #[test]
    fn test_append_adds_sub_item_under_existing_main() {
        let patch = normalize_patch(&json!({
            "navGroups": [{ "label": "平台", "items": [
                { "id": "workspace", "items": [{ "id": "99", "title": "新页面" }] }
            ]}]
        }))
        .unwrap();

        let outcome = MergeEngine::compute(&current(), &patch);
        let main = outcome.append_document.main_item("workspace").unwrap();

        let subs: Vec<&str> = main.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(subs, vec!["1", "99"]);
        assert_eq!(main.title, "工作台");
        assert_eq!(main.url, "/ws");
        assert_eq!(outcome.summary.added_nav_items, 1);
        assert_eq!(outcome.summary.modified_nav_items, 1);
    }

    #[test]
    fn test_append_incoming_scalars_win() {
        let patch = normalize_patch(&json!({
            "navGroups": [{ "label": "其他", "items": [
                { "id": "workspace", "title": "新工作台", "items": [{ "id": "1", "title": "取现" }] }
            ]}]
        }))
        .unwrap();

        let doc = MergeEngine::append_candidate(&current(), &patch);

        // Matched by id in its original group, the new group stays empty
        assert_eq!(doc.nav_groups.len(), 2);
        assert!(doc.nav_groups[1].items.is_empty());
        assert_eq!(doc.main_ids().count(), 1);

        let sub = doc.sub_item("1").unwrap();
        assert_eq!(sub.title, "取现");
        assert_eq!(sub.badge.as_deref(), Some("3"));
        assert_eq!(doc.main_item("workspace").unwrap().title, "新工作台");
    }

    #[test]
    fn test_override_replaces_everything() {
        let patch = normalize_patch(&json!({
            "navGroups": [{ "label": "报表", "items": [{ "id": "reports", "items": [] }] }]
        }))
        .unwrap();

        let doc = MergeEngine::override_candidate(&patch);
        assert!(doc.main_item("workspace").is_none());
        assert!(doc.main_item("reports").is_some());
    }

    #[test]
    fn test_current_is_untouched() {
        let current = current();
        let before = current.clone();
        let patch = normalize_patch(&json!({
            "navGroups": [{ "label": "平台", "items": [{ "id": "workspace", "title": "x", "items": [] }] }]
        }))
        .unwrap();

        MergeEngine::compute(&current, &patch);
        assert_eq!(current, before);
    }
}
