use navboard_model::{ConfigDocument, ConfigPatch};
use serde::{Deserialize, Serialize};

/// What applying a patch would add or modify
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub added_nav_items: usize,
    pub modified_nav_items: usize,
    /// Always zero: neither merge mode reports deletions
    pub deleted_nav_items: usize,
    pub added_page_configs: usize,
    pub modified_page_configs: usize,
}

impl ChangeSummary {
    /// Classify every main item, sub item and page config of the patch
    /// against the current document
    pub fn compute(current: &ConfigDocument, patch: &ConfigPatch) -> Self {
        let mut summary = Self::default();

        for main in patch.main_items() {
            summary.count_nav(current.locate_main(&main.id).is_some());
        }
        for sub in patch.sub_items() {
            summary.count_nav(current.locate_sub(&sub.id).is_some());
        }

        for id in patch.page_configs().keys() {
            if current.page_configs.contains_key(*id) {
                summary.modified_page_configs += 1;
            } else {
                summary.added_page_configs += 1;
            }
        }

        summary
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn count_nav(&mut self, exists: bool) {
        if exists {
            self.modified_nav_items += 1;
        } else {
            self.added_nav_items += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navboard_model::{import_value, normalize_patch};
    use serde_json::json;

    #[test]
    fn test_counts_nav_and_page_configs() {
        let current = import_value(&json!({
            "navGroups": [{ "label": "平台", "items": [
                { "id": "workspace", "items": [{ "id": "1", "component": {} }] }
            ]}]
        }))
        .unwrap();

        let patch = normalize_patch(&json!({
            "navGroups": [{ "label": "平台", "items": [
                { "id": "workspace", "items": [
                    { "id": "1", "component": {} },
                    { "id": "99", "component": {} }
                ]},
                { "id": "reports", "items": [] }
            ]}]
        }))
        .unwrap();

        let summary = ChangeSummary::compute(&current, &patch);
        assert_eq!(
            summary,
            ChangeSummary {
                added_nav_items: 2,
                modified_nav_items: 2,
                deleted_nav_items: 0,
                added_page_configs: 1,
                modified_page_configs: 1,
            }
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(ChangeSummary::default()).unwrap();
        assert_eq!(value["deletedNavItems"], 0);
    }
}
