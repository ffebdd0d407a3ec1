//! # Post-Effect System
//!
//! Some mutations need follow-up changes to keep the document consistent.
//! A post-effect inspects a mutation after it has been applied and returns
//! the secondary mutations to apply next.
//!
//! Current effects:
//! - Setting a page config tags its sub-item with the `Page1` template
//! - Deleting a page config clears that tag

use navboard_model::{ConfigDocument, PAGE_TEMPLATE};

use crate::mutations::{Mutation, MutationError};

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug + Send + Sync {
    /// Analyze the applied mutation and generate secondary mutations if needed
    fn analyze(&self, mutation: &Mutation, doc: &ConfigDocument) -> Vec<Mutation>;
}

/// Keep a sub-item's template tag in step with its page config
#[derive(Debug)]
pub struct SyncPageTemplate;

impl PostEffect for SyncPageTemplate {
    fn analyze(&self, mutation: &Mutation, doc: &ConfigDocument) -> Vec<Mutation> {
        let (sub_id, template) = match mutation {
            Mutation::SetPageConfig { sub_id, .. } => (sub_id, Some(PAGE_TEMPLATE.to_string())),
            Mutation::DeletePageConfig { sub_id } => (sub_id, None),
            _ => return vec![],
        };

        // The config may be set before its sub-item exists
        match doc.sub_item(sub_id) {
            Some(sub) if sub.template != template => vec![Mutation::SetTemplate {
                sub_id: sub_id.clone(),
                template,
            }],
            _ => vec![],
        }
    }
}

/// Post-effect engine that applies all registered effects
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(SyncPageTemplate)],
        }
    }

    pub fn analyze(&self, mutation: &Mutation, doc: &ConfigDocument) -> Vec<Mutation> {
        self.effects
            .iter()
            .flat_map(|effect| effect.analyze(mutation, doc))
            .collect()
    }

    /// Apply a mutation with all its post-effects, returning every mutation
    /// that was applied
    pub fn apply_with_effects(
        &self,
        mutation: Mutation,
        doc: &mut ConfigDocument,
    ) -> Result<Vec<Mutation>, MutationError> {
        mutation.apply(doc)?;

        let secondary = self.analyze(&mutation, doc);
        let mut applied = vec![mutation];
        for secondary_mutation in secondary {
            secondary_mutation.apply(doc)?;
            applied.push(secondary_mutation);
        }

        Ok(applied)
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navboard_model::{NavGroup, NavMainItem, NavSubItem, PageConfig};

    fn doc() -> ConfigDocument {
        ConfigDocument {
            nav_groups: vec![NavGroup {
                label: "平台".to_string(),
                items: vec![NavMainItem {
                    id: "workspace".to_string(),
                    items: vec![NavSubItem {
                        id: "1".to_string(),
                        title: "提现".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_set_page_config_tags_template() {
        let mut doc = doc();
        let engine = PostEffectEngine::new();

        let applied = engine
            .apply_with_effects(
                Mutation::SetPageConfig {
                    sub_id: "1".to_string(),
                    config: PageConfig::default(),
                },
                &mut doc,
            )
            .unwrap();

        assert_eq!(applied.len(), 2);
        assert_eq!(
            doc.sub_item("1").unwrap().template.as_deref(),
            Some(PAGE_TEMPLATE)
        );
    }

    #[test]
    fn test_delete_page_config_clears_template() {
        let mut doc = doc();
        let engine = PostEffectEngine::new();
        engine
            .apply_with_effects(
                Mutation::SetPageConfig {
                    sub_id: "1".to_string(),
                    config: PageConfig::default(),
                },
                &mut doc,
            )
            .unwrap();

        engine
            .apply_with_effects(
                Mutation::DeletePageConfig {
                    sub_id: "1".to_string(),
                },
                &mut doc,
            )
            .unwrap();

        assert!(doc.page_configs.is_empty());
        assert!(doc.sub_item("1").unwrap().template.is_none());
    }

    #[test]
    fn test_config_without_sub_item_has_no_effect() {
        let doc = doc();
        let effects = SyncPageTemplate.analyze(
            &Mutation::SetPageConfig {
                sub_id: "ghost".to_string(),
                config: PageConfig::default(),
            },
            &doc,
        );
        assert!(effects.is_empty());
    }
}
