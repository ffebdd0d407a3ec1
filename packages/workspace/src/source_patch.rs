//! # Source Patcher
//!
//! Best-effort round trip of the committed configuration back into source
//! text.
//!
//! - The sidebar file is patched in place. Each sub-item is located by its
//!   `id: '<id>' ... }` block and only its `title` and `template` literals are
//!   touched. Blocks that already match are left byte-for-byte alone.
//! - The page module is regenerated from scratch from the page-config map.
//!
//! This is pattern matching, not parsing. Unusual formatting simply leaves an
//! item reported as missing.

use indexmap::IndexMap;
use navboard_model::{ConfigDocument, NavSubItem, PageConfig};
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::errors::SyncError;

const TITLE_PATTERN: &str = r#"(title:\s*['"])(.*?)(['"])"#;
const TEMPLATE_PATTERN: &str = r#"(template:\s*['"])(.*?)(['"])"#;

/// Result of patching the sidebar source
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarPatch {
    pub text: String,
    /// Sub-item ids whose block was rewritten
    pub updated: Vec<String>,
    /// Sub-item ids with no matching block
    pub missing: Vec<String>,
}

impl SidebarPatch {
    pub fn changed(&self) -> bool {
        !self.updated.is_empty()
    }
}

/// Bring the sidebar source in line with the document's sub-item titles and
/// templates
pub fn patch_sidebar_source(source: &str, doc: &ConfigDocument) -> Result<SidebarPatch, SyncError> {
    let title_re = Regex::new(TITLE_PATTERN)?;
    let template_re = Regex::new(TEMPLATE_PATTERN)?;

    let mut text = source.to_string();
    let mut updated = Vec::new();
    let mut missing = Vec::new();

    let subs = doc
        .nav_groups
        .iter()
        .flat_map(|group| &group.items)
        .flat_map(|main| &main.items)
        .filter(|sub| !sub.id.is_empty());

    for sub in subs {
        let block_re = Regex::new(&format!(
            r#"id:\s*['"]{}['"][\s\S]*?\}}"#,
            regex::escape(&sub.id)
        ))?;

        let Some(found) = block_re.find(&text) else {
            warn!("[SourcePatch] No block for {} in sidebar source", sub.id);
            missing.push(sub.id.clone());
            continue;
        };
        let range = found.range();

        if let Some(block) = patch_block(found.as_str(), sub, &title_re, &template_re) {
            debug!("[SourcePatch] Updating block for {}", sub.id);
            text.replace_range(range, &block);
            updated.push(sub.id.clone());
        }
    }

    Ok(SidebarPatch {
        text,
        updated,
        missing,
    })
}

/// Rewritten block, or `None` when it already matches
fn patch_block(
    block: &str,
    sub: &NavSubItem,
    title_re: &Regex,
    template_re: &Regex,
) -> Option<String> {
    let mut block = block.to_string();
    let mut changed = false;

    if let Some(caps) = title_re.captures(&block) {
        if &caps[2] != sub.title.as_str() {
            block = replace_literal(title_re, &block, &sub.title);
            changed = true;
        }
    }

    let template = sub.template.as_deref().unwrap_or_default();
    match template_re.captures(&block) {
        Some(caps) => {
            if &caps[2] != template {
                block = replace_literal(template_re, &block, template);
                changed = true;
            }
        }
        None if sub.has_template() => {
            // Insert right after the title literal
            if title_re.is_match(&block) {
                block = title_re
                    .replace(&block, |caps: &Captures| {
                        format!(
                            "{}{}{}, template: '{}'",
                            &caps[1],
                            &caps[2],
                            &caps[3],
                            escape_literal(template, '\'')
                        )
                    })
                    .into_owned();
                changed = true;
            }
        }
        None => {}
    }

    changed.then_some(block)
}

/// Swap the body of the first `key: '...'` literal, keeping its quotes
fn replace_literal(re: &Regex, block: &str, value: &str) -> String {
    re.replace(block, |caps: &Captures| {
        let quote = caps[3].chars().next().unwrap_or('\'');
        format!("{}{}{}", &caps[1], escape_literal(value, quote), &caps[3])
    })
    .into_owned()
}

fn escape_literal(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Render the page-config map as a source module, one keyed block per page
pub fn render_page_source(page_configs: &IndexMap<String, PageConfig>) -> Result<String, SyncError> {
    let mut code = String::from(
        "// Generated from the dashboard configuration. Manual edits are overwritten.\n\n",
    );
    code.push_str("export const page1Configs = {\n");

    for (id, config) in page_configs {
        let key = escape_literal(id, '\'');
        let body = serde_json::to_string_pretty(config)?;

        code.push_str(&format!("    // ID: '{}'\n", key));
        code.push_str(&format!("    '{}': ", key));
        for (index, line) in body.lines().enumerate() {
            if index > 0 {
                code.push_str("\n    ");
            }
            code.push_str(line);
        }
        code.push_str(",\n");
    }

    code.push_str("}\n");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use navboard_model::{NavGroup, NavMainItem};

    fn doc_with(sub: NavSubItem) -> ConfigDocument {
        ConfigDocument {
            nav_groups: vec![NavGroup {
                label: "平台".to_string(),
                items: vec![NavMainItem {
                    id: "workspace".to_string(),
                    title: "工作台".to_string(),
                    url: "#".to_string(),
                    items: vec![sub],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            page_configs: IndexMap::new(),
        }
    }

    fn sub(id: &str, title: &str, template: Option<&str>) -> NavSubItem {
        NavSubItem {
            id: id.to_string(),
            title: title.to_string(),
            url: "#".to_string(),
            badge: None,
            template: template.map(str::to_string),
        }
    }

    #[test]
    fn test_updates_title() {
        let source = "{ id: '1', title: '旧标题', url: '#' },";
        let patch = patch_sidebar_source(source, &doc_with(sub("1", "提现", None))).unwrap();

        assert_eq!(patch.text, "{ id: '1', title: '提现', url: '#' },");
        assert_eq!(patch.updated, vec!["1"]);
    }

    #[test]
    fn test_inserts_template_after_title() {
        let source = "{ id: '1', title: '提现', url: '#' },";
        let patch =
            patch_sidebar_source(source, &doc_with(sub("1", "提现", Some("Page1")))).unwrap();

        assert_eq!(
            patch.text,
            "{ id: '1', title: '提现', template: 'Page1', url: '#' },"
        );
    }

    #[test]
    fn test_clears_existing_template() {
        let source = "{ id: \"1\", title: \"提现\", template: \"Page1\" }";
        let patch = patch_sidebar_source(source, &doc_with(sub("1", "提现", None))).unwrap();

        assert_eq!(patch.text, "{ id: \"1\", title: \"提现\", template: \"\" }");
    }

    #[test]
    fn test_unchanged_source_is_untouched() {
        let source = "{ id: '1', title: '提现', template: 'Page1' }";
        let patch =
            patch_sidebar_source(source, &doc_with(sub("1", "提现", Some("Page1")))).unwrap();

        assert!(!patch.changed());
        assert_eq!(patch.text, source);
    }

    #[test]
    fn test_missing_block_and_regex_metacharacters() {
        let source = "{ id: 'a.b', title: 'x' }";
        let patch = patch_sidebar_source(source, &doc_with(sub("a+b", "y", None))).unwrap();

        assert_eq!(patch.missing, vec!["a+b"]);
        assert_eq!(patch.text, source);
    }

    #[test]
    fn test_title_quotes_are_escaped() {
        let source = "{ id: '1', title: 'x' }";
        let patch = patch_sidebar_source(source, &doc_with(sub("1", "it's", None))).unwrap();
        assert_eq!(patch.text, "{ id: '1', title: 'it\\'s' }");
    }

    #[test]
    fn test_render_page_source() {
        let mut map = IndexMap::new();
        map.insert("o'rders".to_string(), PageConfig::default());

        let code = render_page_source(&map).unwrap();
        assert!(code.contains("export const page1Configs = {"));
        assert!(code.contains("    'o\\'rders': {"));
        assert!(code.contains("\"filterArea\""));
        assert!(code.trim_end().ends_with('}'));
    }
}
