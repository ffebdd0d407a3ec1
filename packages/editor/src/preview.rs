//! # Preview Controller
//!
//! Holds at most one externally proposed configuration and decides what the
//! navigation shows while it is pending. The committed document is never
//! touched until the preview is confirmed.
//!
//! ## States
//!
//! ```text
//!            propose                  set_mode
//!   Idle ─────────────► Previewing(override) ◄──────► Previewing(append | initial)
//!    ▲                        │
//!    └──── cancel / take ─────┘
//! ```
//!
//! Both candidates are computed once, when the patch arrives; switching modes
//! only changes which one is effective.

use navboard_model::{
    ConfigDocument, ConfigPatch, NavGroup, NavMainItem, NavSubItem, PageConfig, DEFAULT_URL,
    PAGE_TEMPLATE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::EditorError;
use crate::merge::MergeEngine;
use crate::summary::ChangeSummary;

pub const PREVIEW_GROUP_LABEL: &str = "AI 预览";
pub const PREVIEW_ITEM_ID: &str = "ai-preview";
pub const PREVIEW_PAGE_ID: &str = "ai-preview-page";
const PREVIEW_ITEM_TITLE: &str = "预览";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Show the committed tree, nothing to apply
    Initial,
    Override,
    Append,
}

impl PreviewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewMode::Initial => "initial",
            PreviewMode::Override => "override",
            PreviewMode::Append => "append",
        }
    }
}

impl std::str::FromStr for PreviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(PreviewMode::Initial),
            "override" => Ok(PreviewMode::Override),
            "append" => Ok(PreviewMode::Append),
            other => Err(format!("unknown preview mode '{}'", other)),
        }
    }
}

/// Page shown by the synthetic preview item
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewPage {
    /// Sub-item id the config belongs to in the patch
    pub source_id: String,
    pub title: String,
    pub config: PageConfig,
}

/// Everything derived from one proposed patch
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPatch {
    pub patch: ConfigPatch,
    pub override_document: ConfigDocument,
    pub append_document: ConfigDocument,
    pub summary: ChangeSummary,
    pub preview_page: Option<PreviewPage>,
}

impl PendingPatch {
    pub fn new(current: &ConfigDocument, patch: ConfigPatch) -> Self {
        let outcome = MergeEngine::compute(current, &patch);

        let preview_page = patch.first_page().map(|(id, config)| PreviewPage {
            source_id: id.to_string(),
            title: patch
                .sub_item(id)
                .and_then(|sub| sub.title.clone())
                .unwrap_or_else(|| PREVIEW_ITEM_TITLE.to_string()),
            config: config.clone(),
        });

        Self {
            patch,
            override_document: outcome.override_document,
            append_document: outcome.append_document,
            summary: outcome.summary,
            preview_page,
        }
    }

    pub fn candidate(&self, mode: PreviewMode) -> Option<&ConfigDocument> {
        match mode {
            PreviewMode::Initial => None,
            PreviewMode::Override => Some(&self.override_document),
            PreviewMode::Append => Some(&self.append_document),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PreviewState {
    #[default]
    Idle,
    Previewing {
        mode: PreviewMode,
        pending: Box<PendingPatch>,
    },
}

/// Candidate taken out of the controller by a confirm
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedPreview {
    pub mode: PreviewMode,
    pub document: ConfigDocument,
    pub summary: ChangeSummary,
}

#[derive(Debug, Default)]
pub struct PreviewController {
    state: PreviewState,
}

impl PreviewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self.state, PreviewState::Previewing { .. })
    }

    pub fn mode(&self) -> Option<PreviewMode> {
        match &self.state {
            PreviewState::Idle => None,
            PreviewState::Previewing { mode, .. } => Some(*mode),
        }
    }

    pub fn pending(&self) -> Option<&PendingPatch> {
        match &self.state {
            PreviewState::Idle => None,
            PreviewState::Previewing { pending, .. } => Some(pending.as_ref()),
        }
    }

    pub fn summary(&self) -> Option<&ChangeSummary> {
        self.pending().map(|pending| &pending.summary)
    }

    /// Compute both candidates for a new patch and start previewing it in
    /// override mode. Replaces any earlier pending patch.
    pub fn propose(&mut self, current: &ConfigDocument, patch: ConfigPatch) -> ChangeSummary {
        let pending = PendingPatch::new(current, patch);
        let summary = pending.summary;
        info!(
            "[Preview] New patch: +{} ~{} nav item(s)",
            summary.added_nav_items, summary.modified_nav_items
        );

        self.state = PreviewState::Previewing {
            mode: PreviewMode::Override,
            pending: Box::new(pending),
        };
        summary
    }

    pub fn set_mode(&mut self, next: PreviewMode) -> Result<(), EditorError> {
        match &mut self.state {
            PreviewState::Idle => Err(EditorError::NoPendingPreview),
            PreviewState::Previewing { mode, .. } => {
                debug!("[Preview] Mode {} → {}", mode.as_str(), next.as_str());
                *mode = next;
                Ok(())
            }
        }
    }

    /// The navigation that should be shown right now
    pub fn effective_tree(&self, committed: &ConfigDocument) -> Vec<NavGroup> {
        match &self.state {
            PreviewState::Previewing {
                mode: PreviewMode::Override,
                pending,
            } => vec![preview_group(pending)],
            PreviewState::Previewing {
                mode: PreviewMode::Append,
                pending,
            } => {
                let mut groups = committed.nav_groups.clone();
                groups.push(preview_group(pending));
                groups
            }
            _ => committed.nav_groups.clone(),
        }
    }

    /// Look up a page config, checking the preview slot first
    pub fn page_config<'a>(
        &'a self,
        sub_id: &str,
        committed: &'a ConfigDocument,
    ) -> Option<&'a PageConfig> {
        let previewing = matches!(self.mode(), Some(PreviewMode::Override | PreviewMode::Append));
        if previewing && sub_id == PREVIEW_PAGE_ID {
            if let Some(page) = self.pending().and_then(|p| p.preview_page.as_ref()) {
                return Some(&page.config);
            }
        }
        committed.page_configs.get(sub_id)
    }

    /// Take the effective candidate out of the controller, leaving it idle.
    ///
    /// In initial mode nothing is taken and the preview stays pending.
    pub fn take_confirmed(&mut self) -> Result<ConfirmedPreview, EditorError> {
        match std::mem::take(&mut self.state) {
            PreviewState::Idle => Err(EditorError::NoPendingPreview),
            PreviewState::Previewing {
                mode: PreviewMode::Initial,
                pending,
            } => {
                self.state = PreviewState::Previewing {
                    mode: PreviewMode::Initial,
                    pending,
                };
                Err(EditorError::NothingToApply)
            }
            PreviewState::Previewing { mode, pending } => {
                let pending = *pending;
                let document = match mode {
                    PreviewMode::Append => pending.append_document,
                    _ => pending.override_document,
                };
                Ok(ConfirmedPreview {
                    mode,
                    document,
                    summary: pending.summary,
                })
            }
        }
    }

    /// Drop any pending preview. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        let was_previewing = self.is_previewing();
        self.state = PreviewState::Idle;
        if was_previewing {
            debug!("[Preview] Cancelled");
        }
        was_previewing
    }
}

fn preview_group(pending: &PendingPatch) -> NavGroup {
    let page = pending.preview_page.as_ref();

    NavGroup {
        id: None,
        label: PREVIEW_GROUP_LABEL.to_string(),
        show_label: Some(true),
        items: vec![NavMainItem {
            id: PREVIEW_ITEM_ID.to_string(),
            title: PREVIEW_GROUP_LABEL.to_string(),
            url: DEFAULT_URL.to_string(),
            is_open: true,
            items: vec![NavSubItem {
                id: PREVIEW_PAGE_ID.to_string(),
                title: page
                    .map(|p| p.title.clone())
                    .unwrap_or_else(|| PREVIEW_ITEM_TITLE.to_string()),
                url: DEFAULT_URL.to_string(),
                badge: None,
                template: page.map(|_| PAGE_TEMPLATE.to_string()),
            }],
        }],
    }
}
