//! # Config Session
//!
//! One owned instance per signed-in editor. It ties the committed store and
//! the preview controller to the outside world:
//!
//! ```text
//!   assistant reply ──► propose_patch ──► PreviewController
//!                                              │ confirm
//!                                              ▼
//!   apply / import ───────────────────────► ConfigStore ──► LocalMirror
//!                                              │
//!                              save ◄──────────┤
//!                   (PersistenceGateway)       └──► sync_sources (optional)
//! ```
//!
//! Confirm commits in memory first. Persistence and source sync run after
//! the commit and report their outcome instead of failing it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use navboard_assistant::AssistantReply;
use navboard_editor::{
    ChangeSummary, ConfigStore, EditorError, MergeEngine, Mutation, PreviewController,
    PreviewMode,
};
use navboard_model::{import_value, normalize_patch, NavGroup, PageConfig, ValidationError};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::errors::{GatewayError, SessionError, SessionResult, SyncError};
use crate::mirror::LocalMirror;
use crate::persistence::{PersistedRecord, PersistenceGateway};
use crate::source_patch::{patch_sidebar_source, render_page_source};
use crate::source_sync::SourceSyncAdapter;

/// Where source sync writes
#[derive(Clone)]
pub struct SourceTargets {
    pub adapter: Arc<dyn SourceSyncAdapter>,
    pub sidebar_file: String,
    pub page_file: String,
}

impl std::fmt::Debug for SourceTargets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceTargets")
            .field("sidebar_file", &self.sidebar_file)
            .field("page_file", &self.page_file)
            .finish_non_exhaustive()
    }
}

/// What happened to the remote copy after a confirm
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    Saved { updated_at: DateTime<Utc> },
    Failed(String),
    /// Nobody is signed in
    Skipped,
}

/// Outcome of syncing one source file
#[derive(Debug, Clone, PartialEq)]
pub enum FileSync {
    Written,
    Unchanged,
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub sidebar: FileSync,
    /// Sub-item ids with no block in the sidebar source
    pub unmatched: Vec<String>,
    pub pages: FileSync,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmReport {
    pub mode: PreviewMode,
    pub summary: ChangeSummary,
    pub persisted: PersistOutcome,
    pub sync: Option<SyncReport>,
}

pub struct ConfigSession {
    store: ConfigStore,
    preview: PreviewController,
    gateway: Arc<dyn PersistenceGateway>,
    mirror: Option<LocalMirror>,
    sources: Option<SourceTargets>,
    user_id: Option<String>,
    sync_on_confirm: bool,
}

impl ConfigSession {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            store: ConfigStore::new(),
            preview: PreviewController::new(),
            gateway,
            mirror: None,
            sources: None,
            user_id: None,
            sync_on_confirm: false,
        }
    }

    pub fn with_mirror(mut self, mirror: LocalMirror) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn with_sources(mut self, sources: SourceTargets) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Also write source files after every confirm
    pub fn sync_on_confirm(mut self, enabled: bool) -> Self {
        self.sync_on_confirm = enabled;
        self
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn preview(&self) -> &PreviewController {
        &self.preview
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Switching to a different user drops the previous user's document.
    pub fn sign_in(&mut self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        if self.user_id.as_deref().is_some_and(|current| current != user_id) {
            self.preview.cancel();
            self.store.reset();
        }
        info!("[Session] Signed in as {}", user_id);
        self.user_id = Some(user_id);
    }

    /// Forget the user and everything loaded for them
    pub fn sign_out(&mut self) {
        if let Some(user_id) = self.user_id.take() {
            info!("[Session] Signed out {}", user_id);
        }
        self.preview.cancel();
        self.store.reset();
    }

    fn require_user(&self) -> Result<&str, GatewayError> {
        self.user_id.as_deref().ok_or(GatewayError::NoUser)
    }

    // Persistence

    /// Load the signed-in user's record. Returns `false` when there is none,
    /// in which case the session starts from an empty document.
    ///
    /// A stored record goes through the same validation as an import. If it
    /// fails, nothing is changed.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> SessionResult<bool> {
        let user_id = self.require_user()?.to_string();

        match self.gateway.load(&user_id).await? {
            Some(record) => {
                let raw = serde_json::to_value(&record.config_data)
                    .map_err(|err| ValidationError::Serialize(err.to_string()))?;
                let document = import_value(&raw)?;

                self.preview.cancel();
                self.store.replace(document);
                self.mirror_page_configs();
                info!("[Session] Loaded record updated at {}", record.updated_at);
                Ok(true)
            }
            None => {
                info!("[Session] No stored configuration for {}", user_id);
                self.preview.cancel();
                self.store.reset();
                self.mirror_page_configs();
                Ok(false)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn save(&self) -> SessionResult<PersistedRecord> {
        let user_id = self.require_user()?;
        let record = self.gateway.save(user_id, &self.store.export()).await?;
        Ok(record)
    }

    /// Re-apply page configs from the local mirror. Returns how many were
    /// restored.
    pub fn restore_from_mirror(&mut self) -> usize {
        let Some(map) = self.mirror.as_ref().and_then(LocalMirror::restore) else {
            return 0;
        };

        let mut restored = 0;
        for (sub_id, config) in map {
            match self.store.apply(Mutation::SetPageConfig {
                sub_id: sub_id.clone(),
                config,
            }) {
                Ok(_) => restored += 1,
                Err(err) => warn!("[Session] Skipping mirrored page {}: {}", sub_id, err),
            }
        }
        info!("[Session] Restored {} page config(s) from mirror", restored);
        restored
    }

    // Editing

    pub fn apply(&mut self, mutation: Mutation) -> SessionResult<Vec<Mutation>> {
        let applied = self.store.apply(mutation)?;
        self.mirror_page_configs();
        Ok(applied)
    }

    /// Import a raw document directly, replacing (`Override`) or merging into
    /// (`Append`) the committed one. `Initial` has nothing to apply.
    pub fn import_value(&mut self, raw: &Value, mode: PreviewMode) -> SessionResult<ChangeSummary> {
        let patch = normalize_patch(raw)?;
        let summary = ChangeSummary::compute(self.store.document(), &patch);

        let document = match mode {
            PreviewMode::Override => MergeEngine::override_candidate(&patch),
            PreviewMode::Append => MergeEngine::append_candidate(self.store.document(), &patch),
            PreviewMode::Initial => return Err(EditorError::NothingToApply.into()),
        };

        self.store.replace(document);
        self.mirror_page_configs();
        info!("[Session] Imported document ({})", mode.as_str());
        Ok(summary)
    }

    pub fn reset(&mut self) {
        self.preview.cancel();
        self.store.reset();
        self.mirror_page_configs();
    }

    // Preview

    /// Normalize a raw patch and start previewing it
    pub fn propose_patch(&mut self, raw: &Value) -> SessionResult<ChangeSummary> {
        let patch = normalize_patch(raw)?;
        Ok(self.preview.propose(self.store.document(), patch))
    }

    /// Preview the patch carried by an assistant reply
    pub fn ingest_reply(&mut self, reply: &AssistantReply) -> SessionResult<ChangeSummary> {
        let raw = reply.patch.as_ref().ok_or(SessionError::NoPatch)?;
        self.propose_patch(raw)
    }

    pub fn set_preview_mode(&mut self, mode: PreviewMode) -> SessionResult<()> {
        self.preview.set_mode(mode)?;
        Ok(())
    }

    pub fn effective_tree(&self) -> Vec<NavGroup> {
        self.preview.effective_tree(self.store.document())
    }

    pub fn page_config(&self, sub_id: &str) -> Option<&PageConfig> {
        self.preview.page_config(sub_id, self.store.document())
    }

    pub fn cancel(&mut self) -> bool {
        self.preview.cancel()
    }

    /// Commit the effective candidate, then persist it.
    ///
    /// The preview is taken before anything is awaited, so a second confirm
    /// racing this one finds no pending preview.
    #[instrument(skip(self))]
    pub async fn confirm(&mut self) -> SessionResult<ConfirmReport> {
        let confirmed = self.preview.take_confirmed()?;
        self.store.replace(confirmed.document);
        self.mirror_page_configs();
        info!("[Session] Confirmed {} preview", confirmed.mode.as_str());

        let persisted = match self.user_id.as_deref() {
            None => PersistOutcome::Skipped,
            Some(user_id) => match self.gateway.save(user_id, &self.store.export()).await {
                Ok(record) => PersistOutcome::Saved {
                    updated_at: record.updated_at,
                },
                Err(err) => {
                    warn!("[Session] Save after confirm failed: {}", err);
                    PersistOutcome::Failed(err.to_string())
                }
            },
        };

        let sync = if self.sync_on_confirm && self.sources.is_some() {
            self.sync_sources().await.ok()
        } else {
            None
        };

        Ok(ConfirmReport {
            mode: confirmed.mode,
            summary: confirmed.summary,
            persisted,
            sync,
        })
    }

    // Source sync

    /// Write the committed configuration back into the source files. Per-file
    /// failures are reported, not returned.
    #[instrument(skip(self))]
    pub async fn sync_sources(&self) -> SessionResult<SyncReport> {
        let targets = self.sources.as_ref().ok_or(SyncError::NotConfigured)?;
        let adapter = targets.adapter.as_ref();
        let doc = self.store.document();

        let mut unmatched = Vec::new();
        let sidebar = match adapter.read(&targets.sidebar_file).await {
            Ok(None) => FileSync::Missing,
            Ok(Some(source)) => match patch_sidebar_source(&source, doc) {
                Ok(patch) => {
                    unmatched = patch.missing.clone();
                    if patch.changed() {
                        write_outcome(adapter, &targets.sidebar_file, &patch.text).await
                    } else {
                        FileSync::Unchanged
                    }
                }
                Err(err) => FileSync::Failed(err.to_string()),
            },
            Err(err) => FileSync::Failed(err.to_string()),
        };

        let pages = match render_page_source(&doc.page_configs) {
            Ok(code) => write_outcome(adapter, &targets.page_file, &code).await,
            Err(err) => FileSync::Failed(err.to_string()),
        };

        if let FileSync::Failed(err) = &sidebar {
            warn!("[Session] Sidebar sync failed: {}", err);
        }
        if let FileSync::Failed(err) = &pages {
            warn!("[Session] Page source sync failed: {}", err);
        }

        Ok(SyncReport {
            sidebar,
            unmatched,
            pages,
        })
    }

    fn mirror_page_configs(&self) {
        if let Some(mirror) = &self.mirror {
            mirror.save(&self.store.document().page_configs);
        }
    }
}

async fn write_outcome(adapter: &dyn SourceSyncAdapter, name: &str, text: &str) -> FileSync {
    match adapter.write(name, text).await {
        Ok(()) => FileSync::Written,
        Err(err) => FileSync::Failed(err.to_string()),
    }
}
