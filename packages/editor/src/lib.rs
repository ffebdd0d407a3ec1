//! # Navboard Editor
//!
//! Committed configuration state and the preview workflow around it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: raw JSON → ConfigPatch / Document    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor                                      │
//! │  - ConfigStore: committed doc + mutations   │
//! │  - MergeEngine: override / append + summary │
//! │  - PreviewController: pending patch, modes  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: persistence, mirror, source sync │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One owner**: the store is the only thing that mutates the committed
//!    document, and only through [`Mutation`]s
//! 2. **Preview isolation**: candidates are independent copies; nothing is
//!    committed before confirm
//! 3. **Additive append**: merging never deletes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use navboard_editor::{ConfigStore, PreviewController, PreviewMode};
//! use navboard_model::normalize_patch;
//!
//! let mut store = ConfigStore::new();
//! let mut preview = PreviewController::new();
//!
//! preview.propose(store.document(), normalize_patch(&raw)?);
//! preview.set_mode(PreviewMode::Append)?;
//!
//! let confirmed = preview.take_confirmed()?;
//! store.replace(confirmed.document);
//! ```

mod errors;
mod merge;
mod mutations;
mod post_effects;
mod preview;
mod store;
mod summary;

pub use errors::EditorError;
pub use merge::{MergeEngine, MergeOutcome};
pub use mutations::{
    FilterAreaChanges, MainItemChanges, Mutation, MutationError, NavGroupSeed, NavMainItemSeed,
    NavSubItemSeed, PageConfigChanges, SubItemChanges, TableAreaChanges,
};
pub use post_effects::{PostEffect, PostEffectEngine, SyncPageTemplate};
pub use preview::{
    ConfirmedPreview, PendingPatch, PreviewController, PreviewMode, PreviewPage, PreviewState,
    PREVIEW_GROUP_LABEL, PREVIEW_ITEM_ID, PREVIEW_PAGE_ID,
};
pub use store::{ConfigStore, PageView};
pub use summary::ChangeSummary;
