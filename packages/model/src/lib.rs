//! # Navboard Model
//!
//! Configuration model for a dashboard: a navigation tree whose leaves render
//! templated pages.
//!
//! ## Layers
//!
//! ```text
//! raw JSON (assistant output, exports, legacy files)
//!         │  normalize_patch / validate
//!         ▼
//! ConfigPatch ──── to_document ────► ConfigDocument
//!                                        │  export_document
//!                                        ▼
//!                               SerializableDocument (wire form)
//! ```
//!
//! - [`ConfigDocument`] is the committed shape. Page configs live in a side
//!   map keyed by sub-item id.
//! - [`ConfigPatch`] is an incoming, possibly partial, configuration; it keeps
//!   track of which fields were actually present so merges can let incoming
//!   values win only where set.
//! - [`SerializableDocument`] embeds page configs as `component` on their
//!   sub-item.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use navboard_model::{export_value, import_value};
//!
//! let doc = import_value(&raw)?;
//! let value = export_value(&doc)?;
//! assert_eq!(import_value(&value)?, doc);
//! ```

mod document;
mod error;
mod export;
mod id_generator;
mod mock;
mod normalize;
mod page;
mod patch;

pub use document::{ConfigDocument, ItemPath, NavGroup, NavMainItem, NavSubItem};
pub use error::{ValidationError, ValidationResult};
pub use export::{
    export_document, export_value, import_value, SerializableDocument, SerializableGroup,
    SerializableMainItem, SerializableSubItem,
};
pub use id_generator::{content_seed, IdGenerator};
pub use mock::MockData;
pub use normalize::{normalize_page_config, normalize_page_config_map, normalize_patch, validate};
pub use page::{
    ActionButton, ActionsArea, ButtonVariant, CardArea, CardItem, CardValue, ColumnFixed,
    ColumnKind, FilterArea, FilterField, FilterKind, PageConfig, TableArea, TableColumn, TopBar,
    TreeNode, DEFAULT_CARD_COLUMNS, DEFAULT_FILTER_COLUMNS, DEFAULT_GAP, PAGE_TEMPLATE,
};
pub use patch::{ConfigPatch, GroupPatch, MainItemPatch, SubItemPatch, DEFAULT_URL};
