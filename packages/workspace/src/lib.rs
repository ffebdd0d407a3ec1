//! # Navboard Workspace
//!
//! Everything that touches the world outside the in-memory configuration:
//!
//! - [`PersistenceGateway`]: per-user remote record (`MemoryGateway`,
//!   `FileGateway`)
//! - [`LocalMirror`]: best-effort local copy of the page-config map
//! - [`SourceSyncAdapter`]: confined read/write of source files
//!   ([`ConfigDirSync`]) plus the text patcher that feeds it
//! - [`ConfigSession`]: the orchestration instance that owns a store and a
//!   preview controller and drives all of the above
//! - [`server::router`]: the dev file-patch HTTP endpoint
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use navboard_workspace::{ConfigSession, FileGateway};
//!
//! let mut session = ConfigSession::new(Arc::new(FileGateway::new(".navboard")));
//! session.sign_in("alice");
//! session.load().await?;
//!
//! session.propose_patch(&raw)?;
//! let report = session.confirm().await?;
//! ```

mod errors;
mod mirror;
mod persistence;
mod session;
mod source_patch;
mod source_sync;

pub mod server;

pub use errors::{GatewayError, SessionError, SessionResult, SyncError};
pub use mirror::LocalMirror;
pub use persistence::{FileGateway, MemoryGateway, PersistedRecord, PersistenceGateway};
pub use session::{
    ConfigSession, ConfirmReport, FileSync, PersistOutcome, SourceTargets, SyncReport,
};
pub use source_patch::{patch_sidebar_source, render_page_source, SidebarPatch};
pub use source_sync::{ConfigDirSync, SourceSyncAdapter};
