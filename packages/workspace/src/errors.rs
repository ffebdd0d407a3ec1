//! Error types for the workspace layer

use navboard_assistant::AssistantError;
use navboard_editor::EditorError;
use navboard_model::ValidationError;
use thiserror::Error;

/// Failure talking to the persistence backend
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Not signed in")]
    NoUser,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failure reading or writing source files
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Source sync is not configured")]
    NotConfigured,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Persistence error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Source sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    #[error("Reply carries no configuration patch")]
    NoPatch,
}

pub type SessionResult<T> = Result<T, SessionError>;
