//! Error types for the assistant client

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistantError {
    #[error("Assistant is not configured: {0}")]
    NotConfigured(String),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Stream abandoned before completion")]
    Cancelled,
}
