//! Error types for the editor

use navboard_model::ValidationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("No pending preview")]
    NoPendingPreview,

    #[error("Preview is in initial mode, nothing to apply")]
    NothingToApply,
}
