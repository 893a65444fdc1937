//! Library error types

use thiserror::Error;

/// Errors raised while loading or querying the post collection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlogError {
    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Duplicate post id: {0}")]
    DuplicateId(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
