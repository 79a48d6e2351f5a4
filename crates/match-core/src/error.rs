//! Error types for core domain values and collaborator seams.

use thiserror::Error;

use crate::UserId;

/// Errors raised while constructing or parsing domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Action string was not `like` or `pass`.
    #[error("invalid swipe action: {0:?} (expected \"like\" or \"pass\")")]
    InvalidAction(String),

    /// Status string was not a known connection status.
    #[error("invalid connection status: {0:?}")]
    InvalidStatus(String),

    /// A pair was built from the same user twice.
    #[error("a pair needs two distinct users, got {0} twice")]
    SelfPair(UserId),
}

/// Errors surfaced by external user/category directories.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The directory could not answer (storage down, timeout, ...).
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
