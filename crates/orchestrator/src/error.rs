//! Error types for swipe, match and connection operations.

use database::DatabaseError;
use match_core::{CategoryId, ConnectionId, CoreError, DirectoryError, UserId};
use thiserror::Error;

/// Errors that can occur while swiping or managing connections.
///
/// Everything except [`MatchError::Database`] and [`MatchError::Directory`]
/// is an expected business outcome the caller should render to the user.
#[derive(Debug, Error)]
pub enum MatchError {
    /// A user tried to swipe on themselves.
    #[error("cannot swipe yourself")]
    SelfSwipe,

    /// The actor already swiped this target in this category.
    #[error("user {actor_id} already swiped user {target_id} in category {category_id}")]
    DuplicateSwipe {
        actor_id: UserId,
        target_id: UserId,
        category_id: CategoryId,
    },

    /// User, category or connection does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A non-participant tried to change a connection.
    #[error("user {user_id} is not a participant of connection {connection_id}")]
    Unauthorized {
        connection_id: ConnectionId,
        user_id: UserId,
    },

    /// Action was not `like` or `pass`.
    #[error("invalid action: {0:?}")]
    InvalidAction(String),

    /// Status filter was not a known connection status.
    #[error("invalid status: {0:?}")]
    InvalidStatus(String),

    /// Target exists but is not verified.
    #[error("user {0} is not eligible for matching")]
    TargetIneligible(UserId),

    /// Storage failure; retryable.
    #[error("storage error: {0}")]
    Database(DatabaseError),

    /// User/category directory failure; retryable.
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl MatchError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        MatchError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Whether the failure is transient infrastructure trouble the caller
    /// may retry, as opposed to a business rule rejection.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MatchError::Database(_) | MatchError::Directory(_))
    }
}

impl From<DatabaseError> for MatchError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => MatchError::NotFound { entity, id },
            other => MatchError::Database(other),
        }
    }
}

impl From<CoreError> for MatchError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAction(action) => MatchError::InvalidAction(action),
            CoreError::InvalidStatus(status) => MatchError::InvalidStatus(status),
            CoreError::SelfPair(_) => MatchError::SelfSwipe,
        }
    }
}
