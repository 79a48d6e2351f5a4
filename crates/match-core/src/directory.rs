//! Collaborator seams for user and category lookups.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::DirectoryError;
use crate::{CategoryId, InterestId, UserId};

/// Read access to the user/interest directory.
///
/// Registration, verification and interest editing live elsewhere; the
/// matching engine only asks these questions.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether the user is known.
    async fn user_exists(&self, user_id: UserId) -> Result<bool, DirectoryError>;

    /// Whether the user may be swiped on (verification status).
    async fn is_eligible(&self, user_id: UserId) -> Result<bool, DirectoryError>;

    /// The user's declared interests. Unknown users have none.
    async fn interest_ids(&self, user_id: UserId) -> Result<HashSet<InterestId>, DirectoryError>;
}

/// Read access to the category catalog.
#[async_trait]
pub trait CategoryDirectory: Send + Sync {
    /// Whether the category is known and open for swiping.
    async fn category_exists(&self, category_id: CategoryId) -> Result<bool, DirectoryError>;
}
