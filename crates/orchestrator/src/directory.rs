//! SQLite-backed user and category directory.

use std::collections::HashSet;

use async_trait::async_trait;
use database::{category, interest, user, Database, DatabaseError};
use match_core::{CategoryDirectory, CategoryId, DirectoryError, InterestId, UserDirectory, UserId};

/// Answers directory questions from the same database the ledger uses.
#[derive(Debug, Clone)]
pub struct DatabaseDirectory {
    database: Database,
}

impl DatabaseDirectory {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

fn unavailable(err: DatabaseError) -> DirectoryError {
    DirectoryError::Unavailable(err.to_string())
}

#[async_trait]
impl UserDirectory for DatabaseDirectory {
    async fn user_exists(&self, user_id: UserId) -> Result<bool, DirectoryError> {
        let found = user::find_user(self.database.pool(), user_id)
            .await
            .map_err(unavailable)?;
        Ok(found.is_some())
    }

    async fn is_eligible(&self, user_id: UserId) -> Result<bool, DirectoryError> {
        let found = user::find_user(self.database.pool(), user_id)
            .await
            .map_err(unavailable)?;
        Ok(found.is_some_and(|u| u.is_eligible()))
    }

    async fn interest_ids(&self, user_id: UserId) -> Result<HashSet<InterestId>, DirectoryError> {
        let ids = interest::interest_ids_for_user(self.database.pool(), user_id)
            .await
            .map_err(unavailable)?;
        Ok(ids.into_iter().collect())
    }
}

#[async_trait]
impl CategoryDirectory for DatabaseDirectory {
    async fn category_exists(&self, category_id: CategoryId) -> Result<bool, DirectoryError> {
        category::is_active(self.database.pool(), category_id)
            .await
            .map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded_db;
    use database::NewUser;

    #[tokio::test]
    async fn test_user_lookups() {
        let (db, _) = seeded_db(&[1]).await;
        user::create_user(db.pool(), &NewUser::pending(2, "Pending"))
            .await
            .unwrap();
        let directory = DatabaseDirectory::new(db);

        assert!(directory.user_exists(1).await.unwrap());
        assert!(directory.user_exists(2).await.unwrap());
        assert!(!directory.user_exists(3).await.unwrap());
        assert!(directory.is_eligible(1).await.unwrap());
        assert!(!directory.is_eligible(2).await.unwrap());
        assert!(!directory.is_eligible(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_interest_ids() {
        let (db, _) = seeded_db(&[1]).await;
        let hiking = interest::create_interest(db.pool(), "hiking").await.unwrap();
        let chess = interest::create_interest(db.pool(), "chess").await.unwrap();
        interest::add_user_interest(db.pool(), 1, hiking.id).await.unwrap();
        interest::add_user_interest(db.pool(), 1, chess.id).await.unwrap();
        let directory = DatabaseDirectory::new(db);

        let ids = directory.interest_ids(1).await.unwrap();
        assert_eq!(ids, [hiking.id, chess.id].into_iter().collect::<HashSet<_>>());
        assert!(directory.interest_ids(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_category_is_not_open() {
        let (db, friends) = seeded_db(&[1]).await;
        let directory = DatabaseDirectory::new(db.clone());
        assert!(directory.category_exists(friends).await.unwrap());

        category::set_active(db.pool(), friends, false).await.unwrap();
        assert!(!directory.category_exists(friends).await.unwrap());
        assert!(!directory.category_exists(404).await.unwrap());
    }
}
