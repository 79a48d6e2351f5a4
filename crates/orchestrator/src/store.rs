//! Connection store: one connection per unordered pair per category.

use std::sync::Arc;

use database::{connection as connection_store, Database, DatabaseError, NewConnection, SqliteConnection};
use match_core::{
    CanonicalPair, CategoryId, Clock, Connection, ConnectionId, ConnectionStatus, Transition,
    UserId,
};
use tracing::{debug, info};

use crate::error::MatchError;

/// Owns connection rows and their status transitions.
#[derive(Clone)]
pub struct ConnectionStore {
    database: Database,
    clock: Arc<dyn Clock>,
}

impl ConnectionStore {
    pub fn new(database: Database, clock: Arc<dyn Clock>) -> Self {
        Self { database, clock }
    }

    /// Return the pair's connection in this category, creating it if absent.
    ///
    /// Runs in its own transaction. Returns the connection and whether this
    /// call created it.
    pub async fn create_if_absent(
        &self,
        user_a: UserId,
        user_b: UserId,
        category_id: CategoryId,
        match_score: Option<f64>,
    ) -> Result<(Connection, bool), MatchError> {
        let mut tx = self.database.begin().await?;
        let outcome = self
            .create_if_absent_in(&mut tx, user_a, user_b, category_id, match_score)
            .await?;
        tx.commit().await.map_err(DatabaseError::from)?;
        Ok(outcome)
    }

    /// [`ConnectionStore::create_if_absent`] inside the caller's transaction.
    ///
    /// An existing row is returned unchanged, whatever its status and score.
    /// The insert runs before any read so a fresh transaction takes the write
    /// lock first; on the unique key it falls back to re-reading the row that
    /// is already there, whether it was created earlier or by a concurrent
    /// caller.
    pub async fn create_if_absent_in(
        &self,
        conn: &mut SqliteConnection,
        user_a: UserId,
        user_b: UserId,
        category_id: CategoryId,
        match_score: Option<f64>,
    ) -> Result<(Connection, bool), MatchError> {
        let pair = CanonicalPair::new(user_a, user_b)?;

        let new = NewConnection {
            low_user_id: pair.low(),
            high_user_id: pair.high(),
            category_id,
            status: ConnectionStatus::INITIAL.as_str().to_string(),
            match_score,
            connected_at: self.clock.now(),
        };

        match connection_store::create_connection(&mut *conn, &new).await {
            Ok(row) => {
                info!(
                    connection_id = row.id,
                    low_user_id = row.low_user_id,
                    high_user_id = row.high_user_id,
                    category_id,
                    "Connection created"
                );
                Ok((to_connection(row)?, true))
            }
            Err(DatabaseError::AlreadyExists { .. }) => {
                let existing =
                    connection_store::find_between(&mut *conn, pair.low(), pair.high(), category_id)
                        .await?
                        .ok_or_else(|| {
                            MatchError::not_found(
                                "Connection",
                                format!("{}/{} in category {}", pair.low(), pair.high(), category_id),
                            )
                        })?;
                debug!(connection_id = existing.id, "Connection already exists");
                Ok((to_connection(existing)?, false))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Set status to accepted. Idempotent.
    pub async fn accept(
        &self,
        connection_id: ConnectionId,
        requesting_user: UserId,
    ) -> Result<Connection, MatchError> {
        self.transition(connection_id, requesting_user, Transition::Accept)
            .await
    }

    /// Set status to blocked. Idempotent.
    pub async fn block(
        &self,
        connection_id: ConnectionId,
        requesting_user: UserId,
    ) -> Result<Connection, MatchError> {
        self.transition(connection_id, requesting_user, Transition::Block)
            .await
    }

    async fn transition(
        &self,
        connection_id: ConnectionId,
        requesting_user: UserId,
        transition: Transition,
    ) -> Result<Connection, MatchError> {
        let target = transition.target();
        let matched = connection_store::update_status_as_participant(
            self.database.pool(),
            connection_id,
            requesting_user,
            target.as_str(),
            self.clock.now(),
        )
        .await?;

        // A missing row surfaces as NotFound here; a row that exists but did
        // not match belongs to other users.
        let row = connection_store::get_connection(self.database.pool(), connection_id).await?;
        if matched == 0 {
            return Err(MatchError::Unauthorized {
                connection_id,
                user_id: requesting_user,
            });
        }

        info!(connection_id, requesting_user, status = %target, "Connection status set");
        to_connection(row)
    }

    /// Get a connection by ID.
    pub async fn get(&self, connection_id: ConnectionId) -> Result<Connection, MatchError> {
        let row = connection_store::get_connection(self.database.pool(), connection_id).await?;
        to_connection(row)
    }

    /// The pair's connection in a category, in either argument order.
    pub async fn between(
        &self,
        user_a: UserId,
        user_b: UserId,
        category_id: CategoryId,
    ) -> Result<Option<Connection>, MatchError> {
        let pair = CanonicalPair::new(user_a, user_b)?;
        connection_store::find_between(self.database.pool(), pair.low(), pair.high(), category_id)
            .await?
            .map(to_connection)
            .transpose()
    }

    /// Whether the pair has a connection, in one category or any.
    pub async fn exists(
        &self,
        user_a: UserId,
        user_b: UserId,
        category_id: Option<CategoryId>,
    ) -> Result<bool, MatchError> {
        let pair = CanonicalPair::new(user_a, user_b)?;
        Ok(
            connection_store::exists_between(self.database.pool(), pair.low(), pair.high(), category_id)
                .await?,
        )
    }

    /// A user's connections, most recent first.
    pub async fn list(
        &self,
        user_id: UserId,
        category_id: Option<CategoryId>,
        status: Option<ConnectionStatus>,
    ) -> Result<Vec<Connection>, MatchError> {
        let rows = connection_store::list_for_user(
            self.database.pool(),
            user_id,
            category_id,
            status.as_ref().map(ConnectionStatus::as_str),
        )
        .await?;

        rows.into_iter().map(to_connection).collect()
    }

    /// A user's accepted connections scoring at least `min_score`, best first.
    pub async fn top_scored(
        &self,
        user_id: UserId,
        min_score: f64,
        limit: i64,
    ) -> Result<Vec<Connection>, MatchError> {
        let rows =
            connection_store::list_top_scored(self.database.pool(), user_id, min_score, limit)
                .await?;

        rows.into_iter().map(to_connection).collect()
    }
}

fn to_connection(row: database::Connection) -> Result<Connection, MatchError> {
    Ok(Connection {
        id: row.id,
        low_user_id: row.low_user_id,
        high_user_id: row.high_user_id,
        category_id: row.category_id,
        status: row.status.parse()?,
        match_score: row.match_score,
        connected_at: row.connected_at,
        updated_at: row.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, seeded_db, test_clock};
    use chrono::Duration;

    #[tokio::test]
    async fn test_create_canonicalizes_pair() {
        let (db, friends) = seeded_db(&[1, 2]).await;
        let store = ConnectionStore::new(db, test_clock());

        let (conn, created) = store
            .create_if_absent(2, 1, friends, Some(0.4))
            .await
            .unwrap();

        assert!(created);
        assert_eq!(conn.low_user_id, 1);
        assert_eq!(conn.high_user_id, 2);
        assert_eq!(conn.status, ConnectionStatus::Accepted);
        assert_eq!(conn.match_score, Some(0.4));
        assert_eq!(conn.connected_at, at(0));
    }

    #[tokio::test]
    async fn test_create_if_absent_is_idempotent() {
        let (db, friends) = seeded_db(&[1, 2]).await;
        let store = ConnectionStore::new(db, test_clock());

        let (first, created_first) = store.create_if_absent(1, 2, friends, Some(0.4)).await.unwrap();
        let (second, created_second) = store.create_if_absent(2, 1, friends, Some(0.9)).await.unwrap();

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first, second);
        assert_eq!(second.match_score, Some(0.4));
        assert_eq!(store.list(1, None, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blocked_connection_returned_unchanged() {
        let (db, friends) = seeded_db(&[1, 2]).await;
        let store = ConnectionStore::new(db, test_clock());

        let (conn, _) = store.create_if_absent(1, 2, friends, None).await.unwrap();
        store.block(conn.id, 1).await.unwrap();

        let (again, created) = store.create_if_absent(1, 2, friends, Some(1.0)).await.unwrap();
        assert!(!created);
        assert_eq!(again.id, conn.id);
        assert_eq!(again.status, ConnectionStatus::Blocked);
        assert_eq!(again.match_score, None);
    }

    #[tokio::test]
    async fn test_self_pair_rejected() {
        let (db, friends) = seeded_db(&[1]).await;
        let store = ConnectionStore::new(db, test_clock());

        let result = store.create_if_absent(1, 1, friends, None).await;
        assert!(matches!(result, Err(MatchError::SelfSwipe)));
    }

    #[tokio::test]
    async fn test_transitions_are_idempotent() {
        let (db, friends) = seeded_db(&[1, 2]).await;
        let clock = test_clock();
        let store = ConnectionStore::new(db, clock.clone());
        let (conn, _) = store.create_if_absent(1, 2, friends, Some(0.5)).await.unwrap();

        clock.advance(Duration::hours(1));
        let accepted = store.accept(conn.id, 2).await.unwrap();
        assert_eq!(accepted.status, ConnectionStatus::Accepted);
        assert_eq!(accepted.updated_at, conn.updated_at);

        let blocked = store.block(conn.id, 1).await.unwrap();
        assert_eq!(blocked.status, ConnectionStatus::Blocked);
        assert_eq!(blocked.updated_at, at(0) + Duration::hours(1));

        clock.advance(Duration::hours(1));
        let blocked_again = store.block(conn.id, 2).await.unwrap();
        assert_eq!(blocked_again, blocked);

        let reaccepted = store.accept(conn.id, 1).await.unwrap();
        assert_eq!(reaccepted.status, ConnectionStatus::Accepted);
        assert_eq!(reaccepted.match_score, Some(0.5));
        assert_eq!(reaccepted.connected_at, conn.connected_at);
    }

    #[tokio::test]
    async fn test_non_participant_unauthorized() {
        let (db, friends) = seeded_db(&[1, 2, 5]).await;
        let store = ConnectionStore::new(db, test_clock());
        let (conn, _) = store.create_if_absent(1, 2, friends, None).await.unwrap();

        let result = store.block(conn.id, 5).await;
        assert!(matches!(
            result,
            Err(MatchError::Unauthorized { user_id: 5, .. })
        ));
        assert_eq!(store.get(conn.id).await.unwrap().status, ConnectionStatus::Accepted);
    }

    #[tokio::test]
    async fn test_missing_connection_not_found() {
        let (db, _) = seeded_db(&[1]).await;
        let store = ConnectionStore::new(db, test_clock());

        assert!(matches!(
            store.accept(404, 1).await,
            Err(MatchError::NotFound { entity: "Connection", .. })
        ));
    }

    #[tokio::test]
    async fn test_lookups() {
        let (db, friends) = seeded_db(&[1, 2, 3]).await;
        let store = ConnectionStore::new(db, test_clock());
        let (conn, _) = store.create_if_absent(3, 1, friends, Some(0.7)).await.unwrap();

        assert_eq!(store.between(1, 3, friends).await.unwrap(), Some(conn.clone()));
        assert_eq!(store.between(3, 1, friends).await.unwrap(), Some(conn));
        assert_eq!(store.between(1, 2, friends).await.unwrap(), None);
        assert!(store.exists(3, 1, None).await.unwrap());
        assert!(!store.exists(2, 1, Some(friends)).await.unwrap());
    }
}
