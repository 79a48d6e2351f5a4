//! Swipe ledger: the append-only record of swipe decisions.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use database::{swipe as swipe_store, Database, DatabaseError, SqliteConnection};
use match_core::{CategoryId, SwipeAction, SwipeRecord, UserId};
use tracing::debug;

use crate::error::MatchError;

/// Default page size for swipe history.
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Append-only swipe storage with one swipe per (actor, target, category).
#[derive(Debug, Clone)]
pub struct SwipeLedger {
    database: Database,
}

impl SwipeLedger {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Record a swipe inside the caller's transaction.
    ///
    /// A second swipe on the same tuple fails with
    /// [`MatchError::DuplicateSwipe`] regardless of its action; earlier
    /// decisions are never overwritten.
    pub async fn record_swipe(
        &self,
        conn: &mut SqliteConnection,
        actor_id: UserId,
        target_id: UserId,
        category_id: CategoryId,
        action: SwipeAction,
        swiped_at: DateTime<Utc>,
    ) -> Result<SwipeRecord, MatchError> {
        if actor_id == target_id {
            return Err(MatchError::SelfSwipe);
        }

        let row = swipe_store::insert_swipe(
            &mut *conn,
            actor_id,
            target_id,
            category_id,
            action.as_str(),
            swiped_at,
        )
        .await
        .map_err(|e| match e {
            DatabaseError::AlreadyExists { .. } => MatchError::DuplicateSwipe {
                actor_id,
                target_id,
                category_id,
            },
            other => other.into(),
        })?;

        debug!(swipe_id = row.id, actor_id, target_id, category_id, %action, "Swipe recorded");
        to_record(row)
    }

    /// Find the swipe `actor_id` made on `target_id`, inside the caller's
    /// transaction.
    pub async fn find_in(
        &self,
        conn: &mut SqliteConnection,
        actor_id: UserId,
        target_id: UserId,
        category_id: CategoryId,
    ) -> Result<Option<SwipeRecord>, MatchError> {
        swipe_store::find_swipe(&mut *conn, actor_id, target_id, category_id)
            .await?
            .map(to_record)
            .transpose()
    }

    /// Whether `actor_id` liked `target_id` in the category.
    pub async fn has_liked(
        &self,
        actor_id: UserId,
        target_id: UserId,
        category_id: CategoryId,
    ) -> Result<bool, MatchError> {
        Ok(swipe_store::has_liked(self.database.pool(), actor_id, target_id, category_id).await?)
    }

    /// Users `actor_id` already swiped in the category.
    pub async fn prior_swipe_targets(
        &self,
        actor_id: UserId,
        category_id: CategoryId,
    ) -> Result<HashSet<UserId>, MatchError> {
        let ids = swipe_store::swiped_targets(self.database.pool(), actor_id, category_id).await?;
        Ok(ids.into_iter().collect())
    }

    /// An actor's swipes, most recent first.
    pub async fn history(
        &self,
        actor_id: UserId,
        category_id: Option<CategoryId>,
        action: Option<SwipeAction>,
        limit: i64,
    ) -> Result<Vec<SwipeRecord>, MatchError> {
        let rows = swipe_store::list_swipes(
            self.database.pool(),
            actor_id,
            category_id,
            action.as_ref().map(SwipeAction::as_str),
            limit,
        )
        .await?;

        rows.into_iter().map(to_record).collect()
    }
}

fn to_record(row: database::Swipe) -> Result<SwipeRecord, MatchError> {
    Ok(SwipeRecord {
        id: row.id,
        actor_id: row.swiper_id,
        target_id: row.swiped_id,
        category_id: row.category_id,
        action: row.action.parse()?,
        swiped_at: row.swiped_at,
    })
}
