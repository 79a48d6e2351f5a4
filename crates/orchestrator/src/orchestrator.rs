//! The swipe/match orchestrator.

use std::collections::HashSet;
use std::sync::Arc;

use database::{Database, DatabaseError};
use match_core::{
    overlap_score, CategoryDirectory, CategoryId, Clock, Connection, ConnectionId,
    ConnectionStatus, SwipeAction, SwipeRecord, SwipeResult, SystemClock, UserDirectory, UserId,
};
use tracing::{debug, info};

use crate::config::MatchConfig;
use crate::detector::MatchDetector;
use crate::directory::DatabaseDirectory;
use crate::error::MatchError;
use crate::ledger::{SwipeLedger, DEFAULT_HISTORY_LIMIT};
use crate::store::ConnectionStore;

/// Coordinates the swipe ledger, match detector and connection store.
///
/// `swipe` is the only operation that writes to both the ledger and the
/// store, and it does so in a single transaction: either the swipe and any
/// resulting connection are both persisted, or neither is.
#[derive(Clone)]
pub struct Orchestrator {
    db: Database,
    ledger: SwipeLedger,
    detector: MatchDetector,
    store: ConnectionStore,
    users: Arc<dyn UserDirectory>,
    categories: Arc<dyn CategoryDirectory>,
    clock: Arc<dyn Clock>,
    config: MatchConfig,
}

impl Orchestrator {
    /// Create an orchestrator with explicit collaborators.
    pub fn new(
        db: Database,
        users: Arc<dyn UserDirectory>,
        categories: Arc<dyn CategoryDirectory>,
        clock: Arc<dyn Clock>,
        config: MatchConfig,
    ) -> Self {
        let ledger = SwipeLedger::new(db.clone());
        let detector = MatchDetector::new(ledger.clone());
        let store = ConnectionStore::new(db.clone(), clock.clone());

        Self {
            db,
            ledger,
            detector,
            store,
            users,
            categories,
            clock,
            config,
        }
    }

    /// Create an orchestrator whose user and category directory is the same
    /// database.
    pub fn with_database_directory(db: Database, clock: Arc<dyn Clock>, config: MatchConfig) -> Self {
        let directory = Arc::new(DatabaseDirectory::new(db.clone()));
        Self::new(db, directory.clone(), directory, clock, config)
    }

    /// Connect to the configured database, run migrations and use the system
    /// clock.
    pub async fn from_config(config: MatchConfig) -> Result<Self, MatchError> {
        let db = Database::connect_with_pool_size(&config.database_url, config.pool_size).await?;
        db.migrate().await?;

        Ok(Self::with_database_directory(db, Arc::new(SystemClock), config))
    }

    /// Record a swipe and, on a mutual like, create or fetch the connection.
    ///
    /// Validation order: self swipe, actor, target (existence then
    /// eligibility), category. Nothing is written unless all pass.
    pub async fn swipe(
        &self,
        actor_id: UserId,
        target_id: UserId,
        category_id: CategoryId,
        action: SwipeAction,
    ) -> Result<SwipeResult, MatchError> {
        if actor_id == target_id {
            return Err(MatchError::SelfSwipe);
        }
        if !self.users.user_exists(actor_id).await? {
            return Err(MatchError::not_found("User", actor_id));
        }
        if !self.users.user_exists(target_id).await? {
            return Err(MatchError::not_found("User", target_id));
        }
        if !self.users.is_eligible(target_id).await? {
            return Err(MatchError::TargetIneligible(target_id));
        }
        if !self.categories.category_exists(category_id).await? {
            return Err(MatchError::not_found("Category", category_id));
        }

        let interests = if action.is_like() {
            Some((
                self.users.interest_ids(actor_id).await?,
                self.users.interest_ids(target_id).await?,
            ))
        } else {
            None
        };

        // The insert is the first statement so the transaction takes the
        // write lock up front.
        let mut tx = self.db.begin().await?;
        let swipe = self
            .ledger
            .record_swipe(&mut tx, actor_id, target_id, category_id, action, self.clock.now())
            .await?;

        let matched = match &interests {
            Some(_) => self.detector.check_mutual(&mut tx, &swipe).await?,
            None => false,
        };

        let result = match interests {
            Some((actor_interests, target_interests)) if matched => {
                let score = overlap_score(&actor_interests, &target_interests);
                let (connection, created) = self
                    .store
                    .create_if_absent_in(&mut tx, actor_id, target_id, category_id, Some(score))
                    .await?;

                info!(
                    actor_id,
                    target_id,
                    category_id,
                    connection_id = connection.id,
                    match_score = score,
                    created,
                    "Mutual like"
                );
                SwipeResult::matched(swipe, connection)
            }
            _ => SwipeResult::unmatched(swipe),
        };

        tx.commit().await.map_err(DatabaseError::from)?;

        debug!(actor_id, target_id, category_id, %action, matched = result.matched, "Swipe committed");
        Ok(result)
    }

    /// Accept a connection as one of its participants.
    pub async fn accept_connection(
        &self,
        connection_id: ConnectionId,
        requesting_user: UserId,
    ) -> Result<Connection, MatchError> {
        self.store.accept(connection_id, requesting_user).await
    }

    /// Block a connection as one of its participants.
    pub async fn block_connection(
        &self,
        connection_id: ConnectionId,
        requesting_user: UserId,
    ) -> Result<Connection, MatchError> {
        self.store.block(connection_id, requesting_user).await
    }

    /// Get a connection by ID.
    pub async fn connection(&self, connection_id: ConnectionId) -> Result<Connection, MatchError> {
        self.store.get(connection_id).await
    }

    /// A user's connections, most recently connected first.
    pub async fn list_connections(
        &self,
        user_id: UserId,
        category_id: Option<CategoryId>,
        status: Option<ConnectionStatus>,
    ) -> Result<Vec<Connection>, MatchError> {
        self.store.list(user_id, category_id, status).await
    }

    /// A user's pending connections.
    pub async fn pending_connections(&self, user_id: UserId) -> Result<Vec<Connection>, MatchError> {
        self.store
            .list(user_id, None, Some(ConnectionStatus::Pending))
            .await
    }

    /// Accepted connections scoring at least the configured minimum, best
    /// first.
    pub async fn recommended_connections(
        &self,
        user_id: UserId,
        limit: Option<i64>,
    ) -> Result<Vec<Connection>, MatchError> {
        let limit = limit
            .filter(|&l| l > 0)
            .unwrap_or(self.config.recommended_limit);
        self.store
            .top_scored(user_id, self.config.recommended_min_score, limit)
            .await
    }

    /// The pair's connection in a category, in either argument order.
    pub async fn connection_between(
        &self,
        user_a: UserId,
        user_b: UserId,
        category_id: CategoryId,
    ) -> Result<Option<Connection>, MatchError> {
        self.store.between(user_a, user_b, category_id).await
    }

    /// Whether the pair is connected, in one category or any.
    pub async fn has_connection(
        &self,
        user_a: UserId,
        user_b: UserId,
        category_id: Option<CategoryId>,
    ) -> Result<bool, MatchError> {
        self.store.exists(user_a, user_b, category_id).await
    }

    /// Interest overlap of two users as the directory currently sees them.
    pub async fn compute_score(&self, user_a: UserId, user_b: UserId) -> Result<f64, MatchError> {
        let a = self.users.interest_ids(user_a).await?;
        let b = self.users.interest_ids(user_b).await?;
        Ok(overlap_score(&a, &b))
    }

    /// An actor's swipes, most recent first. A missing or non-positive
    /// `limit` means 20.
    pub async fn swipe_history(
        &self,
        actor_id: UserId,
        category_id: Option<CategoryId>,
        action: Option<SwipeAction>,
        limit: Option<i64>,
    ) -> Result<Vec<SwipeRecord>, MatchError> {
        self.ledger
            .history(
                actor_id,
                category_id,
                action,
                limit.filter(|&l| l > 0).unwrap_or(DEFAULT_HISTORY_LIMIT),
            )
            .await
    }

    /// Whether `actor_id` liked `target_id` in the category.
    pub async fn has_liked(
        &self,
        actor_id: UserId,
        target_id: UserId,
        category_id: CategoryId,
    ) -> Result<bool, MatchError> {
        self.ledger.has_liked(actor_id, target_id, category_id).await
    }

    /// Users a candidate selector must skip for this actor: everyone already
    /// swiped in the category, and the actor.
    pub async fn excluded_candidates(
        &self,
        actor_id: UserId,
        category_id: CategoryId,
    ) -> Result<HashSet<UserId>, MatchError> {
        let mut excluded = self.ledger.prior_swipe_targets(actor_id, category_id).await?;
        excluded.insert(actor_id);
        Ok(excluded)
    }

    /// Whether the connection counts as new under the configured threshold.
    pub fn is_new(&self, connection: &Connection) -> bool {
        connection.is_new(self.clock.now(), self.config.new_connection_days)
    }

    /// Get the configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Get the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }
}
