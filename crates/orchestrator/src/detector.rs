//! Mutual-like detection.

use database::SqliteConnection;
use match_core::SwipeRecord;

use crate::error::MatchError;
use crate::ledger::SwipeLedger;

/// Decides whether a freshly recorded swipe completes a match.
///
/// Read-only: it only looks up the reverse swipe in the ledger.
#[derive(Debug, Clone)]
pub struct MatchDetector {
    ledger: SwipeLedger,
}

impl MatchDetector {
    pub fn new(ledger: SwipeLedger) -> Self {
        Self { ledger }
    }

    /// True iff `swipe` is a like and the target already liked the actor in
    /// the same category. A pass never matches.
    pub async fn check_mutual(
        &self,
        conn: &mut SqliteConnection,
        swipe: &SwipeRecord,
    ) -> Result<bool, MatchError> {
        if !swipe.action.is_like() {
            return Ok(false);
        }

        let prior = self
            .ledger
            .find_in(conn, swipe.target_id, swipe.actor_id, swipe.category_id)
            .await?;

        Ok(prior.is_some_and(|p| p.action.is_like() && p.is_reciprocal_of(swipe)))
    }
}
