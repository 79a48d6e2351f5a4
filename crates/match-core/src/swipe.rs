//! Swipe actions and records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::connection::Connection;
use crate::error::CoreError;
use crate::{CategoryId, SwipeId, UserId};

/// A user's decision about another user within one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    /// Interested; may produce a match if reciprocated.
    Like,
    /// Not interested; never produces a match.
    Pass,
}

impl SwipeAction {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeAction::Like => "like",
            SwipeAction::Pass => "pass",
        }
    }

    pub fn is_like(&self) -> bool {
        matches!(self, SwipeAction::Like)
    }
}

impl FromStr for SwipeAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "like" => Ok(SwipeAction::Like),
            "pass" => Ok(SwipeAction::Pass),
            _ => Err(CoreError::InvalidAction(s.to_string())),
        }
    }
}

impl fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable, recorded swipe.
///
/// Unique per `(actor_id, target_id, category_id)`: a user swipes another
/// user at most once per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeRecord {
    pub id: SwipeId,
    pub actor_id: UserId,
    pub target_id: UserId,
    pub category_id: CategoryId,
    pub action: SwipeAction,
    /// Server-assigned timestamp.
    pub swiped_at: DateTime<Utc>,
}

impl SwipeRecord {
    /// Whether `other` is the reverse-direction swipe in the same category.
    pub fn is_reciprocal_of(&self, other: &SwipeRecord) -> bool {
        self.actor_id == other.target_id
            && self.target_id == other.actor_id
            && self.category_id == other.category_id
    }
}

/// Outcome of a swipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeResult {
    /// The swipe that was just recorded.
    pub swipe: SwipeRecord,
    /// True when this swipe completed a mutual like.
    pub matched: bool,
    /// The connection for the pair, present iff `matched`.
    pub connection: Option<Connection>,
}

impl SwipeResult {
    /// A swipe that did not produce a match.
    pub fn unmatched(swipe: SwipeRecord) -> Self {
        Self {
            swipe,
            matched: false,
            connection: None,
        }
    }

    /// A swipe that completed a mutual like.
    pub fn matched(swipe: SwipeRecord, connection: Connection) -> Self {
        Self {
            swipe,
            matched: true,
            connection: Some(connection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(actor_id: UserId, target_id: UserId, category_id: CategoryId) -> SwipeRecord {
        SwipeRecord {
            id: 1,
            actor_id,
            target_id,
            category_id,
            action: SwipeAction::Like,
            swiped_at: Utc::now(),
        }
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("like".parse::<SwipeAction>().unwrap(), SwipeAction::Like);
        assert_eq!(" PASS ".parse::<SwipeAction>().unwrap(), SwipeAction::Pass);
        assert!(matches!(
            "superlike".parse::<SwipeAction>(),
            Err(CoreError::InvalidAction(_))
        ));
        assert!(matches!(
            "".parse::<SwipeAction>(),
            Err(CoreError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_action_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&SwipeAction::Like).unwrap(), "\"like\"");
        let pass: SwipeAction = serde_json::from_str("\"pass\"").unwrap();
        assert_eq!(pass, SwipeAction::Pass);
        assert!(serde_json::from_str::<SwipeAction>("\"maybe\"").is_err());
    }

    #[test]
    fn test_reciprocal() {
        let a = record(1, 2, 7);
        assert!(a.is_reciprocal_of(&record(2, 1, 7)));
        assert!(!a.is_reciprocal_of(&record(2, 1, 8)));
        assert!(!a.is_reciprocal_of(&record(1, 2, 7)));
    }
}
