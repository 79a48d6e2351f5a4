//! Connections between two users and their status transitions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::score::{score_display, ScoreLevel};
use crate::{CategoryId, ConnectionId, UserId};

/// Status of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Blocked,
}

/// A status change requested on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Any status to `Accepted`.
    Accept,
    /// Any status to `Blocked`. There is no unblock; reconnecting takes a
    /// new mutual like.
    Block,
}

impl ConnectionStatus {
    /// Status of a connection created from a confirmed mutual like.
    pub const INITIAL: ConnectionStatus = ConnectionStatus::Accepted;

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Blocked => "blocked",
        }
    }

    /// Status after applying `transition`.
    ///
    /// Every transition is total, so applying the same one twice is a no-op.
    pub fn apply(self, transition: Transition) -> ConnectionStatus {
        transition.target()
    }
}

impl Transition {
    /// The status this transition moves any connection to.
    pub fn target(&self) -> ConnectionStatus {
        match self {
            Transition::Accept => ConnectionStatus::Accepted,
            Transition::Block => ConnectionStatus::Blocked,
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ConnectionStatus::Pending),
            "accepted" => Ok(ConnectionStatus::Accepted),
            "blocked" => Ok(ConnectionStatus::Blocked),
            _ => Err(CoreError::InvalidStatus(s.to_string())),
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unordered user pair stored as `(min, max)`.
///
/// `(a, b)` and `(b, a)` produce the same value, so a single uniqueness key
/// covers both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanonicalPair {
    low: UserId,
    high: UserId,
}

impl CanonicalPair {
    /// Canonicalize two distinct users.
    pub fn new(a: UserId, b: UserId) -> Result<Self, CoreError> {
        if a == b {
            return Err(CoreError::SelfPair(a));
        }
        Ok(Self {
            low: a.min(b),
            high: a.max(b),
        })
    }

    pub fn low(&self) -> UserId {
        self.low
    }

    pub fn high(&self) -> UserId {
        self.high
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.low == user_id || self.high == user_id
    }

    /// The member of the pair that is not `user_id`.
    pub fn other(&self, user_id: UserId) -> Option<UserId> {
        if user_id == self.low {
            Some(self.high)
        } else if user_id == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}

/// A persisted relationship between two users in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    /// Always strictly less than `high_user_id`.
    pub low_user_id: UserId,
    pub high_user_id: UserId,
    pub category_id: CategoryId,
    pub status: ConnectionStatus,
    /// Interest overlap at creation time; never recomputed.
    pub match_score: Option<f64>,
    pub connected_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Connection {
    pub fn pair(&self) -> CanonicalPair {
        CanonicalPair {
            low: self.low_user_id,
            high: self.high_user_id,
        }
    }

    /// Whether `user_id` is one of the two participants.
    pub fn involves(&self, user_id: UserId) -> bool {
        self.pair().contains(user_id)
    }

    /// The participant other than `user_id`, if `user_id` participates.
    pub fn other_user(&self, user_id: UserId) -> Option<UserId> {
        self.pair().other(user_id)
    }

    /// Whole days elapsed since the connection was made.
    pub fn age_in_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.connected_at).num_days().max(0)
    }

    /// Whether the connection is at most `threshold_days` old.
    pub fn is_new(&self, now: DateTime<Utc>, threshold_days: i64) -> bool {
        self.age_in_days(now) <= threshold_days
    }

    pub fn score_level(&self) -> ScoreLevel {
        ScoreLevel::from_score(self.match_score)
    }

    pub fn score_display(&self) -> String {
        score_display(self.match_score)
    }
}
