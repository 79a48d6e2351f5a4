//! Database models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user known to the matching engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Externally assigned user ID.
    pub id: i64,
    /// Display name
    pub name: String,
    /// One of `pending`, `verified`, `rejected`.
    pub verification_status: String,
}

impl User {
    /// Only verified users may be swiped on.
    pub fn is_eligible(&self) -> bool {
        self.verification_status == "verified"
    }
}

/// Input for [`crate::user::create_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: i64,
    pub name: String,
    pub verification_status: String,
}

impl NewUser {
    pub fn pending(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            verification_status: "pending".to_string(),
        }
    }

    pub fn verified(id: i64, name: &str) -> Self {
        Self {
            verification_status: "verified".to_string(),
            ..Self::pending(id, name)
        }
    }
}

/// An interest users can declare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Interest {
    pub id: i64,
    pub name: String,
}

/// A swipe category (Friends, Jobs, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// URL-safe unique key (e.g., "friends").
    pub slug: String,
    /// Inactive categories accept no swipes.
    pub is_active: bool,
    pub sort_order: i64,
}

/// A row of the swipe ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Swipe {
    /// Auto-incrementing ID.
    pub id: i64,
    /// User who swiped.
    pub swiper_id: i64,
    /// User who was swiped on.
    pub swiped_id: i64,
    pub category_id: i64,
    /// `like` or `pass`.
    pub action: String,
    pub swiped_at: DateTime<Utc>,
}

/// A row of the connection store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Connection {
    /// Auto-incrementing ID.
    pub id: i64,
    pub low_user_id: i64,
    pub high_user_id: i64,
    pub category_id: i64,
    /// `pending`, `accepted` or `blocked`.
    pub status: String,
    pub match_score: Option<f64>,
    pub connected_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for [`crate::connection::create_connection`].
///
/// The pair must already be canonical (`low_user_id < high_user_id`); the
/// schema rejects anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct NewConnection {
    pub low_user_id: i64,
    pub high_user_id: i64,
    pub category_id: i64,
    pub status: String,
    pub match_score: Option<f64>,
    pub connected_at: DateTime<Utc>,
}
