//! Core types and traits for the swipe-to-match engine.
//!
//! This crate holds the pieces of the matching domain that need no I/O:
//!
//! - [`SwipeAction`] / [`SwipeRecord`] - a user's like/pass decision
//! - [`Connection`] / [`ConnectionStatus`] / [`CanonicalPair`] - the
//!   relationship created from a mutual like
//! - [`overlap_score`] - Jaccard similarity of two interest sets
//! - [`Clock`] - injectable time source
//! - [`UserDirectory`] / [`CategoryDirectory`] - collaborator seams the
//!   orchestrator consumes
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashSet;
//! use match_core::{overlap_score, CanonicalPair};
//!
//! let a: HashSet<i64> = [1, 2, 3].into_iter().collect();
//! let b: HashSet<i64> = [2, 3, 4].into_iter().collect();
//! assert_eq!(overlap_score(&a, &b), 0.5);
//!
//! let pair = CanonicalPair::new(9, 4).unwrap();
//! assert_eq!((pair.low(), pair.high()), (4, 9));
//! ```

mod clock;
mod connection;
mod directory;
mod error;
mod score;
mod swipe;

pub use clock::{Clock, ManualClock, SystemClock};
pub use connection::{CanonicalPair, Connection, ConnectionStatus, Transition};
pub use directory::{CategoryDirectory, UserDirectory};
pub use error::{CoreError, DirectoryError};
pub use score::{overlap_score, score_display, ScoreLevel};
pub use swipe::{SwipeAction, SwipeRecord, SwipeResult};

// Re-export async_trait for directory implementors
pub use async_trait::async_trait;

/// Identifier of a user in the external user directory.
pub type UserId = i64;
/// Identifier of a category (Friends, Jobs, ...).
pub type CategoryId = i64;
/// Identifier of an interest.
pub type InterestId = i64;
/// Identifier of a persisted connection.
pub type ConnectionId = i64;
/// Identifier of a persisted swipe.
pub type SwipeId = i64;
