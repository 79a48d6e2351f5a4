//! Swipe/match orchestrator for the matching backend.
//!
//! This crate provides the [`Orchestrator`] type, the single entry point that
//! records swipes and turns mutual likes into connections.
//!
//! # Architecture
//!
//! ```text
//! swipe(actor, target, category, action)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Validate via UserDirectory / CategoryDirectory          │
//! │         ↓                                                   │
//! │  2. Fetch interest sets (likes only)                        │
//! │         ↓                                                   │
//! │  ── BEGIN ───────────────────────────────────────────────── │
//! │  3. SwipeLedger::record_swipe    → DuplicateSwipe?          │
//! │         ↓                                                   │
//! │  4. MatchDetector::check_mutual  (reverse like?)            │
//! │         ↓                                                   │
//! │  5. ConnectionStore::create_if_absent_in (scored)           │
//! │  ── COMMIT ──────────────────────────────────────────────── │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Uniqueness of swipes and connections is enforced by the database's unique
//! keys, so concurrent handlers can call [`Orchestrator::swipe`] freely.
//!
//! # Example
//!
//! ```rust,no_run
//! use match_core::SwipeAction;
//! use orchestrator::{MatchConfig, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = Orchestrator::from_config(MatchConfig::from_env()?).await?;
//!
//!     let result = orchestrator.swipe(1, 2, 1, SwipeAction::Like).await?;
//!     if let Some(connection) = result.connection {
//!         println!("Matched! connection {}", connection.id);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod detector;
mod directory;
mod error;
mod ledger;
mod orchestrator;
mod store;

pub use config::{ConfigError, MatchConfig};
pub use detector::MatchDetector;
pub use directory::DatabaseDirectory;
pub use error::MatchError;
pub use ledger::{SwipeLedger, DEFAULT_HISTORY_LIMIT};
pub use orchestrator::Orchestrator;
pub use store::ConnectionStore;
