#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use database::{category, interest, user, Database, NewUser};
use match_core::{CategoryId, ManualClock, UserId};
use orchestrator::{MatchConfig, Orchestrator};
use tempfile::TempDir;

/// A file-backed orchestrator. Keep the `TempDir` alive for the test's
/// duration.
pub struct Harness {
    pub orchestrator: Orchestrator,
    pub db: Database,
    pub clock: Arc<ManualClock>,
    pub friends: CategoryId,
    _dir: TempDir,
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap()
}

pub async fn harness(users: &[UserId]) -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("hitme.db").display());
    let db = Database::connect_with_pool_size(&url, 8).await.unwrap();
    db.migrate().await.unwrap();

    for &id in users {
        user::create_user(db.pool(), &NewUser::verified(id, &format!("user-{}", id)))
            .await
            .unwrap();
    }
    let friends = category::create_category(db.pool(), "Friends", "friends")
        .await
        .unwrap()
        .id;

    let clock = Arc::new(ManualClock::new(start()));
    let orchestrator =
        Orchestrator::with_database_directory(db.clone(), clock.clone(), MatchConfig::default());

    Harness {
        orchestrator,
        db,
        clock,
        friends,
        _dir: dir,
    }
}

/// Attach existing interests to `user_id`.
pub async fn add_interests(db: &Database, user_id: UserId, interest_ids: &[i64]) {
    for &id in interest_ids {
        interest::add_user_interest(db.pool(), user_id, id).await.unwrap();
    }
}

pub async fn create_interests(db: &Database, names: &[&str]) -> Vec<i64> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        ids.push(interest::create_interest(db.pool(), name).await.unwrap().id);
    }
    ids
}
