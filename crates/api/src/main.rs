//! HTTP API for the swipe-to-match backend.
//!
//! Exposes swiping, swipe history and connection management as JSON
//! endpoints over the [`orchestrator::Orchestrator`].

mod config;
mod error;
mod routes;
mod state;

use orchestrator::Orchestrator;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting API server");

    // Connect to database and build the orchestrator
    let orchestrator = Orchestrator::from_config(config.matching.clone()).await?;

    // Build application state
    let state = AppState::new(orchestrator);

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use database::{category, user, Database, NewUser};
    use match_core::{CategoryId, SystemClock, UserId};
    use orchestrator::{MatchConfig, Orchestrator};

    use crate::state::AppState;

    /// State over an in-memory database with verified users `ids` and a
    /// "Friends" category.
    pub async fn test_state(ids: &[UserId]) -> (AppState, CategoryId) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        for &id in ids {
            user::create_user(db.pool(), &NewUser::verified(id, &format!("user-{}", id)))
                .await
                .unwrap();
        }
        let friends = category::create_category(db.pool(), "Friends", "friends")
            .await
            .unwrap()
            .id;

        let orchestrator =
            Orchestrator::with_database_directory(db, Arc::new(SystemClock), MatchConfig::default());
        (AppState::new(orchestrator), friends)
    }
}
