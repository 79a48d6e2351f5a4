//! Route handlers for the HTTP API.

pub mod connections;
pub mod health;
pub mod swipes;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Swipes
        .route("/api/swipes", post(swipes::create_swipe))
        .route("/api/users/:user_id/swipes", get(swipes::history))
        .route("/api/users/:user_id/excluded", get(swipes::excluded))
        // Connections
        .route("/api/users/:user_id/connections", get(connections::list))
        .route(
            "/api/users/:user_id/connections/pending",
            get(connections::pending),
        )
        .route(
            "/api/users/:user_id/connections/recommended",
            get(connections::recommended),
        )
        .route("/api/connections/between", get(connections::between))
        .route("/api/connections/:connection_id/accept", post(connections::accept))
        .route("/api/connections/:connection_id/block", post(connections::block))
}
