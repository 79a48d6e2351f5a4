//! Connection endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use match_core::{CategoryId, Connection, ConnectionId, ConnectionStatus, ScoreLevel, UserId};
use orchestrator::Orchestrator;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// A connection plus its presentation fields.
#[derive(Debug, Serialize)]
pub struct ConnectionView {
    #[serde(flatten)]
    pub connection: Connection,
    pub score_level: ScoreLevel,
    pub score_display: String,
    pub is_new: bool,
}

impl ConnectionView {
    pub fn new(orchestrator: &Orchestrator, connection: Connection) -> Self {
        Self {
            score_level: connection.score_level(),
            score_display: connection.score_display(),
            is_new: orchestrator.is_new(&connection),
            connection,
        }
    }
}

fn views(orchestrator: &Orchestrator, connections: Vec<Connection>) -> Vec<ConnectionView> {
    connections
        .into_iter()
        .map(|c| ConnectionView::new(orchestrator, c))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category_id: Option<CategoryId>,
    pub status: Option<String>,
}

/// A user's connections, most recent first.
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ConnectionView>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ConnectionStatus>)
        .transpose()?;

    let connections = state
        .orchestrator
        .list_connections(user_id, query.category_id, status)
        .await?;

    Ok(Json(views(&state.orchestrator, connections)))
}

/// A user's pending connections.
pub async fn pending(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<ConnectionView>>> {
    let connections = state.orchestrator.pending_connections(user_id).await?;
    Ok(Json(views(&state.orchestrator, connections)))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendedQuery {
    pub limit: Option<i64>,
}

/// Highest-scoring accepted connections.
pub async fn recommended(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<RecommendedQuery>,
) -> Result<Json<Vec<ConnectionView>>> {
    let connections = state
        .orchestrator
        .recommended_connections(user_id, query.limit)
        .await?;
    Ok(Json(views(&state.orchestrator, connections)))
}

#[derive(Debug, Deserialize)]
pub struct BetweenQuery {
    pub user_a: UserId,
    pub user_b: UserId,
    pub category_id: CategoryId,
}

/// The pair's connection in a category, or `null`.
pub async fn between(
    State(state): State<AppState>,
    Query(query): Query<BetweenQuery>,
) -> Result<Json<Option<ConnectionView>>> {
    let connection = state
        .orchestrator
        .connection_between(query.user_a, query.user_b, query.category_id)
        .await?;
    Ok(Json(
        connection.map(|c| ConnectionView::new(&state.orchestrator, c)),
    ))
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// The participant performing the change.
    pub user_id: UserId,
}

pub async fn accept(
    State(state): State<AppState>,
    Path(connection_id): Path<ConnectionId>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<ConnectionView>> {
    let connection = state
        .orchestrator
        .accept_connection(connection_id, req.user_id)
        .await?;
    Ok(Json(ConnectionView::new(&state.orchestrator, connection)))
}

pub async fn block(
    State(state): State<AppState>,
    Path(connection_id): Path<ConnectionId>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<ConnectionView>> {
    let connection = state
        .orchestrator
        .block_connection(connection_id, req.user_id)
        .await?;
    Ok(Json(ConnectionView::new(&state.orchestrator, connection)))
}
