//! Swipe endpoints.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use match_core::{CategoryId, SwipeAction, SwipeRecord, UserId};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::routes::connections::ConnectionView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub actor_id: UserId,
    pub target_id: UserId,
    pub category_id: CategoryId,
    /// `like` or `pass`, case-insensitive.
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub swipe: SwipeRecord,
    pub matched: bool,
    pub connection: Option<ConnectionView>,
}

/// Record a swipe. Returns the connection when it completes a mutual like.
pub async fn create_swipe(
    State(state): State<AppState>,
    Json(req): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>> {
    let action: SwipeAction = req.action.parse()?;

    let result = state
        .orchestrator
        .swipe(req.actor_id, req.target_id, req.category_id, action)
        .await?;

    Ok(Json(SwipeResponse {
        swipe: result.swipe,
        matched: result.matched,
        connection: result
            .connection
            .map(|c| ConnectionView::new(&state.orchestrator, c)),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub category_id: Option<CategoryId>,
    pub action: Option<String>,
    pub limit: Option<i64>,
}

/// A user's swipes, most recent first.
pub async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<SwipeRecord>>> {
    let action = query
        .action
        .as_deref()
        .map(str::parse::<SwipeAction>)
        .transpose()?;

    let swipes = state
        .orchestrator
        .swipe_history(user_id, query.category_id, action, query.limit)
        .await?;

    Ok(Json(swipes))
}

#[derive(Debug, Deserialize)]
pub struct ExcludedQuery {
    pub category_id: CategoryId,
}

/// Users a candidate feed must skip for this user in a category.
pub async fn excluded(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<ExcludedQuery>,
) -> Result<Json<Vec<UserId>>> {
    let excluded: HashSet<UserId> = state
        .orchestrator
        .excluded_candidates(user_id, query.category_id)
        .await?;

    let mut ids: Vec<_> = excluded.into_iter().collect();
    ids.sort_unstable();
    Ok(Json(ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::test_support::test_state;
    use axum::http::StatusCode;
    use orchestrator::MatchError;

    fn request(actor_id: UserId, target_id: UserId, category_id: CategoryId, action: &str) -> Json<SwipeRequest> {
        Json(SwipeRequest {
            actor_id,
            target_id,
            category_id,
            action: action.to_string(),
        })
    }

    #[tokio::test]
    async fn test_mutual_like_returns_connection() {
        let (state, friends) = test_state(&[1, 2]).await;

        let Json(first) = create_swipe(State(state.clone()), request(1, 2, friends, "like"))
            .await
            .unwrap();
        assert!(!first.matched);

        let Json(second) = create_swipe(State(state.clone()), request(2, 1, friends, "Like"))
            .await
            .unwrap();
        assert!(second.matched);
        let view = second.connection.unwrap();
        assert_eq!(view.connection.low_user_id, 1);
        assert!(view.is_new);
        assert_eq!(view.score_display, "N/A");
    }

    #[tokio::test]
    async fn test_rejections_map_to_statuses() {
        let (state, friends) = test_state(&[1, 2]).await;

        let err = create_swipe(State(state.clone()), request(1, 2, friends, "superlike"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        create_swipe(State(state.clone()), request(1, 2, friends, "pass"))
            .await
            .unwrap();
        let err = create_swipe(State(state.clone()), request(1, 2, friends, "like"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Match(MatchError::DuplicateSwipe { .. })));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_history_and_excluded() {
        let (state, friends) = test_state(&[1, 2, 3]).await;
        for (target, action) in [(2, "like"), (3, "pass")] {
            create_swipe(State(state.clone()), request(1, target, friends, action))
                .await
                .unwrap();
        }

        let Json(likes) = history(
            State(state.clone()),
            Path(1),
            Query(HistoryQuery {
                action: Some("like".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].target_id, 2);

        let Json(ids) = excluded(
            State(state),
            Path(1),
            Query(ExcludedQuery {
                category_id: friends,
            }),
        )
        .await
        .unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
