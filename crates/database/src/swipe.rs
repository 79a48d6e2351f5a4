//! Swipe ledger storage.
//!
//! Rows are append-only: there is no update, and deletion only happens by
//! cascade when a user or category is removed.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use crate::error::{DatabaseError, Result};
use crate::models::Swipe;

/// Append a swipe.
///
/// Fails with [`DatabaseError::AlreadyExists`] when the swiper already swiped
/// this user in this category, whatever the earlier action was. The check is
/// the table's unique constraint, so concurrent inserts cannot both succeed.
pub async fn insert_swipe<'e, E>(
    executor: E,
    swiper_id: i64,
    swiped_id: i64,
    category_id: i64,
    action: &str,
    swiped_at: DateTime<Utc>,
) -> Result<Swipe>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO swipes (swiper_id, swiped_id, category_id, action, swiped_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(swiper_id)
    .bind(swiped_id)
    .bind(category_id)
    .bind(action)
    .bind(swiped_at)
    .execute(executor)
    .await
    .map_err(|e| {
        DatabaseError::unique_or(
            e,
            "Swipe",
            format!("{} -> {} in category {}", swiper_id, swiped_id, category_id),
        )
    })?;

    Ok(Swipe {
        id: result.last_insert_rowid(),
        swiper_id,
        swiped_id,
        category_id,
        action: action.to_string(),
        swiped_at,
    })
}

/// Get the swipe for a tuple, if any.
pub async fn find_swipe<'e, E>(
    executor: E,
    swiper_id: i64,
    swiped_id: i64,
    category_id: i64,
) -> Result<Option<Swipe>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let swipe = sqlx::query_as::<_, Swipe>(
        r#"
        SELECT id, swiper_id, swiped_id, category_id, action, swiped_at
        FROM swipes
        WHERE swiper_id = ? AND swiped_id = ? AND category_id = ?
        "#,
    )
    .bind(swiper_id)
    .bind(swiped_id)
    .bind(category_id)
    .fetch_optional(executor)
    .await?;

    Ok(swipe)
}

/// Whether `swiper_id` liked `swiped_id` in the category.
pub async fn has_liked<'e, E>(
    executor: E,
    swiper_id: i64,
    swiped_id: i64,
    category_id: i64,
) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let liked = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM swipes
            WHERE swiper_id = ? AND swiped_id = ? AND category_id = ? AND action = 'like'
        )
        "#,
    )
    .bind(swiper_id)
    .bind(swiped_id)
    .bind(category_id)
    .fetch_one(executor)
    .await?;

    Ok(liked)
}

/// IDs of every user `swiper_id` already swiped in the category.
pub async fn swiped_targets<'e, E>(executor: E, swiper_id: i64, category_id: i64) -> Result<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT swiped_id
        FROM swipes
        WHERE swiper_id = ? AND category_id = ?
        ORDER BY swiped_id
        "#,
    )
    .bind(swiper_id)
    .bind(category_id)
    .fetch_all(executor)
    .await?;

    Ok(ids)
}

/// A swiper's history, most recent first, optionally filtered. A negative
/// `limit` returns nothing.
pub async fn list_swipes<'e, E>(
    executor: E,
    swiper_id: i64,
    category_id: Option<i64>,
    action: Option<&str>,
    limit: i64,
) -> Result<Vec<Swipe>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let swipes = sqlx::query_as::<_, Swipe>(
        r#"
        SELECT id, swiper_id, swiped_id, category_id, action, swiped_at
        FROM swipes
        WHERE swiper_id = ?
          AND (? IS NULL OR category_id = ?)
          AND (? IS NULL OR action = ?)
        ORDER BY swiped_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(swiper_id)
    .bind(category_id)
    .bind(category_id)
    .bind(action)
    .bind(action)
    .bind(limit.max(0))
    .fetch_all(executor)
    .await?;

    Ok(swipes)
}

/// Number of swipes stored for a tuple (0 or 1).
pub async fn count_swipes<'e, E>(
    executor: E,
    swiper_id: i64,
    swiped_id: i64,
    category_id: i64,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM swipes
        WHERE swiper_id = ? AND swiped_id = ? AND category_id = ?
        "#,
    )
    .bind(swiper_id)
    .bind(swiped_id)
    .bind(category_id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}
