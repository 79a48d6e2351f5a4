//! Connection store storage.

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use crate::error::{DatabaseError, Result};
use crate::models::{Connection, NewConnection};

/// Insert a connection.
///
/// Fails with [`DatabaseError::AlreadyExists`] when the pair already has a
/// connection in this category. Callers that want insert-or-fetch catch that
/// and re-read with [`find_between`].
pub async fn create_connection<'e, E>(executor: E, new: &NewConnection) -> Result<Connection>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO connections
            (low_user_id, high_user_id, category_id, status, match_score, connected_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.low_user_id)
    .bind(new.high_user_id)
    .bind(new.category_id)
    .bind(&new.status)
    .bind(new.match_score)
    .bind(new.connected_at)
    .bind(new.connected_at)
    .execute(executor)
    .await
    .map_err(|e| {
        DatabaseError::unique_or(
            e,
            "Connection",
            format!(
                "{}/{} in category {}",
                new.low_user_id, new.high_user_id, new.category_id
            ),
        )
    })?;

    Ok(Connection {
        id: result.last_insert_rowid(),
        low_user_id: new.low_user_id,
        high_user_id: new.high_user_id,
        category_id: new.category_id,
        status: new.status.clone(),
        match_score: new.match_score,
        connected_at: new.connected_at,
        updated_at: new.connected_at,
    })
}

/// Get a connection by ID.
pub async fn get_connection<'e, E>(executor: E, id: i64) -> Result<Connection>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Connection>(
        r#"
        SELECT id, low_user_id, high_user_id, category_id, status, match_score,
               connected_at, updated_at
        FROM connections
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Connection",
        id: id.to_string(),
    })
}

/// Get the connection for a canonical pair in a category, if any.
pub async fn find_between<'e, E>(
    executor: E,
    low_user_id: i64,
    high_user_id: i64,
    category_id: i64,
) -> Result<Option<Connection>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let connection = sqlx::query_as::<_, Connection>(
        r#"
        SELECT id, low_user_id, high_user_id, category_id, status, match_score,
               connected_at, updated_at
        FROM connections
        WHERE low_user_id = ? AND high_user_id = ? AND category_id = ?
        "#,
    )
    .bind(low_user_id)
    .bind(high_user_id)
    .bind(category_id)
    .fetch_optional(executor)
    .await?;

    Ok(connection)
}

/// Whether a canonical pair has a connection, in one category or any.
pub async fn exists_between<'e, E>(
    executor: E,
    low_user_id: i64,
    high_user_id: i64,
    category_id: Option<i64>,
) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM connections
            WHERE low_user_id = ? AND high_user_id = ?
              AND (? IS NULL OR category_id = ?)
        )
        "#,
    )
    .bind(low_user_id)
    .bind(high_user_id)
    .bind(category_id)
    .bind(category_id)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}

/// Set the status of a connection on behalf of a participant.
///
/// Only rows where `participant_id` is one of the two users are touched;
/// `updated_at` moves only when the status actually changes. Returns the
/// number of rows matched (0 or 1); SQLite counts a row as matched even when
/// the new status equals the old one.
pub async fn update_status_as_participant<'e, E>(
    executor: E,
    id: i64,
    participant_id: i64,
    status: &str,
    now: DateTime<Utc>,
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE connections
        SET status = ?,
            updated_at = CASE WHEN status = ? THEN updated_at ELSE ? END
        WHERE id = ? AND (low_user_id = ? OR high_user_id = ?)
        "#,
    )
    .bind(status)
    .bind(status)
    .bind(now)
    .bind(id)
    .bind(participant_id)
    .bind(participant_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Connections involving a user, most recent first, optionally filtered.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: i64,
    category_id: Option<i64>,
    status: Option<&str>,
) -> Result<Vec<Connection>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let connections = sqlx::query_as::<_, Connection>(
        r#"
        SELECT id, low_user_id, high_user_id, category_id, status, match_score,
               connected_at, updated_at
        FROM connections
        WHERE (low_user_id = ? OR high_user_id = ?)
          AND (? IS NULL OR category_id = ?)
          AND (? IS NULL OR status = ?)
        ORDER BY connected_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .bind(category_id)
    .bind(category_id)
    .bind(status)
    .bind(status)
    .fetch_all(executor)
    .await?;

    Ok(connections)
}

/// Accepted connections of a user scoring at least `min_score`, best first.
/// A negative `limit` returns nothing.
pub async fn list_top_scored<'e, E>(
    executor: E,
    user_id: i64,
    min_score: f64,
    limit: i64,
) -> Result<Vec<Connection>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let connections = sqlx::query_as::<_, Connection>(
        r#"
        SELECT id, low_user_id, high_user_id, category_id, status, match_score,
               connected_at, updated_at
        FROM connections
        WHERE (low_user_id = ? OR high_user_id = ?)
          AND status = 'accepted'
          AND match_score >= ?
        ORDER BY match_score DESC, connected_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .bind(min_score)
    .bind(limit.max(0))
    .fetch_all(executor)
    .await?;

    Ok(connections)
}
