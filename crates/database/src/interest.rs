//! Interests and the user/interest link table.

use sqlx::{Executor, Sqlite};

use crate::error::{DatabaseError, Result};
use crate::models::Interest;

/// Create a new interest.
pub async fn create_interest<'e, E>(executor: E, name: &str) -> Result<Interest>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO interests (name)
        VALUES (?)
        "#,
    )
    .bind(name)
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::unique_or(e, "Interest", name))?;

    Ok(Interest {
        id: result.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Attach an interest to a user. Attaching twice is a no-op.
pub async fn add_user_interest<'e, E>(executor: E, user_id: i64, interest_id: i64) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO user_interests (user_id, interest_id)
        VALUES (?, ?)
        ON CONFLICT(user_id, interest_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(interest_id)
    .execute(executor)
    .await?;

    Ok(())
}

/// Detach an interest from a user.
pub async fn remove_user_interest<'e, E>(
    executor: E,
    user_id: i64,
    interest_id: i64,
) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM user_interests
        WHERE user_id = ? AND interest_id = ?
        "#,
    )
    .bind(user_id)
    .bind(interest_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// IDs of the interests a user declared.
pub async fn interest_ids_for_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT interest_id
        FROM user_interests
        WHERE user_id = ?
        ORDER BY interest_id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed, test_db};

    #[tokio::test]
    async fn test_user_interests() {
        let db = test_db().await;
        seed(&db, &[1]).await;

        let music = create_interest(db.pool(), "Music").await.unwrap();
        let chess = create_interest(db.pool(), "Chess").await.unwrap();

        add_user_interest(db.pool(), 1, music.id).await.unwrap();
        add_user_interest(db.pool(), 1, chess.id).await.unwrap();
        add_user_interest(db.pool(), 1, chess.id).await.unwrap();

        let mut expected = vec![music.id, chess.id];
        expected.sort();
        assert_eq!(interest_ids_for_user(db.pool(), 1).await.unwrap(), expected);

        assert!(remove_user_interest(db.pool(), 1, music.id).await.unwrap());
        assert!(!remove_user_interest(db.pool(), 1, music.id).await.unwrap());
        assert_eq!(interest_ids_for_user(db.pool(), 1).await.unwrap(), vec![chess.id]);
    }

    #[tokio::test]
    async fn test_duplicate_interest_rejected() {
        let db = test_db().await;
        create_interest(db.pool(), "Music").await.unwrap();

        let result = create_interest(db.pool(), "Music").await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_interests() {
        let db = test_db().await;
        assert!(interest_ids_for_user(db.pool(), 42).await.unwrap().is_empty());
    }
}
