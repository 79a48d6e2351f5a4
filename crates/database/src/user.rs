//! User directory operations.

use sqlx::{Executor, Sqlite};

use crate::error::{DatabaseError, Result};
use crate::models::{NewUser, User};

/// Create a new user.
pub async fn create_user<'e, E>(executor: E, user: &NewUser) -> Result<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO users (id, name, verification_status)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.verification_status)
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::unique_or(e, "User", user.id.to_string()))?;

    Ok(User {
        id: user.id,
        name: user.name.clone(),
        verification_status: user.verification_status.clone(),
    })
}

/// Get a user by ID.
pub async fn get_user<'e, E>(executor: E, id: i64) -> Result<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    find_user(executor, id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        })
}

/// Get a user by ID, if present.
pub async fn find_user<'e, E>(executor: E, id: i64) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, verification_status
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

/// Set a user's verification status.
pub async fn set_verification_status<'e, E>(executor: E, id: i64, status: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE users
        SET verification_status = ?
        WHERE id = ?
        "#,
    )
    .bind(status)
    .bind(id)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Delete a user by ID.
///
/// Their swipes, connections and interest links are removed by cascade.
pub async fn delete_user<'e, E>(executor: E, id: i64) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn test_user_crud() {
        let db = test_db().await;

        // Create
        let user = create_user(db.pool(), &NewUser::pending(7, "Alice"))
            .await
            .unwrap();
        assert!(!user.is_eligible());

        // Read
        let fetched = get_user(db.pool(), 7).await.unwrap();
        assert_eq!(fetched.name, "Alice");

        // Verify
        set_verification_status(db.pool(), 7, "verified").await.unwrap();
        assert!(get_user(db.pool(), 7).await.unwrap().is_eligible());

        // Delete
        delete_user(db.pool(), 7).await.unwrap();
        let result = get_user(db.pool(), 7).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_user_rejected() {
        let db = test_db().await;
        create_user(db.pool(), &NewUser::verified(1, "Alice")).await.unwrap();

        let result = create_user(db.pool(), &NewUser::verified(1, "Alice again")).await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_unknown_verification_status_rejected() {
        let db = test_db().await;
        create_user(db.pool(), &NewUser::pending(1, "Alice")).await.unwrap();

        let result = set_verification_status(db.pool(), 1, "maybe").await;
        assert!(matches!(result, Err(DatabaseError::Sqlx(_))));
        assert!(matches!(
            set_verification_status(db.pool(), 99, "verified").await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
