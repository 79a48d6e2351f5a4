//! Category catalog operations.

use sqlx::{Executor, Sqlite};

use crate::error::{DatabaseError, Result};
use crate::models::Category;

/// Create a new active category.
pub async fn create_category<'e, E>(executor: E, name: &str, slug: &str) -> Result<Category>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO categories (name, slug)
        VALUES (?, ?)
        "#,
    )
    .bind(name)
    .bind(slug)
    .execute(executor)
    .await
    .map_err(|e| DatabaseError::unique_or(e, "Category", slug))?;

    Ok(Category {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        slug: slug.to_string(),
        is_active: true,
        sort_order: 0,
    })
}

/// Get a category by ID.
pub async fn get_category<'e, E>(executor: E, id: i64) -> Result<Category>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, slug, is_active, sort_order
        FROM categories
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Category",
        id: id.to_string(),
    })
}

/// Get a category by slug.
pub async fn get_category_by_slug<'e, E>(executor: E, slug: &str) -> Result<Category>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, slug, is_active, sort_order
        FROM categories
        WHERE slug = ?
        "#,
    )
    .bind(slug)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Category",
        id: slug.to_string(),
    })
}

/// Whether an active category with this ID exists.
pub async fn is_active<'e, E>(executor: E, id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let active = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM categories WHERE id = ? AND is_active = 1)
        "#,
    )
    .bind(id)
    .fetch_one(executor)
    .await?;

    Ok(active)
}

/// Open or close a category for swiping.
pub async fn set_active<'e, E>(executor: E, id: i64, active: bool) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE categories
        SET is_active = ?
        WHERE id = ?
        "#,
    )
    .bind(active)
    .bind(id)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Category",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List active categories in display order.
pub async fn list_active_categories<'e, E>(executor: E) -> Result<Vec<Category>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, slug, is_active, sort_order
        FROM categories
        WHERE is_active = 1
        ORDER BY sort_order, name
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    #[tokio::test]
    async fn test_category_lookup() {
        let db = test_db().await;

        let friends = create_category(db.pool(), "Friends", "friends").await.unwrap();
        let jobs = create_category(db.pool(), "Jobs", "jobs").await.unwrap();

        assert_eq!(get_category(db.pool(), friends.id).await.unwrap(), friends);
        assert_eq!(get_category_by_slug(db.pool(), "jobs").await.unwrap(), jobs);
        assert!(matches!(
            get_category_by_slug(db.pool(), "dating").await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            create_category(db.pool(), "Friends 2", "friends").await,
            Err(DatabaseError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_inactive_categories_are_hidden() {
        let db = test_db().await;

        let friends = create_category(db.pool(), "Friends", "friends").await.unwrap();
        let jobs = create_category(db.pool(), "Jobs", "jobs").await.unwrap();
        assert!(is_active(db.pool(), jobs.id).await.unwrap());

        set_active(db.pool(), jobs.id, false).await.unwrap();

        assert!(!is_active(db.pool(), jobs.id).await.unwrap());
        assert!(!is_active(db.pool(), 999).await.unwrap());
        let listed = list_active_categories(db.pool()).await.unwrap();
        assert_eq!(listed, vec![friends]);
    }
}
