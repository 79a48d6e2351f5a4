//! SQLite persistence layer for the swipe-to-match backend.
//!
//! This crate provides async database operations for the user/category
//! directory, the swipe ledger and the connection store using SQLx with
//! SQLite. Every operation is a free function over an executor, so callers
//! can run it against the pool or inside an open transaction.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use database::{category, swipe, user, Database, NewUser};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:hitme.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     user::create_user(db.pool(), &NewUser::verified(1, "Alice")).await?;
//!     user::create_user(db.pool(), &NewUser::verified(2, "Bob")).await?;
//!     let friends = category::create_category(db.pool(), "Friends", "friends").await?;
//!
//!     swipe::insert_swipe(db.pool(), 1, 2, friends.id, "like", Utc::now()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod category;
pub mod connection;
pub mod error;
pub mod interest;
pub mod models;
pub mod swipe;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{Category, Connection, Interest, NewConnection, NewUser, Swipe, User};

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

pub use sqlx::SqliteConnection;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    pub const DEFAULT_POOL_SIZE: u32 = 20;

    /// How long a writer waits on a locked database before failing.
    const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/hitme.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Self::BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a transaction.
    ///
    /// Dropping the transaction without committing rolls it back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Check that the database answers a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    /// Seed users `ids` (all verified) and one category, returning its id.
    pub async fn seed(db: &Database, ids: &[i64]) -> i64 {
        for &id in ids {
            user::create_user(db.pool(), &NewUser::verified(id, &format!("user-{}", id)))
                .await
                .unwrap();
        }
        category::create_category(db.pool(), "Friends", "friends")
            .await
            .unwrap()
            .id
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{seed, test_db};
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_rolled_back_transaction_leaves_no_rows() {
        let db = test_db().await;
        let friends = seed(&db, &[1, 2]).await;

        {
            let mut tx = db.begin().await.unwrap();
            swipe::insert_swipe(&mut *tx, 1, 2, friends, "like", Utc::now())
                .await
                .unwrap();
            // dropped without commit
        }

        assert!(!swipe::has_liked(db.pool(), 1, 2, friends).await.unwrap());
    }

    #[tokio::test]
    async fn test_ping_fails_after_close() {
        let db = test_db().await;
        db.ping().await.unwrap();

        db.close().await;
        assert!(db.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_deleting_user_cascades() {
        let db = test_db().await;
        let friends = seed(&db, &[1, 2]).await;
        let now = Utc::now();

        swipe::insert_swipe(db.pool(), 1, 2, friends, "like", now).await.unwrap();
        connection::create_connection(
            db.pool(),
            &NewConnection {
                low_user_id: 1,
                high_user_id: 2,
                category_id: friends,
                status: "accepted".to_string(),
                match_score: Some(0.5),
                connected_at: now,
            },
        )
        .await
        .unwrap();

        user::delete_user(db.pool(), 2).await.unwrap();

        assert!(!swipe::has_liked(db.pool(), 1, 2, friends).await.unwrap());
        assert!(connection::find_between(db.pool(), 1, 2, friends)
            .await
            .unwrap()
            .is_none());
    }
}
