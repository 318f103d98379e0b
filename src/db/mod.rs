//! Database module for SQLite persistence.
//!
//! Each collection (feedback, queries, reviews, ratings) is a flat table with
//! no foreign keys between them.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and create the tables.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Create tables and indexes if they don't exist.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feedbacks (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            feedback TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS queries (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            query TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            comment TEXT NOT NULL,
            date_published TEXT NOT NULL,
            language TEXT NOT NULL DEFAULT 'en-IN',
            user_id TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    // user_id is the upsert key
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ratings (
            user_id TEXT PRIMARY KEY,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_feedbacks_created_at ON feedbacks(created_at);
        CREATE INDEX IF NOT EXISTS idx_queries_created_at ON queries(created_at);
        CREATE INDEX IF NOT EXISTS idx_reviews_date_published ON reviews(date_published);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
