//! Database initialization
//!
//! Opens (or creates) the SQLite database and applies the schema. Every
//! statement is idempotent, so initialization runs on each startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets concurrent requests read while one writes
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// In-memory SQLite is per-connection, so the pool is pinned to one
/// connection.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    create_search_results_table(pool).await?;
    create_audio_searches_table(pool).await?;
    create_audio_search_results_table(pool).await?;

    info!("Database tables initialized (search_results, audio_searches, audio_search_results)");

    Ok(())
}

async fn create_search_results_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_results (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            platform TEXT NOT NULL DEFAULT 'YouTube',
            url TEXT NOT NULL CHECK (length(url) > 0),
            thumbnail_url TEXT,
            duration TEXT,
            channel_name TEXT,
            view_count TEXT,
            netflix_url TEXT,
            prime_url TEXT,
            hulu_url TEXT,
            disney_url TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_search_results_created_at ON search_results(created_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_audio_searches_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audio_searches (
            id TEXT PRIMARY KEY,
            audio_file TEXT NOT NULL,
            is_processed INTEGER NOT NULL DEFAULT 0,
            processing_time REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_audio_searches_created_at ON audio_searches(created_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Many-to-many link between searches and results
async fn create_audio_search_results_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audio_search_results (
            search_id TEXT NOT NULL REFERENCES audio_searches(id) ON DELETE CASCADE,
            result_id TEXT NOT NULL REFERENCES search_results(id) ON DELETE CASCADE,
            PRIMARY KEY (search_id, result_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
