//! Database initialization
//!
//! Opens (or creates) the SQLite database and brings the schema up to date.
//! Every step is idempotent, so it is safe to run on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::Path;
use tracing::info;

/// Current schema version recorded in `schema_version`
pub const SCHEMA_VERSION: i64 = 2;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets the review UI read while a generation is being written
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and apply column migrations
///
/// Split out from [`init_database`] so tests can run it against `:memory:`.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_evaluations_table(pool).await?;
    add_missing_evaluation_columns(pool).await?;
    record_schema_version(pool).await?;
    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the evaluations table
///
/// One row per rendered visualization: the description, the extracted
/// parameters as JSON, the image, and the expert rating once given.
pub async fn create_evaluations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS evaluations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL,
            wine_description TEXT NOT NULL,
            viz_params TEXT NOT NULL,
            image_blob BLOB NOT NULL,
            renderer TEXT NOT NULL DEFAULT 'swatch',
            rating INTEGER CHECK(rating >= 1 AND rating <= 5),
            comment TEXT,
            evaluated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_evaluations_created_at ON evaluations(created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Add columns introduced after version 1
///
/// Databases written by the first version of the tool have no `renderer`
/// column; every existing row came from the primary renderer.
async fn add_missing_evaluation_columns(pool: &SqlitePool) -> Result<()> {
    let columns: Vec<String> = sqlx::query("PRAGMA table_info(evaluations)")
        .fetch_all(pool)
        .await?
        .iter()
        .map(|row| row.get::<String, _>(1))
        .collect();

    if !columns.iter().any(|c| c == "renderer") {
        sqlx::query("ALTER TABLE evaluations ADD COLUMN renderer TEXT NOT NULL DEFAULT 'swatch'")
            .execute(pool)
            .await?;
        info!("Added column evaluations.renderer");
    }

    Ok(())
}

async fn record_schema_version(pool: &SqlitePool) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = memory_pool().await;
        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();

        let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_version")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[tokio::test]
    async fn test_legacy_table_gains_renderer_column() {
        let pool = memory_pool().await;
        sqlx::query(
            r#"
            CREATE TABLE evaluations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL,
                wine_description TEXT NOT NULL,
                viz_params TEXT NOT NULL,
                image_blob BLOB NOT NULL,
                rating INTEGER CHECK(rating >= 1 AND rating <= 5),
                comment TEXT,
                evaluated_at TEXT
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO evaluations (created_at, wine_description, viz_params, image_blob) \
             VALUES ('2024-01-01T00:00:00', 'alt', '{}', x'00')",
        )
        .execute(&pool)
        .await
        .unwrap();

        init_schema(&pool).await.unwrap();

        let renderer: String = sqlx::query_scalar("SELECT renderer FROM evaluations WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(renderer, "swatch");
    }

    #[tokio::test]
    async fn test_rating_check_constraint() {
        let pool = memory_pool().await;
        init_schema(&pool).await.unwrap();

        let result = sqlx::query(
            "INSERT INTO evaluations (created_at, wine_description, viz_params, image_blob, rating) \
             VALUES ('t', 'd', '{}', x'00', 6)",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err(), "rating 6 must violate the CHECK constraint");
    }
}
