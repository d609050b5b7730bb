//! Tests for database initialization against real files

use cow_common::db::{init_database, SCHEMA_VERSION};

#[tokio::test]
async fn test_database_creation_when_missing() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("sub").join("cow.db");

    let pool = init_database(&db_path).await.unwrap();
    assert!(db_path.exists(), "Database file was not created");

    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert!(tables.contains(&"evaluations".to_string()));
    assert!(tables.contains(&"schema_version".to_string()));
}

#[tokio::test]
async fn test_database_opens_existing() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("cow.db");

    let pool = init_database(&db_path).await.unwrap();
    sqlx::query(
        "INSERT INTO evaluations (created_at, wine_description, viz_params, image_blob) \
         VALUES ('2024-05-01T10:00:00.000000Z', 'Riesling', '{}', x'89504E47')",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evaluations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1, "Existing rows must survive re-initialization");
}

#[tokio::test]
async fn test_wal_mode_enabled() {
    let temp = tempfile::tempdir().unwrap();
    let pool = init_database(&temp.path().join("cow.db")).await.unwrap();

    let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[tokio::test]
async fn test_schema_version_recorded() {
    let temp = tempfile::tempdir().unwrap();
    let pool = init_database(&temp.path().join("cow.db")).await.unwrap();

    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}
