//! Evaluation store
//!
//! One row per rendered visualization. Experts rate rows afterwards; the
//! statistics feed the review page header.

use cow_common::params::WineVisualizationParameters;
use cow_common::time::now_rfc3339;
use cow_common::{Error, Result};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating
pub const MAX_RATING: i64 = 5;

/// Stored evaluation without its image
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    pub id: i64,
    pub created_at: String,
    pub wine_description: String,
    pub viz_params: WineVisualizationParameters,
    /// Which synthesizer produced the image (`swatch` or `remote`)
    pub renderer: String,
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub evaluated_at: Option<String>,
}

/// Stored evaluation including the image bytes
#[derive(Debug, Clone)]
pub struct EvaluationWithImage {
    pub record: EvaluationRecord,
    pub image: Vec<u8>,
}

/// Aggregate rating figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationStatistics {
    pub total: i64,
    pub evaluated: i64,
    pub unevaluated: i64,
    /// Mean rating rounded to two decimals, `None` until something is rated
    pub avg_rating: Option<f64>,
    /// Count per rating value, always containing keys 1 through 5
    pub rating_distribution: BTreeMap<i64, i64>,
}

/// Store a new visualization and return its id
pub async fn save_visualization(
    pool: &SqlitePool,
    description: &str,
    params: &WineVisualizationParameters,
    image: &[u8],
    renderer: &str,
) -> Result<i64> {
    let viz_params = serde_json::to_string(params)
        .map_err(|e| Error::Internal(format!("Failed to serialize parameters: {}", e)))?;

    let result = sqlx::query(
        r#"
        INSERT INTO evaluations (created_at, wine_description, viz_params, image_blob, renderer)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(now_rfc3339())
    .bind(description)
    .bind(viz_params)
    .bind(image)
    .bind(renderer)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    debug!(id, renderer, bytes = image.len(), "Saved visualization");
    Ok(id)
}

/// Record an expert rating
///
/// Blank comments are stored as NULL. Rating an entry again overwrites the
/// previous rating.
pub async fn save_rating(
    pool: &SqlitePool,
    id: i64,
    rating: i64,
    comment: Option<&str>,
) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(Error::InvalidInput(format!(
            "Rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )));
    }

    let comment = comment.filter(|c| !c.trim().is_empty());

    let result = sqlx::query(
        "UPDATE evaluations SET rating = ?, comment = ?, evaluated_at = ? WHERE id = ?",
    )
    .bind(rating)
    .bind(comment)
    .bind(now_rfc3339())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Evaluation {}", id)));
    }

    info!(id, rating, "Saved rating");
    Ok(())
}

/// All evaluations, newest first, without images
///
/// Rows whose stored parameters no longer parse or validate are skipped with
/// a warning.
pub async fn list_evaluations(pool: &SqlitePool) -> Result<Vec<EvaluationRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, created_at, wine_description, viz_params, renderer, rating, comment, evaluated_at
        FROM evaluations
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        match record_from_row(row) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping evaluation {}: {}", row.get::<i64, _>("id"), e),
        }
    }
    Ok(records)
}

/// One evaluation including its image, `None` if the id is unknown
pub async fn get_evaluation_with_image(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<EvaluationWithImage>> {
    let row = sqlx::query(
        r#"
        SELECT id, created_at, wine_description, viz_params, renderer, rating, comment,
               evaluated_at, image_blob
        FROM evaluations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(EvaluationWithImage {
            record: record_from_row(&row)?,
            image: row.get("image_blob"),
        })),
        None => Ok(None),
    }
}

/// Delete one evaluation
pub async fn delete_evaluation(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM evaluations WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Evaluation {}", id)));
    }

    info!(id, "Deleted evaluation");
    Ok(())
}

/// Number of evaluations without a rating
pub async fn unevaluated_count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evaluations WHERE rating IS NULL")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn statistics(pool: &SqlitePool) -> Result<EvaluationStatistics> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evaluations")
        .fetch_one(pool)
        .await?;

    let avg: Option<f64> =
        sqlx::query_scalar("SELECT AVG(rating) FROM evaluations WHERE rating IS NOT NULL")
            .fetch_one(pool)
            .await?;

    let mut rating_distribution: BTreeMap<i64, i64> =
        (MIN_RATING..=MAX_RATING).map(|r| (r, 0)).collect();

    let rows = sqlx::query(
        "SELECT rating, COUNT(*) AS n FROM evaluations WHERE rating IS NOT NULL GROUP BY rating",
    )
    .fetch_all(pool)
    .await?;
    for row in rows {
        rating_distribution.insert(row.get("rating"), row.get("n"));
    }

    let evaluated: i64 = rating_distribution.values().sum();

    Ok(EvaluationStatistics {
        total,
        evaluated,
        unevaluated: total - evaluated,
        avg_rating: avg.map(|a| (a * 100.0).round() / 100.0),
        rating_distribution,
    })
}

fn record_from_row(row: &SqliteRow) -> Result<EvaluationRecord> {
    let id: i64 = row.get("id");
    let raw: String = row.get("viz_params");

    let viz_params: WineVisualizationParameters = serde_json::from_str(&raw)
        .map_err(|e| Error::Internal(format!("Evaluation {} has unreadable parameters: {}", id, e)))?;
    viz_params
        .validate()
        .map_err(|e| Error::Internal(format!("Evaluation {} has invalid parameters: {}", id, e)))?;

    Ok(EvaluationRecord {
        id,
        created_at: row.get("created_at"),
        wine_description: row.get("wine_description"),
        viz_params,
        renderer: row.get("renderer"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        evaluated_at: row.get("evaluated_at"),
    })
}
