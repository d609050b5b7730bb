//! Visualization endpoints: generate, browse, rate, delete

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::analysis::DescriptionRequest;
use crate::db::{self, EvaluationRecord};
use crate::workflow::{self, GenerationOutcome};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct EvaluationListResponse {
    pub evaluations: Vec<EvaluationRecord>,
    pub unevaluated: i64,
}

#[derive(Debug, Serialize)]
pub struct EvaluationDetail {
    #[serde(flatten)]
    pub record: EvaluationRecord,
    pub image_base64: String,
    pub image_content_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    /// Paired remote entry to delete along with this one
    pub secondary_id: Option<i64>,
}

/// POST /api/visualizations
pub async fn create_visualization(
    State(state): State<AppState>,
    body: Result<Json<DescriptionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<GenerationOutcome>)> {
    let Json(request) = body?;
    let description = request.description.as_str().ok_or_else(|| {
        cow_common::Error::InvalidInput("Description must be text".to_string())
    })?;

    let outcome = workflow::generate(&state, description).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /api/visualizations
pub async fn list_visualizations(
    State(state): State<AppState>,
) -> ApiResult<Json<EvaluationListResponse>> {
    Ok(Json(EvaluationListResponse {
        evaluations: db::list_evaluations(&state.db).await?,
        unevaluated: db::unevaluated_count(&state.db).await?,
    }))
}

/// GET /api/visualizations/:id
pub async fn get_visualization(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EvaluationDetail>> {
    let found = db::get_evaluation_with_image(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Evaluation {}", id)))?;

    Ok(Json(EvaluationDetail {
        record: found.record,
        image_base64: STANDARD.encode(&found.image),
        image_content_type: image_content_type(&found.image),
    }))
}

/// GET /api/visualizations/:id/image
pub async fn get_visualization_image(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let found = db::get_evaluation_with_image(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Evaluation {}", id)))?;

    let content_type = image_content_type(&found.image);
    Ok(([(header::CONTENT_TYPE, content_type)], found.image).into_response())
}

/// POST /api/visualizations/:id/rating
pub async fn rate_visualization(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<RatingRequest>, JsonRejection>,
) -> ApiResult<Json<EvaluationRecord>> {
    let Json(request) = body?;
    db::save_rating(&state.db, id, request.rating, request.comment.as_deref()).await?;

    let found = db::get_evaluation_with_image(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Evaluation {}", id)))?;
    Ok(Json(found.record))
}

/// DELETE /api/visualizations/:id
pub async fn delete_visualization(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<StatusCode> {
    workflow::delete_generation(&state, id, query.secondary_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Content type from the image signature
///
/// Swatches are always PNG; the remote service may answer with JPEG.
fn image_content_type(bytes: &[u8]) -> &'static str {
    if crate::imagegen::is_png(bytes) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

pub fn visualization_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/visualizations",
            get(list_visualizations).post(create_visualization),
        )
        .route(
            "/api/visualizations/:id",
            get(get_visualization).delete(delete_visualization),
        )
        .route("/api/visualizations/:id/image", get(get_visualization_image))
        .route("/api/visualizations/:id/rating", post(rate_visualization))
}
