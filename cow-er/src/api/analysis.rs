//! Stateless analysis endpoints
//!
//! Run the extraction engine without rendering or storing anything, and
//! expose the keyword lexicons it matches against.

use axum::extract::rejection::JsonRejection;
use axum::{routing::get, routing::post, Json, Router};
use cow_common::extract::extract_value;
use cow_common::lexicon;
use cow_common::params::WineVisualizationParameters;
use serde::{Deserialize, Serialize};

use crate::{ApiResult, AppState};

/// Request body carrying a description
///
/// `description` is any JSON value so that non-text input reaches the engine
/// boundary and is reported as invalid input rather than a parse failure.
#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    #[serde(default)]
    pub description: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct KeywordGroupResponse {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// POST /api/extract
pub async fn extract_parameters(
    body: Result<Json<DescriptionRequest>, JsonRejection>,
) -> ApiResult<Json<WineVisualizationParameters>> {
    let Json(request) = body?;
    Ok(Json(extract_value(&request.description)?))
}

/// GET /api/lexicon
pub async fn get_lexicon() -> Json<Vec<KeywordGroupResponse>> {
    Json(
        lexicon::all()
            .iter()
            .map(|g| KeywordGroupResponse {
                name: g.name,
                keywords: g.keywords,
            })
            .collect(),
    )
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/api/extract", post(extract_parameters))
        .route("/api/lexicon", get(get_lexicon))
}
