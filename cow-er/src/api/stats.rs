//! Rating statistics endpoint

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{self, EvaluationStatistics};
use crate::{ApiResult, AppState};

/// GET /api/statistics
pub async fn get_statistics(State(state): State<AppState>) -> ApiResult<Json<EvaluationStatistics>> {
    Ok(Json(db::statistics(&state.db).await?))
}

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/api/statistics", get(get_statistics))
}
