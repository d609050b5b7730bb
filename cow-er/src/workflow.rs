//! Generation workflow
//!
//! One "generation" is a description rendered by the primary synthesizer and,
//! when configured, by the remote service. The primary path must succeed; the
//! remote path is best-effort and only logs its failures.

use cow_common::extract;
use cow_common::params::WineVisualizationParameters;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::evaluations;
use crate::remote::REMOTE_RENDERER;
use crate::{ApiError, ApiResult, AppState};

/// Ids and parameters of one generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub primary_id: i64,
    /// Set only when the remote renderer produced and stored an image
    pub secondary_id: Option<i64>,
    pub params: WineVisualizationParameters,
}

/// Extract, render, and store a description
pub async fn generate(state: &AppState, description: &str) -> ApiResult<GenerationOutcome> {
    if description.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Description must not be blank".to_string(),
        ));
    }

    let params = extract(description);

    let synthesizer = state.synthesizer.clone();
    let renderer = synthesizer.name();
    let size = state.image_size;
    let render_params = params.clone();
    let image = tokio::task::spawn_blocking(move || synthesizer.render(&render_params, size))
        .await
        .map_err(|e| ApiError::Internal(format!("Render task failed: {}", e)))??;

    let primary_id =
        evaluations::save_visualization(&state.db, description, &params, &image, renderer).await?;

    let secondary_id = match &state.remote {
        Some(remote) => match remote.generate(description).await {
            Ok(image) => {
                match evaluations::save_visualization(
                    &state.db,
                    description,
                    &params,
                    &image,
                    REMOTE_RENDERER,
                )
                .await
                {
                    Ok(id) => Some(id),
                    Err(e) => {
                        warn!("Failed to store remote image: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                warn!("Remote image generation failed: {}", e);
                None
            }
        },
        None => None,
    };

    info!(
        primary_id,
        secondary_id = ?secondary_id,
        wine_type = %params.wine_type,
        "Generated visualization"
    );

    Ok(GenerationOutcome {
        primary_id,
        secondary_id,
        params,
    })
}

/// Delete both entries of a generation
///
/// The primary entry must exist. A secondary entry that is already gone is
/// logged and ignored.
pub async fn delete_generation(
    state: &AppState,
    primary_id: i64,
    secondary_id: Option<i64>,
) -> ApiResult<()> {
    evaluations::delete_evaluation(&state.db, primary_id).await?;

    if let Some(id) = secondary_id {
        match evaluations::delete_evaluation(&state.db, id).await {
            Ok(()) => {}
            Err(cow_common::Error::NotFound(_)) => {
                warn!("Secondary evaluation {} was already deleted", id)
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_state() -> AppState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        cow_common::db::init_schema(&pool).await.unwrap();
        AppState::new(pool).with_image_size(64)
    }

    #[tokio::test]
    async fn test_blank_description_rejected() {
        let state = setup_state().await;
        for blank in ["", "   ", "\n\t"] {
            let err = generate(&state, blank).await.unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)));
        }
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evaluations")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_generate_without_remote() {
        let state = setup_state().await;
        let outcome = generate(&state, "Pinot Noir, Kirsche").await.unwrap();

        assert!(outcome.secondary_id.is_none());
        assert_eq!(outcome.params.base_color_hex, "#8A3050");

        let stored = evaluations::get_evaluation_with_image(&state.db, outcome.primary_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.record.renderer, "swatch");
        assert!(crate::imagegen::is_png(&stored.image));
    }

    #[tokio::test]
    async fn test_delete_generation_tolerates_missing_secondary() {
        let state = setup_state().await;
        let outcome = generate(&state, "Riesling").await.unwrap();

        delete_generation(&state, outcome.primary_id, Some(12345)).await.unwrap();
        assert!(evaluations::get_evaluation_with_image(&state.db, outcome.primary_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_generation_missing_primary() {
        let state = setup_state().await;
        let err = delete_generation(&state, 1, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Common(cow_common::Error::NotFound(_))));
    }
}
