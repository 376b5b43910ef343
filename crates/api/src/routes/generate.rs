use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, info, warn};

use chart::prepare_chart;

use crate::error::{ApiError, ApiJson};
use crate::request::{ChartRequest, ChartResponse};
use crate::AppState;

pub fn chart_router() -> Router<AppState> {
    Router::new().route("/chart/generate", post(generate_chart))
}

/// Compute the display window, indicator bands and signal overlays for one
/// chart and return them as JSON.
async fn generate_chart(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChartRequest>,
) -> Result<Json<ChartResponse>, ApiError> {
    let symbol = request.symbol.clone();
    info!(symbol = %symbol, rows = request.data.len(), "Generating chart");

    let input = request.into_input(state.defaults).map_err(|e| {
        warn!(symbol = %symbol, error = %e, "Rejected chart request");
        e
    })?;
    let display = state.display;

    // O(n) over the candles, but keep it off the async workers for big payloads
    let chart = tokio::task::spawn_blocking(move || prepare_chart(&input, &display))
        .await
        .map_err(|e| {
            error!(symbol = %symbol, error = %e, "Chart task failed");
            ApiError::internal("Failed to generate chart")
        })??;

    info!(symbol = %symbol, "Successfully generated chart");
    Ok(Json(ChartResponse {
        success: true,
        chart,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }))
}
