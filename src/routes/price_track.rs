use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::PriceTrackResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PriceTrackParams {
    pub url: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/price-track", get(track_price))
}

pub async fn track_price(
    Query(params): Query<PriceTrackParams>,
    State(state): State<AppState>,
) -> Result<Json<PriceTrackResponse>, AppError> {
    info!("GET /price-track - Tracking {}", params.url);
    let today = Utc::now().date_naive();
    let response = state.tracker.track(&params.url, today).await?;
    Ok(Json(response))
}
