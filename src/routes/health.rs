use axum::{routing::get, Router};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> &'static str {
    info!("GET /health - Health check");
    "OK"
}
