use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::models::ProductSearchResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductSearchParams {
    #[serde(default)]
    pub query: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/product-search", get(search_products))
}

pub async fn search_products(
    Query(params): Query<ProductSearchParams>,
    State(state): State<AppState>,
) -> Json<ProductSearchResponse> {
    let query = params.query.trim();
    info!("GET /product-search - Searching offers for '{}'", query);

    // Nothing to search for; still report which providers are configured
    if query.is_empty() {
        return Json(ProductSearchResponse {
            query: String::new(),
            results: Vec::new(),
            sources: state.aggregator.sources(),
        });
    }

    Json(state.aggregator.search(query).await)
}
