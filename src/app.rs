use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{health, price_track, product_search};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    // The browser client is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .merge(health::router())
        .merge(price_track::router())
        .merge(product_search::router())
        .layer(cors)
        .with_state(state)
}
