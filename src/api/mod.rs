mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::engine::AstroEngine;

/// The engine handle shared across request handlers.
pub type SharedEngine = Arc<dyn AstroEngine>;

pub fn create_router(engine: SharedEngine) -> Router {
    let api = Router::new()
        .route("/chart", post(handlers::generate_chart))
        .route("/chart/svg", post(handlers::generate_chart_svg))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(engine)
}
