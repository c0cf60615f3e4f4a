pub mod api_routes;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::service::relay_service::RelayService;
use api_routes::{gemini_handler, history_handler};

pub fn router(svc: RelayService) -> Router {
    Router::new()
        .route("/api/gemini", post(gemini_handler))
        .route("/api/history", get(history_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(svc)
}
