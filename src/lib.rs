// Public API for integration tests and potential library usage

pub mod api;
pub mod config;
pub mod edge;
pub mod error;
pub mod game;
pub mod hardware;
pub mod leaderboard;
pub mod protocol;
pub mod runtime;
pub mod state;
pub mod types;
pub mod ws;

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Build the HTTP router: WebSocket channel, API, and the viewer page
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/api/health", get(api::health))
        .route("/api/trigger", get(api::get_trigger))
        .route("/api/trigger/press", post(api::press_trigger))
        .route("/api/trigger/release", post(api::release_trigger))
        .route("/api/indicator", get(api::get_indicator));

    Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(api_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
