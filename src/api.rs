//! HTTP API endpoints.
//!
//! Besides a health probe, these drive the simulated trigger and expose the
//! simulated indicator, standing in for the physical pins.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::hardware::TriggerInput;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorResponse {
    pub lit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriggerResponse {
    pub pressed: bool,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// POST /api/trigger/press
pub async fn press_trigger(State(state): State<Arc<AppState>>) -> StatusCode {
    tracing::debug!("Simulated trigger pressed");
    state.panel.press();
    StatusCode::NO_CONTENT
}

/// POST /api/trigger/release
pub async fn release_trigger(State(state): State<Arc<AppState>>) -> StatusCode {
    tracing::debug!("Simulated trigger released");
    state.panel.release();
    StatusCode::NO_CONTENT
}

/// GET /api/trigger
pub async fn get_trigger(State(state): State<Arc<AppState>>) -> Json<TriggerResponse> {
    Json(TriggerResponse {
        pressed: state.panel.is_pressed(),
    })
}

/// GET /api/indicator
pub async fn get_indicator(State(state): State<Arc<AppState>>) -> Json<IndicatorResponse> {
    Json(IndicatorResponse {
        lit: state.panel.is_lit(),
    })
}
