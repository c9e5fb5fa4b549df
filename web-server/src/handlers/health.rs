//! Health check handler

use axum::{extract::State, Json};
use dropout_risk_core::constants::APP_VERSION;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    core_version: &'static str,
    profile: String,
    features: usize,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        core_version: APP_VERSION,
        profile: state.context.options().profile.to_string(),
        features: state.context.schema().len(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
