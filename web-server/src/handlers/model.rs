//! Loaded model description

use axum::{extract::State, Json};
use dropout_risk_core::ContextInfo;

use crate::AppState;

/// Model name, feature layout, thresholds and artifact digests
pub async fn info(State(state): State<AppState>) -> Json<ContextInfo> {
    Json(state.context.info())
}
