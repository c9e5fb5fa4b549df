//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dropout_risk_core::ScoringError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Validation errors
    ValidationError(String),

    // Feature vector could not be assembled for the model
    FeatureError(String),

    // Model failed to produce a probability
    PredictionError(String),

    // Generic errors
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::FeatureError(_)
            | AppError::PredictionError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user. Scoring failures are shown as-is.
    pub fn message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::FeatureError(msg) => format!("Feature error: {}", msg),
            AppError::PredictionError(msg) => format!("Prediction failed: {}", msg),
            AppError::InternalError(_) => "Internal server error".to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg) => tracing::debug!("Validation error: {}", msg),
            AppError::FeatureError(msg) => tracing::error!("Feature error: {}", msg),
            AppError::PredictionError(msg) => tracing::error!("Prediction error: {}", msg),
            AppError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();

        let body = Json(json!({
            "error": self.message(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Feature(_) | ScoringError::Unfilled(_) => AppError::FeatureError(err.to_string()),
            ScoringError::Inference(_) => AppError::PredictionError(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(err.to_string())
    }
}
