//! Prediction handlers
//!
//! Scoring is synchronous (ONNX session behind a mutex), so it runs on the
//! blocking pool.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use dropout_risk_core::{Assessment, FeatureProfile, RawInput, ScoringContext};

use crate::models::PredictForm;
use crate::view;
use crate::{AppError, AppResult, AppState};

async fn score(context: Arc<ScoringContext>, input: RawInput) -> AppResult<Assessment> {
    let assessment = tokio::task::spawn_blocking(move || context.score(&input)).await??;
    Ok(assessment)
}

/// Empty form with default values
pub async fn form_page(State(state): State<AppState>) -> Html<String> {
    let form = PredictForm::from(&RawInput::default());
    Html(view::form_page(&form, state.config.profile))
}

/// Form submission, answers with the same page plus the result
pub async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> Response {
    let profile = state.config.profile;

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("Form rejected: {}", rejection.body_text());
            let message = format!("Data formulir tidak valid: {}", rejection.body_text());
            let blank = PredictForm::from(&RawInput::default());
            return (rejection.status(), Html(view::error_page(Some(&blank), profile, &message)))
                .into_response();
        }
    };

    let result = match form.clone().into_input() {
        Ok(input) => score(state.context.clone(), input).await,
        Err(errors) => Err(AppError::from(errors)),
    };

    match result {
        Ok(assessment) => Html(view::result_page(&form, profile, &assessment)).into_response(),
        Err(err) => page_error(&form, profile, err),
    }
}

fn page_error(form: &PredictForm, profile: FeatureProfile, err: AppError) -> Response {
    let status: StatusCode = err.status();
    match &err {
        AppError::ValidationError(msg) => tracing::debug!("Form rejected: {}", msg),
        _ => tracing::error!("Form scoring failed: {:?}", err),
    }
    (status, Html(view::error_page(Some(form), profile, &err.message()))).into_response()
}

/// JSON API
pub async fn predict_json(
    State(state): State<AppState>,
    Json(form): Json<PredictForm>,
) -> AppResult<Json<Assessment>> {
    let input = form.into_input()?;
    let assessment = score(state.context.clone(), input).await?;
    Ok(Json(assessment))
}
