//! Student Dropout Risk Server
//!
//! Serves the collection form and scores submissions against the model
//! loaded at startup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  DROPOUT RISK SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌────────────────────┐ │
//! │  │  Form /   │──▶│  Feature     │──▶│  RiskModel (ONNX)  │ │
//! │  │  JSON API │   │  Builder     │   │  + Risk Bander     │ │
//! │  │  (Axum)   │   │  + Imputer   │   │                    │ │
//! │  └───────────┘   └──────────────┘   └────────────────────┘ │
//! │                 Arc<ScoringContext> (read-only)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod view;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use dropout_risk_core::ScoringContext;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env().context("invalid configuration")?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dropout_risk_server=debug,dropout_risk_core=info,tower_http=debug".into());
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Dropout risk server starting...");
    tracing::info!(
        "Profile: {}, model: {}",
        config.profile,
        config.artifacts.model.display()
    );

    // Load artifacts once, shared read-only by every request
    let context = ScoringContext::load(&config.artifacts, config.scoring_options())
        .context("failed to load model artifacts")?;
    for artifact in &context.info().artifacts {
        tracing::info!("{} {} sha256={}", artifact.kind, artifact.path, artifact.sha256);
    }

    let state = AppState {
        context: Arc::new(context),
        config: config.clone(),
    };

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ScoringContext>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        // Form
        .route("/", get(handlers::predict::form_page))
        .route("/predict", post(handlers::predict::submit_form))

        // API
        .route("/api/v1/predict", post(handlers::predict::predict_json))
        .route("/api/v1/model", get(handlers::model::info))

        .route("/health", get(handlers::health::check))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
