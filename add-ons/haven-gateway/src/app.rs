//! Router, shared state, and request logging.

use crate::handlers;
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use haven_core::{
    build_provider, HavenConfig, HttpEmotionClassifier, LlmError, ResponseGenerator, SessionStore,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<HavenConfig>,
    pub generator: Arc<ResponseGenerator>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: HavenConfig, generator: ResponseGenerator) -> Self {
        Self {
            config: Arc::new(config),
            generator: Arc::new(generator),
            http: reqwest::Client::new(),
        }
    }

    /// Wires the session store, HTTP classifier, and configured completion provider.
    pub fn from_config(config: HavenConfig) -> Result<Self, LlmError> {
        let provider = build_provider(&config)?;
        let classifier = Arc::new(HttpEmotionClassifier::from_config(&config));
        tracing::info!(
            target: "haven::gateway",
            classify_url = %config.classify_url(),
            llm = provider.name(),
            "collaborators configured"
        );
        let generator = ResponseGenerator::new(Arc::new(SessionStore::new()), classifier, provider);
        Ok(Self::new(config, generator))
    }
}

pub fn router(state: AppState) -> Router {
    // the web front end calls from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/classify", post(handlers::classify::classify))
        .route("/chat", post(handlers::chat::chat))
        .route("/quote", get(handlers::quote::quote))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(log_requests))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "app_name": state.config.app_name,
        "sessions": state.generator.sessions().len(),
        "llm": state.generator.provider_name(),
        "version": haven_core::version(),
    }))
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        target: "haven::gateway",
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
