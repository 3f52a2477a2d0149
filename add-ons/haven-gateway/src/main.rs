//! Haven gateway: HTTP surface for the support chatbot.
//! `POST /classify` and `POST /chat` are thin adapters over `haven_core::ResponseGenerator`.

mod app;
mod handlers;

use haven_core::{HavenConfig, LlmMode};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    // .env first so PUBLIC_URL and API keys reach the config layer
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[haven-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(target: "haven::gateway", error = %e, "gateway stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let config = HavenConfig::load()?;
    if config.llm_mode() == LlmMode::Mock {
        tracing::info!(
            target: "haven::gateway",
            "LLM mode is mock; set HAVEN__LLM_MODE=live and OPENROUTER_API_KEY for real replies"
        );
    }
    let addr = config.bind_addr();
    let app_name = config.app_name.clone();

    let state = app::AppState::from_config(config)?;
    let router = app::router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        target: "haven::gateway",
        "{} v{} listening on http://{}",
        app_name,
        haven_core::version(),
        addr
    );

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(target: "haven::gateway", error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    tracing::info!(target: "haven::gateway", "shutting down");
}
