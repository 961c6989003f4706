//! chatopt - HTTP server for the ChatOPT API.
//!
//! Reads configuration from `CHATOPT__*` environment variables (and `.env`),
//! then serves the API and form UI until Ctrl+C or SIGTERM.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use chatopt::adapters::ai::{OpenAIConfig, OpenAIProvider};
use chatopt::adapters::http::{masterplan_router, MasterplanAppState};
use chatopt::config::{AppConfig, ServerConfig};

const BODY_TIMEOUT_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load_validated() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("chatopt: invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.server);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("chatopt stopped: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let provider = OpenAIProvider::new(OpenAIConfig::from_app_config(&config.ai)?)?;
    tracing::info!(
        model = %config.ai.model,
        base_url = %config.ai.base_url,
        "Using OpenAI chat completions"
    );

    let request_timeout = config.server.request_timeout();
    let state = MasterplanAppState::new(Arc::new(provider)).with_request_timeout(request_timeout);

    // The handlers answer a slow model with a structured 504 at `request_timeout`.
    // This layer only catches requests whose body never finishes arriving.
    let app = masterplan_router(state)
        .layer(TimeoutLayer::new(request_timeout + BODY_TIMEOUT_GRACE))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("chatopt listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("chatopt shut down");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if server.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl+C handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
