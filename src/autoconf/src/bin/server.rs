//! # Configuration Export Server
//!
//! HTTP server exposing the compiled authorization configuration. Runs the
//! autoconfiguration pass once at startup against descriptors supplied by an
//! external discovery step, then serves the frozen result.
//!
//! ## Endpoints
//!
//! - `GET {EXPORT_PATH}` - Authorization settings document (pretty JSON)
//! - `GET /health` - Health check
//!
//! ## Configuration
//!
//! Environment variables:
//! - `PORT` - HTTP server port (default: 8080)
//! - `DESCRIPTORS_PATH` - JSON file with discovered endpoint descriptors
//! - `EXPORT_PATH` - Export endpoint mount point (default: /mac/configuration/export)
//! - `PROTECT_EXPORT_PATH` - Whether the export path requires a scope (default: true)
//! - `EXPORT_PATH_ACCESS_SCOPE` - Scope protecting the export path (default: configuration:export)
//! - `RESOLUTION_MODE` - Scope resolution mode: aggregate or first-match (default: aggregate)
//! - `RUST_LOG` - Log level (default: info)

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    serve, Router,
};
use pathguard_autoconf::{
    export::to_pretty_json, path::build_path, AuthorizationExporter, AutoconfEngine,
    AutoconfOptions, EndpointDescriptor, PolicyConfiguration,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared application state
#[derive(Clone)]
struct AppState {
    configuration: Arc<PolicyConfiguration>,
    exporter: AuthorizationExporter,
    start_time: std::time::Instant,
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

/// Application error type
#[derive(Debug)]
enum AppError {
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<pathguard_autoconf::AutoconfError> for AppError {
    fn from(err: pathguard_autoconf::AutoconfError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    uptime_seconds: u64,
    version: String,
}

/// GET {export_path} - Export the authorization settings document
async fn export_configuration(State(state): State<AppState>) -> Result<Response, AppError> {
    let settings = state.exporter.export(state.configuration.paths());
    let json = to_pretty_json(&settings)?;

    Ok((
        StatusCode::OK,
        [("content-type", "application/json")],
        json,
    )
        .into_response())
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = state.start_time.elapsed().as_secs();

    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: uptime,
        version: pathguard_autoconf::VERSION.to_string(),
    })
}

/// Create the HTTP router with all endpoints
fn create_router(export_path: &str, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http()
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route(export_path, get(export_configuration))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}

/// Load discovered descriptors from the configured JSON file, if any
fn load_descriptors() -> anyhow::Result<Vec<EndpointDescriptor>> {
    let Some(path) = std::env::var("DESCRIPTORS_PATH").ok() else {
        info!("DESCRIPTORS_PATH not set, starting with no discovered endpoints");
        return Ok(Vec::new());
    };

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read descriptors from {}", path))?;
    let descriptors: Vec<EndpointDescriptor> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse descriptors from {}", path))?;

    info!("Loaded {} endpoint descriptors from {}", descriptors.len(), path);
    Ok(descriptors)
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    info!("Starting graceful shutdown");
}

/// Main server entrypoint
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting configuration export server v{}",
        pathguard_autoconf::VERSION
    );

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let options = AutoconfOptions::from_env()?;
    // Same canonical form the engine registers in the store
    let export_path = build_path([options.export_path.as_str()]);

    info!("Configuration:");
    info!("  Port: {}", port);
    info!("  Export path: {}", export_path);
    info!("  Protect export path: {}", options.protect_export_path);
    info!("  Resolution mode: {}", options.resolution_mode);

    let descriptors = load_descriptors()?;

    // One-shot startup pass; the result is frozen before serving begins
    let configuration = AutoconfEngine::with_options(options)
        .configure(&descriptors)
        .context("autoconfiguration pass failed")?;

    let state = AppState {
        configuration: Arc::new(configuration),
        exporter: AuthorizationExporter::new(),
        start_time: std::time::Instant::now(),
    };

    let app = create_router(&export_path, state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down gracefully");
    Ok(())
}
