//! HTTP surface.
//!
//! Two routes accept the same request so both the local web server path and
//! the function-style path keep working:
//!
//! - `POST /api/process-command`
//! - `POST /api/process_command`
//!
//! Body: `{"command": "<text>"}`. Response body is always an
//! [`OutcomeEnvelope`].
//!
//! [`serve`] wraps the router with the listener's request timeout and, when
//! enabled, request tracing (see [`with_server_layers`]).

use crate::envelope::OutcomeEnvelope;
use crate::error::{AgentError, Result};
use crate::orchestrator::CommandProcessor;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};
use utils::ServerConfig;

pub const AGENT_NOT_INITIALIZED: &str = "Agent not initialized. Check logs for details.";
pub const NO_COMMAND_PROVIDED: &str =
    "No command provided. Please include a 'command' field in the request body.";

/// Shared application state.
///
/// `agent` is `None` when start-up failed; every command request then
/// answers 500.
#[derive(Clone, Default)]
pub struct AppState {
    pub agent: Option<Arc<dyn CommandProcessor>>,
}

impl AppState {
    pub fn new(agent: Arc<dyn CommandProcessor>) -> Self {
        Self { agent: Some(agent) }
    }

    pub fn uninitialized() -> Self {
        Self { agent: None }
    }
}

/// Build the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/process-command", post(process_command))
        .route("/api/process_command", post(process_command))
        .with_state(state)
}

/// Apply the listener's middleware to a router.
///
/// Requests running longer than `config.timeout` are answered with
/// `408 Request Timeout`.
pub fn with_server_layers(router: Router, config: &ServerConfig) -> Router {
    let router = router.layer(TimeoutLayer::new(config.timeout));
    if config.enable_logging {
        router.layer(logging_layer())
    } else {
        router
    }
}

fn logging_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .include_headers(false),
        )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    agent_initialized: bool,
    version: &'static str,
}

/// Handler for GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        agent_initialized: state.agent.is_some(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler for POST /api/process-command and /api/process_command
async fn process_command(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<OutcomeEnvelope>) {
    info!("Processing incoming request");

    let Some(agent) = state.agent.as_ref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(OutcomeEnvelope::failure(AGENT_NOT_INITIALIZED)),
        );
    };

    let command = match command_from_body(&body) {
        Ok(Some(command)) => command,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(OutcomeEnvelope::failure(NO_COMMAND_PROVIDED)),
            )
        }
        Err(reason) => {
            error!(reason = %reason, "Error processing request");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(OutcomeEnvelope::failure(format!(
                    "Error processing request: {}",
                    reason
                ))),
            );
        }
    };

    let outcome = agent.process_command(&command).await;
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(outcome))
}

/// The non-empty `command` string of a request body.
fn command_from_body(body: &[u8]) -> std::result::Result<Option<String>, String> {
    let value: Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| "request body must be a JSON object".to_string())?;

    Ok(object
        .get("command")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|command| !command.is_empty())
        .map(str::to_string))
}

/// Serve the router until SIGINT or SIGTERM.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = config.socket_addr()?;
    let initialized = state.agent.is_some();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AgentError::Server(format!("failed to bind {}: {}", addr, e)))?;

    if initialized {
        info!(
            %addr,
            timeout_secs = config.timeout.as_secs(),
            "Entra agent listening on http://{}/api/process-command",
            addr
        );
    } else {
        warn!(%addr, "Entra agent failed to initialize; serving errors only");
    }

    axum::serve(listener, with_server_layers(create_router(state), config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AgentError::Server(e.to_string()))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => warn!("Received SIGINT, shutting down"),
                    _ = sigterm.recv() => warn!("Received SIGTERM, shutting down"),
                }
            }
            _ => {
                error!("Failed to install signal handlers; falling back to Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        warn!("Received Ctrl+C, shutting down");
    }
}
