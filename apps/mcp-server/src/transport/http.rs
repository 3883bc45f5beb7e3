//! HTTP transport for MCP
//!
//! JSON-RPC messages are POSTed to `/mcp`; notifications get `202 Accepted`
//! with no body.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ConverterConfig;
use crate::converter::ConvertError;
use crate::mcp::protocol::*;
use crate::mcp::RtlDocxMcpServer;

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct HttpServerState {
    /// The MCP server instance
    server: Arc<RtlDocxMcpServer>,
}

/// Build the router; split out so tests can drive it without a socket
pub fn build_router(config: ConverterConfig) -> Router {
    let state = HttpServerState {
        server: Arc::new(RtlDocxMcpServer::new(config)),
    };

    // Configure CORS for browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // MCP JSON-RPC endpoint
        .route("/mcp", post(handle_mcp_request))
        // Health check
        .route("/health", get(handle_health))
        // Server info
        .route("/", get(handle_info))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the MCP server using HTTP transport
pub async fn run_http_server(addr: &str, config: ConverterConfig) -> Result<(), ConvertError> {
    tracing::info!("Starting HTTP transport on {}", addr);

    let app = build_router(config);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(ConvertError::IoError)?;

    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ConvertError::IoError(std::io::Error::other(e)))?;

    Ok(())
}

/// Handle MCP JSON-RPC requests
async fn handle_mcp_request(
    State(state): State<HttpServerState>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    tracing::debug!("HTTP request: {:?}", request.method);

    match state.server.handle_request(request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Health check endpoint
async fn handle_health(State(state): State<HttpServerState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": state.server.name()
    }))
}

/// Server info endpoint
async fn handle_info(State(state): State<HttpServerState>) -> impl IntoResponse {
    Json(json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "http",
        "endpoints": {
            "mcp": "/mcp",
            "health": "/health"
        }
    }))
}
