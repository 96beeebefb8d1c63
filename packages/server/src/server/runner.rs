//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::chat::RoomRegistry;

use super::{
    handler::{
        echo_request, health_check, list_request, ping, websocket_example_page, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router.
///
/// Split out of [`run_server`] so integration tests can serve the exact
/// same router on an ephemeral port.
pub fn router(state: Arc<AppState>) -> Router {
    // The demo is meant to be poked at from anywhere, so CORS is wide open.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket エンドポイント
        .route("/ws/{room}", get(websocket_handler))
        // HTTP エンドポイント
        .route("/ping/", post(ping))
        .route("/request/", post(echo_request))
        .route("/list-request/", get(list_request))
        .route("/web-socket-example/", get(websocket_example_page))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the chat server until a shutdown signal arrives.
///
/// # Arguments
///
/// * `registry` - The room registry shared by every connection
/// * `host` - The host address to bind to (e.g., "127.0.0.1")
/// * `port` - The port number to bind to (e.g., 8080)
/// * `public_ws_url` - Websocket base URL advertised on the demo page;
///   derived from `host`/`port` when not given
///
/// # Errors
///
/// Returns an error if the server fails to bind to the specified address or
/// if there's an error during server execution.
pub async fn run_server(
    registry: Arc<RoomRegistry>,
    host: String,
    port: u16,
    public_ws_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = format!("{}:{}", host, port);
    let public_ws_url = public_ws_url.unwrap_or_else(|| format!("ws://{}/ws", bind_addr));

    let app_state = Arc::new(AppState {
        registry,
        public_ws_url,
    });
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("chat server listening on {}", listener.local_addr()?);
    tracing::info!("connect to: ws://{}/ws/{{room}}?client_name=...", bind_addr);
    tracing::info!("demo page: http://{}/web-socket-example/", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    // Set up graceful shutdown signal handler
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
