//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};
use chrono::Local;
use serde::Deserialize;

use crate::server::{
    models::{EchoRequest, ListItemResponse, TextChoice, ValidationError},
    state::AppState,
};

/// Demo page bundled into the binary; `{backend_url}` is substituted with
/// the configured public websocket URL at request time.
const DEMO_PAGE: &str = include_str!("../../../static/websocket-example.html");

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Log the request body when it parses as JSON; always respond 204.
pub async fn ping(body: Bytes) -> StatusCode {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(payload) => tracing::info!("ping payload: {}", payload),
        Err(_) => tracing::debug!("ping body was not JSON, ignoring"),
    }
    StatusCode::NO_CONTENT
}

/// Echo the request body back after validating its field constraints.
pub async fn echo_request(
    Json(request): Json<EchoRequest>,
) -> Result<Json<EchoRequest>, ValidationError> {
    request.validate(Local::now().date_naive())?;
    Ok(Json(request))
}

/// Query parameters for `GET /list-request/`
#[derive(Debug, Deserialize)]
pub struct ListRequestQuery {
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub choices_text: Option<TextChoice>,
}

fn default_count() -> usize {
    5
}

/// Respond with `count` numbered items carrying the requested choice.
pub async fn list_request(Query(query): Query<ListRequestQuery>) -> Json<Vec<ListItemResponse>> {
    let items = (0..query.count)
        .map(|number| ListItemResponse {
            number,
            choices_text: query.choices_text,
        })
        .collect();
    Json(items)
}

/// Serve the browser demo page for the websocket chat.
pub async fn websocket_example_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(DEMO_PAGE.replace("{backend_url}", &state.public_ws_url))
}
