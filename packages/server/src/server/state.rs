//! Shared application state.

use std::sync::Arc;

use crate::chat::RoomRegistry;

/// State shared by every request handler.
///
/// The room registry is constructed at startup and injected here, so tests
/// can run independent server instances with isolated registries.
pub struct AppState {
    /// Registry of chat rooms, one instance per room name
    pub registry: Arc<RoomRegistry>,
    /// Public websocket base URL substituted into the demo page
    pub public_ws_url: String,
}
