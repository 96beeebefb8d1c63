//! Request handlers, organized by protocol.

mod http;
mod websocket;

pub use http::{echo_request, health_check, list_request, ping, websocket_example_page};
pub use websocket::websocket_handler;
