//! WebSocket multi-room chat demo.
//!
//! This library provides the chat core (rooms, the room registry, and the
//! typed event model) plus the Axum host layer that exposes it over HTTP
//! and WebSocket.

pub mod chat;
pub mod server;
