//! Shared utilities for the Idobata chat application.
//!
//! This crate holds the pieces that every binary needs: logging setup and
//! time utilities with a clock abstraction for testability.

pub mod logger;
pub mod time;
