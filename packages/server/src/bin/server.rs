//! WebSocket multi-room chat server with broadcast functionality.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-server
//! cargo run --bin idobata-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use idobata_server::{chat::RoomRegistry, server::run_server};
use idobata_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "idobata-server")]
#[command(about = "WebSocket multi-room chat server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Public websocket URL substituted into the demo page
    /// (defaults to ws://<host>:<port>/ws)
    #[arg(long)]
    public_ws_url: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // The registry is process-scoped state, built here and injected into
    // the host layer.
    let registry = Arc::new(RoomRegistry::new(Arc::new(SystemClock)));

    if let Err(e) = run_server(registry, args.host, args.port, args.public_ws_url).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
