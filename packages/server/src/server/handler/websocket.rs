//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::server::state::AppState;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub client_name: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(room_name): Path<String>,
    Query(query): Query<ConnectQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, room_name, query.client_name))
}

/// Spawns a task that drains the client's outbound channel into its
/// WebSocket sink. The room only enqueues on the channel, so a slow socket
/// never blocks room operations.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_name: String,
    client_name: String,
) {
    let (sender, mut receiver) = socket.split();

    let room = state.registry.get_or_create(&room_name).await;

    // Create a channel for this client to receive room events
    let (tx, rx) = mpsc::unbounded_channel();
    let client_id = room.connect(&client_name, tx).await;
    tracing::info!(
        "client '{}' ({}) joined room '{}'",
        client_name,
        client_id,
        room.name()
    );

    let mut send_task = pusher_loop(rx, sender);

    let recv_room = room.clone();
    let recv_client_id = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("websocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("received frame from '{}': {}", recv_client_id, text);

                    let payload: serde_json::Value = match serde_json::from_str(&text) {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::warn!(
                                "client '{}' sent a non-JSON frame, closing: {}",
                                recv_client_id,
                                e
                            );
                            break;
                        }
                    };

                    // A protocol violation is fatal to this connection only.
                    if let Err(e) = recv_room.process_event(&recv_client_id, &payload).await {
                        tracing::warn!(
                            "protocol violation from client '{}', closing: {}",
                            recv_client_id,
                            e
                        );
                        break;
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("client '{}' requested close", recv_client_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Safe to call even if the room already dropped this client.
    room.disconnect(&client_id).await;
    tracing::info!(
        "client '{}' left room '{}' ({} still connected)",
        client_id,
        room.name(),
        room.connected_count().await
    );
}
