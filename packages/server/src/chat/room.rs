//! One chat room: membership, message history, and event fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

use idobata_shared::time::Clock;

use super::event::{ChatEvent, ChatMessage, ClientInfo, EventError, InboundEvent};

/// Per-client outbound channel. The room only enqueues serialized events
/// here; the actual socket write happens in the connection's pusher task.
pub type ClientSender = mpsc::UnboundedSender<String>;

/// Error raised by room operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("client '{0}' is not connected")]
    ClientNotConnected(String),
    #[error("failed to deliver event to client '{0}'")]
    DeliveryFailed(String),
    #[error(transparent)]
    Event(#[from] EventError),
}

/// Mutable room state. All of it lives behind one lock so that membership
/// changes, history appends, and fan-out iterations never interleave.
struct RoomState {
    /// Map of client_id to the participant's info
    clients: HashMap<String, ClientInfo>,
    /// Map of client_id to the participant's outbound channel
    connections: HashMap<String, ClientSender>,
    /// Message history, ordered by arrival
    messages: Vec<ChatMessage>,
}

/// An isolated chat channel with its own membership and history.
///
/// A room lives for the process lifetime once created by the
/// [`RoomRegistry`](super::RoomRegistry); history is never evicted.
pub struct Room {
    name: String,
    clock: Arc<dyn Clock>,
    state: Mutex<RoomState>,
}

impl Room {
    pub fn new(name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            clock,
            state: Mutex::new(RoomState {
                clients: HashMap::new(),
                connections: HashMap::new(),
                messages: Vec::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of currently connected clients.
    pub async fn connected_count(&self) -> usize {
        self.state.lock().await.connections.len()
    }

    /// Register a new client and return its freshly generated id.
    ///
    /// Broadcasts `user_connected` to every connected client (the new one
    /// included, since it is registered before the broadcast), then sends
    /// `connection_started` with the full history to the new client only.
    pub async fn connect(&self, client_name: &str, sender: ClientSender) -> String {
        let mut state = self.state.lock().await;

        let client_id = Self::generate_client_id(&state.connections);
        let client_info = ClientInfo {
            client_id: client_id.clone(),
            client_name: client_name.to_owned(),
        };
        state.clients.insert(client_id.clone(), client_info.clone());
        state.connections.insert(client_id.clone(), sender);

        Self::fan_out(
            &state,
            &ChatEvent::UserConnected {
                client_info: client_info.clone(),
            },
        );

        let started = ChatEvent::ConnectionStarted {
            client_info,
            messages: state.messages.clone(),
        };
        if let Err(e) = Self::send_to(&state, &client_id, &started) {
            tracing::warn!(
                "failed to send connection_started to client '{}': {}",
                client_id,
                e
            );
        }

        client_id
    }

    /// Remove a client and notify the remaining ones.
    ///
    /// A no-op for ids that are not currently connected, so the transport
    /// close signal and an application-level disconnect may race safely.
    pub async fn disconnect(&self, client_id: &str) {
        let mut state = self.state.lock().await;

        let Some(client_info) = state.clients.remove(client_id) else {
            return;
        };
        state.connections.remove(client_id);

        Self::fan_out(&state, &ChatEvent::UserDisconnected { client_info });
    }

    /// Dispatch one inbound frame from a connected client.
    ///
    /// Only `new_message` is understood; a missing, unrecognized, or
    /// malformed `event_tag` is a protocol violation and fails the dispatch
    /// without touching room state.
    pub async fn process_event(&self, client_id: &str, payload: &Value) -> Result<(), RoomError> {
        let event = InboundEvent::from_payload(payload)?;
        match event {
            InboundEvent::NewMessage { message } => {
                self.handle_new_message(client_id, message).await
            }
        }
    }

    /// Record a message in the history and fan it out to every client,
    /// the sender included.
    async fn handle_new_message(&self, client_id: &str, text: String) -> Result<(), RoomError> {
        let mut state = self.state.lock().await;

        let client_info = state
            .clients
            .get(client_id)
            .cloned()
            .ok_or_else(|| RoomError::ClientNotConnected(client_id.to_owned()))?;

        let message = ChatMessage {
            message: text,
            created: self.clock.now_rfc3339(),
            client_info,
        };
        state.messages.push(message.clone());

        Self::fan_out(&state, &ChatEvent::NewMessage { message });
        Ok(())
    }

    /// Send an event to every currently connected client.
    pub async fn broadcast(&self, event: &ChatEvent) {
        let state = self.state.lock().await;
        Self::fan_out(&state, event);
    }

    /// Send an event to exactly one client.
    pub async fn broadcast_to_client(
        &self,
        client_id: &str,
        event: &ChatEvent,
    ) -> Result<(), RoomError> {
        let state = self.state.lock().await;
        Self::send_to(&state, client_id, event)
    }

    fn fan_out(state: &RoomState, event: &ChatEvent) {
        let json = serde_json::to_string(event).unwrap();
        for (client_id, sender) in &state.connections {
            // A dead recipient must not break delivery to the others.
            if sender.send(json.clone()).is_err() {
                tracing::warn!(
                    "failed to deliver '{}' event to client '{}'",
                    event.tag(),
                    client_id
                );
            }
        }
    }

    fn send_to(state: &RoomState, client_id: &str, event: &ChatEvent) -> Result<(), RoomError> {
        let sender = state
            .connections
            .get(client_id)
            .ok_or_else(|| RoomError::ClientNotConnected(client_id.to_owned()))?;
        let json = serde_json::to_string(event).unwrap();
        sender
            .send(json)
            .map_err(|_| RoomError::DeliveryFailed(client_id.to_owned()))
    }

    /// Generate a digits-only client id of fixed length.
    ///
    /// Ids colliding with a currently connected client are regenerated;
    /// an id may recur after its owner disconnects.
    fn generate_client_id(connections: &HashMap<String, ClientSender>) -> String {
        let mut rng = rand::rng();
        loop {
            let client_id = format!("{:06}", rng.random_range(0..1_000_000));
            if !connections.contains_key(&client_id) {
                return client_id;
            }
        }
    }
}
