//! Chat core: rooms, the room registry, and the typed event model.
//!
//! The host layer drives a room through exactly three operations:
//! [`Room::connect`], [`Room::process_event`], and [`Room::disconnect`].
//! Rooms are obtained from the [`RoomRegistry`], which guarantees one
//! instance per room name.

mod event;
mod registry;
mod room;

pub use event::{ChatEvent, ChatMessage, ClientInfo, EventError, InboundEvent};
pub use registry::RoomRegistry;
pub use room::{ClientSender, Room, RoomError};
