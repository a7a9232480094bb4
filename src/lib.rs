//! Wire contract for the notification WebSocket protocol.
//!
//! Declares the client→server messages, server→client responses, the closed
//! set of notification events and the internal bus messages they are
//! produced from, plus topic-name builders. No sockets, dispatch or bus I/O
//! live here; those belong to the services that speak this contract.

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod topics;

pub use codec::{decode_frame, encode, Frame};
pub use config::Config;
pub use error::{ProtocolError, ProtocolResult};
pub use models::{
    is_generation_audio_output_event, is_generation_complete_event, is_project_delete_event,
    is_project_update_event, BusMessage, ClientMessage, NotificationEvent, ServerResponse,
    UnknownFrame,
};
pub use topics::TopicPattern;
