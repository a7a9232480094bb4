//! Structural decoding of raw text frames by their discriminant field.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ProtocolError, ProtocolResult};
use crate::models::bus::{BusMessage, BUS_DISCRIMINANT};
use crate::models::client::{ClientMessage, CLIENT_DISCRIMINANT};
use crate::models::response::{ServerResponse, ACTION_DISCRIMINANT};

/// A decoded frame from any leg of the protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Server→client; carries `action`.
    Server(ServerResponse),
    /// Internal bus; carries `eventType`.
    Bus(BusMessage),
    /// Client→server; carries `type` only.
    Client(ClientMessage),
}

impl Frame {
    /// Name of the field the frame was dispatched on.
    pub fn discriminant(&self) -> &'static str {
        match self {
            Frame::Server(_) => ACTION_DISCRIMINANT,
            Frame::Bus(_) => BUS_DISCRIMINANT,
            Frame::Client(_) => CLIENT_DISCRIMINANT,
        }
    }

    /// Value of the discriminant field.
    pub fn tag(&self) -> &str {
        match self {
            Frame::Server(r) => r.action(),
            Frame::Bus(m) => m.event_type(),
            Frame::Client(m) => m.message_type(),
        }
    }

    /// True when the frame, or the notification inside it, fell through to
    /// an `Unknown` variant.
    pub fn is_unknown(&self) -> bool {
        match self {
            Frame::Server(ServerResponse::Notification(event)) => event.is_unknown(),
            Frame::Server(r) => r.is_unknown(),
            Frame::Bus(m) => m.is_unknown(),
            Frame::Client(m) => m.is_unknown(),
        }
    }
}

/// Decode a JSON text frame.
///
/// `action` is checked before `type` because notifications carry both.
pub fn decode_frame(text: &str) -> ProtocolResult<Frame> {
    let value: Value = serde_json::from_str(text)?;
    let fields = value.as_object().ok_or(ProtocolError::NotAnObject)?;

    let frame = if fields.contains_key(ACTION_DISCRIMINANT) {
        Frame::Server(serde_json::from_value(value)?)
    } else if fields.contains_key(BUS_DISCRIMINANT) {
        Frame::Bus(serde_json::from_value(value)?)
    } else if fields.contains_key(CLIENT_DISCRIMINANT) {
        Frame::Client(serde_json::from_value(value)?)
    } else {
        return Err(ProtocolError::MissingDiscriminant);
    };

    if frame.is_unknown() {
        debug!(
            discriminant = frame.discriminant(),
            tag = %frame.tag(),
            "unrecognized frame"
        );
    }
    Ok(frame)
}

/// Encode any message of this crate as a JSON text frame.
pub fn encode<T: Serialize>(message: &T) -> ProtocolResult<String> {
    Ok(serde_json::to_string(message)?)
}
