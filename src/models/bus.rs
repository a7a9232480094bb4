//! Internal event-bus messages, discriminated by `eventType`.
//!
//! Producer-side twins of the notification events. They travel on the
//! internal pub/sub backend without the `action` envelope; turning one into a
//! client notification is the bridge's job, not this crate's.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::event::{
    GenerationStatus, GENERATION_AUDIO_OUTPUT, GENERATION_COMPLETE, PROJECT_DELETE,
    PROJECT_UPDATE,
};
use super::timestamp_now;
use super::unknown::{from_fields, serialize_tagged, take_tag, UnknownFrame};

/// Discriminant field of bus messages.
pub const BUS_DISCRIMINANT: &str = "eventType";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationAudioOutputBusMessage {
    pub generation_id: String,
    pub audio_id: String,
    pub output_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub timestamp: String,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationCompleteBusMessage {
    pub generation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub status: GenerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub timestamp: String,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

/// Payload shared by project update and delete bus messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBusMessage {
    pub project_id: String,
    pub user_id: String,
    pub timestamp: String,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

impl ProjectBusMessage {
    pub fn new(project_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            user_id: user_id.into(),
            timestamp: timestamp_now(),
            extra: Map::new(),
        }
    }
}

/// Bus message, discriminated by `eventType`.
#[derive(Debug, Clone, PartialEq)]
pub enum BusMessage {
    GenerationAudioOutput(GenerationAudioOutputBusMessage),
    GenerationComplete(GenerationCompleteBusMessage),
    ProjectUpdate(ProjectBusMessage),
    ProjectDelete(ProjectBusMessage),
    Unknown(UnknownFrame),
}

impl BusMessage {
    /// Value of the `eventType` field.
    pub fn event_type(&self) -> &str {
        match self {
            BusMessage::GenerationAudioOutput(_) => GENERATION_AUDIO_OUTPUT,
            BusMessage::GenerationComplete(_) => GENERATION_COMPLETE,
            BusMessage::ProjectUpdate(_) => PROJECT_UPDATE,
            BusMessage::ProjectDelete(_) => PROJECT_DELETE,
            BusMessage::Unknown(frame) => &frame.tag,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, BusMessage::Unknown(_))
    }

    /// User the message concerns, when the producer supplied one.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            BusMessage::GenerationAudioOutput(m) => m.user_id.as_deref(),
            BusMessage::GenerationComplete(m) => m.user_id.as_deref(),
            BusMessage::ProjectUpdate(m) | BusMessage::ProjectDelete(m) => Some(&m.user_id),
            BusMessage::Unknown(frame) => frame.get("userId").and_then(Value::as_str),
        }
    }
}

impl From<GenerationAudioOutputBusMessage> for BusMessage {
    fn from(message: GenerationAudioOutputBusMessage) -> Self {
        BusMessage::GenerationAudioOutput(message)
    }
}

impl From<GenerationCompleteBusMessage> for BusMessage {
    fn from(message: GenerationCompleteBusMessage) -> Self {
        BusMessage::GenerationComplete(message)
    }
}

impl Serialize for BusMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field = BUS_DISCRIMINANT;
        match self {
            BusMessage::GenerationAudioOutput(m) => {
                serialize_tagged(serializer, field, GENERATION_AUDIO_OUTPUT, m)
            }
            BusMessage::GenerationComplete(m) => {
                serialize_tagged(serializer, field, GENERATION_COMPLETE, m)
            }
            BusMessage::ProjectUpdate(m) => serialize_tagged(serializer, field, PROJECT_UPDATE, m),
            BusMessage::ProjectDelete(m) => serialize_tagged(serializer, field, PROJECT_DELETE, m),
            BusMessage::Unknown(frame) => frame.serialize_as(serializer, field),
        }
    }
}

impl<'de> Deserialize<'de> for BusMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let tag = take_tag(&mut fields, BUS_DISCRIMINANT).map_err(D::Error::custom)?;
        let message = match tag.as_str() {
            GENERATION_AUDIO_OUTPUT => from_fields(fields).map(BusMessage::GenerationAudioOutput),
            GENERATION_COMPLETE => from_fields(fields).map(BusMessage::GenerationComplete),
            PROJECT_UPDATE => from_fields(fields).map(BusMessage::ProjectUpdate),
            PROJECT_DELETE => from_fields(fields).map(BusMessage::ProjectDelete),
            _ => Ok(BusMessage::Unknown(UnknownFrame::new(tag, fields))),
        };
        message.map_err(D::Error::custom)
    }
}
