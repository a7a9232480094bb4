//! Messages a client sends to the server, discriminated by `type`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::unknown::{from_fields, serialize_tagged, take_tag, UnknownFrame};

/// Discriminant field of client messages.
pub const CLIENT_DISCRIMINANT: &str = "type";

pub const AUTH: &str = "auth";
pub const SUBSCRIBE: &str = "subscribe";
pub const UNSUBSCRIBE: &str = "unsubscribe";

/// Present a credential to authenticate the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMessage {
    pub token: String,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

/// Ask for notification delivery on the named topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeMessage {
    pub topics: Vec<String>,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

/// Withdraw interest in the named topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsubscribeMessage {
    pub topics: Vec<String>,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

/// Client→server message.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Auth(AuthMessage),
    Subscribe(SubscribeMessage),
    Unsubscribe(UnsubscribeMessage),
    Unknown(UnknownFrame),
}

impl ClientMessage {
    pub fn auth(token: impl Into<String>) -> Self {
        ClientMessage::Auth(AuthMessage {
            token: token.into(),
            extra: Map::new(),
        })
    }

    pub fn subscribe<I, T>(topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ClientMessage::Subscribe(SubscribeMessage {
            topics: topics.into_iter().map(Into::into).collect(),
            extra: Map::new(),
        })
    }

    pub fn unsubscribe<I, T>(topics: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        ClientMessage::Unsubscribe(UnsubscribeMessage {
            topics: topics.into_iter().map(Into::into).collect(),
            extra: Map::new(),
        })
    }

    /// Value of the `type` field.
    pub fn message_type(&self) -> &str {
        match self {
            ClientMessage::Auth(_) => AUTH,
            ClientMessage::Subscribe(_) => SUBSCRIBE,
            ClientMessage::Unsubscribe(_) => UNSUBSCRIBE,
            ClientMessage::Unknown(frame) => &frame.tag,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ClientMessage::Unknown(_))
    }
}

impl From<AuthMessage> for ClientMessage {
    fn from(message: AuthMessage) -> Self {
        ClientMessage::Auth(message)
    }
}

impl From<SubscribeMessage> for ClientMessage {
    fn from(message: SubscribeMessage) -> Self {
        ClientMessage::Subscribe(message)
    }
}

impl From<UnsubscribeMessage> for ClientMessage {
    fn from(message: UnsubscribeMessage) -> Self {
        ClientMessage::Unsubscribe(message)
    }
}

impl Serialize for ClientMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field = CLIENT_DISCRIMINANT;
        match self {
            ClientMessage::Auth(m) => serialize_tagged(serializer, field, AUTH, m),
            ClientMessage::Subscribe(m) => serialize_tagged(serializer, field, SUBSCRIBE, m),
            ClientMessage::Unsubscribe(m) => serialize_tagged(serializer, field, UNSUBSCRIBE, m),
            ClientMessage::Unknown(frame) => frame.serialize_as(serializer, field),
        }
    }
}

impl<'de> Deserialize<'de> for ClientMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let tag = take_tag(&mut fields, CLIENT_DISCRIMINANT).map_err(D::Error::custom)?;
        let message = match tag.as_str() {
            AUTH => from_fields(fields).map(ClientMessage::Auth),
            SUBSCRIBE => from_fields(fields).map(ClientMessage::Subscribe),
            UNSUBSCRIBE => from_fields(fields).map(ClientMessage::Unsubscribe),
            _ => Ok(ClientMessage::Unknown(UnknownFrame::new(tag, fields))),
        };
        message.map_err(D::Error::custom)
    }
}
