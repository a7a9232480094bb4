//! Responses the server sends to a client, discriminated by `action`.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::event::NotificationEvent;
use super::unknown::{from_fields, serialize_tagged, take_tag, to_fields, UnknownFrame};

/// Discriminant field of server responses.
pub const ACTION_DISCRIMINANT: &str = "action";

pub const AUTH_SUCCESS: &str = "auth_success";
pub const SUBSCRIBE_RESULT: &str = "subscribe_result";
pub const UNSUBSCRIBE_RESULT: &str = "unsubscribe_result";
pub const ERROR: &str = "error";
pub const NOTIFICATION: &str = "notification";

/// Authentication accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSuccessResponse {
    pub user_id: String,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

/// Outcome of a subscribe request.
///
/// `failed` is the name the backend sends; it lists topics that were
/// rejected or could not be granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeResultResponse {
    pub subscribed: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<Vec<String>>,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsubscribeResultResponse {
    pub unsubscribed: Vec<String>,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

/// Human-readable failure reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Fields beyond the known ones, kept for forwarding.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

/// Server→client response.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerResponse {
    AuthSuccess(AuthSuccessResponse),
    SubscribeResult(SubscribeResultResponse),
    UnsubscribeResult(UnsubscribeResultResponse),
    Error(ErrorResponse),
    /// Push event; serialized as `{ "action": "notification", "type": .. }`.
    Notification(NotificationEvent),
    Unknown(UnknownFrame),
}

impl ServerResponse {
    pub fn auth_success(user_id: impl Into<String>) -> Self {
        ServerResponse::AuthSuccess(AuthSuccessResponse {
            user_id: user_id.into(),
            extra: Map::new(),
        })
    }

    /// Build a subscribe result; `failed` is left off the wire when empty.
    pub fn subscribe_result(subscribed: Vec<String>, failed: Vec<String>) -> Self {
        ServerResponse::SubscribeResult(SubscribeResultResponse {
            subscribed,
            failed: if failed.is_empty() { None } else { Some(failed) },
            extra: Map::new(),
        })
    }

    pub fn unsubscribe_result(unsubscribed: Vec<String>) -> Self {
        ServerResponse::UnsubscribeResult(UnsubscribeResultResponse {
            unsubscribed,
            extra: Map::new(),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerResponse::Error(ErrorResponse {
            message: message.into(),
            extra: Map::new(),
        })
    }

    /// Value of the `action` field.
    pub fn action(&self) -> &str {
        match self {
            ServerResponse::AuthSuccess(_) => AUTH_SUCCESS,
            ServerResponse::SubscribeResult(_) => SUBSCRIBE_RESULT,
            ServerResponse::UnsubscribeResult(_) => UNSUBSCRIBE_RESULT,
            ServerResponse::Error(_) => ERROR,
            ServerResponse::Notification(_) => NOTIFICATION,
            ServerResponse::Unknown(frame) => &frame.tag,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ServerResponse::Unknown(_))
    }

    pub fn as_notification(&self) -> Option<&NotificationEvent> {
        match self {
            ServerResponse::Notification(event) => Some(event),
            _ => None,
        }
    }
}

impl From<NotificationEvent> for ServerResponse {
    fn from(event: NotificationEvent) -> Self {
        ServerResponse::Notification(event)
    }
}

impl From<ErrorResponse> for ServerResponse {
    fn from(response: ErrorResponse) -> Self {
        ServerResponse::Error(response)
    }
}

impl Serialize for ServerResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field = ACTION_DISCRIMINANT;
        match self {
            ServerResponse::AuthSuccess(r) => serialize_tagged(serializer, field, AUTH_SUCCESS, r),
            ServerResponse::SubscribeResult(r) => {
                serialize_tagged(serializer, field, SUBSCRIBE_RESULT, r)
            }
            ServerResponse::UnsubscribeResult(r) => {
                serialize_tagged(serializer, field, UNSUBSCRIBE_RESULT, r)
            }
            ServerResponse::Error(r) => serialize_tagged(serializer, field, ERROR, r),
            ServerResponse::Notification(event) => {
                let mut map = to_fields(event).map_err(S::Error::custom)?;
                map.insert(field.to_string(), Value::String(NOTIFICATION.to_string()));
                map.serialize(serializer)
            }
            ServerResponse::Unknown(frame) => frame.serialize_as(serializer, field),
        }
    }
}

impl<'de> Deserialize<'de> for ServerResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let tag = take_tag(&mut fields, ACTION_DISCRIMINANT).map_err(D::Error::custom)?;
        let response = match tag.as_str() {
            AUTH_SUCCESS => from_fields(fields).map(ServerResponse::AuthSuccess),
            SUBSCRIBE_RESULT => from_fields(fields).map(ServerResponse::SubscribeResult),
            UNSUBSCRIBE_RESULT => from_fields(fields).map(ServerResponse::UnsubscribeResult),
            ERROR => from_fields(fields).map(ServerResponse::Error),
            NOTIFICATION => from_fields(fields).map(ServerResponse::Notification),
            _ => Ok(ServerResponse::Unknown(UnknownFrame::new(tag, fields))),
        };
        response.map_err(D::Error::custom)
    }
}
