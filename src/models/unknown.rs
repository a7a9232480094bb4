//! Catch-all frame for discriminant values this crate does not model, plus
//! the tag split/merge helpers every tagged union here is built on.

use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A frame whose discriminant is not one of the known tags.
///
/// Keeps every other field as raw JSON so the frame can be forwarded as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownFrame {
    /// Value of the discriminant field.
    pub tag: String,
    /// All remaining fields, untouched.
    pub fields: Map<String, Value>,
}

impl UnknownFrame {
    pub fn new(tag: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            tag: tag.into(),
            fields,
        }
    }

    /// Look up a raw field by wire name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub(crate) fn serialize_as<S: Serializer>(
        &self,
        serializer: S,
        discriminant: &str,
    ) -> Result<S::Ok, S::Error> {
        let mut map = self.fields.clone();
        map.insert(discriminant.to_string(), Value::String(self.tag.clone()));
        map.serialize(serializer)
    }
}

/// Remove the discriminant field from `fields` and return its value.
pub(crate) fn take_tag(fields: &mut Map<String, Value>, discriminant: &str) -> Result<String, String> {
    match fields.remove(discriminant) {
        Some(Value::String(tag)) => Ok(tag),
        Some(other) => Err(format!("`{discriminant}` must be a string, got {other}")),
        None => Err(format!("missing `{discriminant}` field")),
    }
}

/// Decode a variant payload from the fields left once the tag is gone.
pub(crate) fn from_fields<T: DeserializeOwned>(
    fields: Map<String, Value>,
) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(fields))
}

pub(crate) fn to_fields<T: Serialize>(payload: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(payload)? {
        Value::Object(map) => Ok(map),
        other => Err(serde_json::Error::custom(format!(
            "payload must serialize to an object, got {other}"
        ))),
    }
}

/// Serialize `payload` as one flat object with `discriminant: tag` merged in.
pub(crate) fn serialize_tagged<S, T>(
    serializer: S,
    discriminant: &str,
    tag: &str,
    payload: &T,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut map = to_fields(payload).map_err(S::Error::custom)?;
    map.insert(discriminant.to_string(), Value::String(tag.to_string()));
    map.serialize(serializer)
}
