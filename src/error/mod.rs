//! Error types for decoding and encoding protocol frames.

use thiserror::Error;

/// Failures when a frame cannot be matched structurally.
///
/// An unrecognized discriminant value is not an error: it decodes to the
/// `Unknown` variant of the relevant union.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Frame is not a JSON object")]
    NotAnObject,

    #[error("Frame has no `action`, `eventType` or `type` field")]
    MissingDiscriminant,
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
