//! Message shapes: client messages, server responses, notification events and
//! bus messages.

pub mod bus;
pub mod client;
pub mod event;
pub mod response;
pub mod unknown;

pub use bus::*;
pub use client::*;
pub use event::*;
pub use response::*;
pub use unknown::UnknownFrame;

use chrono::{SecondsFormat, Utc};

/// Current UTC time as RFC 3339 with millisecond precision.
///
/// Timestamps are opaque strings on the wire; this is only the format the
/// constructors in this crate stamp by default.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
