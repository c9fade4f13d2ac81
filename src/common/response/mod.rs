// src/common/response/mod.rs

mod error;
pub mod parse; // Make parse functions public

// Re-export items for external use
pub use error::FieldParseError;
pub use parse::{parse_reply, REPLY_MARKER};

/// The (up to) two numeric fields following the `Response` marker.
///
/// Slots the sensor did not fill are `0.0`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ReplyFields {
    pub first: f32,
    pub second: f32,
}

/// Outcome of scanning a raw reply buffer.
///
/// Lenient by policy: once the marker is present the reply counts as an
/// acknowledgement, and any field that is missing or unreadable reads as `0.0`.
/// `Malformed` only records that the defaulting happened on a token that was
/// actually there, so it can be logged.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Reply {
    /// Marker found and every present field parsed.
    Fields(ReplyFields),
    /// Marker found, at least one present field was unreadable and defaulted to `0.0`.
    Malformed(ReplyFields),
    /// No `Response` marker in the buffer.
    NotFound,
}

impl Reply {
    /// Fields of an acknowledged reply, `None` for [`Reply::NotFound`].
    pub fn fields(&self) -> Option<ReplyFields> {
        match *self {
            Reply::Fields(fields) | Reply::Malformed(fields) => Some(fields),
            Reply::NotFound => None,
        }
    }
}

/// Result of one query, consumed immediately by the settings sequencer.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct QueryResponse {
    /// The sensor answered with a `Response` line.
    pub ok: bool,
    pub field1: f32,
    pub field2: f32,
}

impl QueryResponse {
    /// Response reported when the sensor did not answer (or could not be asked).
    pub const FAILED: QueryResponse = QueryResponse { ok: false, field1: 0.0, field2: 0.0 };
}

impl From<Reply> for QueryResponse {
    fn from(reply: Reply) -> Self {
        match reply.fields() {
            Some(fields) => QueryResponse { ok: true, field1: fields.first, field2: fields.second },
            None => QueryResponse::FAILED,
        }
    }
}
