// src/common/response/parse.rs

use super::error::FieldParseError;
use super::{Reply, ReplyFields};

use core::str::{self, FromStr};

/// Token that opens every reply carrying data.
pub const REPLY_MARKER: &[u8] = b"Response";

// --- Internal Helpers ---

#[inline]
fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\r' | b'\n' | b'\0')
}

#[inline]
fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')
}

fn find_marker(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(REPLY_MARKER.len())
        .position(|window| window == REPLY_MARKER)
}

/// Reads the longest leading decimal number of a token, so `"6.0*"` reads as `6.0`.
fn parse_field(token: &[u8]) -> Result<f32, FieldParseError> {
    let text = str::from_utf8(token)?;
    let end = text.find(|c: char| !is_numeric_char(c)).unwrap_or(text.len());
    let candidate = &text[..end];

    // Back off one char at a time: "1.5e" or "2-" still carry a usable prefix.
    (1..=candidate.len())
        .rev()
        .find_map(|len| f32::from_str(&candidate[..len]).ok())
        .ok_or(FieldParseError::NotANumber)
}

// --- Public Parsing Functions ---

/// Scans a raw reply buffer for `Response <v1> <v2>`.
///
/// The marker may appear anywhere (echoes or noise can precede it). Tokens are
/// separated by space, CR, LF or NUL; runs of separators count as one. The
/// first token (the marker itself) is skipped and the next two are read as
/// floats. Anything after them is ignored.
pub fn parse_reply(buffer: &[u8]) -> Reply {
    let Some(start) = find_marker(buffer) else {
        return Reply::NotFound;
    };

    let mut tokens = buffer[start..]
        .split(|b| is_separator(*b))
        .filter(|token| !token.is_empty());
    tokens.next(); // the marker token

    let mut fields = ReplyFields::default();
    let mut malformed = false;

    for slot in [&mut fields.first, &mut fields.second] {
        let Some(token) = tokens.next() else { break };
        match parse_field(token) {
            Ok(value) => *slot = value,
            Err(_) => malformed = true, // slot stays 0.0
        }
    }

    if malformed {
        Reply::Malformed(fields)
    } else {
        Reply::Fields(fields)
    }
}
