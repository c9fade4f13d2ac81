// src/common/response/error.rs

use core::fmt;

/// Why a single numeric token of a `Response` line could not be read.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldParseError {
    /// Token bytes are not valid UTF-8.
    InvalidUtf8,
    /// Token has no leading decimal number.
    NotANumber,
}

impl From<core::str::Utf8Error> for FieldParseError {
    fn from(_: core::str::Utf8Error) -> Self {
        FieldParseError::InvalidUtf8
    }
}

impl From<core::num::ParseFloatError> for FieldParseError {
    fn from(_: core::num::ParseFloatError) -> Self {
        FieldParseError::NotANumber
    }
}

impl fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldParseError::InvalidUtf8 => write!(f, "Reply field is not valid UTF-8"),
            FieldParseError::NotANumber => write!(f, "Reply field is not a number"),
        }
    }
}

impl core::error::Error for FieldParseError {}
