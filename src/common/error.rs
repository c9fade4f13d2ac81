// src/common/error.rs

use super::command::CommandFormatError;

/// Errors raised inside the driver's I/O helpers.
///
/// None of these escape the public sensor operations: the sequencer logs them
/// and falls back to cached or default values instead.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError<E = ()>
where
    E: core::fmt::Debug, // Still need Debug for the generic Io error
{
    /// Underlying I/O error from the transport implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The serial port was never opened.
    #[error("Transport unavailable")]
    TransportUnavailable,

    /// The transport kept refusing bytes past the write stall timeout.
    #[error("Write stalled")]
    WriteStalled,

    /// Command text did not fit the command buffer.
    #[error("Command formatting failed: {0}")]
    CommandFormatFailed(#[from] CommandFormatError),
}

impl<E: core::fmt::Debug> PresenceError<E> {
    /// Maps a non-blocking transport error, treating `WouldBlock` as a stall.
    pub fn from_nb(err: nb::Error<E>) -> Self {
        match err {
            nb::Error::WouldBlock => PresenceError::WriteStalled,
            nb::Error::Other(e) => PresenceError::Io(e),
        }
    }
}
