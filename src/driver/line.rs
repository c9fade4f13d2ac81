// src/driver/line.rs

use crate::common::{hal_traits::SensorSerial, timing::LINE_CAPACITY};
use log::warn;

/// A completed line, terminator stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line(heapless::Vec<u8, LINE_CAPACITY>);

impl Line {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Assembles unsolicited sensor output into lines.
///
/// Lines end at CR, LF or NUL. A line longer than [`LINE_CAPACITY`] is thrown
/// away in full: once the buffer overflows, every byte up to and including the
/// next terminator is dropped, so a truncated tail is never mistaken for a line.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buffer: heapless::Vec<u8, LINE_CAPACITY>,
    discarding: bool,
}

#[inline]
fn is_terminator(byte: u8) -> bool {
    matches!(byte, b'\r' | b'\n' | b'\0')
}

impl LineAssembler {
    pub const fn new() -> Self {
        LineAssembler {
            buffer: heapless::Vec::new(),
            discarding: false,
        }
    }

    /// Drops any partial line and leaves overflow recovery.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Bytes of the line currently being assembled.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes one byte; returns the line it completes, if any.
    ///
    /// Empty lines (the LF of a CRLF pair, for instance) are never returned.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        if is_terminator(byte) {
            let overflowed = core::mem::replace(&mut self.discarding, false);
            if overflowed || self.buffer.is_empty() {
                self.buffer.clear();
                return None;
            }
            let line = Line(self.buffer.clone());
            self.buffer.clear();
            return Some(line);
        }

        if self.discarding {
            return None;
        }

        if self.buffer.push(byte).is_err() {
            warn!("line buffer overflow, dropping {} bytes", self.buffer.len());
            self.buffer.clear();
            self.discarding = true;
        }
        None
    }

    /// Reads from `serial` until a line completes or nothing more is pending.
    ///
    /// Never blocks. Bytes after the returned line's terminator stay in the
    /// transport for the next call. A transport error ends the read like an
    /// empty receive buffer would.
    pub fn feed<S: SensorSerial>(&mut self, serial: &mut S) -> Option<Line> {
        loop {
            match serial.read_byte() {
                Ok(byte) => {
                    if let Some(line) = self.push(byte) {
                        return Some(line);
                    }
                }
                Err(nb::Error::WouldBlock) => return None,
                Err(nb::Error::Other(e)) => {
                    warn!("UART read error while polling: {:?}", e);
                    return None;
                }
            }
        }
    }
}
