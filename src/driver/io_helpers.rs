// src/driver/io_helpers.rs

use super::PresenceSensor; // Access PresenceSensor definition
use crate::common::{
    command::Command,
    error::PresenceError,
    hal_traits::{SensorSerial, SensorTimer},
    response::{parse_reply, QueryResponse, Reply},
    timing,
};
use arrayvec::ArrayVec;
use core::time::Duration;
use log::{debug, trace, warn};
use nb::Result as NbResult;

const LINE_END: &[u8] = b"\r\n";

#[inline]
fn duration_ms(d: Duration) -> u32 {
    d.as_millis().min(u32::MAX as u128) as u32
}

/// Retries a non-blocking write-side operation while it returns `WouldBlock`,
/// backing off between attempts, for at most `budget` retries.
fn retry_write<IF, T, FN>(
    iface: &mut IF,
    budget: u32,
    mut f: FN,
) -> Result<T, PresenceError<IF::Error>>
where
    IF: SensorSerial + SensorTimer,
    FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
{
    let mut retries = 0;
    loop {
        match f(iface) {
            Ok(result) => return Ok(result),
            Err(nb::Error::WouldBlock) if retries < budget => {
                retries += 1;
                iface.delay_us(timing::WRITE_RETRY_INTERVAL.as_micros() as u32);
            }
            Err(e) => return Err(PresenceError::from_nb(e)),
        }
    }
}

// Implementation block for the command/response channel
impl<IF> PresenceSensor<IF>
where
    IF: SensorSerial + SensorTimer,
{
    /// Sends a command without waiting for a reply, then lets the sensor settle.
    ///
    /// Transport errors are logged and otherwise ignored; there is no way to
    /// tell whether the sensor acted on the command.
    pub fn send(&mut self, command: Command) {
        match command.format_into() {
            Ok(text) => self.send_text(&text),
            Err(e) => warn!("cannot send {:?}: {}", command, e),
        }
    }

    /// [`send`](Self::send) for raw command text.
    pub fn send_text(&mut self, text: &str) {
        if self.interface.is_none() {
            return;
        }
        debug!("send {:?}", text);
        if let Err(e) = self.write_line(text.as_bytes()) {
            warn!("write of {:?} failed: {:?}", text, e);
        }
        let settle = duration_ms(self.config.send_settle);
        if let Some(iface) = self.interface.as_mut() {
            iface.delay_ms(settle);
        }
    }

    /// Sends a query and reads the sensor's `Response` line.
    ///
    /// Returns `ok: false` when the reply carries no `Response` marker or the
    /// transport is unavailable. Never retries.
    pub fn query(&mut self, command: Command) -> QueryResponse {
        match command.format_into() {
            Ok(text) => self.query_text(&text),
            Err(e) => {
                warn!("cannot query {:?}: {}", command, e);
                QueryResponse::FAILED
            }
        }
    }

    /// [`query`](Self::query) for raw command text.
    pub fn query_text(&mut self, text: &str) -> QueryResponse {
        if self.interface.is_none() {
            return QueryResponse::FAILED;
        }

        self.drain();
        if let Err(e) = self.write_line(text.as_bytes()) {
            warn!("write of {:?} failed: {:?}", text, e);
        }
        let settle = duration_ms(self.config.query_settle);
        if let Some(iface) = self.interface.as_mut() {
            iface.delay_ms(settle);
        }

        let raw = self.read_reply();
        self.scan_reply_for_events(&raw);

        let reply = parse_reply(&raw);
        match reply {
            Reply::Fields(fields) => debug!("{:?} -> {} {}", text, fields.first, fields.second),
            Reply::Malformed(fields) => warn!(
                "{:?} -> malformed reply {:?}, read as {} {}",
                text, raw.as_slice(), fields.first, fields.second
            ),
            Reply::NotFound => warn!("{:?} not acknowledged ({} bytes)", text, raw.len()),
        }
        QueryResponse::from(reply)
    }

    // --- Low-Level I/O Helpers (Private) ---

    /// Writes `text` followed by `<CR><LF>` and flushes.
    fn write_line(&mut self, text: &[u8]) -> Result<(), PresenceError<IF::Error>> {
        let budget = self.config.write_retry_budget();
        let iface = self
            .interface
            .as_mut()
            .ok_or(PresenceError::TransportUnavailable)?;

        for byte in text.iter().chain(LINE_END) {
            retry_write(&mut *iface, budget, |iface| iface.write_byte(*byte))?;
        }
        retry_write(&mut *iface, budget, |iface| iface.flush())?;
        Ok(())
    }

    /// Empties the receive buffer before a query.
    ///
    /// Drained bytes still pass through the line assembler, so a presence
    /// sentence that arrived just before the query is not lost. Whatever partial
    /// line is left afterwards is stale and gets dropped.
    fn drain(&mut self) -> usize {
        let mut drained = 0;
        while let Some(iface) = self.interface.as_mut() {
            match iface.read_byte() {
                Ok(byte) => {
                    drained += 1;
                    if let Some(line) = self.lines.push(byte) {
                        self.apply_event_line(line.as_bytes());
                    }
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => {
                    warn!("UART read error while draining: {:?}", e);
                    break;
                }
            }
        }
        self.lines.reset();
        if drained > 0 {
            trace!("drained {} stale bytes", drained);
        }
        drained
    }

    /// Collects reply bytes until the transport is empty or the buffer is full.
    fn read_reply(&mut self) -> ArrayVec<u8, { timing::REPLY_CAPACITY }> {
        let mut raw = ArrayVec::new();
        let Some(iface) = self.interface.as_mut() else {
            return raw;
        };
        while !raw.is_full() {
            match iface.read_byte() {
                Ok(byte) => raw.push(byte),
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => {
                    warn!("UART read error while reading reply: {:?}", e);
                    break;
                }
            }
        }
        trace!("reply bytes {:?}", raw.as_slice());
        raw
    }

    /// Applies presence sentences that arrived in the middle of a reply.
    ///
    /// Only terminated lines are considered; the unterminated tail is left alone.
    fn scan_reply_for_events(&mut self, raw: &[u8]) {
        let Some(last_end) = raw.iter().rposition(|b| matches!(b, b'\r' | b'\n' | b'\0')) else {
            return;
        };
        for line in raw[..last_end].split(|b| matches!(b, b'\r' | b'\n' | b'\0')) {
            if !line.is_empty() && crate::common::event::parse_event_line(line).is_some() {
                self.apply_event_line(line);
            }
        }
    }
}
