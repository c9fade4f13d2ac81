// src/common/config.rs

use super::timing;
use core::time::Duration;

/// Serial line parameters handed to [`SensorPort::open`](super::SensorPort::open).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    /// Reads must return `WouldBlock` instead of waiting for a byte.
    pub non_blocking_reads: bool,
}

impl Default for SerialSettings {
    fn default() -> Self {
        SerialSettings {
            baud_rate: timing::DEFAULT_BAUD_RATE,
            non_blocking_reads: true,
        }
    }
}

/// Tunable waits of the command/response channel.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DriverConfig {
    /// Sleep after every fire-and-forget command.
    pub send_settle: Duration,
    /// Sleep between a query and reading its reply.
    pub query_settle: Duration,
    /// Give up on a byte write after this long of `WouldBlock`.
    pub write_stall_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            send_settle: timing::SEND_SETTLE,
            query_settle: timing::QUERY_SETTLE,
            write_stall_timeout: timing::WRITE_STALL_TIMEOUT,
        }
    }
}

impl DriverConfig {
    /// Number of `WouldBlock` retries a byte write gets before it is abandoned.
    pub fn write_retry_budget(&self) -> u32 {
        let interval = timing::WRITE_RETRY_INTERVAL.as_micros().max(1);
        (self.write_stall_timeout.as_micros() / interval).min(u32::MAX as u128) as u32
    }
}
