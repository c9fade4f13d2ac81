// src/common/timing.rs

use core::time::Duration;

// The sensor has no completion signal for commands: the only way to know it
// has processed one is to give it time. These are the nominal waits.

// === Command/Response Timing ===

/// Wait after a fire-and-forget command (stop, start, set*, save).
pub const SEND_SETTLE: Duration = Duration::from_millis(200);
/// Wait between writing a query and reading its reply.
pub const QUERY_SETTLE: Duration = Duration::from_millis(100);
/// How long a single byte write may keep returning `WouldBlock` before it is abandoned.
pub const WRITE_STALL_TIMEOUT: Duration = Duration::from_millis(50);
/// Back-off between `WouldBlock` retries while writing.
pub const WRITE_RETRY_INTERVAL: Duration = Duration::from_micros(100);

// === Buffers ===

/// Capacity of the unsolicited-sentence line buffer.
pub const LINE_CAPACITY: usize = 32;
/// Maximum number of reply bytes collected for a single query.
pub const REPLY_CAPACITY: usize = 63;

// === Host Scheduling ===

/// Interval at which the host runs the occupancy tick.
pub const OCCUPANCY_TICK_INTERVAL: Duration = Duration::from_secs(1);

// === Serial Line ===

/// Factory baud rate of the sensor UART (8N1).
pub const DEFAULT_BAUD_RATE: u32 = 9600;
