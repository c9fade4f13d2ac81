// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod hal_traits;
pub mod response;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{Command, CommandBuffer, CommandFormatError, Decimal};

// From config.rs
pub use config::{DriverConfig, SerialSettings};

// From error.rs
pub use error::PresenceError;

// From event.rs
pub use event::{parse_event_line, PresenceEvent};

// From hal_traits.rs
pub use hal_traits::{SensorPort, SensorSerial, SensorTimer};

// From response/mod.rs (and its sub-modules via its own `pub use`)
pub use response::{parse_reply, QueryResponse, Reply, ReplyFields, REPLY_MARKER};

// From types.rs
pub use types::PresenceConfig;

// Timing constants stay under common::timing::*

#[cfg(feature = "impl-embedded-hal")]
pub use hal_traits::HalDelay;
