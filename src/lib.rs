// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)] // no_std unless testing or std is requested

pub mod common;
pub mod driver;
pub mod host;

// Re-export key types for convenience
pub use common::{PresenceConfig, PresenceError, QueryResponse};
pub use driver::PresenceSensor;
pub use host::SensorEndpoint;
