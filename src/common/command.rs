//! SEN0609 command definitions.
//!
//! The sensor speaks a plain ASCII command language; every command is a single
//! line terminated by `<CR><LF>` (the terminator is added by the driver, not here).

use arrayvec::ArrayString;
use core::fmt::{self, Write};

/// Capacity of a formatted command line, excluding `<CR><LF>`.
pub const COMMAND_CAPACITY: usize = 48;

/// Stack buffer holding one formatted command.
pub type CommandBuffer = ArrayString<COMMAND_CAPACITY>;

/// Error produced while rendering a command into a [`CommandBuffer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum CommandFormatError {
    #[error("Command does not fit the command buffer")]
    BufferOverflow,
}

/// Fixed-point decimal as the sensor expects it: exactly one fractional digit.
///
/// The conversions truncate; `Centi(305)` renders as `3.0`, not `3.1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Decimal {
    /// Value in hundredths of the sensor unit (cm for metres, 10 ms for seconds).
    Centi(u16),
    /// Value in halves of the sensor unit (500 ms for seconds).
    Half(u16),
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Decimal::Centi(v) => write!(f, "{}.{}", v / 100, (v / 10) % 10),
            Decimal::Half(v) => write!(f, "{}.{}", v / 2, (v % 2) * 5),
        }
    }
}

/// Represents a SEN0609 command.
///
/// The `Display` implementation generates the exact command text sent on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// `sensorStop` - halts detection; required before changing settings.
    SensorStop,
    /// `sensorStart` - resumes detection.
    SensorStart,
    /// `setRunApp <n>` - selects the sensor's run mode.
    SetRunApp(u8),
    /// `setRange <min> <max>` - detection window in metres.
    SetRange { min_cm: u16, max_cm: u16 },
    /// `setTrigRange <trig>` - trigger distance in metres.
    SetTrigRange { trig_cm: u16 },
    /// `setSensitivity <keep> <trig>` - note the keep value goes first.
    SetSensitivity { keep: u8, trig: u8 },
    /// `setLatency <delay> <timeout>` - both in seconds.
    SetLatency { trig_delay: u8, keep_timeout: u16 },
    /// `setGpioLevel <p>` - output pin polarity.
    SetGpioLevel(u8),
    /// `setMicroMotion <0|1>` - micromotion (fretting) detection.
    SetMicroMotion(bool),
    /// `saveConfig` - persists the current settings to sensor flash.
    SaveConfig,

    /// `getRange` - replies `Response <min> <max>`.
    GetRange,
    /// `getTrigRange` - replies `Response <trig>`.
    GetTrigRange,
    /// `getSensitivity` - replies `Response <keep> <trig>`.
    GetSensitivity,
    /// `getLatency` - replies `Response <delay> <timeout>`.
    GetLatency,
    /// `getGpioMode <pin>` - replies `Response <pin> <polarity>`.
    GetGpioMode(u8),
    /// `getMicroMotion` - replies `Response <0|1>`.
    GetMicroMotion,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Command::SensorStop => f.write_str("sensorStop"),
            Command::SensorStart => f.write_str("sensorStart"),
            Command::SetRunApp(mode) => write!(f, "setRunApp {}", mode),
            Command::SetRange { min_cm, max_cm } => {
                write!(f, "setRange {} {}", Decimal::Centi(min_cm), Decimal::Centi(max_cm))
            }
            Command::SetTrigRange { trig_cm } => {
                write!(f, "setTrigRange {}", Decimal::Centi(trig_cm))
            }
            Command::SetSensitivity { keep, trig } => write!(f, "setSensitivity {} {}", keep, trig),
            Command::SetLatency { trig_delay, keep_timeout } => write!(
                f,
                "setLatency {} {}",
                Decimal::Centi(trig_delay as u16),
                Decimal::Half(keep_timeout)
            ),
            Command::SetGpioLevel(polarity) => write!(f, "setGpioLevel {}", polarity),
            Command::SetMicroMotion(enabled) => write!(f, "setMicroMotion {}", enabled as u8),
            Command::SaveConfig => f.write_str("saveConfig"),
            Command::GetRange => f.write_str("getRange"),
            Command::GetTrigRange => f.write_str("getTrigRange"),
            Command::GetSensitivity => f.write_str("getSensitivity"),
            Command::GetLatency => f.write_str("getLatency"),
            Command::GetGpioMode(pin) => write!(f, "getGpioMode {}", pin),
            Command::GetMicroMotion => f.write_str("getMicroMotion"),
        }
    }
}

impl Command {
    /// Renders the command text into a stack buffer.
    pub fn format_into(&self) -> Result<CommandBuffer, CommandFormatError> {
        let mut buffer = CommandBuffer::new();
        write!(buffer, "{}", self).map_err(|_| CommandFormatError::BufferOverflow)?;
        Ok(buffer)
    }

    /// True for the `get*` commands, which the sensor answers with a `Response` line.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Command::GetRange
                | Command::GetTrigRange
                | Command::GetSensitivity
                | Command::GetLatency
                | Command::GetGpioMode(_)
                | Command::GetMicroMotion
        )
    }
}
