// src/driver/mod.rs

mod io_helpers;
pub mod line;
mod settings;

#[cfg(test)]
pub(crate) mod mock;

pub use line::{Line, LineAssembler};

use crate::common::{
    config::{DriverConfig, SerialSettings},
    event::parse_event_line,
    hal_traits::{SensorPort, SensorSerial, SensorTimer},
    types::PresenceConfig,
};
use log::{info, trace, warn};

/// Driver for one SEN0609 presence sensor on a dedicated UART.
///
/// Owns the transport, the cached configuration and the presence flag. Every
/// operation takes `&mut self`, so the command channel and the unsolicited
/// event path can never interleave on the wire. Hosts with several threads
/// have to put the whole driver behind their own lock.
///
/// A driver built without a transport (see [`PresenceSensor::unavailable`])
/// still answers every call: commands become no-ops, queries fail, and reads
/// return the cached values.
#[derive(Debug)]
pub struct PresenceSensor<IF>
where
    IF: SensorSerial + SensorTimer,
{
    interface: Option<IF>,
    config: DriverConfig,
    cache: PresenceConfig,
    presence: bool,
    lines: LineAssembler,
}

impl<IF> PresenceSensor<IF>
where
    IF: SensorSerial + SensorTimer,
{
    pub fn new(interface: IF, config: DriverConfig) -> Self {
        Self::with_interface(Some(interface), config)
    }

    /// Driver whose transport never opened.
    pub fn unavailable(config: DriverConfig) -> Self {
        Self::with_interface(None, config)
    }

    /// Opens the transport through `port`; a failed open yields an unavailable driver.
    pub fn open<P>(port: &mut P, settings: &SerialSettings, config: DriverConfig) -> Self
    where
        P: SensorPort<Interface = IF>,
    {
        let interface = port.open(settings);
        if interface.is_none() {
            warn!("sensor UART failed to open at {} baud", settings.baud_rate);
        }
        Self::with_interface(interface, config)
    }

    fn with_interface(interface: Option<IF>, config: DriverConfig) -> Self {
        PresenceSensor {
            interface,
            config,
            cache: PresenceConfig::default(),
            presence: false,
            lines: LineAssembler::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.interface.is_some()
    }

    pub fn driver_config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn interface(&self) -> Option<&IF> {
        self.interface.as_ref()
    }

    pub fn interface_mut(&mut self) -> Option<&mut IF> {
        self.interface.as_mut()
    }

    /// Hands the transport back, dropping the driver state.
    pub fn release(self) -> Option<IF> {
        self.interface
    }

    /// Cached configuration. Never touches the serial link.
    pub fn get_config(&self) -> PresenceConfig {
        self.cache
    }

    /// Presence as last reported by the sensor.
    pub fn get_presence(&self) -> bool {
        self.presence
    }

    /// Decodes any unsolicited sentences waiting in the UART.
    ///
    /// Call this on every main-loop iteration. It reads until the transport has
    /// nothing pending, updating the presence flag for each recognised sentence
    /// and silently dropping every other line.
    pub fn poll_presence(&mut self) {
        while let Some(line) = self
            .interface
            .as_mut()
            .and_then(|iface| self.lines.feed(iface))
        {
            self.apply_event_line(line.as_bytes());
        }
    }

    /// Updates the presence flag if `line` is one of the two event sentences.
    pub(crate) fn apply_event_line(&mut self, line: &[u8]) -> bool {
        match parse_event_line(line) {
            Some(event) => {
                let present = event.is_present();
                if present != self.presence {
                    info!("presence {}", if present { "asserted" } else { "cleared" });
                }
                self.presence = present;
                true
            }
            None => {
                trace!("dropping line {:?}", line);
                false
            }
        }
    }
}
