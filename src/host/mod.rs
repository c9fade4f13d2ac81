// src/host/mod.rs
//
// Glue between the driver and a wireless stack that exposes the sensor as an
// Occupancy Sensing endpoint with writable configuration attributes.

pub mod attributes;

pub use attributes::{
    AttributeError, AttributeId, AttributeType, AttributeValue, OccupancyAttributes,
    SettingGroup, OCCUPANCY_ATTRIBUTE,
};

use crate::common::{
    config::{DriverConfig, SerialSettings},
    hal_traits::{SensorPort, SensorSerial, SensorTimer},
    types::PresenceConfig,
};
use crate::driver::PresenceSensor;
use log::{debug, info, warn};

/// On/Off request the endpoint should send to its bound light.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SwitchCommand {
    On,
    Off,
}

/// Outcome of one [`SensorEndpoint::occupancy_tick`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct OccupancyUpdate {
    /// Occupancy attribute after the tick, 0 or 1.
    pub occupancy: u8,
    /// The attribute changed and should be reported.
    pub changed: bool,
    pub command: Option<SwitchCommand>,
}

/// The sensor as seen from the network: driver plus attribute mirror.
#[derive(Debug)]
pub struct SensorEndpoint<IF>
where
    IF: SensorSerial + SensorTimer,
{
    sensor: PresenceSensor<IF>,
    attrs: OccupancyAttributes,
}

impl<IF> SensorEndpoint<IF>
where
    IF: SensorSerial + SensorTimer,
{
    /// Opens the sensor UART and brings the sensor to its startup settings.
    ///
    /// With the transport open, [`PresenceConfig::STARTUP`] is written and the
    /// full configuration read back. Either way the cached configuration is
    /// published to the attribute mirror.
    pub fn init<P>(port: &mut P, settings: &SerialSettings, config: DriverConfig) -> Self
    where
        P: SensorPort<Interface = IF>,
    {
        let mut sensor = PresenceSensor::open(port, settings, config);
        if sensor.is_available() {
            sensor.apply_full_config(&PresenceConfig::STARTUP);
            sensor.read_full_config();
        }
        Self::from_sensor(sensor)
    }

    /// Wraps a driver that is already set up, publishing its cached configuration.
    pub fn from_sensor(sensor: PresenceSensor<IF>) -> Self {
        let mut attrs = OccupancyAttributes::default();
        attrs.publish(&sensor.get_config());
        attrs.occupancy = sensor.get_presence() as u8;
        SensorEndpoint { sensor, attrs }
    }

    pub fn sensor(&self) -> &PresenceSensor<IF> {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut PresenceSensor<IF> {
        &mut self.sensor
    }

    pub fn into_sensor(self) -> PresenceSensor<IF> {
        self.sensor
    }

    /// Handles a network write to one of the sensor attributes.
    ///
    /// `new_value` is the little-endian encoding of the attribute's type. The
    /// value lands in the mirror, the whole setting group it belongs to is sent
    /// to the sensor, and the mirror is then refreshed from what the sensor
    /// reports. Rejected writes never reach the sensor.
    pub fn write_attr_hook(&mut self, attr_id: u16, new_value: &[u8]) -> Result<(), AttributeError> {
        let attr = AttributeId::new(attr_id).map_err(|e| {
            warn!("write to unhandled attribute 0x{:04x}", attr_id);
            e
        })?;
        let value = AttributeValue::decode(attr, new_value)?;
        info!("attribute write {:?} = {:?}", attr, value);
        self.attrs.store(attr, value);

        let a = self.attrs;
        match attr.group() {
            SettingGroup::Range => self.sensor.set_range(a.range_min, a.range_max, a.trigger_range),
            SettingGroup::Sensitivity => {
                self.sensor.set_sensitivity(a.trigger_sensitivity, a.keep_sensitivity)
            }
            SettingGroup::Latency => self.sensor.set_latency(a.trigger_delay, a.keep_timeout),
            SettingGroup::IoPolarity => self.sensor.set_io_polarity(a.io_polarity),
            SettingGroup::Fretting => self.sensor.set_fretting(a.fretting),
        }

        self.sync_from_sensor();
        Ok(())
    }

    /// Re-reads the sensor configuration into the mirror.
    pub fn sync_from_sensor(&mut self) -> PresenceConfig {
        let cfg = self.sensor.read_full_config();
        self.attrs.publish(&cfg);
        cfg
    }

    pub fn attributes(&self) -> OccupancyAttributes {
        self.attrs
    }

    /// Main-loop hook; cheap when nothing is pending.
    pub fn poll(&mut self) {
        self.sensor.poll_presence();
    }

    pub fn presence(&self) -> bool {
        self.sensor.get_presence()
    }

    /// Periodic occupancy handler, run every
    /// [`OCCUPANCY_TICK_INTERVAL`](crate::common::timing::OCCUPANCY_TICK_INTERVAL).
    ///
    /// Refreshes the occupancy attribute and decides whether the bound light
    /// needs switching. Nothing is requested while an earlier On/Off command is
    /// still in flight.
    pub fn occupancy_tick(&mut self, light_on: bool, command_in_progress: bool) -> OccupancyUpdate {
        let present = self.presence();
        let occupancy = present as u8;
        let changed = occupancy != self.attrs.occupancy;
        if changed {
            info!("occupancy {} -> {}", self.attrs.occupancy, occupancy);
            self.attrs.occupancy = occupancy;
        }

        let command = match (present, light_on, command_in_progress) {
            (true, false, false) => Some(SwitchCommand::On),
            (false, true, false) => Some(SwitchCommand::Off),
            _ => None,
        };
        if let Some(cmd) = command {
            debug!("requesting light {:?}", cmd);
        }

        OccupancyUpdate { occupancy, changed, command }
    }
}
