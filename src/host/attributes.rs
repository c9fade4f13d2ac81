// src/host/attributes.rs

use crate::common::types::PresenceConfig;
use core::convert::TryFrom;

/// Custom sensor attributes on the Occupancy Sensing cluster (0xE000-0xE008).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u16)]
pub enum AttributeId {
    RangeMin = 0xE000,
    RangeMax = 0xE001,
    TriggerRange = 0xE002,
    TriggerSensitivity = 0xE003,
    KeepSensitivity = 0xE004,
    TriggerDelay = 0xE005,
    KeepTimeout = 0xE006,
    IoPolarity = 0xE007,
    Fretting = 0xE008,
}

/// Standard Occupancy attribute (bitmap8, bit 0 = occupied).
pub const OCCUPANCY_ATTRIBUTE: u16 = 0x0000;

/// Wire type of an attribute value.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AttributeType {
    U8,
    U16,
    Bool,
}

impl AttributeType {
    /// Encoded size in bytes.
    pub const fn width(self) -> usize {
        match self {
            AttributeType::U16 => 2,
            AttributeType::U8 | AttributeType::Bool => 1,
        }
    }
}

/// Settings that are written to the sensor together.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SettingGroup {
    Range,
    Sensitivity,
    Latency,
    IoPolarity,
    Fretting,
}

impl AttributeId {
    pub const ALL: [AttributeId; 9] = [
        AttributeId::RangeMin,
        AttributeId::RangeMax,
        AttributeId::TriggerRange,
        AttributeId::TriggerSensitivity,
        AttributeId::KeepSensitivity,
        AttributeId::TriggerDelay,
        AttributeId::KeepTimeout,
        AttributeId::IoPolarity,
        AttributeId::Fretting,
    ];

    pub fn new(id: u16) -> Result<Self, AttributeError> {
        Self::ALL
            .iter()
            .copied()
            .find(|attr| attr.id() == id)
            .ok_or(AttributeError::UnknownAttribute(id))
    }

    #[inline]
    pub const fn id(self) -> u16 {
        self as u16
    }

    pub const fn attr_type(self) -> AttributeType {
        match self {
            AttributeId::RangeMin
            | AttributeId::RangeMax
            | AttributeId::TriggerRange
            | AttributeId::KeepTimeout => AttributeType::U16,
            AttributeId::TriggerSensitivity
            | AttributeId::KeepSensitivity
            | AttributeId::TriggerDelay
            | AttributeId::IoPolarity => AttributeType::U8,
            AttributeId::Fretting => AttributeType::Bool,
        }
    }

    pub const fn group(self) -> SettingGroup {
        match self {
            AttributeId::RangeMin | AttributeId::RangeMax | AttributeId::TriggerRange => {
                SettingGroup::Range
            }
            AttributeId::TriggerSensitivity | AttributeId::KeepSensitivity => {
                SettingGroup::Sensitivity
            }
            AttributeId::TriggerDelay | AttributeId::KeepTimeout => SettingGroup::Latency,
            AttributeId::IoPolarity => SettingGroup::IoPolarity,
            AttributeId::Fretting => SettingGroup::Fretting,
        }
    }
}

impl TryFrom<u16> for AttributeId {
    type Error = AttributeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AttributeId> for u16 {
    fn from(value: AttributeId) -> Self {
        value.id()
    }
}

/// Rejected attribute write.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("Unknown attribute 0x{0:04x}")]
    UnknownAttribute(u16),

    #[error("Attribute 0x{attribute:04x} expects {expected} bytes, got {got}")]
    InvalidLength {
        attribute: u16,
        expected: usize,
        got: usize,
    },
}

/// A decoded attribute value.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AttributeValue {
    U8(u8),
    U16(u16),
    Bool(bool),
}

impl AttributeValue {
    /// Decodes a little-endian value of `attr`'s type.
    pub fn decode(attr: AttributeId, bytes: &[u8]) -> Result<Self, AttributeError> {
        let ty = attr.attr_type();
        if bytes.len() != ty.width() {
            return Err(AttributeError::InvalidLength {
                attribute: attr.id(),
                expected: ty.width(),
                got: bytes.len(),
            });
        }
        Ok(match ty {
            AttributeType::U16 => AttributeValue::U16(u16::from_le_bytes([bytes[0], bytes[1]])),
            AttributeType::U8 => AttributeValue::U8(bytes[0]),
            AttributeType::Bool => AttributeValue::Bool(bytes[0] != 0),
        })
    }
}

/// Host-side copy of the sensor attributes, as the network sees them.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct OccupancyAttributes {
    /// Occupancy bitmap, 0 or 1.
    pub occupancy: u8,
    pub range_min: u16,
    pub range_max: u16,
    pub trigger_range: u16,
    pub trigger_sensitivity: u8,
    pub keep_sensitivity: u8,
    pub trigger_delay: u8,
    pub keep_timeout: u16,
    pub io_polarity: u8,
    pub fretting: bool,
}

impl OccupancyAttributes {
    /// Overwrites the configuration attributes; occupancy is left alone.
    pub fn publish(&mut self, cfg: &PresenceConfig) {
        self.range_min = cfg.range_min_cm;
        self.range_max = cfg.range_max_cm;
        self.trigger_range = cfg.trig_range_cm;
        self.trigger_sensitivity = cfg.trig_sensitivity;
        self.keep_sensitivity = cfg.keep_sensitivity;
        self.trigger_delay = cfg.trig_delay;
        self.keep_timeout = cfg.keep_timeout;
        self.io_polarity = cfg.io_polarity;
        self.fretting = cfg.fretting;
    }

    /// Stores a decoded value. A value of the wrong type for `attr` is ignored.
    pub fn store(&mut self, attr: AttributeId, value: AttributeValue) {
        use AttributeValue::*;
        match (attr, value) {
            (AttributeId::RangeMin, U16(v)) => self.range_min = v,
            (AttributeId::RangeMax, U16(v)) => self.range_max = v,
            (AttributeId::TriggerRange, U16(v)) => self.trigger_range = v,
            (AttributeId::TriggerSensitivity, U8(v)) => self.trigger_sensitivity = v,
            (AttributeId::KeepSensitivity, U8(v)) => self.keep_sensitivity = v,
            (AttributeId::TriggerDelay, U8(v)) => self.trigger_delay = v,
            (AttributeId::KeepTimeout, U16(v)) => self.keep_timeout = v,
            (AttributeId::IoPolarity, U8(v)) => self.io_polarity = v,
            (AttributeId::Fretting, Bool(v)) => self.fretting = v,
            _ => {}
        }
    }

    pub fn get(&self, attr: AttributeId) -> AttributeValue {
        match attr {
            AttributeId::RangeMin => AttributeValue::U16(self.range_min),
            AttributeId::RangeMax => AttributeValue::U16(self.range_max),
            AttributeId::TriggerRange => AttributeValue::U16(self.trigger_range),
            AttributeId::TriggerSensitivity => AttributeValue::U8(self.trigger_sensitivity),
            AttributeId::KeepSensitivity => AttributeValue::U8(self.keep_sensitivity),
            AttributeId::TriggerDelay => AttributeValue::U8(self.trigger_delay),
            AttributeId::KeepTimeout => AttributeValue::U16(self.keep_timeout),
            AttributeId::IoPolarity => AttributeValue::U8(self.io_polarity),
            AttributeId::Fretting => AttributeValue::Bool(self.fretting),
        }
    }
}
