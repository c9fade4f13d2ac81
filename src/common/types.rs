// src/common/types.rs

// --- Presence Detection Settings ---

/// Detection settings of the sensor, in the sensor's integer units.
///
/// The driver does not check that `range_min_cm <= trig_range_cm <= range_max_cm`;
/// whatever the caller supplies is sent to the sensor as is.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PresenceConfig {
    /// Minimum detection range in cm (30-2000).
    pub range_min_cm: u16,
    /// Maximum detection range in cm (240-2000).
    pub range_max_cm: u16,
    /// Trigger range in cm (30-2000).
    pub trig_range_cm: u16,
    /// Trigger sensitivity, 0 (low) to 9 (high).
    pub trig_sensitivity: u8,
    /// Keep sensitivity, 0 (low) to 9 (high).
    pub keep_sensitivity: u8,
    /// Trigger delay in 10 ms units (0-200).
    pub trig_delay: u8,
    /// Keep timeout in 500 ms units (4-3000).
    pub keep_timeout: u16,
    /// Output pin polarity, 0 or 1.
    pub io_polarity: u8,
    /// Micromotion (fretting) detection.
    pub fretting: bool,
}

impl PresenceConfig {
    /// Settings written to the sensor on startup.
    pub const STARTUP: PresenceConfig = PresenceConfig {
        range_min_cm: 30,
        range_max_cm: 600,
        trig_range_cm: 300,
        trig_sensitivity: 5,
        keep_sensitivity: 5,
        trig_delay: 50,
        keep_timeout: 10,
        io_polarity: 0,
        fretting: true,
    };
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self::STARTUP
    }
}

// --- Reply Field Conversions ---
//
// Replies carry floats in sensor units (metres, seconds). `as` casts saturate,
// so negative noise lands on 0 rather than wrapping.

/// Metres (or seconds) back to hundredths, rounded half up.
#[inline]
pub fn centi_from_f32(value: f32) -> u16 {
    (value * 100.0 + 0.5) as u16
}

/// Seconds back to 500 ms units, rounded half up.
#[inline]
pub fn half_from_f32(value: f32) -> u16 {
    (value * 2.0 + 0.5) as u16
}

/// Plain integer field (sensitivity, polarity); the fraction is dropped.
#[inline]
pub fn truncate_u8(value: f32) -> u8 {
    value as u8
}
