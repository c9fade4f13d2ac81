// src/common/hal_traits.rs

use super::config::SerialSettings;
use core::fmt::Debug;

/// Abstraction for the coarse delays the sensor protocol relies on.
pub trait SensorTimer {
    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for the sensor's (non-blocking) UART.
pub trait SensorSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was pending, or `Err(nb::Error::WouldBlock)`
    /// if the receive buffer is empty. The driver never waits on `WouldBlock`
    /// when reading; it takes it to mean "nothing more right now".
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or `Err(nb::Error::WouldBlock)`
    /// if the write buffer is full. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes have been sent.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// Opens the serial transport the sensor hangs off.
///
/// Returning `None` leaves the driver in its transport-unavailable state, where
/// every operation is a no-op.
pub trait SensorPort {
    type Interface: SensorSerial + SensorTimer;

    fn open(&mut self, settings: &SerialSettings) -> Option<Self::Interface>;
}

/// Wraps an embedded-hal v1 delay provider so it can drive [`SensorTimer`].
///
/// Pair it with a UART type that implements [`SensorSerial`] inside your own
/// interface struct.
#[cfg(feature = "impl-embedded-hal")]
#[derive(Debug)]
pub struct HalDelay<D>(pub D);

#[cfg(feature = "impl-embedded-hal")]
impl<D: embedded_hal::delay::DelayNs> SensorTimer for HalDelay<D> {
    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}
