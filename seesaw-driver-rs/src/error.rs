//! Error types for the Seesaw driver.

use core::fmt;

use crate::codec::LengthMismatch;

/// Errors that can occur when communicating with a Seesaw device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeeSawError<E> {
    /// Underlying I2C bus error. Never retried by the driver.
    I2c(E),

    /// The hardware ID register returned a value no supported chip reports.
    UnknownChipId(u8),

    /// Reserved: the version word carried a product ID outside the known
    /// table. Identification treats an unknown product as "no pin map"
    /// rather than an error, so the driver itself never returns this.
    UnknownProductId(u16),

    /// Pin has no analog, PWM or touch capability in the resolved pin map,
    /// or no pin map was resolved for this device.
    InvalidPin(u8),

    /// Encoder index out of valid range (must be 0–3).
    InvalidEncoderIndex(u8),

    /// A register value did not have the byte width of its integer type.
    LengthMismatch { expected: usize, actual: usize },

    /// Write payload exceeds the frame buffer.
    PayloadTooLong(usize),
}

impl<E> From<LengthMismatch> for SeeSawError<E> {
    fn from(e: LengthMismatch) -> Self {
        SeeSawError::LengthMismatch {
            expected: e.expected,
            actual: e.actual,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for SeeSawError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeeSawError::I2c(e) => write!(f, "I2C error: {:?}", e),
            SeeSawError::UnknownChipId(id) => write!(f, "Unknown chip ID 0x{:02X}", id),
            SeeSawError::UnknownProductId(pid) => write!(f, "Unknown product ID {}", pid),
            SeeSawError::InvalidPin(pin) => write!(f, "Pin {} not available in pin map", pin),
            SeeSawError::InvalidEncoderIndex(index) => {
                write!(f, "Invalid encoder index {} (must be 0-3)", index)
            }
            SeeSawError::LengthMismatch { expected, actual } => {
                write!(f, "Expected {} bytes, got {}", expected, actual)
            }
            SeeSawError::PayloadTooLong(len) => write!(f, "Payload of {} bytes too long", len),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for SeeSawError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            SeeSawError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            SeeSawError::UnknownChipId(id) => defmt::write!(f, "Unknown chip ID {=u8:#x}", id),
            SeeSawError::UnknownProductId(pid) => defmt::write!(f, "Unknown product ID {}", pid),
            SeeSawError::InvalidPin(pin) => defmt::write!(f, "Invalid pin {}", pin),
            SeeSawError::InvalidEncoderIndex(index) => {
                defmt::write!(f, "Invalid encoder index {}", index)
            }
            SeeSawError::LengthMismatch { expected, actual } => {
                defmt::write!(f, "Length mismatch: expected {}, got {}", expected, actual)
            }
            SeeSawError::PayloadTooLong(len) => defmt::write!(f, "Payload too long: {}", len),
        }
    }
}
