//! Seesaw register map.
//!
//! The Seesaw firmware uses a two-byte register addressing scheme:
//! - Byte 1: Module base address ([`Base`])
//! - Byte 2: Register offset within the module
//!
//! Indexed registers (encoder slots, ADC/touch channels) add the channel
//! number to the module's base offset: `[MODULE, BASE_REGISTER + index]`.

/// Module base address, the first byte of every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Base {
    Status = 0x00,
    Gpio = 0x01,
    Sercom0 = 0x02,
    Timer = 0x08,
    Adc = 0x09,
    Dac = 0x0A,
    Interrupt = 0x0B,
    Dap = 0x0C,
    Eeprom = 0x0D,
    NeoPixel = 0x0E,
    Touch = 0x0F,
    Encoder = 0x11,
}

/// A register address: module base plus offset.
///
/// Carries no identity beyond a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register {
    pub base: Base,
    pub offset: u8,
}

impl Register {
    pub const fn new(base: Base, offset: u8) -> Self {
        Self { base, offset }
    }

    /// The two header bytes that open every transaction.
    pub const fn header(self) -> [u8; 2] {
        [self.base as u8, self.offset]
    }
}

// ---------------------------------------------------------------------------
// Status module
// ---------------------------------------------------------------------------

pub mod status {
    /// Hardware ID (8-bit), identifies the chip.
    pub const HW_ID: u8 = 0x01;
    /// Version word (32-bit); the upper 16 bits carry the product ID.
    pub const VERSION: u8 = 0x02;
    /// Options word (32-bit), bitmask of compiled-in modules.
    pub const OPTIONS: u8 = 0x03;
    /// Die temperature (32-bit, 16.16 fixed point, top two bits reserved).
    pub const TEMP: u8 = 0x04;
    /// Software reset, triggered by writing `0xFF`.
    pub const SW_RST: u8 = 0x7F;
}

// ---------------------------------------------------------------------------
// GPIO module
// ---------------------------------------------------------------------------

pub mod gpio {
    pub const DIR_SET_BULK: u8 = 0x02;
    pub const DIR_CLR_BULK: u8 = 0x03;
    pub const BULK: u8 = 0x04;
    pub const BULK_SET: u8 = 0x05;
    pub const BULK_CLR: u8 = 0x06;
    pub const BULK_TOGGLE: u8 = 0x07;
    pub const INTEN_SET: u8 = 0x08;
    pub const INTEN_CLR: u8 = 0x09;
    /// Interrupt flag register (32-bit, read-only).
    /// Reading this register clears all flags and resets the INT pin.
    pub const INTFLAG: u8 = 0x0A;
    pub const PULLEN_SET: u8 = 0x0B;
    pub const PULLEN_CLR: u8 = 0x0C;
}

// ---------------------------------------------------------------------------
// Serial, timer, ADC and touch modules
// ---------------------------------------------------------------------------

pub mod sercom {
    pub const STATUS: u8 = 0x00;
    pub const INTEN: u8 = 0x02;
    pub const INTEN_CLR: u8 = 0x03;
    pub const BAUD: u8 = 0x04;
    pub const DATA: u8 = 0x05;
}

pub mod timer {
    pub const STATUS: u8 = 0x00;
    pub const PWM: u8 = 0x01;
    pub const FREQ: u8 = 0x02;
}

pub mod adc {
    pub const STATUS: u8 = 0x00;
    pub const INTEN: u8 = 0x02;
    pub const INTEN_CLR: u8 = 0x03;
    pub const WIN_MODE: u8 = 0x04;
    pub const WIN_THRESH: u8 = 0x05;
    /// First ADC channel register; channel `n` lives at `CHANNEL_OFFSET + n`.
    pub const CHANNEL_OFFSET: u8 = 0x07;
}

pub mod touch {
    /// First touch channel register; channel `n` lives at `CHANNEL_OFFSET + n`.
    pub const CHANNEL_OFFSET: u8 = 0x10;
}

// ---------------------------------------------------------------------------
// Encoder module
// ---------------------------------------------------------------------------

pub mod encoder {
    pub const STATUS: u8 = 0x00;
    /// Enable the per-encoder interrupt: `INTEN_SET + index`.
    pub const INTEN_SET: u8 = 0x10;
    /// Disable the per-encoder interrupt: `INTEN_CLR + index`.
    pub const INTEN_CLR: u8 = 0x20;
    /// Absolute position (32-bit signed): `POSITION + index`.
    pub const POSITION: u8 = 0x30;
    /// Change since last read (32-bit signed, cleared by reading): `DELTA + index`.
    pub const DELTA: u8 = 0x40;
}

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Required delay in microseconds between the header write and the read
/// phase, as the Seesaw firmware requires.
pub const SEESAW_DELAY_US: u64 = 125;

/// Default I2C address for the Adafruit Quad Rotary Encoder Breakout.
pub const DEFAULT_ADDRESS: u8 = 0x49;

/// Number of encoder slots addressable on a Seesaw device.
pub const ENCODER_COUNT: usize = 4;

/// Largest payload accepted by a single register write.
pub const MAX_WRITE_PAYLOAD: usize = 32;
