//! Async and blocking driver for Adafruit Seesaw I2C coprocessors.
//!
//! Seesaw is firmware that runs on a small microcontroller (SAMD09 or an
//! ATtiny8xx) and exposes GPIO, ADC, PWM, capacitive touch, EEPROM and
//! rotary encoders as registers over I2C. Boards built on it include the
//! Quad Rotary Encoder Breakout (#5752), the Crickit and the ATtiny
//! breakouts.
//!
//! # Architecture
//!
//! - **[`RegisterBus`]** handles the transaction framing: two-byte register
//!   header, the 125µs turnaround before a read, big-endian values.
//! - **[`SeeSaw`]** identifies the chip and board on construction and
//!   offers the module-level API (GPIO, analog, touch, encoder, EEPROM).
//! - **[`DigitalIo`]** and **[`IncrementalEncoder`]** are small per-pin and
//!   per-encoder handles over a borrowed [`SeeSaw`].
//!
//! Every operation comes as an `async fn` over
//! [`embedded_hal_async::i2c::I2c`] and as a `blocking_` variant over
//! [`embedded_hal::i2c::I2c`]; both put the same bytes on the wire.
//!
//! # Quick start
//!
//! ```ignore
//! use seesaw_driver::{Config, Mode, SeeSaw};
//!
//! // Construct with any `embedded-hal-async` I2C implementation
//! let mut seesaw = SeeSaw::new(i2c, Config::default()).await?;
//!
//! seesaw.digital_mode_set(12, Mode::InputPullUp).await?;
//! let pressed = !seesaw.digital_read(12).await?;
//! let delta = seesaw.take_delta(0).await?;
//! ```
//!
//! # Features
//!
//! - **`defmt`**: Enable [`defmt::Format`] implementations and log the
//!   identification handshake.
//! - **`mock`**: Export `mock::SimulatedBoard`, an in-memory Seesaw for
//!   host tests of code built on this crate.

#![cfg_attr(not(test), no_std)]

pub use codec::{BigEndian, LengthMismatch};
pub use device::{Config, SeeSaw};
pub use digital_io::{Direction, DigitalIo, DriveMode, Pull};
pub use driver::RegisterBus;
pub use encoder::IncrementalEncoder;
pub use error::SeeSawError;
pub use gpio::Mode;
pub use pinmap::{ChipId, PinMap, ProductId};
pub use registers::{DEFAULT_ADDRESS, ENCODER_COUNT};

pub mod registers;

mod codec;
mod device;
mod digital_io;
mod driver;
mod encoder;
mod error;
mod gpio;
mod pinmap;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
