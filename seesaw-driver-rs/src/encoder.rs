//! Rotary encoder access.
//!
//! The Seesaw firmware accumulates each encoder's ticks in a 32-bit signed
//! position register and, separately, in a delta register that is cleared
//! every time it is read. Encoder `n`'s registers sit at the module base
//! offset plus `n`.

use embedded_hal::i2c::I2c as BlockingI2c;
use embedded_hal_async::i2c::I2c;

use crate::device::SeeSaw;
use crate::error::SeeSawError;
use crate::registers::{encoder, Base, Register, ENCODER_COUNT};

/// Register for encoder `index` at `offset`, or `None` if the index is out
/// of range.
fn encoder_reg(offset: u8, index: u8) -> Option<Register> {
    (usize::from(index) < ENCODER_COUNT).then(|| Register::new(Base::Encoder, offset + index))
}

// ---------------------------------------------------------------------------
// Async API
// ---------------------------------------------------------------------------

impl<I2C> SeeSaw<I2C>
where
    I2C: I2c,
{
    /// Read the absolute position of an encoder.
    ///
    /// # Errors
    /// * [`SeeSawError::InvalidEncoderIndex`] if `index >= 4`
    /// * [`SeeSawError::I2c`] on communication failure
    pub async fn position(&mut self, index: u8) -> Result<i32, SeeSawError<I2C::Error>> {
        let Some(register) = encoder_reg(encoder::POSITION, index) else {
            return Err(SeeSawError::InvalidEncoderIndex(index));
        };
        self.bus.read_value(register).await
    }

    /// Overwrite an encoder's accumulator, e.g. to zero it.
    pub async fn set_position(
        &mut self,
        index: u8,
        value: i32,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let Some(register) = encoder_reg(encoder::POSITION, index) else {
            return Err(SeeSawError::InvalidEncoderIndex(index));
        };
        self.bus.write_value(register, value).await
    }

    /// Consume the change in position since the previous call.
    ///
    /// The firmware clears the delta register when it is read, so each
    /// movement is reported by exactly one call.
    pub async fn take_delta(&mut self, index: u8) -> Result<i32, SeeSawError<I2C::Error>> {
        let Some(register) = encoder_reg(encoder::DELTA, index) else {
            return Err(SeeSawError::InvalidEncoderIndex(index));
        };
        self.bus.read_value(register).await
    }

    /// Enable the hardware interrupt for an encoder.
    ///
    /// Once enabled, the board's INT line fires whenever this encoder moves.
    /// Interrupts are **disabled by default** after power-on.
    pub async fn enable_interrupt(&mut self, index: u8) -> Result<(), SeeSawError<I2C::Error>> {
        let Some(register) = encoder_reg(encoder::INTEN_SET, index) else {
            return Err(SeeSawError::InvalidEncoderIndex(index));
        };
        self.bus.write_u8(register, 1).await
    }

    pub async fn disable_interrupt(&mut self, index: u8) -> Result<(), SeeSawError<I2C::Error>> {
        let Some(register) = encoder_reg(encoder::INTEN_CLR, index) else {
            return Err(SeeSawError::InvalidEncoderIndex(index));
        };
        self.bus.write_u8(register, 1).await
    }

    /// Read all four encoder positions in sequence.
    ///
    /// Returns the first error encountered; no partial results.
    pub async fn read_all_positions(&mut self) -> Result<[i32; ENCODER_COUNT], SeeSawError<I2C::Error>> {
        let mut positions = [0i32; ENCODER_COUNT];
        for (index, slot) in (0u8..).zip(positions.iter_mut()) {
            *slot = self.position(index).await?;
        }
        Ok(positions)
    }
}

// ---------------------------------------------------------------------------
// Blocking API
// ---------------------------------------------------------------------------

impl<I2C> SeeSaw<I2C>
where
    I2C: BlockingI2c,
{
    pub fn blocking_position(&mut self, index: u8) -> Result<i32, SeeSawError<I2C::Error>> {
        let Some(register) = encoder_reg(encoder::POSITION, index) else {
            return Err(SeeSawError::InvalidEncoderIndex(index));
        };
        self.bus.blocking_read_value(register)
    }

    pub fn blocking_set_position(
        &mut self,
        index: u8,
        value: i32,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let Some(register) = encoder_reg(encoder::POSITION, index) else {
            return Err(SeeSawError::InvalidEncoderIndex(index));
        };
        self.bus.blocking_write_value(register, value)
    }

    pub fn blocking_take_delta(&mut self, index: u8) -> Result<i32, SeeSawError<I2C::Error>> {
        let Some(register) = encoder_reg(encoder::DELTA, index) else {
            return Err(SeeSawError::InvalidEncoderIndex(index));
        };
        self.bus.blocking_read_value(register)
    }

    pub fn blocking_enable_interrupt(&mut self, index: u8) -> Result<(), SeeSawError<I2C::Error>> {
        let Some(register) = encoder_reg(encoder::INTEN_SET, index) else {
            return Err(SeeSawError::InvalidEncoderIndex(index));
        };
        self.bus.blocking_write_u8(register, 1)
    }

    pub fn blocking_disable_interrupt(&mut self, index: u8) -> Result<(), SeeSawError<I2C::Error>> {
        let Some(register) = encoder_reg(encoder::INTEN_CLR, index) else {
            return Err(SeeSawError::InvalidEncoderIndex(index));
        };
        self.bus.blocking_write_u8(register, 1)
    }
}

/// One encoder slot of a [`SeeSaw`] device.
///
/// Holds only the index; pass the device to each call so that a shared
/// device lock covers the whole operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IncrementalEncoder {
    index: u8,
}

impl IncrementalEncoder {
    /// # Errors
    /// Returns the index back if it is not below [`ENCODER_COUNT`].
    pub fn new(index: u8) -> Result<Self, u8> {
        if usize::from(index) < ENCODER_COUNT {
            Ok(Self { index })
        } else {
            Err(index)
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub async fn position<I2C: I2c>(
        &self,
        seesaw: &mut SeeSaw<I2C>,
    ) -> Result<i32, SeeSawError<I2C::Error>> {
        seesaw.position(self.index).await
    }

    pub async fn set_position<I2C: I2c>(
        &self,
        seesaw: &mut SeeSaw<I2C>,
        value: i32,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        seesaw.set_position(self.index, value).await
    }

    /// See [`SeeSaw::take_delta`].
    pub async fn take_delta<I2C: I2c>(
        &self,
        seesaw: &mut SeeSaw<I2C>,
    ) -> Result<i32, SeeSawError<I2C::Error>> {
        seesaw.take_delta(self.index).await
    }

    pub async fn enable_interrupt<I2C: I2c>(
        &self,
        seesaw: &mut SeeSaw<I2C>,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        seesaw.enable_interrupt(self.index).await
    }

    pub async fn disable_interrupt<I2C: I2c>(
        &self,
        seesaw: &mut SeeSaw<I2C>,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        seesaw.disable_interrupt(self.index).await
    }
}
