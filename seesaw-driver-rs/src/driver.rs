//! Low-level Seesaw register bus.
//!
//! Implements the I2C transaction framing required by the Seesaw firmware,
//! including the mandatory 125µs delay between write and read phases.
//!
//! Every transaction is a two-byte register header, followed either by a
//! payload (write) or, after the turnaround delay, by an N-byte read. The
//! async methods and their `blocking_` counterparts put identical bytes on
//! the wire.

use embassy_time::{Delay, Duration, Timer};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c as BlockingI2c;
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use crate::codec::BigEndian;
use crate::error::SeeSawError;
use crate::registers::{Register, MAX_WRITE_PAYLOAD, SEESAW_DELAY_US};

type Frame = Vec<u8, { 2 + MAX_WRITE_PAYLOAD }>;

/// Register-addressed read/write primitives over an owned I2C peripheral.
pub struct RegisterBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> RegisterBus<I2C> {
    /// Create a new register bus.
    ///
    /// # Arguments
    /// * `i2c`: I2C peripheral (takes ownership for exclusive access)
    /// * `address`: 7-bit I2C device address
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the I2C peripheral back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Header plus payload in one buffer, so a write is a single transaction.
fn frame<E>(register: Register, payload: &[u8]) -> Result<Frame, SeeSawError<E>> {
    if payload.len() > MAX_WRITE_PAYLOAD {
        return Err(SeeSawError::PayloadTooLong(payload.len()));
    }
    let mut buf = Frame::new();
    // Capacity is checked above, neither extend can fail.
    let _ = buf.extend_from_slice(&register.header());
    let _ = buf.extend_from_slice(payload);
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Async path
// ---------------------------------------------------------------------------

impl<I2C> RegisterBus<I2C>
where
    I2C: I2c,
{
    /// Write the register header, wait the required delay, then read the
    /// response into `buffer`.
    ///
    /// Uses separate `write()` and `read()` operations rather than
    /// `write_read()` because a repeated-start does not leave the Seesaw
    /// firmware enough time to prepare its answer.
    pub async fn read(
        &mut self,
        register: Register,
        buffer: &mut [u8],
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.read_with_delay(register, buffer, Duration::from_micros(SEESAW_DELAY_US))
            .await
    }

    /// [`read`](Self::read) with a longer turnaround, for registers the
    /// firmware needs extra time to sample.
    pub async fn read_with_delay(
        &mut self,
        register: Register,
        buffer: &mut [u8],
        delay: Duration,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.i2c
            .write(self.address, &register.header())
            .await
            .map_err(SeeSawError::I2c)?;

        Timer::after(delay).await;

        self.i2c
            .read(self.address, buffer)
            .await
            .map_err(SeeSawError::I2c)
    }

    /// Write `payload` (possibly empty) to a register in a single transaction.
    pub async fn write(
        &mut self,
        register: Register,
        payload: &[u8],
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let buf = frame::<I2C::Error>(register, payload)?;
        self.i2c
            .write(self.address, &buf)
            .await
            .map_err(SeeSawError::I2c)
    }

    /// Read a big-endian integer of any supported width.
    pub async fn read_value<T: BigEndian>(
        &mut self,
        register: Register,
    ) -> Result<T, SeeSawError<I2C::Error>> {
        let mut buf = T::Bytes::default();
        self.read(register, buf.as_mut()).await?;
        Ok(T::from_be_wire(buf.as_ref())?)
    }

    /// Write a big-endian integer of any supported width.
    pub async fn write_value<T: BigEndian>(
        &mut self,
        register: Register,
        value: T,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.write(register, value.to_be_wire().as_ref()).await
    }

    pub async fn read_u8(&mut self, register: Register) -> Result<u8, SeeSawError<I2C::Error>> {
        self.read_value(register).await
    }

    pub async fn read_u16(&mut self, register: Register) -> Result<u16, SeeSawError<I2C::Error>> {
        self.read_value(register).await
    }

    pub async fn read_u32(&mut self, register: Register) -> Result<u32, SeeSawError<I2C::Error>> {
        self.read_value(register).await
    }

    pub async fn read_u64(&mut self, register: Register) -> Result<u64, SeeSawError<I2C::Error>> {
        self.read_value(register).await
    }

    pub async fn write_u8(
        &mut self,
        register: Register,
        value: u8,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.write_value(register, value).await
    }

    pub async fn write_u16(
        &mut self,
        register: Register,
        value: u16,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.write_value(register, value).await
    }

    pub async fn write_u32(
        &mut self,
        register: Register,
        value: u32,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.write_value(register, value).await
    }

    pub async fn write_u64(
        &mut self,
        register: Register,
        value: u64,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.write_value(register, value).await
    }
}

// ---------------------------------------------------------------------------
// Blocking path
// ---------------------------------------------------------------------------

impl<I2C> RegisterBus<I2C>
where
    I2C: BlockingI2c,
{
    /// Blocking counterpart of [`read`](Self::read). Busy-waits through the
    /// turnaround delay.
    pub fn blocking_read(
        &mut self,
        register: Register,
        buffer: &mut [u8],
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.i2c
            .write(self.address, &register.header())
            .map_err(SeeSawError::I2c)?;

        Delay.delay_us(SEESAW_DELAY_US as u32);

        self.i2c
            .read(self.address, buffer)
            .map_err(SeeSawError::I2c)
    }

    pub fn blocking_write(
        &mut self,
        register: Register,
        payload: &[u8],
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let buf = frame::<I2C::Error>(register, payload)?;
        self.i2c.write(self.address, &buf).map_err(SeeSawError::I2c)
    }

    pub fn blocking_read_value<T: BigEndian>(
        &mut self,
        register: Register,
    ) -> Result<T, SeeSawError<I2C::Error>> {
        let mut buf = T::Bytes::default();
        self.blocking_read(register, buf.as_mut())?;
        Ok(T::from_be_wire(buf.as_ref())?)
    }

    pub fn blocking_write_value<T: BigEndian>(
        &mut self,
        register: Register,
        value: T,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.blocking_write(register, value.to_be_wire().as_ref())
    }

    pub fn blocking_read_u8(&mut self, register: Register) -> Result<u8, SeeSawError<I2C::Error>> {
        self.blocking_read_value(register)
    }

    pub fn blocking_read_u16(
        &mut self,
        register: Register,
    ) -> Result<u16, SeeSawError<I2C::Error>> {
        self.blocking_read_value(register)
    }

    pub fn blocking_read_u32(
        &mut self,
        register: Register,
    ) -> Result<u32, SeeSawError<I2C::Error>> {
        self.blocking_read_value(register)
    }

    pub fn blocking_read_u64(
        &mut self,
        register: Register,
    ) -> Result<u64, SeeSawError<I2C::Error>> {
        self.blocking_read_value(register)
    }

    pub fn blocking_write_u8(
        &mut self,
        register: Register,
        value: u8,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.blocking_write_value(register, value)
    }

    pub fn blocking_write_u16(
        &mut self,
        register: Register,
        value: u16,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.blocking_write_value(register, value)
    }

    pub fn blocking_write_u32(
        &mut self,
        register: Register,
        value: u32,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.blocking_write_value(register, value)
    }

    pub fn blocking_write_u64(
        &mut self,
        register: Register,
        value: u64,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.blocking_write_value(register, value)
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::mock::SimulatedBoard;
    use crate::registers::{gpio, status, Base, DEFAULT_ADDRESS};

    #[test]
    fn async_and_blocking_paths_emit_identical_frames() {
        let board = SimulatedBoard::new();
        let reg = Register::new(Base::Gpio, gpio::BULK_SET);

        let mut bus = RegisterBus::new(board.i2c(), DEFAULT_ADDRESS);
        block_on(bus.write_u64(reg, 0x0000_0000_0000_1000)).unwrap();
        bus.blocking_write_u64(reg, 0x0000_0000_0000_1000).unwrap();

        let frames = board.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[0].as_slice(), &[0x01, 0x05, 0, 0, 0, 0, 0, 0, 0x10, 0x00]);
    }

    #[test]
    fn read_sends_header_then_decodes_big_endian() {
        let board = SimulatedBoard::new();
        board.set_version(0x1670_0102);
        let mut bus = RegisterBus::new(board.i2c(), DEFAULT_ADDRESS);

        let reg = Register::new(Base::Status, status::VERSION);
        assert_eq!(block_on(bus.read_u32(reg)), Ok(0x1670_0102));
        assert_eq!(bus.blocking_read_u32(reg), Ok(0x1670_0102));
        assert_eq!(board.frames()[0].as_slice(), &[0x00, 0x02]);
    }

    #[test]
    fn transport_failure_surfaces_as_i2c_error() {
        let board = SimulatedBoard::new();
        let reg = Register::new(Base::Status, status::HW_ID);
        board.fail_next(reg, 1);
        let mut bus = RegisterBus::new(board.i2c(), DEFAULT_ADDRESS);

        assert!(matches!(block_on(bus.read_u8(reg)), Err(SeeSawError::I2c(_))));
        // No retry: the next call goes through.
        assert!(block_on(bus.read_u8(reg)).is_ok());
    }

    #[test]
    fn oversized_payload_is_rejected_before_the_bus() {
        let board = SimulatedBoard::new();
        let mut bus = RegisterBus::new(board.i2c(), DEFAULT_ADDRESS);
        let payload = [0u8; MAX_WRITE_PAYLOAD + 1];

        let result = block_on(bus.write(Register::new(Base::Eeprom, 0), &payload));
        assert_eq!(result, Err(SeeSawError::PayloadTooLong(MAX_WRITE_PAYLOAD + 1)));
        assert!(board.frames().is_empty());
    }
}
