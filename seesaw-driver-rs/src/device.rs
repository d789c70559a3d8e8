//! Seesaw device handle and identification handshake.
//!
//! [`SeeSaw`] is only ever handed out fully identified: construction reads
//! the hardware ID, optionally resets the chip, reads the product ID and
//! resolves the pin map, or fails without returning a device.

use embassy_time::{Delay, Duration, Timer};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c as BlockingI2c;
use embedded_hal_async::i2c::I2c;

use crate::driver::RegisterBus;
use crate::error::SeeSawError;
use crate::pinmap::{self, ChipId, PinMap, ProductId};
use crate::registers::{sercom, status, Base, Register, DEFAULT_ADDRESS};

const HW_ID: Register = Register::new(Base::Status, status::HW_ID);
const VERSION: Register = Register::new(Base::Status, status::VERSION);
const OPTIONS: Register = Register::new(Base::Status, status::OPTIONS);
const SW_RST: Register = Register::new(Base::Status, status::SW_RST);

/// Construction options for [`SeeSaw`].
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// 7-bit I2C address. Default: `0x49`.
    pub address: u8,
    /// Issue a software reset during identification. Default: `true`.
    pub reset: bool,
    /// Fixed wait after the reset; the firmware offers no ready flag.
    /// Default: 500 ms.
    pub post_reset_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            reset: true,
            post_reset_delay: Duration::from_millis(500),
        }
    }
}

/// An identified Seesaw device.
///
/// Owns the I2C peripheral; all register traffic goes through `&mut self`,
/// so transactions on one device can never interleave. Share it between
/// tasks by wrapping it in an async mutex.
pub struct SeeSaw<I2C> {
    pub(crate) bus: RegisterBus<I2C>,
    chip: ChipId,
    product: Option<ProductId>,
    pin_map: Option<&'static PinMap>,
}

impl<I2C> SeeSaw<I2C> {
    pub fn chip_id(&self) -> ChipId {
        self.chip
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product
    }

    /// Pin capabilities, `None` when the board is not in the lookup table.
    pub fn pin_map(&self) -> Option<&'static PinMap> {
        self.pin_map
    }

    pub fn address(&self) -> u8 {
        self.bus.address()
    }

    /// Give the I2C peripheral back.
    pub fn release(self) -> I2C {
        self.bus.release()
    }

    /// Finish identification once the raw registers are known.
    fn identified(bus: RegisterBus<I2C>, chip: ChipId, version: u32) -> Self {
        let product = ProductId::try_from((version >> 16) as u16).ok();
        let pin_map = pinmap::resolve(product, chip);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "SeeSaw at {=u8:#x}: chip {}, product {}, pin map {}",
            bus.address(),
            chip,
            product,
            pin_map.is_some()
        );

        Self {
            bus,
            chip,
            product,
            pin_map,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_pin_map(mut self, pin_map: Option<&'static PinMap>) -> Self {
        self.pin_map = pin_map;
        self
    }
}

// ---------------------------------------------------------------------------
// Async API
// ---------------------------------------------------------------------------

impl<I2C> SeeSaw<I2C>
where
    I2C: I2c,
{
    /// Identify the device and resolve its pin map.
    ///
    /// # Errors
    /// * [`SeeSawError::UnknownChipId`] if the hardware ID is not recognised
    /// * [`SeeSawError::I2c`] on communication failure
    pub async fn new(i2c: I2C, config: Config) -> Result<Self, SeeSawError<I2C::Error>> {
        let mut bus = RegisterBus::new(i2c, config.address);

        let raw = bus.read_u8(HW_ID).await?;
        let Ok(chip) = ChipId::try_from(raw) else {
            return Err(SeeSawError::UnknownChipId(raw));
        };

        if config.reset {
            bus.write_u8(SW_RST, 0xFF).await?;
            #[cfg(feature = "defmt")]
            defmt::debug!("SeeSaw software reset, waiting {} ms", config.post_reset_delay.as_millis());
            Timer::after(config.post_reset_delay).await;
        }

        let version = bus.read_u32(VERSION).await?;
        Ok(Self::identified(bus, chip, version))
    }

    /// Trigger a software reset, then wait `post_reset_delay` if given.
    pub async fn software_reset(
        &mut self,
        post_reset_delay: Option<Duration>,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.bus.write_u8(SW_RST, 0xFF).await?;
        if let Some(delay) = post_reset_delay {
            Timer::after(delay).await;
        }
        Ok(())
    }

    /// The raw 'version' word: product ID in the upper half, date code below.
    pub async fn version(&mut self) -> Result<u32, SeeSawError<I2C::Error>> {
        self.bus.read_u32(VERSION).await
    }

    /// The 'options' word: bitmask of firmware modules present.
    pub async fn options(&mut self) -> Result<u32, SeeSawError<I2C::Error>> {
        self.bus.read_u32(OPTIONS).await
    }

    pub async fn eeprom_read_u8(&mut self, slot: u8) -> Result<u8, SeeSawError<I2C::Error>> {
        self.bus.read_u8(Register::new(Base::Eeprom, slot)).await
    }

    pub async fn eeprom_write_u8(
        &mut self,
        slot: u8,
        value: u8,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.eeprom_write(slot, &[value]).await
    }

    /// Write consecutive EEPROM bytes starting at `slot`.
    pub async fn eeprom_write(
        &mut self,
        slot: u8,
        data: &[u8],
    ) -> Result<(), SeeSawError<I2C::Error>> {
        self.bus.write(Register::new(Base::Eeprom, slot), data).await
    }

    /// The I2C address the device will use after its next reset.
    pub async fn i2c_address(&mut self) -> Result<u8, SeeSawError<I2C::Error>> {
        let slot = self.chip.eeprom_i2c_address_slot();
        self.eeprom_read_u8(slot).await
    }

    /// Store a new I2C address in EEPROM; effective after the next reset.
    pub async fn set_i2c_address(&mut self, address: u8) -> Result<(), SeeSawError<I2C::Error>> {
        let slot = self.chip.eeprom_i2c_address_slot();
        self.eeprom_write_u8(slot, address).await
    }

    pub async fn set_uart_baud(&mut self, baud: u32) -> Result<(), SeeSawError<I2C::Error>> {
        self.bus
            .write_u32(Register::new(Base::Sercom0, sercom::BAUD), baud)
            .await
    }
}

// ---------------------------------------------------------------------------
// Blocking API
// ---------------------------------------------------------------------------

impl<I2C> SeeSaw<I2C>
where
    I2C: BlockingI2c,
{
    /// Blocking counterpart of [`new`](Self::new); busy-waits through the
    /// post-reset delay.
    pub fn blocking_new(i2c: I2C, config: Config) -> Result<Self, SeeSawError<I2C::Error>> {
        let mut bus = RegisterBus::new(i2c, config.address);

        let raw = bus.blocking_read_u8(HW_ID)?;
        let Ok(chip) = ChipId::try_from(raw) else {
            return Err(SeeSawError::UnknownChipId(raw));
        };

        if config.reset {
            bus.blocking_write_u8(SW_RST, 0xFF)?;
            Delay.delay_ms(config.post_reset_delay.as_millis() as u32);
        }

        let version = bus.blocking_read_u32(VERSION)?;
        Ok(Self::identified(bus, chip, version))
    }

    pub fn blocking_version(&mut self) -> Result<u32, SeeSawError<I2C::Error>> {
        self.bus.blocking_read_u32(VERSION)
    }

    pub fn blocking_options(&mut self) -> Result<u32, SeeSawError<I2C::Error>> {
        self.bus.blocking_read_u32(OPTIONS)
    }
}
