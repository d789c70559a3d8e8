//! GPIO, analog, PWM, touch and temperature access.
//!
//! Digital pins are addressed as a 64-bit bitmask; single-pin calls are
//! conveniences over the bulk registers. Analog, PWM and touch pins must be
//! present in the device's [`PinMap`](crate::PinMap).

use embassy_time::{Duration, Timer};
use embedded_hal::i2c::I2c as BlockingI2c;
use embedded_hal_async::i2c::I2c;

use crate::device::SeeSaw;
use crate::error::SeeSawError;
use crate::pinmap::PinMap;
use crate::registers::{adc, gpio, status, timer, touch, Base, Register};

/// Pin configuration for [`SeeSaw::digital_mode_set_bulk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Input,
    InputPullUp,
    InputPullDown,
    Output,
}

impl Mode {
    pub fn is_input(self) -> bool {
        self != Mode::Output
    }

    pub fn has_pull(self) -> bool {
        matches!(self, Mode::InputPullUp | Mode::InputPullDown)
    }
}

const fn gpio_reg(offset: u8) -> Register {
    Register::new(Base::Gpio, offset)
}

/// Temperature register counts in 1/65536 °C.
const TEMPERATURE_SCALE: f32 = 0.000_015_258_78;
const TEMPERATURE_MASK: u32 = 0x3FFF_FFFF;
const TEMPERATURE_SAMPLE_DELAY: Duration = Duration::from_millis(5);
const ANALOG_WRITE_SETTLE: Duration = Duration::from_millis(1);

impl<I2C> SeeSaw<I2C> {
    /// The map and the position of `pin` within the list `find` searches.
    fn lookup(
        &self,
        pin: u8,
        find: impl Fn(&PinMap, u8) -> Option<usize>,
    ) -> Option<(&'static PinMap, usize)> {
        self.pin_map()
            .and_then(|map| find(map, pin).map(|index| (map, index)))
    }

    /// Channel registers are numbered by map position on the SAMD09 and by
    /// pin number elsewhere.
    fn channel_offset(&self, pin: u8, index: usize) -> u8 {
        if self.chip_id().addresses_channels_by_index() {
            index as u8
        } else {
            pin
        }
    }
}

/// PWM command payload: channel, then a 16-bit or 8-bit duty value.
fn pwm_payload(pwm_width: u8, offset: u8, value: u16) -> ([u8; 3], usize) {
    let [hi, lo] = value.to_be_bytes();
    if pwm_width == 16 {
        ([offset, hi, lo], 3)
    } else {
        ([offset, lo, 0], 2)
    }
}

// ---------------------------------------------------------------------------
// Async API
// ---------------------------------------------------------------------------

impl<I2C> SeeSaw<I2C>
where
    I2C: I2c,
{
    /// Configure every pin in `pins` for `mode`.
    ///
    /// The command sequence is fixed by the firmware: direction-set first,
    /// then either direction-set again (output) or direction-clear followed
    /// by the pull configuration (input).
    pub async fn digital_mode_set_bulk(
        &mut self,
        pins: u64,
        mode: Mode,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let cmd = pins.to_be_bytes();

        self.bus.write(gpio_reg(gpio::DIR_SET_BULK), &cmd).await?;
        if mode == Mode::Output {
            return self.bus.write(gpio_reg(gpio::DIR_SET_BULK), &cmd).await;
        }

        self.bus.write(gpio_reg(gpio::DIR_CLR_BULK), &cmd).await?;
        if mode.has_pull() {
            self.bus.write(gpio_reg(gpio::PULLEN_SET), &cmd).await?;
            let level = if mode == Mode::InputPullUp {
                gpio::BULK_SET
            } else {
                gpio::BULK_CLR
            };
            self.bus.write(gpio_reg(level), &cmd).await
        } else {
            self.bus.write(gpio_reg(gpio::PULLEN_CLR), &cmd).await
        }
    }

    /// Drive every pin in `pins` high (`true`) or low.
    pub async fn digital_write_bulk(
        &mut self,
        pins: u64,
        value: bool,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let offset = if value { gpio::BULK_SET } else { gpio::BULK_CLR };
        self.bus.write_u64(gpio_reg(offset), pins).await
    }

    /// Levels of the pins in `pins`; bits outside the mask are zero.
    pub async fn digital_read_bulk(&mut self, pins: u64) -> Result<u64, SeeSawError<I2C::Error>> {
        Ok(self.bus.read_u64(gpio_reg(gpio::BULK)).await? & pins)
    }

    pub async fn digital_toggle_bulk(&mut self, pins: u64) -> Result<(), SeeSawError<I2C::Error>> {
        self.bus.write_u64(gpio_reg(gpio::BULK_TOGGLE), pins).await
    }

    pub async fn digital_mode_set(
        &mut self,
        pin: u8,
        mode: Mode,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let Some(mask) = pin_mask(pin) else {
            return Err(SeeSawError::InvalidPin(pin));
        };
        self.digital_mode_set_bulk(mask, mode).await
    }

    pub async fn digital_write(&mut self, pin: u8, value: bool) -> Result<(), SeeSawError<I2C::Error>> {
        let Some(mask) = pin_mask(pin) else {
            return Err(SeeSawError::InvalidPin(pin));
        };
        self.digital_write_bulk(mask, value).await
    }

    pub async fn digital_read(&mut self, pin: u8) -> Result<bool, SeeSawError<I2C::Error>> {
        let Some(mask) = pin_mask(pin) else {
            return Err(SeeSawError::InvalidPin(pin));
        };
        Ok(self.digital_read_bulk(mask).await? != 0)
    }

    /// Enable or disable the change interrupt for the pins in `pins`.
    pub async fn set_gpio_interrupts(
        &mut self,
        pins: u32,
        enabled: bool,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let offset = if enabled { gpio::INTEN_SET } else { gpio::INTEN_CLR };
        self.bus.write_u32(gpio_reg(offset), pins).await
    }

    /// Read and clear the GPIO interrupt flags; also releases the INT line.
    pub async fn gpio_interrupt_flag(&mut self) -> Result<u32, SeeSawError<I2C::Error>> {
        self.bus.read_u32(gpio_reg(gpio::INTFLAG)).await
    }

    /// Read an ADC channel.
    ///
    /// # Errors
    /// * [`SeeSawError::InvalidPin`] if `pin` is not analog-capable
    pub async fn analog_read(&mut self, pin: u8) -> Result<u16, SeeSawError<I2C::Error>> {
        let Some((_, index)) = self.lookup(pin, PinMap::analog_index) else {
            return Err(SeeSawError::InvalidPin(pin));
        };
        let offset = self.channel_offset(pin, index);
        self.bus
            .read_u16(Register::new(Base::Adc, adc::CHANNEL_OFFSET + offset))
            .await
    }

    /// Set the PWM duty of an analog-capable pin, then wait 1 ms for the
    /// output to settle.
    pub async fn analog_write(&mut self, pin: u8, value: u16) -> Result<(), SeeSawError<I2C::Error>> {
        let Some((map, index)) = self.lookup(pin, PinMap::analog_index) else {
            return Err(SeeSawError::InvalidPin(pin));
        };
        let (payload, len) = pwm_payload(map.pwm_width, self.channel_offset(pin, index), value);
        self.bus
            .write(Register::new(Base::Timer, timer::PWM), &payload[..len])
            .await?;
        Timer::after(ANALOG_WRITE_SETTLE).await;
        Ok(())
    }

    /// Read a capacitive touch channel.
    pub async fn touch_read(&mut self, pin: u8) -> Result<u16, SeeSawError<I2C::Error>> {
        let Some((_, index)) = self.lookup(pin, PinMap::touch_index) else {
            return Err(SeeSawError::InvalidPin(pin));
        };
        self.bus
            .read_u16(Register::new(Base::Touch, touch::CHANNEL_OFFSET + index as u8))
            .await
    }

    /// Set the PWM frequency of a PWM-capable pin, in Hz.
    pub async fn set_pwm_frequency(
        &mut self,
        pin: u8,
        frequency: u16,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let Some((_, index)) = self.lookup(pin, PinMap::pwm_index) else {
            return Err(SeeSawError::InvalidPin(pin));
        };
        let offset = self.channel_offset(pin, index);
        let [hi, lo] = frequency.to_be_bytes();
        self.bus
            .write(Register::new(Base::Timer, timer::FREQ), &[offset, hi, lo])
            .await
    }

    /// Die temperature in °C.
    ///
    /// The firmware samples on request, so the read phase waits 5 ms instead
    /// of the usual turnaround. Only the two reserved top bits are masked off;
    /// a `0x3F00_0000` mask would discard the fractional and low integer bits.
    pub async fn temperature(&mut self) -> Result<f32, SeeSawError<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.bus
            .read_with_delay(
                Register::new(Base::Status, status::TEMP),
                &mut buf,
                TEMPERATURE_SAMPLE_DELAY,
            )
            .await?;
        let raw = u32::from_be_bytes(buf) & TEMPERATURE_MASK;
        Ok(TEMPERATURE_SCALE * raw as f32)
    }
}

impl<I2C> SeeSaw<I2C>
where
    I2C: BlockingI2c,
{
    pub fn blocking_set_pwm_frequency(
        &mut self,
        pin: u8,
        frequency: u16,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let Some((_, index)) = self.lookup(pin, PinMap::pwm_index) else {
            return Err(SeeSawError::InvalidPin(pin));
        };
        let offset = self.channel_offset(pin, index);
        let [hi, lo] = frequency.to_be_bytes();
        self.bus
            .blocking_write(Register::new(Base::Timer, timer::FREQ), &[offset, hi, lo])
    }
}

/// `1 << pin`, `None` for pins outside the 64-bit GPIO space.
fn pin_mask(pin: u8) -> Option<u64> {
    1u64.checked_shl(u32::from(pin))
}
