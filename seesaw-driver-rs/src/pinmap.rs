//! Chip/product identification tables and pin capability maps.
//!
//! The hardware ID register names the microcontroller running the Seesaw
//! firmware; the upper half of the version word names the board. Together
//! they select which pins can do analog, PWM and capacitive touch.

/// Microcontroller reported by the `STATUS/HW_ID` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChipId {
    SamD09 = 0x55,
    ATtiny806 = 0x84,
    ATtiny807 = 0x85,
    ATtiny816 = 0x86,
    ATtiny817 = 0x87,
    ATtiny1616 = 0x88,
    ATtiny1617 = 0x89,
}

impl TryFrom<u8> for ChipId {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, u8> {
        Ok(match raw {
            0x55 => ChipId::SamD09,
            0x84 => ChipId::ATtiny806,
            0x85 => ChipId::ATtiny807,
            0x86 => ChipId::ATtiny816,
            0x87 => ChipId::ATtiny817,
            0x88 => ChipId::ATtiny1616,
            0x89 => ChipId::ATtiny1617,
            other => return Err(other),
        })
    }
}

impl ChipId {
    /// EEPROM slot holding the device's own I2C address.
    pub fn eeprom_i2c_address_slot(self) -> u8 {
        match self {
            ChipId::ATtiny806 | ChipId::ATtiny807 | ChipId::ATtiny816 | ChipId::ATtiny817 => 0x7F,
            ChipId::ATtiny1616 | ChipId::ATtiny1617 => 0xFF,
            ChipId::SamD09 => 0x3F,
        }
    }

    /// Channel registers are addressed by map position on the SAMD09 and by
    /// pin number on the ATtiny parts.
    pub(crate) fn addresses_channels_by_index(self) -> bool {
        self == ChipId::SamD09
    }
}

/// Board identity carried in the upper 16 bits of `STATUS/VERSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ProductId {
    Crickit = 9999,
    RoboHatMm1 = 9998,
    /// ATtiny1616 breakout.
    P5690 = 5690,
    /// ATtiny817 breakout.
    P5681 = 5681,
    /// ATtiny1617 breakout.
    P5743 = 5743,
    /// Quad rotary encoder breakout. Older Seesaw libraries leave this ID
    /// out of their table and report no product for the board; it still
    /// resolves to the chip's default pin map.
    P5752 = 5752,
}

impl TryFrom<u16> for ProductId {
    type Error = u16;

    fn try_from(raw: u16) -> Result<Self, u16> {
        Ok(match raw {
            9999 => ProductId::Crickit,
            9998 => ProductId::RoboHatMm1,
            5690 => ProductId::P5690,
            5681 => ProductId::P5681,
            5743 => ProductId::P5743,
            5752 => ProductId::P5752,
            other => return Err(other),
        })
    }
}

/// Which pins support analog, PWM and touch on a given board.
#[derive(Debug, PartialEq, Eq)]
pub struct PinMap {
    pub analog_pins: &'static [u8],
    /// PWM resolution in bits, 8 or 16.
    pub pwm_width: u8,
    pub pwm_pins: &'static [u8],
    pub touch_pins: &'static [u8],
}

impl PinMap {
    pub fn analog_index(&self, pin: u8) -> Option<usize> {
        self.analog_pins.iter().position(|&p| p == pin)
    }

    pub fn pwm_index(&self, pin: u8) -> Option<usize> {
        self.pwm_pins.iter().position(|&p| p == pin)
    }

    pub fn touch_index(&self, pin: u8) -> Option<usize> {
        self.touch_pins.iter().position(|&p| p == pin)
    }
}

pub static CRICKIT: PinMap = PinMap {
    analog_pins: &[2, 3, 40, 41, 11, 10, 9, 8],
    pwm_width: 16,
    pwm_pins: &[14, 15, 16, 17, 18, 19, 22, 23, 42, 43, 12, 13],
    touch_pins: &[4, 5, 6, 7],
};

pub static ROBOHAT_MM1: PinMap = PinMap {
    analog_pins: &[34, 35],
    pwm_width: 16,
    pwm_pins: &[8, 9, 10, 11, 16, 17, 18, 19, 40, 41, 42, 43],
    touch_pins: &[4, 5, 6, 7],
};

pub static ATTINY8X7: PinMap = PinMap {
    analog_pins: &[0, 1, 2, 3, 6, 7, 18, 19, 20],
    pwm_width: 16,
    pwm_pins: &[0, 1, 9, 12, 13, 6, 7, 8],
    touch_pins: &[],
};

pub static ATTINYX16: PinMap = PinMap {
    analog_pins: &[0, 1, 2, 3, 4, 5, 14, 15, 16],
    pwm_width: 16,
    pwm_pins: &[0, 1, 7, 11, 16, 4, 5, 6],
    touch_pins: &[],
};

pub static SAMD09: PinMap = PinMap {
    analog_pins: &[2, 3, 4, 5],
    pwm_width: 8,
    pwm_pins: &[4, 5, 6, 7],
    touch_pins: &[],
};

/// Pick the pin map for a device.
///
/// Priority: a dedicated board map, then the shared small-chip map (by
/// product family or by ATtinyx16 chip), then the bare-chip map. `None`
/// when nothing matches.
pub fn resolve(product: Option<ProductId>, chip: ChipId) -> Option<&'static PinMap> {
    match product {
        Some(ProductId::Crickit) => return Some(&CRICKIT),
        Some(ProductId::RoboHatMm1) => return Some(&ROBOHAT_MM1),
        Some(ProductId::P5690 | ProductId::P5681 | ProductId::P5743) => return Some(&ATTINYX16),
        _ => {}
    }

    match chip {
        ChipId::ATtiny806 | ChipId::ATtiny816 | ChipId::ATtiny1616 => Some(&ATTINYX16),
        ChipId::SamD09 => Some(&SAMD09),
        ChipId::ATtiny807 | ChipId::ATtiny817 | ChipId::ATtiny1617 => Some(&ATTINY8X7),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chip_id_lookup() {
        assert_eq!(ChipId::try_from(0x87), Ok(ChipId::ATtiny817));
        assert_eq!(ChipId::try_from(0x55), Ok(ChipId::SamD09));
        assert_eq!(ChipId::try_from(0x42), Err(0x42));
    }

    #[test]
    fn product_id_lookup() {
        assert_eq!(ProductId::try_from(9999), Ok(ProductId::Crickit));
        assert_eq!(ProductId::try_from(1234), Err(1234));
    }

    #[test]
    fn dedicated_board_maps_take_priority() {
        assert_eq!(resolve(Some(ProductId::Crickit), ChipId::SamD09), Some(&CRICKIT));
        assert_eq!(
            resolve(Some(ProductId::RoboHatMm1), ChipId::SamD09),
            Some(&ROBOHAT_MM1)
        );
    }

    #[test]
    fn small_chip_family_shares_a_map() {
        // Product family wins even over an 8x7 chip.
        assert_eq!(
            resolve(Some(ProductId::P5681), ChipId::ATtiny817),
            Some(&ATTINYX16)
        );
        assert_eq!(resolve(None, ChipId::ATtiny1616), Some(&ATTINYX16));
        assert_eq!(resolve(Some(ProductId::P5752), ChipId::ATtiny806), Some(&ATTINYX16));
    }

    #[test]
    fn bare_chip_maps_apply_last() {
        assert_eq!(resolve(None, ChipId::SamD09), Some(&SAMD09));
        assert_eq!(resolve(Some(ProductId::P5752), ChipId::ATtiny817), Some(&ATTINY8X7));
        assert_eq!(resolve(None, ChipId::ATtiny1617), Some(&ATTINY8X7));
    }

    #[test]
    fn map_lookups_by_pin() {
        assert_eq!(SAMD09.analog_index(4), Some(2));
        assert_eq!(SAMD09.analog_index(9), None);
        assert_eq!(CRICKIT.touch_index(7), Some(3));
        assert_eq!(ATTINY8X7.touch_index(0), None);
    }
}
