//! Single-pin digital I/O object.

use embedded_hal_async::i2c::I2c;

use crate::device::SeeSaw;
use crate::error::SeeSawError;
use crate::gpio::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Recorded only; the Seesaw GPIO block always drives push-pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    PushPull,
    OpenDrain,
}

/// One GPIO pin of a Seesaw device with its configured direction and pull.
///
/// State changes only through the `switch_to_*` and `set_*` calls. An
/// output pin reports the last value written without touching the bus;
/// an input pin is read live every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitalIo {
    pin: u8,
    direction: Direction,
    pull: Pull,
    drive_mode: DriveMode,
    value: bool,
}

impl DigitalIo {
    /// A pin handle in its power-on state: floating input.
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            direction: Direction::Input,
            pull: Pull::None,
            drive_mode: DriveMode::PushPull,
            value: false,
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pull(&self) -> Pull {
        self.pull
    }

    pub fn drive_mode(&self) -> DriveMode {
        self.drive_mode
    }

    pub async fn switch_to_output<I2C: I2c>(
        &mut self,
        seesaw: &mut SeeSaw<I2C>,
        value: bool,
        drive_mode: DriveMode,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        seesaw.digital_mode_set(self.pin, Mode::Output).await?;
        seesaw.digital_write(self.pin, value).await?;
        self.direction = Direction::Output;
        self.pull = Pull::None;
        self.drive_mode = drive_mode;
        self.value = value;
        Ok(())
    }

    pub async fn switch_to_input<I2C: I2c>(
        &mut self,
        seesaw: &mut SeeSaw<I2C>,
        pull: Pull,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        let mode = match pull {
            Pull::None => Mode::Input,
            Pull::Up => Mode::InputPullUp,
            Pull::Down => Mode::InputPullDown,
        };
        seesaw.digital_mode_set(self.pin, mode).await?;
        self.direction = Direction::Input;
        self.pull = pull;
        Ok(())
    }

    /// Switch direction with default settings: floating input, or push-pull
    /// output driven low.
    pub async fn set_direction<I2C: I2c>(
        &mut self,
        seesaw: &mut SeeSaw<I2C>,
        direction: Direction,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        match direction {
            Direction::Input => self.switch_to_input(seesaw, Pull::None).await,
            Direction::Output => {
                self.switch_to_output(seesaw, false, DriveMode::PushPull)
                    .await
            }
        }
    }

    /// Current level: cached for outputs, read from the device for inputs.
    pub async fn value<I2C: I2c>(
        &self,
        seesaw: &mut SeeSaw<I2C>,
    ) -> Result<bool, SeeSawError<I2C::Error>> {
        match self.direction {
            Direction::Output => Ok(self.value),
            Direction::Input => seesaw.digital_read(self.pin).await,
        }
    }

    pub async fn set_value<I2C: I2c>(
        &mut self,
        seesaw: &mut SeeSaw<I2C>,
        value: bool,
    ) -> Result<(), SeeSawError<I2C::Error>> {
        seesaw.digital_write(self.pin, value).await?;
        self.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::device::Config;
    use crate::mock::{SimulatedBoard, SimulatedI2c};

    fn device(board: &SimulatedBoard) -> SeeSaw<SimulatedI2c<'_>> {
        let config = Config {
            reset: false,
            ..Config::default()
        };
        let seesaw = block_on(SeeSaw::new(board.i2c(), config)).unwrap();
        board.clear_frames();
        seesaw
    }

    #[test]
    fn output_value_is_served_from_cache() {
        let board = SimulatedBoard::new();
        let mut seesaw = device(&board);
        let mut led = DigitalIo::new(5);

        block_on(led.switch_to_output(&mut seesaw, true, DriveMode::PushPull)).unwrap();
        assert_eq!(led.direction(), Direction::Output);
        board.clear_frames();

        assert_eq!(block_on(led.value(&mut seesaw)), Ok(true));
        assert!(board.frames().is_empty());

        block_on(led.set_value(&mut seesaw, false)).unwrap();
        assert_eq!(block_on(led.value(&mut seesaw)), Ok(false));
        assert!(!board.output_level(5));
    }

    #[test]
    fn input_value_is_read_live() {
        let board = SimulatedBoard::new();
        let mut seesaw = device(&board);
        let mut button = DigitalIo::new(17);

        block_on(button.switch_to_input(&mut seesaw, Pull::Up)).unwrap();
        assert_eq!(button.pull(), Pull::Up);
        assert_eq!(block_on(button.value(&mut seesaw)), Ok(true));

        board.drive_pin(17, false);
        assert_eq!(block_on(button.value(&mut seesaw)), Ok(false));
    }

    #[test]
    fn set_direction_uses_defaults() {
        let board = SimulatedBoard::new();
        let mut seesaw = device(&board);
        let mut pin = DigitalIo::new(3);

        block_on(pin.switch_to_input(&mut seesaw, Pull::Down)).unwrap();
        block_on(pin.set_direction(&mut seesaw, Direction::Output)).unwrap();
        assert_eq!(pin.pull(), Pull::None);
        assert_eq!(pin.drive_mode(), DriveMode::PushPull);
        assert_eq!(block_on(pin.value(&mut seesaw)), Ok(false));

        block_on(pin.set_direction(&mut seesaw, Direction::Input)).unwrap();
        assert_eq!(pin.direction(), Direction::Input);
        assert_eq!(pin.pull(), Pull::None);
    }
}
