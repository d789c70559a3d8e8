//! In-memory Seesaw board for host tests.
//!
//! [`SimulatedBoard`] answers register traffic the way the firmware does:
//! GPIO direction/latch/pull state, encoder position and read-to-clear delta
//! registers, ADC and touch channels, EEPROM, and the status block. Every
//! write frame is logged so tests can assert on the exact bytes sent.
//!
//! Handles from [`SimulatedBoard::i2c`] implement both the blocking and the
//! async `embedded-hal` I2C traits and borrow the board, so a test keeps the
//! board around to drive inputs and inspect state while the driver owns
//! its handle.

use core::cell::RefCell;

use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
use heapless::Vec;

use crate::registers::{
    adc, encoder, gpio, sercom, status, touch, Base, Register, DEFAULT_ADDRESS, ENCODER_COUNT,
    MAX_WRITE_PAYLOAD,
};

/// One logged write: register header plus payload.
pub type Frame = Vec<u8, { 2 + MAX_WRITE_PAYLOAD }>;

const FRAME_LOG: usize = 128;
const CHANNELS: usize = 64;

const STATUS: u8 = Base::Status as u8;
const GPIO: u8 = Base::Gpio as u8;
const SERCOM: u8 = Base::Sercom0 as u8;
const ADC: u8 = Base::Adc as u8;
const EEPROM: u8 = Base::Eeprom as u8;
const TOUCH: u8 = Base::Touch as u8;
const ENCODER: u8 = Base::Encoder as u8;

struct BoardState {
    address: u8,
    hw_id: u8,
    version: u32,
    options: u32,
    temperature_raw: u32,
    resets: u32,
    baud: u32,

    direction: u64,
    latch: u64,
    pull_enable: u64,
    driven: u64,
    driven_level: u64,
    gpio_inten: u32,
    gpio_flag: u32,

    positions: [i32; ENCODER_COUNT],
    deltas: [i32; ENCODER_COUNT],
    encoder_inten: [bool; ENCODER_COUNT],

    adc: [u16; CHANNELS],
    touch: [u16; CHANNELS],
    eeprom: [u8; 256],

    pending: [u8; 2],
    frames: Vec<Frame, FRAME_LOG>,
    failures: Vec<([u8; 2], u32), 8>,
}

impl BoardState {
    fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            hw_id: 0x87,
            version: 5752 << 16,
            options: 0,
            temperature_raw: 0,
            resets: 0,
            baud: 0,
            direction: 0,
            latch: 0,
            pull_enable: 0,
            driven: 0,
            driven_level: 0,
            gpio_inten: 0,
            gpio_flag: 0,
            positions: [0; ENCODER_COUNT],
            deltas: [0; ENCODER_COUNT],
            encoder_inten: [false; ENCODER_COUNT],
            adc: [0; CHANNELS],
            touch: [0; CHANNELS],
            eeprom: [0; 256],
            pending: [0; 2],
            frames: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Level seen on the GPIO input register.
    fn levels(&self) -> u64 {
        let outputs = self.direction & self.latch;
        let external = (self.driven & self.driven_level) | (!self.driven & self.latch);
        outputs | (!self.direction & external)
    }

    /// Consume one injected failure for `header`, if any is pending.
    fn should_fail(&mut self, header: [u8; 2]) -> bool {
        match self.failures.iter_mut().find(|(h, n)| *h == header && *n > 0) {
            Some((_, remaining)) => {
                *remaining -= 1;
                true
            }
            None => false,
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ErrorKind> {
        let [base, offset, payload @ ..] = bytes else {
            return Err(ErrorKind::Other);
        };
        let (base, offset) = (*base, *offset);
        if self.should_fail([base, offset]) {
            return Err(ErrorKind::Bus);
        }
        self.pending = [base, offset];
        // A full log drops further frames; tests clear it between phases.
        let _ = self.frames.push(Frame::from_slice(bytes).map_err(|_| ErrorKind::Overrun)?);
        if !payload.is_empty() {
            self.apply(base, offset, payload);
        }
        Ok(())
    }

    fn apply(&mut self, base: u8, offset: u8, payload: &[u8]) {
        let word = payload.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        match (base, offset) {
            (STATUS, status::SW_RST) => self.resets += 1,
            (GPIO, gpio::DIR_SET_BULK) => self.direction |= word,
            (GPIO, gpio::DIR_CLR_BULK) => self.direction &= !word,
            (GPIO, gpio::BULK_SET) => self.latch |= word,
            (GPIO, gpio::BULK_CLR) => self.latch &= !word,
            (GPIO, gpio::BULK_TOGGLE) => self.latch ^= word,
            (GPIO, gpio::PULLEN_SET) => self.pull_enable |= word,
            (GPIO, gpio::PULLEN_CLR) => self.pull_enable &= !word,
            (GPIO, gpio::INTEN_SET) => self.gpio_inten |= word as u32,
            (GPIO, gpio::INTEN_CLR) => self.gpio_inten &= !(word as u32),
            (SERCOM, sercom::BAUD) => self.baud = word as u32,
            (EEPROM, slot) => {
                for (i, &b) in payload.iter().enumerate() {
                    self.eeprom[(usize::from(slot) + i) % 256] = b;
                }
            }
            (ENCODER, o) if in_block(o, encoder::INTEN_SET) => {
                self.encoder_inten[usize::from(o - encoder::INTEN_SET)] = true;
            }
            (ENCODER, o) if in_block(o, encoder::INTEN_CLR) => {
                self.encoder_inten[usize::from(o - encoder::INTEN_CLR)] = false;
            }
            (ENCODER, o) if in_block(o, encoder::POSITION) => {
                self.positions[usize::from(o - encoder::POSITION)] = word as u32 as i32;
            }
            _ => {}
        }
    }

    fn read(&mut self, buf: &mut [u8]) {
        let [base, offset] = self.pending;
        match (base, offset) {
            (STATUS, status::HW_ID) => fill(buf, &[self.hw_id]),
            (STATUS, status::VERSION) => fill(buf, &self.version.to_be_bytes()),
            (STATUS, status::OPTIONS) => fill(buf, &self.options.to_be_bytes()),
            (STATUS, status::TEMP) => fill(buf, &self.temperature_raw.to_be_bytes()),
            (GPIO, gpio::BULK) => fill(buf, &self.levels().to_be_bytes()),
            (GPIO, gpio::INTFLAG) => {
                fill(buf, &self.gpio_flag.to_be_bytes());
                self.gpio_flag = 0;
            }
            (ADC, o) if o >= adc::CHANNEL_OFFSET => {
                let value = self.adc[usize::from(o - adc::CHANNEL_OFFSET) % CHANNELS];
                fill(buf, &value.to_be_bytes());
            }
            (TOUCH, o) if o >= touch::CHANNEL_OFFSET => {
                let value = self.touch[usize::from(o - touch::CHANNEL_OFFSET) % CHANNELS];
                fill(buf, &value.to_be_bytes());
            }
            (EEPROM, slot) => {
                for (i, b) in buf.iter_mut().enumerate() {
                    *b = self.eeprom[(usize::from(slot) + i) % 256];
                }
            }
            (ENCODER, o) if in_block(o, encoder::POSITION) => {
                let index = usize::from(o - encoder::POSITION);
                fill(buf, &self.positions[index].to_be_bytes());
            }
            (ENCODER, o) if in_block(o, encoder::DELTA) => {
                let index = usize::from(o - encoder::DELTA);
                fill(buf, &self.deltas[index].to_be_bytes());
                self.deltas[index] = 0;
            }
            _ => buf.fill(0),
        }
    }
}

fn in_block(offset: u8, start: u8) -> bool {
    offset >= start && usize::from(offset - start) < ENCODER_COUNT
}

/// Copy `bytes` to the front of `buf` and zero the remainder.
fn fill(buf: &mut [u8], bytes: &[u8]) {
    let n = buf.len().min(bytes.len());
    buf[..n].copy_from_slice(&bytes[..n]);
    buf[n..].fill(0);
}

/// A simulated Seesaw board. Defaults to an ATtiny817 reporting product
/// 5752 at address `0x49`.
pub struct SimulatedBoard {
    state: RefCell<BoardState>,
}

impl Default for SimulatedBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBoard {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(BoardState::new()),
        }
    }

    /// An I2C handle wired to this board.
    pub fn i2c(&self) -> SimulatedI2c<'_> {
        SimulatedI2c { board: self }
    }

    pub fn set_address(&self, address: u8) {
        self.state.borrow_mut().address = address;
    }

    pub fn set_hardware_id(&self, hw_id: u8) {
        self.state.borrow_mut().hw_id = hw_id;
    }

    pub fn set_version(&self, version: u32) {
        self.state.borrow_mut().version = version;
    }

    pub fn set_options(&self, options: u32) {
        self.state.borrow_mut().options = options;
    }

    pub fn set_temperature_raw(&self, raw: u32) {
        self.state.borrow_mut().temperature_raw = raw;
    }

    pub fn set_adc(&self, channel: usize, value: u16) {
        self.state.borrow_mut().adc[channel] = value;
    }

    pub fn set_touch(&self, channel: usize, value: u16) {
        self.state.borrow_mut().touch[channel] = value;
    }

    /// Hold `pin` at `level` from outside, as a switch or sensor would.
    ///
    /// Raises the GPIO interrupt flag when the pin has its interrupt enabled
    /// and the level it reads changes.
    pub fn drive_pin(&self, pin: u8, level: bool) {
        let mut state = self.state.borrow_mut();
        let bit = 1u64 << pin;
        let before = state.levels() & bit;
        state.driven |= bit;
        if level {
            state.driven_level |= bit;
        } else {
            state.driven_level &= !bit;
        }
        if state.levels() & bit != before && pin < 32 && state.gpio_inten & (1 << pin) != 0 {
            state.gpio_flag |= 1 << pin;
        }
    }

    /// Stop driving `pin`; it falls back to its pull or latch level.
    pub fn release_pin(&self, pin: u8) {
        let mut state = self.state.borrow_mut();
        state.driven &= !(1u64 << pin);
    }

    /// Latched output level of `pin`.
    pub fn output_level(&self, pin: u8) -> bool {
        self.state.borrow().latch & (1u64 << pin) != 0
    }

    /// Rotate encoder `index` by `steps` detents.
    pub fn turn(&self, index: usize, steps: i32) {
        let mut state = self.state.borrow_mut();
        state.positions[index] = state.positions[index].wrapping_add(steps);
        state.deltas[index] = state.deltas[index].wrapping_add(steps);
    }

    pub fn encoder_interrupt_enabled(&self, index: usize) -> bool {
        self.state.borrow().encoder_inten[index]
    }

    pub fn gpio_interrupts(&self) -> u32 {
        self.state.borrow().gpio_inten
    }

    pub fn pull_enabled(&self, pin: u8) -> bool {
        self.state.borrow().pull_enable & (1u64 << pin) != 0
    }

    pub fn eeprom(&self, slot: u8) -> u8 {
        self.state.borrow().eeprom[usize::from(slot)]
    }

    pub fn baud(&self) -> u32 {
        self.state.borrow().baud
    }

    /// Number of software resets received.
    pub fn resets(&self) -> u32 {
        self.state.borrow().resets
    }

    /// Make the next `count` transactions addressing `register` fail with a
    /// bus error.
    pub fn fail_next(&self, register: Register, count: u32) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let header = register.header();
        if let Some(entry) = state.failures.iter_mut().find(|(h, _)| *h == header) {
            entry.1 = count;
        } else {
            let _ = state.failures.push((header, count));
        }
    }

    /// Logged write frames, oldest first.
    pub fn frames(&self) -> Vec<Frame, FRAME_LOG> {
        self.state.borrow().frames.clone()
    }

    pub fn clear_frames(&self) {
        self.state.borrow_mut().frames.clear();
    }

    fn transaction(&self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        let mut state = self.state.borrow_mut();
        if address != state.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => state.write(bytes)?,
                Operation::Read(buf) => state.read(buf),
            }
        }
        Ok(())
    }
}

/// I2C handle onto a [`SimulatedBoard`].
pub struct SimulatedI2c<'a> {
    board: &'a SimulatedBoard,
}

impl ErrorType for SimulatedI2c<'_> {
    type Error = ErrorKind;
}

impl embedded_hal::i2c::I2c for SimulatedI2c<'_> {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.board.transaction(address, operations)
    }
}

impl embedded_hal_async::i2c::I2c for SimulatedI2c<'_> {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.board.transaction(address, operations)
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal::i2c::I2c;

    use super::*;

    #[test]
    fn wrong_address_is_not_acknowledged() {
        let board = SimulatedBoard::new();
        let mut i2c = board.i2c();
        assert_eq!(
            i2c.write(0x10, &[0x00, 0x01]),
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
        );
        assert!(board.frames().is_empty());
    }

    #[test]
    fn delta_register_clears_on_read() {
        let board = SimulatedBoard::new();
        let mut i2c = board.i2c();
        board.turn(0, -3);

        let mut buf = [0u8; 4];
        i2c.write(DEFAULT_ADDRESS, &[0x11, 0x40]).unwrap();
        i2c.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(i32::from_be_bytes(buf), -3);

        i2c.write(DEFAULT_ADDRESS, &[0x11, 0x40]).unwrap();
        i2c.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(i32::from_be_bytes(buf), 0);
    }

    #[test]
    fn driving_an_interrupt_pin_raises_the_flag() {
        let board = SimulatedBoard::new();
        let mut i2c = board.i2c();
        // Pin 12 as pulled-up input with its interrupt enabled.
        i2c.write(DEFAULT_ADDRESS, &[0x01, 0x0B, 0, 0, 0, 0, 0, 0, 0x10, 0]).unwrap();
        i2c.write(DEFAULT_ADDRESS, &[0x01, 0x05, 0, 0, 0, 0, 0, 0, 0x10, 0]).unwrap();
        i2c.write(DEFAULT_ADDRESS, &[0x01, 0x08, 0, 0, 0x10, 0]).unwrap();
        assert!(board.pull_enabled(12));

        board.drive_pin(12, true);
        let mut buf = [0u8; 4];
        i2c.write(DEFAULT_ADDRESS, &[0x01, 0x0A]).unwrap();
        i2c.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(u32::from_be_bytes(buf), 0, "level unchanged");

        board.drive_pin(12, false);
        i2c.write(DEFAULT_ADDRESS, &[0x01, 0x0A]).unwrap();
        i2c.read(DEFAULT_ADDRESS, &mut buf).unwrap();
        assert_eq!(u32::from_be_bytes(buf), 1 << 12);
    }
}
