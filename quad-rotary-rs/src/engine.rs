//! The sampling engine: turns encoder deltas and switch levels into
//! [`Event`]s.
//!
//! Each tick locks the device once, then for every active encoder/switch
//! pair in ascending index order reads the switch (one event if its level
//! differs from the remembered one) and consumes the encoder delta (one
//! event if nonzero). The tick's events are published only after the
//! device lock is released.

use core::cell::Cell;
use core::convert::Infallible;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use embedded_hal::digital::ErrorType;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::I2c;
use heapless::Vec;
use seesaw_driver::{DigitalIo, IncrementalEncoder, Pull, SeeSaw, SeeSawError, ENCODER_COUNT};

use crate::event::{Event, Message};
use crate::stream::EventStream;

/// Poll rate used when no interrupt pin is wired: 30 Hz.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_hz(30);

/// Default event queue depth.
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// Which encoder/switch pairs to sample and where the switches are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Bit `n` enables pair `n`. Bits above 3 are ignored. Default: `0x0F`.
    pub mask: u8,
    /// Seesaw GPIO of each pair's push switch. Default: the Quad Rotary
    /// Encoder Breakout wiring, pins 12, 14, 17 and 19.
    pub switch_pins: [u8; ENCODER_COUNT],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mask: 0x0F,
            switch_pins: [12, 14, 17, 19],
        }
    }
}

/// What drives a tick.
pub enum Mode<INT> {
    /// Sample, then sleep for the interval, forever.
    Poll(Duration),
    /// Sample once per rising edge of the breakout's INT line.
    Interrupt(INT),
}

impl Default for Mode<NoInterrupt> {
    fn default() -> Self {
        Mode::Poll(DEFAULT_POLL_INTERVAL)
    }
}

/// Pin type for engines that only poll. Cannot be constructed.
pub enum NoInterrupt {}

impl ErrorType for NoInterrupt {
    type Error = Infallible;
}

impl Wait for NoInterrupt {
    async fn wait_for_high(&mut self) -> Result<(), Infallible> {
        match *self {}
    }

    async fn wait_for_low(&mut self) -> Result<(), Infallible> {
        match *self {}
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
        match *self {}
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
        match *self {}
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
        match *self {}
    }
}

struct Pair {
    index: u8,
    switch: DigitalIo,
    encoder: IncrementalEncoder,
}

/// State only the running loop touches.
struct Sampler<INT> {
    mode: Mode<INT>,
    pairs: Vec<Pair, ENCODER_COUNT>,
}

/// Loop lifecycle, shared with the event streams.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Lifecycle {
    pub(crate) running: bool,
    /// Set by `stop()`, consumed by the `run()` that honours it.
    pub(crate) stop_requested: bool,
    /// Streams end once this is set and the queue is drained.
    pub(crate) closed: bool,
}

/// Close the streams and wake parked consumers.
fn close<M: RawMutex, const N: usize>(
    queue: &Channel<M, Message, N>,
    lifecycle: &BlockingMutex<M, Cell<Lifecycle>>,
) {
    lifecycle.lock(|cell| {
        let mut state = cell.get();
        state.running = false;
        state.closed = true;
        cell.set(state);
    });
    // A full queue has no parked consumer to wake.
    let _ = queue.try_send(Message::Closed);
}

/// Marks the loop as stopped and wakes parked consumers on every exit path,
/// including the `run()` future being dropped.
struct Session<'a, M: RawMutex, const N: usize> {
    queue: &'a Channel<M, Message, N>,
    lifecycle: &'a BlockingMutex<M, Cell<Lifecycle>>,
    cancel: &'a Signal<M, ()>,
}

impl<M: RawMutex, const N: usize> Drop for Session<'_, M, N> {
    fn drop(&mut self) {
        self.lifecycle.lock(|cell| {
            let mut state = cell.get();
            state.stop_requested = false;
            cell.set(state);
        });
        self.cancel.reset();
        close(self.queue, self.lifecycle);

        #[cfg(feature = "defmt")]
        defmt::info!("QuadRotary stopped");
    }
}

/// Event engine for a Quad Rotary Encoder Breakout.
///
/// Owns the [`SeeSaw`] device behind an async mutex; every tick holds that
/// lock, and other code reaches the device through [`device`](Self::device)
/// so bus transactions never interleave.
///
/// [`run`](Self::run) is the sampling loop. Embassy tasks cannot be
/// generic, so spawn it from a thin concrete task:
///
/// ```ignore
/// static ENGINE: StaticCell<QuadRotary<CriticalSectionRawMutex, MyI2c, Input<'static>>> =
///     StaticCell::new();
///
/// #[embassy_executor::task]
/// async fn rotary_task(engine: &'static QuadRotary<CriticalSectionRawMutex, MyI2c, Input<'static>>) {
///     engine.run().await;
/// }
/// ```
///
/// Consumers read from [`events`](Self::events). The queue holds `N` events;
/// when it is full the loop waits for a consumer before sampling again.
pub struct QuadRotary<M: RawMutex, I2C, INT, const N: usize = DEFAULT_QUEUE_DEPTH> {
    seesaw: Mutex<M, SeeSaw<I2C>>,
    sampler: Mutex<M, Sampler<INT>>,
    switch_levels: BlockingMutex<M, Cell<[bool; ENCODER_COUNT]>>,
    queue: Channel<M, Message, N>,
    cancel: Signal<M, ()>,
    lifecycle: BlockingMutex<M, Cell<Lifecycle>>,
}

impl<M: RawMutex, I2C, INT, const N: usize> QuadRotary<M, I2C, INT, N> {
    /// The device, for operations outside the sampling loop.
    pub fn device(&self) -> &Mutex<M, SeeSaw<I2C>> {
        &self.seesaw
    }

    pub fn events(&self) -> EventStream<'_, M, N> {
        EventStream::new(&self.queue, &self.lifecycle)
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.lock(Cell::get).running
    }

    /// Last switch level seen by the loop for each pair; `true` is released.
    pub fn switch_levels(&self) -> [bool; ENCODER_COUNT] {
        self.switch_levels.lock(Cell::get)
    }

    /// Stop the sampling loop. No event is published after this returns.
    ///
    /// Takes effect at the loop's next suspension point; a bus transaction
    /// already in flight completes. A stop issued while no loop is active is
    /// honoured by the next `run()`, which then returns at once.
    pub fn stop(&self) {
        self.lifecycle.lock(|cell| {
            let mut state = cell.get();
            state.stop_requested = true;
            cell.set(state);
        });
        self.cancel.signal(());
        close(&self.queue, &self.lifecycle);
    }
}

impl<M, I2C, INT, const N: usize> QuadRotary<M, I2C, INT, N>
where
    M: RawMutex,
    I2C: I2c,
    INT: Wait,
{
    /// Configure the active switches as pulled-up inputs and, in interrupt
    /// mode, enable the interrupts of the active encoders and switches.
    ///
    /// # Errors
    /// Any bus failure during setup; the device is dropped.
    pub async fn new(
        mut seesaw: SeeSaw<I2C>,
        config: Config,
        mode: Mode<INT>,
    ) -> Result<Self, SeeSawError<I2C::Error>> {
        let interrupts = matches!(mode, Mode::Interrupt(_));
        let mut pairs = Vec::new();
        let mut switch_mask = 0u32;

        for (index, &pin) in (0u8..).zip(config.switch_pins.iter()) {
            if config.mask & (1 << index) == 0 {
                continue;
            }
            let Ok(encoder) = IncrementalEncoder::new(index) else {
                continue;
            };
            let mut switch = DigitalIo::new(pin);
            switch.switch_to_input(&mut seesaw, Pull::Up).await?;
            if interrupts {
                encoder.enable_interrupt(&mut seesaw).await?;
                switch_mask |= 1u32.checked_shl(u32::from(pin)).unwrap_or(0);
            }
            let _ = pairs.push(Pair {
                index,
                switch,
                encoder,
            });
        }

        if interrupts {
            seesaw.set_gpio_interrupts(switch_mask, true).await?;
            // Release INT in case setup latched a flag.
            seesaw.gpio_interrupt_flag().await?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "QuadRotary ready: mask {=u8:#x}, interrupt mode {}",
            config.mask,
            interrupts
        );

        Ok(Self {
            seesaw: Mutex::new(seesaw),
            sampler: Mutex::new(Sampler { mode, pairs }),
            switch_levels: BlockingMutex::new(Cell::new([true; ENCODER_COUNT])),
            queue: Channel::new(),
            cancel: Signal::new(),
            lifecycle: BlockingMutex::new(Cell::new(Lifecycle::default())),
        })
    }

    /// The sampling loop. Returns after [`stop`](Self::stop).
    ///
    /// Returns at once if another `run()` future of this engine is active,
    /// or if `stop()` was called since the last loop ended. Per-channel bus
    /// failures are logged and count as "no change"; they never end the
    /// loop.
    pub async fn run(&self) {
        let Ok(mut sampler) = self.sampler.try_lock() else {
            return;
        };
        let start = self.lifecycle.lock(|cell| {
            let mut state = cell.get();
            let start = !state.stop_requested;
            state.stop_requested = false;
            if start {
                state.running = true;
                state.closed = false;
            }
            cell.set(state);
            start
        });
        if !start {
            self.cancel.reset();
            return;
        }
        self.discard_stale_markers();
        let _session = Session {
            queue: &self.queue,
            lifecycle: &self.lifecycle,
            cancel: &self.cancel,
        };

        #[cfg(feature = "defmt")]
        defmt::info!("QuadRotary started");

        loop {
            if let Mode::Interrupt(pin) = &mut sampler.mode {
                match select(self.cancel.wait(), pin.wait_for_rising_edge()).await {
                    Either::First(()) => return,
                    Either::Second(Ok(())) => {}
                    Either::Second(Err(_e)) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("INT pin failed: {}", defmt::Debug2Format(&_e));
                        if self.sleep(DEFAULT_POLL_INTERVAL).await.is_err() {
                            return;
                        }
                        continue;
                    }
                }
            }

            let rearm = matches!(sampler.mode, Mode::Interrupt(_));
            let events = self.tick(&sampler.pairs, rearm).await;
            for event in events {
                let send = self.queue.send(Message::Event(event));
                if let Either::First(()) = select(self.cancel.wait(), send).await {
                    return;
                }
            }

            if let Mode::Poll(interval) = sampler.mode {
                if self.sleep(interval).await.is_err() {
                    return;
                }
            }
        }
    }

    /// Drop end markers left by earlier runs, keeping queued events in order.
    fn discard_stale_markers(&self) {
        let mut kept: Vec<Event, N> = Vec::new();
        while let Ok(message) = self.queue.try_receive() {
            if let Message::Event(event) = message {
                let _ = kept.push(event);
            }
        }
        for event in kept {
            let _ = self.queue.try_send(Message::Event(event));
        }
    }

    /// Sleep unless cancelled first.
    async fn sleep(&self, duration: Duration) -> Result<(), ()> {
        match select(self.cancel.wait(), Timer::after(duration)).await {
            Either::First(()) => Err(()),
            Either::Second(()) => Ok(()),
        }
    }

    /// One sampling pass over `pairs`.
    async fn tick(&self, pairs: &[Pair], rearm: bool) -> Vec<Event, { 2 * ENCODER_COUNT }> {
        let mut events = Vec::new();
        let mut guard = self.seesaw.lock().await;
        let seesaw = &mut *guard;
        let mut levels = self.switch_levels.lock(Cell::get);

        for pair in pairs {
            let slot = usize::from(pair.index);

            match pair.switch.value(seesaw).await {
                Ok(level) if level != levels[slot] => {
                    levels[slot] = level;
                    let _ = events.push(Event::switched(pair.index, level));
                }
                Ok(_) => {}
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Switch {} read failed", pair.index);
                }
            }

            match pair.encoder.take_delta(seesaw).await {
                Ok(0) => {}
                Ok(delta) => {
                    let _ = events.push(Event::rotated(pair.index, delta));
                }
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Encoder {} read failed", pair.index);
                }
            }
        }

        self.switch_levels.lock(|cell| cell.set(levels));

        // Reading the flag register drives INT back high for the next edge.
        if rearm && seesaw.gpio_interrupt_flag().await.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Failed to clear interrupt flags");
        }

        events
    }
}

impl<M: RawMutex, I2C, INT, const N: usize> Drop for QuadRotary<M, I2C, INT, N> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embassy_futures::join::{join, join3};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_time::with_timeout;
    use seesaw_driver::mock::{SimulatedBoard, SimulatedI2c};
    use seesaw_driver::registers::{encoder, Base, Register};

    use super::*;
    use crate::event::EventKind;

    const TICK: Duration = Duration::from_millis(1);
    const SETTLE: Duration = Duration::from_millis(20);
    const PATIENCE: Duration = Duration::from_millis(500);

    type Polled<'a> = QuadRotary<NoopRawMutex, SimulatedI2c<'a>, NoInterrupt>;

    fn device(board: &SimulatedBoard) -> SeeSaw<SimulatedI2c<'_>> {
        let config = seesaw_driver::Config {
            reset: false,
            ..seesaw_driver::Config::default()
        };
        block_on(SeeSaw::new(board.i2c(), config)).unwrap()
    }

    fn polled(board: &SimulatedBoard, config: Config) -> Polled<'_> {
        block_on(QuadRotary::new(device(board), config, Mode::Poll(TICK))).unwrap()
    }

    /// Rising-edge source the test fires by hand.
    struct EdgePin<'a> {
        edges: &'a Signal<NoopRawMutex, ()>,
    }

    impl ErrorType for EdgePin<'_> {
        type Error = Infallible;
    }

    impl Wait for EdgePin<'_> {
        async fn wait_for_high(&mut self) -> Result<(), Infallible> {
            core::future::pending().await
        }

        async fn wait_for_low(&mut self) -> Result<(), Infallible> {
            core::future::pending().await
        }

        async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
            self.edges.wait().await;
            Ok(())
        }

        async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
            core::future::pending().await
        }

        async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
            self.edges.wait().await;
            Ok(())
        }
    }

    #[test]
    fn one_delta_yields_exactly_one_rotation() {
        let board = SimulatedBoard::new();
        let engine = polled(&board, Config::default());
        board.turn(0, 5);

        block_on(join(engine.run(), async {
            let mut events = engine.events();
            let first = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(first, Ok(Some(Event::rotated(0, 5))));

            Timer::after(SETTLE).await;
            assert_eq!(events.try_next(), None);

            board.turn(0, -1);
            let next = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(next, Ok(Some(Event::rotated(0, -1))));
            engine.stop();
        }));
    }

    #[test]
    fn switch_transition_is_reported_once_and_remembered() {
        let board = SimulatedBoard::new();
        let engine = polled(&board, Config::default());
        assert_eq!(engine.switch_levels(), [true; 4]);

        block_on(join(engine.run(), async {
            let mut events = engine.events();

            board.drive_pin(14, false);
            let pressed = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(pressed, Ok(Some(Event::switched(1, false))));
            assert_eq!(engine.switch_levels(), [true, false, true, true]);

            Timer::after(SETTLE).await;
            assert_eq!(events.try_next(), None);

            board.release_pin(14);
            let released = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(
                released.map(|e| e.map(|e| e.kind)),
                Ok(Some(EventKind::SwitchReleased))
            );
            assert_eq!(engine.switch_levels(), [true; 4]);

            Timer::after(SETTLE).await;
            assert_eq!(events.try_next(), None);
            engine.stop();
        }));
    }

    #[test]
    fn tick_orders_by_index_switch_before_rotation() {
        let board = SimulatedBoard::new();
        let engine = polled(&board, Config::default());
        board.turn(2, 1);
        board.turn(0, -1);
        board.drive_pin(12, false);

        block_on(join(engine.run(), async {
            let mut events = engine.events();
            let mut seen = [None; 3];
            for slot in seen.iter_mut() {
                *slot = with_timeout(PATIENCE, events.next()).await.unwrap();
            }
            assert_eq!(
                seen,
                [
                    Some(Event::switched(0, false)),
                    Some(Event::rotated(0, -1)),
                    Some(Event::rotated(2, 1)),
                ]
            );
            engine.stop();
        }));
    }

    #[test]
    fn inactive_pairs_are_not_sampled() {
        let board = SimulatedBoard::new();
        let config = Config {
            mask: 0b0001,
            ..Config::default()
        };
        let engine = polled(&board, config);
        // Only pin 12 was configured as an input.
        assert!(board.pull_enabled(12));
        assert!(!board.pull_enabled(14));

        board.turn(1, 4);
        board.turn(0, 2);

        block_on(join(engine.run(), async {
            let mut events = engine.events();
            let first = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(first, Ok(Some(Event::rotated(0, 2))));
            Timer::after(SETTLE).await;
            assert_eq!(events.try_next(), None);
            engine.stop();
        }));

        // The masked-out delta is still waiting in the device.
        let mut seesaw = block_on(engine.device().lock());
        assert_eq!(block_on(seesaw.take_delta(1)), Ok(4));
    }

    #[test]
    fn nothing_is_published_after_stop() {
        let board = SimulatedBoard::new();
        let engine = polled(&board, Config::default());

        block_on(join(engine.run(), async {
            let mut events = engine.events();
            Timer::after(SETTLE).await;
            engine.stop();
            assert!(!engine.is_running());

            board.turn(0, 3);
            board.drive_pin(19, false);
            Timer::after(SETTLE).await;

            assert_eq!(events.try_next(), None);
            assert_eq!(with_timeout(PATIENCE, events.next()).await, Ok(None));

            // No tick consumed the delta.
            let mut seesaw = engine.device().lock().await;
            assert_eq!(seesaw.take_delta(0).await, Ok(3));
        }));
    }

    #[test]
    fn channel_failure_is_skipped_for_that_tick_only() {
        let board = SimulatedBoard::new();
        let engine = polled(&board, Config::default());
        board.fail_next(Register::new(Base::Encoder, encoder::DELTA + 1), 1);
        board.turn(1, 2);
        board.turn(3, 4);

        block_on(join(engine.run(), async {
            let mut events = engine.events();
            let first = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(first, Ok(Some(Event::rotated(3, 4))));
            // The failed read left the delta in place for the next tick.
            let second = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(second, Ok(Some(Event::rotated(1, 2))));
            engine.stop();
        }));
    }

    #[test]
    fn interrupt_mode_samples_once_per_edge() {
        let board = SimulatedBoard::new();
        let edges = Signal::<NoopRawMutex, ()>::new();
        let config = Config {
            mask: 0b0101,
            ..Config::default()
        };
        let engine: QuadRotary<NoopRawMutex, _, _> = block_on(QuadRotary::new(
            device(&board),
            config,
            Mode::Interrupt(EdgePin { edges: &edges }),
        ))
        .unwrap();

        assert!(board.encoder_interrupt_enabled(0));
        assert!(!board.encoder_interrupt_enabled(1));
        assert!(board.encoder_interrupt_enabled(2));
        assert_eq!(board.gpio_interrupts(), (1 << 12) | (1 << 17));
        board.clear_frames();

        block_on(join(engine.run(), async {
            let mut events = engine.events();
            board.turn(2, 6);
            Timer::after(SETTLE).await;
            assert_eq!(events.try_next(), None, "no edge, no tick");

            edges.signal(());
            let first = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(first, Ok(Some(Event::rotated(2, 6))));
            assert!(board
                .frames()
                .iter()
                .any(|frame| frame.as_slice() == [0x01, 0x0A]));

            engine.stop();
        }));
    }

    #[test]
    fn run_is_single_instance_and_restartable() {
        let board = SimulatedBoard::new();
        let engine = polled(&board, Config::default());

        block_on(join3(engine.run(), engine.run(), async {
            let mut events = engine.events();
            board.turn(0, 1);
            let first = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(first, Ok(Some(Event::rotated(0, 1))));
            Timer::after(SETTLE).await;
            assert_eq!(events.try_next(), None);
            engine.stop();
            engine.stop();
        }));
        assert!(!engine.is_running());

        // A fresh run skips the previous run's end marker.
        block_on(join(engine.run(), async {
            let mut events = engine.events();
            board.turn(3, -2);
            let next = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(next, Ok(Some(Event::rotated(3, -2))));
            engine.stop();
        }));
    }

    #[test]
    fn consumer_waiting_before_run_sees_events() {
        let board = SimulatedBoard::new();
        let engine = polled(&board, Config::default());
        board.turn(0, 5);

        let (first, ()) = block_on(join(
            async {
                let mut events = engine.events();
                let first = with_timeout(PATIENCE, events.next()).await;
                engine.stop();
                first
            },
            async {
                Timer::after(SETTLE).await;
                engine.run().await;
            },
        ));
        assert_eq!(first, Ok(Some(Event::rotated(0, 5))));
    }

    #[test]
    fn stop_before_first_poll_ends_run() {
        let board = SimulatedBoard::new();
        let engine = polled(&board, Config::default());
        board.turn(0, 2);

        engine.stop();
        assert_eq!(block_on(with_timeout(PATIENCE, engine.run())), Ok(()));
        assert!(!engine.is_running());
        assert_eq!(engine.events().try_next(), None);

        // The request was consumed; a later run samples normally.
        block_on(join(engine.run(), async {
            let mut events = engine.events();
            let first = with_timeout(PATIENCE, events.next()).await;
            assert_eq!(first, Ok(Some(Event::rotated(0, 2))));
            engine.stop();
        }));
    }

    #[test]
    fn full_queue_blocks_until_stopped() {
        let board = SimulatedBoard::new();
        let engine: QuadRotary<NoopRawMutex, _, NoInterrupt, 1> =
            block_on(QuadRotary::new(device(&board), Config::default(), Mode::Poll(TICK)))
                .unwrap();
        board.turn(0, 1);
        board.turn(1, 2);
        board.turn(2, 3);

        let stopped = block_on(with_timeout(
            PATIENCE,
            join(engine.run(), async {
                Timer::after(SETTLE).await;
                assert!(engine.is_running());
                engine.stop();
            }),
        ));
        assert!(stopped.is_ok());

        let mut events = engine.events();
        assert_eq!(events.try_next(), Some(Event::rotated(0, 1)));
        assert_eq!(events.try_next(), None);
        assert_eq!(block_on(events.next()), None);
    }

    #[test]
    fn end_markers_do_not_pile_up_across_runs() {
        let board = SimulatedBoard::new();
        let engine: QuadRotary<NoopRawMutex, _, NoInterrupt, 2> =
            block_on(QuadRotary::new(device(&board), Config::default(), Mode::Poll(TICK)))
                .unwrap();

        for _ in 0..3 {
            block_on(join(engine.run(), async {
                Timer::after(TICK).await;
                engine.stop();
            }));
        }

        board.turn(0, 1);
        board.turn(1, 1);
        board.turn(2, 1);
        block_on(join(engine.run(), async {
            Timer::after(SETTLE).await;
            engine.stop();
        }));

        let mut events = engine.events();
        assert_eq!(events.try_next(), Some(Event::rotated(0, 1)));
        assert_eq!(events.try_next(), Some(Event::rotated(1, 1)));
        assert_eq!(events.try_next(), None);
    }
}
