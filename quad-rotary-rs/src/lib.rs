//! Input events from the Adafruit Quad Rotary Encoder Breakout.
//!
//! The breakout (product #5752) carries four rotary encoders with push
//! switches behind a Seesaw coprocessor. [`QuadRotary`] samples them, either
//! on a fixed poll interval or on each rising edge of the board's INT line,
//! and publishes one [`Event`] per observed change: a rotation with its net
//! detent count, or a switch press/release.
//!
//! # Quick start
//!
//! ```ignore
//! use quad_rotary::{Config, Mode, QuadRotary};
//! use seesaw_driver::SeeSaw;
//!
//! let seesaw = SeeSaw::new(i2c, seesaw_driver::Config::default()).await?;
//! let engine: QuadRotary<CriticalSectionRawMutex, _, _> =
//!     QuadRotary::new(seesaw, Config::default(), Mode::default()).await?;
//!
//! // In one task:
//! engine.run().await;
//!
//! // In another:
//! let mut events = engine.events();
//! while let Some(event) = events.next().await {
//!     // ...
//! }
//! ```
//!
//! # Features
//!
//! - **`defmt`**: Log engine start/stop and per-channel read failures, and
//!   derive [`defmt::Format`] for the event types.

#![cfg_attr(not(test), no_std)]

pub use engine::{
    Config, Mode, NoInterrupt, QuadRotary, DEFAULT_POLL_INTERVAL, DEFAULT_QUEUE_DEPTH,
};
pub use event::{Event, EventKind};
pub use stream::EventStream;

mod engine;
mod event;
mod stream;
