//! Input events produced by the engine.

/// What happened on one encoder/switch pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// Net detents since the previous tick; positive is clockwise.
    Rotated(i32),
    /// The push switch closed (pin pulled low).
    SwitchPressed,
    /// The push switch opened again.
    SwitchReleased,
}

/// A single observed change on encoder/switch pair `index` (0..4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    pub index: u8,
    pub kind: EventKind,
}

impl Event {
    pub const fn rotated(index: u8, delta: i32) -> Self {
        Self {
            index,
            kind: EventKind::Rotated(delta),
        }
    }

    /// Event for a switch whose pin now reads `level`. The switches are
    /// active-low, so a low level is a press.
    pub const fn switched(index: u8, level: bool) -> Self {
        Self {
            index,
            kind: if level {
                EventKind::SwitchReleased
            } else {
                EventKind::SwitchPressed
            },
        }
    }
}

/// What travels through the engine's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Message {
    Event(Event),
    /// The sampling loop has exited; wakes consumers parked on an empty
    /// queue.
    Closed,
}
