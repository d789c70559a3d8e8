//! Consumer side of the engine's event queue.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;

use crate::engine::Lifecycle;
use crate::event::{Event, Message};

/// Ordered events from a [`QuadRotary`](crate::QuadRotary).
///
/// Several streams may drain the same engine; each event is delivered to
/// exactly one of them. A stream ends (yields `None`) once the engine is
/// stopped and every event published before the stop has been taken. Before
/// the first `run()` it waits like a running engine's stream.
pub struct EventStream<'a, M: RawMutex, const N: usize> {
    queue: &'a Channel<M, Message, N>,
    lifecycle: &'a BlockingMutex<M, Cell<Lifecycle>>,
}

impl<'a, M: RawMutex, const N: usize> EventStream<'a, M, N> {
    pub(crate) fn new(
        queue: &'a Channel<M, Message, N>,
        lifecycle: &'a BlockingMutex<M, Cell<Lifecycle>>,
    ) -> Self {
        Self { queue, lifecycle }
    }

    fn closed(&self) -> bool {
        self.lifecycle.lock(Cell::get).closed
    }

    /// Next event, waiting until one arrives; `None` once the engine has
    /// stopped and the queue is drained.
    pub async fn next(&mut self) -> Option<Event> {
        loop {
            let message = match self.queue.try_receive() {
                Ok(message) => message,
                Err(_) if self.closed() => return None,
                Err(_) => self.queue.receive().await,
            };
            if let Some(event) = self.accept(message) {
                return event;
            }
        }
    }

    /// Next event if one is already queued.
    pub fn try_next(&mut self) -> Option<Event> {
        loop {
            let message = self.queue.try_receive().ok()?;
            if let Some(event) = self.accept(message) {
                return event;
            }
        }
    }

    /// `None` to skip the message, `Some(None)` when the stream has ended.
    fn accept(&self, message: Message) -> Option<Option<Event>> {
        match message {
            Message::Event(event) => Some(Some(event)),
            // Left over from an earlier run.
            Message::Closed if !self.closed() => None,
            Message::Closed => {
                // Put the marker back for any other parked consumer.
                let _ = self.queue.try_send(Message::Closed);
                Some(None)
            }
        }
    }
}
