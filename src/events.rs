//! Internal event queue.
//!
//! Events are produced by:
//! - Scheduler fires (CPU poll, dock poll, screen debounce, idle timeout)
//! - Display notifications (screen parameters changed)
//!
//! Events are consumed by [`AppService::tick`](crate::app::service::AppService::tick),
//! which processes them one at a time in FIFO order.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Scheduler    │────▶│              │     │              │
//! │ Display      │────▶│  EventQueue  │────▶│  Main Loop   │
//! │              │     │  (bounded)   │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::Deque;
use log::warn;

/// Maximum number of pending events.
const EVENT_QUEUE_CAP: usize = 32;

/// Runtime event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    // ── Sensors ───────────────────────────────────────────
    /// CPU poll timer fired.
    CpuPollTick = 0,
    /// Dock poll timer fired.
    DockPollTick = 1,

    // ── Display ───────────────────────────────────────────
    /// The OS reported a screen-parameter change (may burst).
    ScreenParamsChanged = 10,
    /// No further screen change arrived within the debounce delay.
    ScreenSettled = 11,

    // ── Behaviour ─────────────────────────────────────────
    /// The pet was left alone long enough to pick an idle activity.
    IdleTimeout = 20,
}

/// Bounded FIFO of pending [`Event`]s, owned by the main loop.
#[derive(Default)]
pub struct EventQueue {
    queue: Deque<Event, EVENT_QUEUE_CAP>,
    dropped: u32,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: Event) -> bool {
        if self.queue.push_back(event).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            warn!("Event queue full, dropped {:?}", event);
            return false;
        }
        true
    }

    /// Next event, oldest first.
    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Events lost to a full queue since construction.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
