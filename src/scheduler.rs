//! Timer/scheduler engine.
//!
//! Drives every recurring and one-shot activity of the companion from a
//! single monotonic millisecond clock.  The scheduler notifies a
//! [`SchedulerDelegate`] when timers fire; the service implements the
//! delegate to push events into its queue.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Timer Sources                          │
//! │                                                              │
//! │  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌──────────┐   │
//! │  │ CPU poll  │  │ Dock poll │  │ Screen    │  │ Idle     │   │
//! │  │ (10 s)    │  │ (3 s)     │  │ debounce  │  │ timeout  │   │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  └─────┬────┘   │
//! │        │  periodic    │  periodic    │  one-shot    │ one-shot│
//! │        ▼              ▼              ▼              ▼        │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              SchedulerDelegate                         │  │
//! │  │       (service pushes into its EventQueue)             │  │
//! │  └───────────────────────┬────────────────────────────────┘  │
//! │                          ▼                                   │
//! │                    AppService.tick()                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::app::ports::{SchedulerDelegate, TimerId};
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════
//  Timer types
// ═══════════════════════════════════════════════════════════════

/// A single timer entry.
#[derive(Debug, Clone)]
pub struct Timer {
    /// Human-readable label (e.g., "cpu-poll").
    pub label: &'static str,
    pub id: TimerId,
    pub kind: TimerKind,
}

/// The type of timer determines how and when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fire every `interval_ms`.
    Periodic { interval_ms: u64 },
    /// Fire once, `delay_ms` after being armed, then disarm.
    OneShot { delay_ms: u64 },
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of concurrent timers (stack-allocated).
const MAX_TIMERS: usize = 4;

/// The scheduler engine.
///
/// Timers are keyed by [`TimerId`]: arming an id that is already present
/// replaces its deadline, which is how bursts are coalesced.
pub struct Scheduler {
    timers: [Option<TimerEntry>; MAX_TIMERS],
    /// Global enable flag.
    enabled: bool,
}

/// Internal bookkeeping for a live timer.
#[derive(Debug, Clone)]
struct TimerEntry {
    timer: Timer,
    /// Monotonic time at which the timer next fires.
    due_ms: u64,
    armed: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            timers: [None, None, None, None],
            enabled: true,
        }
    }

    /// Arm `timer` relative to `now_ms`, replacing any timer with the same
    /// id.  Returns the slot index, or `None` if every slot is taken.
    pub fn arm(&mut self, timer: Timer, now_ms: u64) -> Option<usize> {
        let delay = match timer.kind {
            TimerKind::Periodic { interval_ms } => interval_ms,
            TimerKind::OneShot { delay_ms } => delay_ms,
        };
        let entry = TimerEntry {
            due_ms: now_ms.saturating_add(delay),
            armed: true,
            timer,
        };

        if let Some(i) = self.slot_of(entry.timer.id) {
            debug!("Scheduler: re-armed '{}' for +{}ms", entry.timer.label, delay);
            self.timers[i] = Some(entry);
            return Some(i);
        }

        for (i, slot) in self.timers.iter_mut().enumerate() {
            if slot.is_none() {
                info!("Scheduler: added '{}' at slot {}", entry.timer.label, i);
                *slot = Some(entry);
                return Some(i);
            }
        }
        None // All slots full.
    }

    /// Disarm and remove the timer with `id`, if present.
    pub fn cancel(&mut self, id: TimerId) {
        if let Some(i) = self.slot_of(id) {
            if let Some(entry) = &self.timers[i] {
                info!("Scheduler: removed '{}' from slot {}", entry.timer.label, i);
            }
            self.timers[i] = None;
        }
    }

    /// Remove every timer (teardown).
    pub fn cancel_all(&mut self) {
        self.timers = [None, None, None, None];
    }

    /// Enable or disable the entire scheduler.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Fire every timer whose deadline has passed.  Call once per loop.
    ///
    /// A periodic timer that fell several intervals behind fires once and
    /// is rescheduled one interval after `now_ms`.
    pub fn tick(&mut self, now_ms: u64, delegate: &mut dyn SchedulerDelegate) {
        if !self.enabled {
            return;
        }

        for slot in &mut self.timers {
            let entry = match slot {
                Some(e) if e.armed => e,
                _ => continue,
            };
            if now_ms < entry.due_ms {
                continue;
            }

            delegate.on_timer_fired(entry.timer.label, entry.timer.id);

            match entry.timer.kind {
                TimerKind::Periodic { interval_ms } => {
                    let next = entry.due_ms.saturating_add(interval_ms);
                    entry.due_ms = if next > now_ms {
                        next
                    } else {
                        now_ms.saturating_add(interval_ms)
                    };
                }
                TimerKind::OneShot { .. } => {
                    entry.armed = false; // Auto-disarm.
                }
            }
        }
    }

    /// Whether the timer with `id` will fire again.
    pub fn is_armed(&self, id: TimerId) -> bool {
        self.slot_of(id)
            .and_then(|i| self.timers[i].as_ref())
            .is_some_and(|e| e.armed)
    }

    /// Deadline of the timer with `id`, if armed.
    pub fn due_ms(&self, id: TimerId) -> Option<u64> {
        self.slot_of(id)
            .and_then(|i| self.timers[i].as_ref())
            .filter(|e| e.armed)
            .map(|e| e.due_ms)
    }

    /// Number of armed timers.
    pub fn active_count(&self) -> usize {
        self.timers
            .iter()
            .filter(|s| s.as_ref().is_some_and(|e| e.armed))
            .count()
    }

    fn slot_of(&self, id: TimerId) -> Option<usize> {
        self.timers
            .iter()
            .position(|s| s.as_ref().is_some_and(|e| e.timer.id == id))
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
