//! Table-driven pet state machine.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  PetStateMachine                                          │
//! │  ┌────────┬──────────────┬───────┬─────────────────────┐  │
//! │  │ State  │ animation(s) │ loops │ placeholder colour  │  │
//! │  ├────────┼──────────────┼───────┼─────────────────────┤  │
//! │  │ Idle   │ 2.0          │ yes   │ blue                │  │
//! │  │ Walk   │ 1.0          │ no    │ green               │  │
//! │  │ Sleep  │ 3.0          │ no    │ purple              │  │
//! │  │ Eat    │ 1.5          │ no    │ orange              │  │
//! │  │ Dance  │ 2.5          │ no    │ pink                │  │
//! │  └────────┴──────────────┴───────┴─────────────────────┘  │
//! │  + TRANSITIONS[state][event] -> next state                │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! [`PetStateMachine::handle_event`] looks the next state up in the
//! transition table and hands it to [`PetStateMachine::set_state`], which
//! notifies the [`StateListener`] synchronously, and only when the state
//! actually changes.

pub mod states;

use core::fmt;

use log::info;

use crate::app::ports::StateListener;
use states::{StateDescriptor, build_state_table, next_state};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all pet states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PetState {
    Idle = 0,
    Walk = 1,
    Sleep = 2,
    Eat = 3,
    Dance = 4,
}

impl PetState {
    /// Total number of states — used to size the tables.
    pub const COUNT: usize = 5;

    pub const ALL: [Self; Self::COUNT] = [Self::Idle, Self::Walk, Self::Sleep, Self::Eat, Self::Dance];

    /// Lower-case name, also the sprite directory and file prefix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Sleep => "sleep",
            Self::Eat => "eat",
            Self::Dance => "dance",
        }
    }
}

impl fmt::Display for PetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stimuli produced by input handlers and timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PetEvent {
    Idle = 0,
    Walk = 1,
    Sleep = 2,
    Feed = 3,
    Dance = 4,
    Interact = 5,
}

impl PetEvent {
    pub const COUNT: usize = 6;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Idle,
        Self::Walk,
        Self::Sleep,
        Self::Feed,
        Self::Dance,
        Self::Interact,
    ];
}

/// Idle-animation cadence hint derived from CPU load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdleFrequency {
    #[default]
    Low,
    Medium,
    High,
}

impl IdleFrequency {
    /// Classify a 0–1 utilization: strictly above `high` is `High`,
    /// strictly above `medium` is `Medium`, anything else is `Low`.
    pub fn from_usage(usage: f64, medium: f64, high: f64) -> Self {
        if usage > high {
            Self::High
        } else if usage > medium {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for IdleFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// The pet state machine.
///
/// Holds exactly one current state at all times. Listeners are passed at
/// each call site rather than stored, so the machine borrows nothing.
pub struct PetStateMachine {
    /// Fixed-size table indexed by `PetState as usize`.
    table: [StateDescriptor; PetState::COUNT],
    current: PetState,
    idle_frequency: IdleFrequency,
    /// Number of state changes since construction.
    transitions: u64,
}

impl Default for PetStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PetStateMachine {
    /// Construct a machine resting in `Idle`.
    pub fn new() -> Self {
        Self {
            table: build_state_table(),
            current: PetState::Idle,
            idle_frequency: IdleFrequency::Low,
            transitions: 0,
        }
    }

    /// Move to `next`, notifying `listener` if the state changed.
    ///
    /// Returns `true` when a transition happened.
    pub fn set_state(&mut self, next: PetState, listener: &mut dyn StateListener) -> bool {
        if next == self.current {
            return false;
        }

        let prev = self.current;
        info!("Pet state: {} -> {}", prev, next);
        self.current = next;
        self.transitions += 1;
        listener.on_state_changed(prev, next);
        true
    }

    /// Apply `event` through the transition table.  Returns the resulting
    /// current state.
    pub fn handle_event(&mut self, event: PetEvent, listener: &mut dyn StateListener) -> PetState {
        let next = next_state(self.current, event);
        self.set_state(next, listener);
        self.current
    }

    pub fn set_idle_frequency(&mut self, frequency: IdleFrequency) {
        self.idle_frequency = frequency;
    }

    pub fn idle_frequency(&self) -> IdleFrequency {
        self.idle_frequency
    }

    pub fn current_state(&self) -> PetState {
        self.current
    }

    /// Descriptor row for `state`.
    pub fn descriptor(&self, state: PetState) -> &StateDescriptor {
        &self.table[state as usize]
    }

    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    pub fn is_idle(&self) -> bool {
        self.current == PetState::Idle
    }

    /// Eating and dancing are the reactions to user interaction.
    pub fn is_interacting(&self) -> bool {
        matches!(self.current, PetState::Eat | PetState::Dance)
    }

    pub fn can_sleep(&self) -> bool {
        self.is_idle()
    }

    pub fn can_walk(&self) -> bool {
        self.is_idle()
    }
}

impl fmt::Display for PetStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PetStateMachine(current: {}, frequency: {})",
            self.current, self.idle_frequency
        )
    }
}
