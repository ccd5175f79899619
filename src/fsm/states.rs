//! Per-state descriptors and the event transition table.
//!
//! ```text
//!            ┌──[walk]──▶ WALK ──[idle|interact]──┐
//!            │                                    ▼
//!          IDLE ◀───────────────────────────── (back)
//!            │                                    ▲
//!            └──[sleep]─▶ SLEEP ─[idle|interact]──┘
//!
//!  Any state ──[feed]──▶ EAT     ──[anything else]──▶ IDLE
//!  Any state ──[dance]─▶ DANCE   ──[anything else]──▶ IDLE
//!  Any state ──[interact]──▶ IDLE
//! ```
//!
//! The table is total: every `(state, event)` cell names a next state, and
//! cells with no rule hold the current state.

use super::{PetEvent, PetState};

// ═══════════════════════════════════════════════════════════════════════════
//  State descriptors
// ═══════════════════════════════════════════════════════════════════════════

/// Static descriptor for a single pet state.
#[derive(Debug, Clone, Copy)]
pub struct StateDescriptor {
    pub id: PetState,
    pub name: &'static str,
    /// Length of one full pass through the state's animation.
    pub animation_secs: f64,
    /// Whether the animation repeats; non-looping states fall back to idle.
    pub loops: bool,
    /// Fill colour (R, G, B) used when no sprite frames exist.
    pub placeholder_rgb: (u8, u8, u8),
}

/// Build the static state table.  Indexed by `PetState as usize`.
pub const fn build_state_table() -> [StateDescriptor; PetState::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: PetState::Idle,
            name: "idle",
            animation_secs: 2.0,
            loops: true,
            placeholder_rgb: (0, 122, 255), // blue
        },
        // Index 1 — Walk
        StateDescriptor {
            id: PetState::Walk,
            name: "walk",
            animation_secs: 1.0,
            loops: false,
            placeholder_rgb: (52, 199, 89), // green
        },
        // Index 2 — Sleep
        StateDescriptor {
            id: PetState::Sleep,
            name: "sleep",
            animation_secs: 3.0,
            loops: false,
            placeholder_rgb: (175, 82, 222), // purple
        },
        // Index 3 — Eat
        StateDescriptor {
            id: PetState::Eat,
            name: "eat",
            animation_secs: 1.5,
            loops: false,
            placeholder_rgb: (255, 149, 0), // orange
        },
        // Index 4 — Dance
        StateDescriptor {
            id: PetState::Dance,
            name: "dance",
            animation_secs: 2.5,
            loops: false,
            placeholder_rgb: (255, 45, 85), // pink
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Transition table
// ═══════════════════════════════════════════════════════════════════════════

use PetState::{Dance, Eat, Idle, Sleep, Walk};

/// Rows: current state.  Columns: event in
/// `[Idle, Walk, Sleep, Feed, Dance, Interact]` order.
const TRANSITIONS: [[PetState; PetEvent::COUNT]; PetState::COUNT] = [
    //        idle   walk   sleep  feed  dance  interact
    /* Idle  */ [Idle, Walk, Sleep, Eat, Dance, Idle],
    /* Walk  */ [Idle, Walk, Walk, Eat, Dance, Idle],
    /* Sleep */ [Idle, Sleep, Sleep, Eat, Dance, Idle],
    /* Eat   */ [Idle, Idle, Idle, Eat, Dance, Idle],
    /* Dance */ [Idle, Idle, Idle, Eat, Dance, Idle],
];

/// Look up the state that `event` leads to from `current`.
pub const fn next_state(current: PetState, event: PetEvent) -> PetState {
    TRANSITIONS[current as usize][event as usize]
}
