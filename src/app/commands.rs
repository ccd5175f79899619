//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (pointer input,
//! file drops, the status menu) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use std::path::PathBuf;

/// Commands that input adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    // ── Pointer ───────────────────────────────────────────────
    /// Single click on the pet: feed it.
    Click,

    /// Double click on the pet: make it dance.
    DoubleClick,

    /// Option-drag began over the pet.
    DragStart,

    /// Pointer moved by `(dx, dy)` points during an option-drag.
    DragMove { dx: f64, dy: f64 },

    /// Option-drag released; the accumulated delta becomes the new offset.
    DragEnd,

    /// Files were dropped onto the pet.
    DropFiles(Vec<PathBuf>),

    // ── Status menu ───────────────────────────────────────────
    /// Flip click-through and persist it.
    ToggleClickThrough,

    /// Flip the drag lock and persist it.
    ToggleLockPosition,

    /// Forget the user offset and re-place the window.
    ResetPosition,

    ShowPet,

    HidePet,

    /// Leave the main loop.
    Quit,
}

impl AppCommand {
    /// Whether the command counts as the user playing with the pet, which
    /// postpones the next idle activity.
    pub fn is_interaction(&self) -> bool {
        matches!(
            self,
            Self::Click | Self::DoubleClick | Self::DragEnd | Self::DropFiles(_)
        )
    }
}
