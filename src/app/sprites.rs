//! Sprite frame model shared by the animator and the sprite adapter.

use std::path::PathBuf;

use crate::fsm::PetState;

/// Highest number of frames looked up per state.
pub const MAX_FRAMES: usize = 10;

/// One animation frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteFrame {
    /// An image file on disk.
    File(PathBuf),
    /// Solid tile in the state's colour, labelled with its name.
    Placeholder { rgb: (u8, u8, u8), label: &'static str },
}

impl SpriteFrame {
    /// Upper-case state name, the label shown on placeholder tiles.
    pub const fn placeholder_label(state: PetState) -> &'static str {
        match state {
            PetState::Idle => "IDLE",
            PetState::Walk => "WALK",
            PetState::Sleep => "SLEEP",
            PetState::Eat => "EAT",
            PetState::Dance => "DANCE",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Frames of one animation, in play order.
pub type FrameSet = heapless::Vec<SpriteFrame, MAX_FRAMES>;

/// A single-frame set holding `state`'s placeholder tile.
pub fn placeholder_set(state: PetState, rgb: (u8, u8, u8)) -> FrameSet {
    let mut set = FrameSet::new();
    // Capacity is MAX_FRAMES, so one push cannot fail.
    let _ = set.push(SpriteFrame::Placeholder {
        rgb,
        label: SpriteFrame::placeholder_label(state),
    });
    set
}
