//! Animation playback.
//!
//! The animator owns the frames of the animation currently on screen and
//! maps elapsed time to a frame index.  Looping states cycle forever;
//! every other state plays once, after which [`Animator::is_finished`]
//! reports `true` and the service returns the pet to idle.
//!
//! ```text
//!   frame_ms = animation_secs * 1000 / frames
//!   index    = elapsed / frame_ms                (looping: mod frames)
//!   finished = !loops && elapsed >= animation_secs * 1000
//! ```

use log::debug;

use crate::fsm::PetState;
use crate::fsm::states::{StateDescriptor, build_state_table};

use super::events::AppEvent;
use super::sprites::{FrameSet, SpriteFrame};

struct Playback {
    state: PetState,
    frames: FrameSet,
    started_ms: u64,
    duration_ms: u64,
    loops: bool,
}

impl Playback {
    fn frame_ms(&self) -> u64 {
        (self.duration_ms / self.frames.len().max(1) as u64).max(1)
    }
}

pub struct Animator {
    table: [StateDescriptor; PetState::COUNT],
    playing: Option<Playback>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    pub fn new() -> Self {
        Self {
            table: build_state_table(),
            playing: None,
        }
    }

    /// Start `state`'s animation at `now_ms`, replacing whatever was
    /// playing.  An empty frame set plays the state's placeholder.
    pub fn play(&mut self, state: PetState, frames: FrameSet, now_ms: u64) -> AppEvent {
        let desc = &self.table[state as usize];
        let frames = if frames.is_empty() {
            super::sprites::placeholder_set(state, desc.placeholder_rgb)
        } else {
            frames
        };

        let playback = Playback {
            state,
            started_ms: now_ms,
            duration_ms: (desc.animation_secs * 1000.0) as u64,
            loops: desc.loops,
            frames,
        };
        let event = AppEvent::AnimationStarted {
            state,
            frames: playback.frames.len(),
            placeholder: playback.frames.iter().all(SpriteFrame::is_placeholder),
            frame_secs: playback.frame_ms() as f64 / 1000.0,
        };
        debug!(
            "Animator: {} x{} frames, {}ms each",
            state,
            playback.frames.len(),
            playback.frame_ms()
        );
        self.playing = Some(playback);
        event
    }

    /// State whose animation is on screen.
    pub fn state(&self) -> Option<PetState> {
        self.playing.as_ref().map(|p| p.state)
    }

    /// Index of the frame to show at `now_ms`.  A finished one-shot rests
    /// on its last frame.
    pub fn frame_index(&self, now_ms: u64) -> usize {
        let Some(p) = &self.playing else {
            return 0;
        };
        let n = p.frames.len().max(1);
        let step = (now_ms.saturating_sub(p.started_ms) / p.frame_ms()) as usize;
        if p.loops { step % n } else { step.min(n - 1) }
    }

    pub fn current_frame(&self, now_ms: u64) -> Option<&SpriteFrame> {
        let p = self.playing.as_ref()?;
        p.frames.get(self.frame_index(now_ms))
    }

    /// `true` once a non-looping animation has run its full duration.
    pub fn is_finished(&self, now_ms: u64) -> bool {
        self.playing
            .as_ref()
            .is_some_and(|p| !p.loops && now_ms.saturating_sub(p.started_ms) >= p.duration_ms)
    }

    pub fn stop(&mut self) {
        self.playing = None;
    }
}
