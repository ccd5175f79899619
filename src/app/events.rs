//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, drive a real window, etc.

use core::fmt;
use std::path::Path;

use crate::fsm::{IdleFrequency, PetState};
use crate::geometry::Point;
use crate::sensors::dock::DockOrientation;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(PetState),

    /// The pet changed state.
    StateChanged { from: PetState, to: PetState },

    /// A new animation began playing.
    AnimationStarted {
        state: PetState,
        frames: usize,
        /// `true` if the frames are a generated placeholder.
        placeholder: bool,
        frame_secs: f64,
    },

    /// A CPU sample was taken.
    CpuSampled {
        usage: f64,
        frequency: IdleFrequency,
        /// `false` when the value is the degraded-mode stand-in.
        measured: bool,
    },

    /// The dock moved to another screen edge.
    DockMoved {
        from: DockOrientation,
        to: DockOrientation,
    },

    /// The window was (re)placed next to the dock.
    WindowPlaced { origin: Point, dock: DockOrientation },

    /// The window followed the pointer during an option-drag.
    WindowDragged { origin: Point },

    /// A new user offset was persisted.
    OffsetSaved(Point),

    ClickThroughChanged(bool),

    PositionLockChanged(bool),

    VisibilityChanged(bool),

    /// Files were dropped on the pet: it wiggles.
    Joy,

    /// One dropped file and what the pet made of it.
    FileDropped { name: String, kind: FileKind },

    /// The service was shut down.
    Stopped,
}

/// Coarse classification of a dropped file, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Text,
    Audio,
    Video,
    Other,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" => Self::Image,
            "txt" | "md" | "rtf" => Self::Text,
            "mp3" | "wav" | "m4a" => Self::Audio,
            "mov" | "mp4" | "avi" => Self::Video,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Text => f.write_str("text"),
            Self::Audio => f.write_str("audio"),
            Self::Video => f.write_str("video"),
            Self::Other => f.write_str("other"),
        }
    }
}
