//! Dock edge detection.
//!
//! The dock's edge is read from the OS preference when one is set; without
//! it, the edge is inferred by comparing the screen's full frame with its
//! visible frame — whichever horizontal side is inset hosts the dock.

use core::fmt;

use log::{debug, info};

use crate::app::ports::{DisplayPort, DockListener, DockPreferencePort};
use crate::geometry::ScreenGeometry;

/// Screen edge hosting the dock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DockOrientation {
    Left,
    #[default]
    Bottom,
    Right,
}

impl DockOrientation {
    /// Map a preference value; unknown values mean the default bottom dock.
    pub fn from_preference(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Bottom,
        }
    }

    /// Infer the edge from how the visible frame is inset.
    pub fn from_geometry(screen: &ScreenGeometry) -> Self {
        if screen.visible.min_x() > screen.frame.min_x() {
            Self::Left
        } else if screen.visible.max_x() < screen.frame.max_x() {
            Self::Right
        } else {
            Self::Bottom
        }
    }
}

impl fmt::Display for DockOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Bottom => f.write_str("bottom"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Current dock edge: preference first, geometry second, bottom last.
pub fn detect(prefs: &dyn DockPreferencePort, display: &dyn DisplayPort) -> DockOrientation {
    if let Some(value) = prefs.orientation_preference() {
        return DockOrientation::from_preference(&value);
    }
    display
        .main_screen()
        .map_or(DockOrientation::Bottom, |screen| {
            DockOrientation::from_geometry(&screen)
        })
}

/// Edge-change detector.  Notifies only when consecutive polls disagree.
#[derive(Debug, Default)]
pub struct DockDetector {
    last: Option<DockOrientation>,
    polls: u64,
}

impl DockDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the starting edge without notifying anyone.
    pub fn start(
        &mut self,
        prefs: &dyn DockPreferencePort,
        display: &dyn DisplayPort,
    ) -> DockOrientation {
        let edge = detect(prefs, display);
        info!("Dock: starting on {} edge", edge);
        self.last = Some(edge);
        edge
    }

    /// Re-detect the edge.  Returns the new edge if it changed, after
    /// notifying `listener`.  A poll before [`start`](Self::start) only
    /// records the edge.
    pub fn poll(
        &mut self,
        prefs: &dyn DockPreferencePort,
        display: &dyn DisplayPort,
        listener: &mut dyn DockListener,
    ) -> Option<DockOrientation> {
        self.polls += 1;
        let edge = detect(prefs, display);

        match self.last.replace(edge) {
            Some(prev) if prev != edge => {
                info!("Dock: moved {} -> {}", prev, edge);
                listener.on_dock_moved(prev, edge);
                Some(edge)
            }
            _ => {
                debug!("Dock: still {}", edge);
                None
            }
        }
    }

    /// Last detected edge; bottom before the first detection.
    pub fn current(&self) -> DockOrientation {
        self.last.unwrap_or_default()
    }

    pub fn poll_count(&self) -> u64 {
        self.polls
    }
}
