//! Option-drag tracking.
//!
//! Between press and release the window follows the pointer from where it
//! was grabbed.  On release the accumulated delta is handed back so the
//! service can fold it into the persisted offset.

use crate::geometry::Point;

#[derive(Debug, Default)]
pub struct DragTracker {
    /// Window origin at press time; `None` when no drag is in progress.
    grab_origin: Option<Point>,
    delta: Point,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag with the window at `origin`.  Restarts any drag
    /// already in progress.
    pub fn begin(&mut self, origin: Point) {
        self.grab_origin = Some(origin);
        self.delta = Point::ZERO;
    }

    /// Add a pointer movement.  Returns the window origin to apply, or
    /// `None` when no drag is in progress.
    pub fn moved(&mut self, dx: f64, dy: f64) -> Option<Point> {
        let origin = self.grab_origin?;
        if !dx.is_finite() || !dy.is_finite() {
            return None;
        }
        self.delta = self.delta.offset_by(Point::new(dx, dy));
        Some(origin.offset_by(self.delta))
    }

    /// Release.  Returns the total displacement, or `None` when no drag
    /// was in progress.
    pub fn end(&mut self) -> Option<Point> {
        self.grab_origin.take()?;
        Some(core::mem::take(&mut self.delta))
    }

    pub fn is_dragging(&self) -> bool {
        self.grab_origin.is_some()
    }
}
