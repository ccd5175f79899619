//! Pet window placement.
//!
//! ```text
//!   ┌──────────────────────── screen frame ─────────────────────────┐
//!   │ ┌────────────────────── visible frame ──────────────────────┐ │
//!   │ │                                                           │ │
//!   │ │                                              ┌─────┐      │ │
//!   │ │                                              │ pet │      │ │
//!   │ │                                              └─────┘◀─m─▶ │ │
//!   │ │                                                 ▲m        │ │
//!   │ └───────────────────────────────────────────────────────────┘ │
//!   │                          dock                                 │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bottom and right docks park the pet in the visible frame's
//! bottom-right corner; a left dock parks it bottom-left.  The persisted
//! user offset is added and the result clamped onto the screen.

use crate::geometry::{Point, Rect, ScreenGeometry, Size};
use crate::sensors::dock::DockOrientation;

/// Margin-inset corner of the visible frame for `dock`.
pub fn base_origin(dock: DockOrientation, visible: &Rect, window: Size, margin: f64) -> Point {
    let y = visible.min_y() + margin;
    match dock {
        DockOrientation::Bottom | DockOrientation::Right => {
            Point::new(visible.max_x() - window.width - margin, y)
        }
        DockOrientation::Left => Point::new(visible.min_x() + margin, y),
    }
}

/// Keep the whole window on screen.  If the window is larger than the
/// screen, the lower bound (0) wins.
pub fn clamp_to_screen(origin: Point, frame: &Rect, window: Size) -> Point {
    Point::new(
        origin.x.min(frame.max_x() - window.width).max(0.0),
        origin.y.min(frame.max_y() - window.height).max(0.0),
    )
}

/// Final window origin for the given dock edge, screen and user offset.
pub fn place_window(
    dock: DockOrientation,
    screen: &ScreenGeometry,
    window: Size,
    margin: f64,
    offset: Point,
) -> Point {
    let base = base_origin(dock, &screen.visible, window, margin);
    // A non-finite offset can only come from a corrupt store; ignore it.
    let offset = if offset.is_finite() { offset } else { Point::ZERO };
    clamp_to_screen(base.offset_by(offset), &screen.frame, window)
}
