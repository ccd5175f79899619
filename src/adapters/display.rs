//! Headless display and window adapters.
//!
//! [`StaticDisplay`] reports a screen geometry that the input adapter can
//! replace at runtime (`screen …` lines).  [`HeadlessWindow`] records what
//! a real pet window would be told to do and logs it.

use std::cell::Cell;

use log::debug;

use crate::app::ports::{DisplayPort, WindowPort};
use crate::geometry::{Point, ScreenGeometry};

pub struct StaticDisplay {
    screen: Cell<Option<ScreenGeometry>>,
}

impl StaticDisplay {
    pub fn new(screen: Option<ScreenGeometry>) -> Self {
        Self {
            screen: Cell::new(screen),
        }
    }

    /// Replace the reported geometry.  Returns `true` if it changed.
    pub fn set_geometry(&self, screen: Option<ScreenGeometry>) -> bool {
        self.screen.replace(screen) != screen
    }
}

impl DisplayPort for StaticDisplay {
    fn main_screen(&self) -> Option<ScreenGeometry> {
        self.screen.get()
    }
}

/// Window state without a window server.
#[derive(Debug, Default)]
pub struct HeadlessWindow {
    origin: Point,
    click_through: bool,
    visible: bool,
    moves: u64,
}

impl HeadlessWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click_through(&self) -> bool {
        self.click_through
    }

    /// Number of `set_origin` calls.
    pub fn move_count(&self) -> u64 {
        self.moves
    }
}

impl WindowPort for HeadlessWindow {
    fn set_origin(&mut self, origin: Point) {
        debug!("Window: origin ({:.1}, {:.1})", origin.x, origin.y);
        self.origin = origin;
        self.moves += 1;
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn set_click_through(&mut self, enabled: bool) {
        debug!("Window: ignores mouse events = {}", enabled);
        self.click_through = enabled;
    }

    fn set_visible(&mut self, visible: bool) {
        debug!("Window: visible = {}", visible);
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
