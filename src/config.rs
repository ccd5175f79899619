//! Runtime configuration parameters
//!
//! All tunable parameters for the DockLambda companion.
//! Values can be overridden via `config.json` in the preference directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, ScreenGeometry, Size};

/// Inclusive range, in seconds, from which an idle-timer delay is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdleRange {
    pub min_secs: u32,
    pub max_secs: u32,
}

impl IdleRange {
    pub const fn new(min_secs: u32, max_secs: u32) -> Self {
        Self { min_secs, max_secs }
    }
}

/// Core runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // --- Timing ---
    /// CPU sampler poll interval (milliseconds)
    pub cpu_poll_interval_ms: u32,
    /// Dock detector poll interval (milliseconds)
    pub dock_poll_interval_ms: u32,
    /// Screen-parameter change debounce (milliseconds)
    pub screen_debounce_ms: u32,
    /// Main loop period (milliseconds)
    pub loop_period_ms: u32,

    // --- Window ---
    /// Distance kept between the pet window and the visible-frame edges
    pub window_margin: f64,
    /// Pet window size in points
    pub pet_size: Size,

    // --- CPU load ---
    /// Utilization above which the idle cadence is `High`
    pub cpu_high_threshold: f64,
    /// Utilization above which the idle cadence is `Medium`
    pub cpu_medium_threshold: f64,

    // --- Idle timer ---
    pub idle_low: IdleRange,
    pub idle_medium: IdleRange,
    pub idle_high: IdleRange,

    // --- Assets ---
    /// Sprite root; `None` selects `<prefs dir>/Sprites`
    pub sprite_dir: Option<PathBuf>,

    // --- Display ---
    /// Display geometry reported when no live display is attached
    pub display: ScreenGeometry,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            // Timing
            cpu_poll_interval_ms: 10_000, // 0.1 Hz
            dock_poll_interval_ms: 3_000,
            screen_debounce_ms: 500,
            loop_period_ms: 100, // 10 Hz

            // Window
            window_margin: 12.0,
            pet_size: Size::new(120.0, 120.0),

            // CPU load
            cpu_high_threshold: 0.8,
            cpu_medium_threshold: 0.5,

            // Idle timer
            idle_low: IdleRange::new(10, 30),
            idle_medium: IdleRange::new(8, 20),
            idle_high: IdleRange::new(5, 12),

            // Assets
            sprite_dir: None,

            // 1440x900 panel, 25pt menu bar, 70pt bottom dock
            display: ScreenGeometry::new(
                Rect::new(0.0, 0.0, 1440.0, 900.0),
                Rect::new(0.0, 70.0, 1440.0, 805.0),
            ),
        }
    }
}

impl AppConfig {
    /// Pet window width in points.
    pub fn pet_width(&self) -> f64 {
        self.pet_size.width
    }

    /// Pet window height in points.
    pub fn pet_height(&self) -> f64 {
        self.pet_size.height
    }
}
