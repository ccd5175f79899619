//! Port traits — the hexagonal boundary between domain logic and the desktop.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (tick counters, dock preferences, display, window,
//! sprites, storage, event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) reaches them through
//! [`PlatformPorts`], so the domain core never touches the OS directly.
//!
//! Listener traits ([`StateListener`], [`CpuListener`], [`DockListener`],
//! [`SchedulerDelegate`]) run synchronously on the main loop.

use crate::config::AppConfig;
use crate::error::TickError;
use crate::fsm::{IdleFrequency, PetState};
use crate::geometry::{Point, ScreenGeometry};
use crate::sensors::cpu::TickSnapshot;
use crate::sensors::dock::DockOrientation;

use super::events::AppEvent;
use super::sprites::FrameSet;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapters: OS → domain)
// ───────────────────────────────────────────────────────────────

/// Cumulative CPU tick counters.
pub trait TickSource {
    /// Read the aggregate counters for all cores.
    fn read_ticks(&mut self) -> Result<TickSnapshot, TickError>;
}

/// The OS preference that records where the dock lives.
pub trait DockPreferencePort {
    /// Raw `orientation` preference value, or `None` if unset/unreadable.
    fn orientation_preference(&self) -> Option<String>;
}

/// Geometry of the display hosting the pet.
pub trait DisplayPort {
    /// Full and visible frames of the main screen, or `None` if no screen.
    fn main_screen(&self) -> Option<ScreenGeometry>;
}

/// Wall and monotonic time.
pub trait ClockPort {
    /// Milliseconds on a monotonic clock.
    fn now_ms(&self) -> u64;

    /// Seconds since the Unix epoch (wall clock).
    fn unix_secs(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Output ports (driven adapters: domain → OS)
// ───────────────────────────────────────────────────────────────

/// The floating pet window.
pub trait WindowPort {
    /// Move the window's bottom-left corner to `origin`.
    fn set_origin(&mut self, origin: Point);

    /// Current bottom-left corner.
    fn origin(&self) -> Point;

    /// Let mouse events pass through to whatever is beneath the window.
    fn set_click_through(&mut self, enabled: bool);

    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;
}

/// Animation frames for each state.
pub trait SpritePort {
    /// Every frame of `state`'s animation, in order.  Never empty: a state
    /// without frames yields a single placeholder.
    fn frames(&mut self, state: PetState) -> FrameSet;
}

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Persistence ports
// ───────────────────────────────────────────────────────────────

/// Loads and persists [`AppConfig`].
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration.
    /// Returns [`AppConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;
}

/// Persistent key-value storage for user settings.
///
/// Keys are namespaced to prevent collisions between subsystems.
/// Write operations MUST be atomic — no partially written store on crash.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`, or
    /// [`StorageError::BufferTooSmall`] rather than a truncated value.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Port bundle
// ───────────────────────────────────────────────────────────────

/// Every port the service needs for one call, borrowed for its duration.
pub struct PlatformPorts<'a> {
    pub ticks: &'a mut dyn TickSource,
    pub dock_prefs: &'a dyn DockPreferencePort,
    pub display: &'a dyn DisplayPort,
    pub clock: &'a dyn ClockPort,
    pub window: &'a mut dyn WindowPort,
    pub sprites: &'a mut dyn SpritePort,
    pub storage: &'a mut dyn StoragePort,
    pub sink: &'a mut dyn EventSink,
}

// ───────────────────────────────────────────────────────────────
// Listeners
// ───────────────────────────────────────────────────────────────

/// Notified by [`PetStateMachine`](crate::fsm::PetStateMachine) on every
/// actual state change.
pub trait StateListener {
    fn on_state_changed(&mut self, from: PetState, to: PetState);
}

/// Receives each CPU sample from the
/// [`CpuSampler`](crate::sensors::cpu::CpuSampler).
pub trait CpuListener {
    /// `usage` is in `[0, 1]`; `measured` is false for fallback values.
    fn on_cpu_usage(&mut self, usage: f64, frequency: IdleFrequency, measured: bool);
}

/// Notified by the [`DockDetector`](crate::sensors::dock::DockDetector)
/// only when the dock changes edge.
pub trait DockListener {
    fn on_dock_moved(&mut self, from: DockOrientation, to: DockOrientation);
}

/// Callback trait that the scheduler invokes when a timer fires.
///
/// This decouples the [`Scheduler`](crate::scheduler::Scheduler) from the
/// event queue: the service forwards fires into
/// [`EventQueue`](crate::events::EventQueue), but the scheduler itself
/// knows nothing about events.
pub trait SchedulerDelegate {
    fn on_timer_fired(&mut self, label: &str, timer: TimerId);
}

/// Identity of each timer the runtime arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Recurring CPU sample.
    CpuPoll,
    /// Recurring dock-edge check.
    DockPoll,
    /// One-shot: screen parameters have been stable for the debounce delay.
    ScreenDebounce,
    /// One-shot: the pet has been left alone long enough to doze or fidget.
    IdleTimeout,
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Generic I/O error.
    IoError,
    /// The backing file exists but is not a valid store.
    Corrupted,
    /// The stored value is longer than the caller's buffer.
    BufferTooSmall(usize),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::IoError => write!(f, "I/O error"),
            Self::Corrupted => write!(f, "store corrupted"),
            Self::BufferTooSmall(len) => write!(f, "value of {} bytes exceeds buffer", len),
        }
    }
}
