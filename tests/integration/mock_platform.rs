//! Mock platform for integration tests.
//!
//! A manual clock, scripted tick counters, canned sprites and a recording
//! event sink, plus the crate's own headless display/window adapters and
//! in-memory preference store.  [`Platform::ports`] lends them all out as
//! one [`PlatformPorts`] bundle.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use docklambda::adapters::display::{HeadlessWindow, StaticDisplay};
use docklambda::adapters::dock_prefs::FixedDockPreference;
use docklambda::adapters::prefs::PrefsStore;
use docklambda::app::events::AppEvent;
use docklambda::app::ports::{
    ClockPort, EventSink, PlatformPorts, SpritePort, StorageError, StoragePort, TickSource,
};
use docklambda::app::service::AppService;
use docklambda::app::sprites::{FrameSet, SpriteFrame};
use docklambda::config::AppConfig;
use docklambda::error::TickError;
use docklambda::fsm::PetState;
use docklambda::sensors::cpu::TickSnapshot;

// ── Clock ─────────────────────────────────────────────────────

pub struct ManualClock {
    now_ms: Cell<u64>,
    unix_secs: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            now_ms: Cell::new(0),
            unix_secs: Cell::new(1_700_000_000),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
        self.unix_secs.set(1_700_000_000 + self.now_ms.get() / 1000);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    fn unix_secs(&self) -> u64 {
        self.unix_secs.get()
    }
}

// ── Tick counters ─────────────────────────────────────────────

/// Replays scripted results, then keeps answering `exhausted`.
pub struct ScriptedTicks {
    pub script: VecDeque<Result<TickSnapshot, TickError>>,
    pub exhausted: Result<TickSnapshot, TickError>,
    pub reads: usize,
}

impl ScriptedTicks {
    pub fn unavailable() -> Self {
        Self {
            script: VecDeque::new(),
            exhausted: Err(TickError::Unavailable),
            reads: 0,
        }
    }
}

impl TickSource for ScriptedTicks {
    fn read_ticks(&mut self) -> Result<TickSnapshot, TickError> {
        self.reads += 1;
        self.script.pop_front().unwrap_or(self.exhausted)
    }
}

// ── Sprites ───────────────────────────────────────────────────

/// Serves `n` fake file frames for each configured state and nothing
/// (placeholder) for the rest.
#[derive(Default)]
pub struct CannedSprites {
    pub frame_counts: HashMap<PetState, usize>,
    pub requests: Vec<PetState>,
}

impl SpritePort for CannedSprites {
    fn frames(&mut self, state: PetState) -> FrameSet {
        self.requests.push(state);
        let mut set = FrameSet::new();
        for i in 0..self.frame_counts.get(&state).copied().unwrap_or(0) {
            let _ = set.push(SpriteFrame::File(PathBuf::from(format!("{state}_{i}.png"))));
        }
        set
    }
}

// ── Storage that always fails ─────────────────────────────────

pub struct BrokenStore;

impl StoragePort for BrokenStore {
    fn read(&self, _: &str, _: &str, _: &mut [u8]) -> Result<usize, StorageError> {
        Err(StorageError::IoError)
    }

    fn write(&mut self, _: &str, _: &str, _: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::IoError)
    }

    fn delete(&mut self, _: &str, _: &str) -> Result<(), StorageError> {
        Err(StorageError::IoError)
    }

    fn exists(&self, _: &str, _: &str) -> bool {
        false
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn last_matching(&self, pred: impl Fn(&AppEvent) -> bool) -> Option<&AppEvent> {
        self.events.iter().rev().find(|e| pred(e))
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Platform bundle ───────────────────────────────────────────

pub struct Platform {
    pub clock: ManualClock,
    pub ticks: ScriptedTicks,
    pub dock_prefs: FixedDockPreference,
    pub display: StaticDisplay,
    pub window: HeadlessWindow,
    pub sprites: CannedSprites,
    pub storage: Box<dyn StoragePort>,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Platform {
    /// Default 1440×900 display with a bottom dock, no dock preference,
    /// unreadable tick counters and an empty in-memory store.
    pub fn new() -> Self {
        Self {
            clock: ManualClock::new(),
            ticks: ScriptedTicks::unavailable(),
            dock_prefs: FixedDockPreference(None),
            display: StaticDisplay::new(Some(AppConfig::default().display)),
            window: HeadlessWindow::new(),
            sprites: CannedSprites::default(),
            storage: Box::new(PrefsStore::in_memory()),
            sink: RecordingSink::default(),
        }
    }

    pub fn ports(&mut self) -> PlatformPorts<'_> {
        PlatformPorts {
            ticks: &mut self.ticks,
            dock_prefs: &self.dock_prefs,
            display: &self.display,
            clock: &self.clock,
            window: &mut self.window,
            sprites: &mut self.sprites,
            storage: &mut *self.storage,
            sink: &mut self.sink,
        }
    }

    /// Advance the clock in `step_ms` increments up to `until_ms`,
    /// ticking the service at every step.
    pub fn run_until(&mut self, app: &mut AppService, until_ms: u64, step_ms: u64) {
        while self.clock.now_ms() < until_ms {
            let step = step_ms.min(until_ms - self.clock.now_ms());
            self.clock.advance(step);
            app.tick(&mut self.ports());
        }
    }
}
