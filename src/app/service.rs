//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the pet state machine, the sensors, the scheduler
//! and the user settings.  It exposes a platform-agnostic API; all I/O
//! flows through the [`PlatformPorts`] bundle handed in at each call,
//! making the entire service testable with mock adapters and a manual
//! clock.
//!
//! ```text
//!  TickSource ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!  DockPrefs  ──▶ │         AppService          │ ──▶ WindowPort
//!  DisplayPort──▶ │ FSM · CPU · Dock · Schedule │ ◀── SpritePort
//!  AppCommand ──▶ └─────────────────────────────┘ ◀─▶ StoragePort
//! ```

use log::{debug, info, warn};

use crate::config::{AppConfig, IdleRange};
use crate::events::{Event, EventQueue};
use crate::fsm::{IdleFrequency, PetEvent, PetState, PetStateMachine};
use crate::geometry::Point;
use crate::placement;
use crate::rng::Prng;
use crate::scheduler::{Scheduler, Timer, TimerKind};
use crate::sensors::cpu::{CpuReading, CpuSampler};
use crate::sensors::dock::{DockDetector, DockOrientation};

use super::animator::Animator;
use super::commands::AppCommand;
use super::drag::DragTracker;
use super::events::{AppEvent, FileKind};
use super::ports::{
    CpuListener, DockListener, EventSink, PlatformPorts, SchedulerDelegate, SpritePort,
    StateListener, TimerId,
};
use super::settings::Settings;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: AppConfig,
    fsm: PetStateMachine,
    cpu: CpuSampler,
    dock: DockDetector,
    scheduler: Scheduler,
    events: EventQueue,
    animator: Animator,
    drag: DragTracker,
    settings: Settings,
    /// A settings write failed and must be retried at shutdown.
    settings_dirty: bool,
    rng: Prng,
    tick_count: u64,
    running: bool,
    quit_requested: bool,
}

impl AppService {
    /// Construct the service.  `seed` drives the idle-timer jitter and
    /// the sleep-or-fidget choice.
    ///
    /// Does **not** start anything — call [`start`](Self::start) next.
    pub fn new(config: AppConfig, settings: Settings, seed: u64) -> Self {
        let cpu = CpuSampler::new(config.cpu_medium_threshold, config.cpu_high_threshold);
        Self {
            fsm: PetStateMachine::new(),
            cpu,
            dock: DockDetector::new(),
            scheduler: Scheduler::new(),
            events: EventQueue::new(),
            animator: Animator::new(),
            drag: DragTracker::new(),
            settings,
            settings_dirty: false,
            rng: Prng::from_seed(seed),
            tick_count: 0,
            running: false,
            quit_requested: false,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Prime the sensors, arm the timers, place and show the window and
    /// start the idle animation.
    pub fn start(&mut self, ports: &mut PlatformPorts<'_>) {
        let now = ports.clock.now_ms();

        self.cpu.prime(&mut *ports.ticks, ports.clock.unix_secs());
        self.dock.start(ports.dock_prefs, ports.display);

        self.scheduler.set_enabled(true);
        self.scheduler.arm(
            Timer {
                label: "cpu-poll",
                id: TimerId::CpuPoll,
                kind: TimerKind::Periodic {
                    interval_ms: u64::from(self.config.cpu_poll_interval_ms),
                },
            },
            now,
        );
        self.scheduler.arm(
            Timer {
                label: "dock-poll",
                id: TimerId::DockPoll,
                kind: TimerKind::Periodic {
                    interval_ms: u64::from(self.config.dock_poll_interval_ms),
                },
            },
            now,
        );
        self.rearm_idle_timer(now);

        ports.window.set_click_through(self.settings.click_through);
        self.place_window(ports);
        ports.window.set_visible(true);

        ports.sink.emit(&AppEvent::Started(self.fsm.current_state()));
        self.play_current(ports, now);

        self.running = true;
        info!(
            "AppService started in {} (dock {}, offset {:?})",
            self.fsm.current_state(),
            self.dock.current(),
            self.settings.relative_offset
        );
    }

    /// Stop every timer and flush settings that failed to save earlier.
    pub fn shutdown(&mut self, ports: &mut PlatformPorts<'_>) {
        if !self.running {
            return;
        }
        self.scheduler.cancel_all();
        self.scheduler.set_enabled(false);
        self.animator.stop();
        if self.settings_dirty {
            self.persist_settings(ports);
        }
        self.running = false;
        ports.sink.emit(&AppEvent::Stopped);
        info!("AppService stopped after {} ticks", self.tick_count);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one loop iteration: fire due timers, handle queued events,
    /// and return a finished one-shot animation to idle.
    pub fn tick(&mut self, ports: &mut PlatformPorts<'_>) {
        if !self.running {
            return;
        }
        self.tick_count += 1;
        let now = ports.clock.now_ms();

        self.scheduler.tick(
            now,
            &mut QueueDelegate {
                events: &mut self.events,
            },
        );

        while let Some(event) = self.events.pop() {
            self.handle_event(event, ports);
        }

        if self.animator.is_finished(now) && !self.set_state(PetState::Idle, ports) {
            self.play_current(ports, now);
        }
    }

    /// Report that the OS changed screen parameters.  Bursts coalesce
    /// into one re-placement after the debounce delay.
    pub fn notify_screen_changed(&mut self) {
        self.events.push(Event::ScreenParamsChanged);
    }

    fn handle_event(&mut self, event: Event, ports: &mut PlatformPorts<'_>) {
        let now = ports.clock.now_ms();
        match event {
            Event::CpuPollTick => {
                let unix_secs = ports.clock.unix_secs();
                let mut reaction = CpuReaction {
                    fsm: &mut self.fsm,
                    sink: &mut *ports.sink,
                };
                self.cpu.poll(&mut *ports.ticks, unix_secs, &mut reaction);
            }
            Event::DockPollTick => {
                let mut reaction = DockReaction::default();
                self.dock
                    .poll(ports.dock_prefs, ports.display, &mut reaction);
                if let Some((from, to)) = reaction.moved {
                    ports.sink.emit(&AppEvent::DockMoved { from, to });
                    self.place_window(ports);
                }
            }
            Event::ScreenParamsChanged => {
                debug!("Screen parameters changed, debouncing");
                self.scheduler.arm(
                    Timer {
                        label: "screen-debounce",
                        id: TimerId::ScreenDebounce,
                        kind: TimerKind::OneShot {
                            delay_ms: u64::from(self.config.screen_debounce_ms),
                        },
                    },
                    now,
                );
            }
            Event::ScreenSettled => {
                info!("Screen parameters settled, re-placing window");
                self.place_window(ports);
            }
            Event::IdleTimeout => {
                let pick = if self.rng.coin() {
                    PetEvent::Sleep
                } else {
                    PetEvent::Idle
                };
                debug!("Idle timeout: {:?}", pick);
                self.apply_event(pick, ports);
                self.rearm_idle_timer(now);
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a command from an input adapter.
    pub fn handle_command(&mut self, cmd: AppCommand, ports: &mut PlatformPorts<'_>) {
        if cmd.is_interaction() {
            self.rearm_idle_timer(ports.clock.now_ms());
        }

        match cmd {
            AppCommand::Click => {
                self.apply_event(PetEvent::Feed, ports);
            }
            AppCommand::DoubleClick => {
                self.apply_event(PetEvent::Dance, ports);
            }
            AppCommand::DragStart => {
                if self.settings.lock_position {
                    debug!("Drag ignored: position locked");
                } else {
                    self.drag.begin(ports.window.origin());
                }
            }
            AppCommand::DragMove { dx, dy } => {
                if let Some(origin) = self.drag.moved(dx, dy) {
                    ports.window.set_origin(origin);
                    ports.sink.emit(&AppEvent::WindowDragged { origin });
                }
            }
            AppCommand::DragEnd => {
                if let Some(delta) = self.drag.end() {
                    let offset = self.settings.relative_offset.offset_by(delta);
                    self.settings.relative_offset = offset;
                    self.persist_settings(ports);
                    ports.sink.emit(&AppEvent::OffsetSaved(offset));
                }
            }
            AppCommand::DropFiles(paths) => {
                if paths.is_empty() {
                    return;
                }
                ports.sink.emit(&AppEvent::Joy);
                let mut heard_music = false;
                for path in &paths {
                    let kind = FileKind::from_path(path);
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    heard_music |= kind == FileKind::Audio;
                    ports.sink.emit(&AppEvent::FileDropped { name, kind });
                }
                if heard_music {
                    self.apply_event(PetEvent::Dance, ports);
                }
            }
            AppCommand::ToggleClickThrough => {
                let enabled = !self.settings.click_through;
                self.settings.click_through = enabled;
                ports.window.set_click_through(enabled);
                self.persist_settings(ports);
                ports.sink.emit(&AppEvent::ClickThroughChanged(enabled));
            }
            AppCommand::ToggleLockPosition => {
                let locked = !self.settings.lock_position;
                self.settings.lock_position = locked;
                if locked && self.drag.is_dragging() {
                    // Abandon the drag; the offset keeps its old value.
                    self.drag.end();
                    self.place_window(ports);
                }
                self.persist_settings(ports);
                ports.sink.emit(&AppEvent::PositionLockChanged(locked));
            }
            AppCommand::ResetPosition => {
                self.settings.relative_offset = Point::ZERO;
                self.persist_settings(ports);
                ports.sink.emit(&AppEvent::OffsetSaved(Point::ZERO));
                self.place_window(ports);
            }
            AppCommand::ShowPet => self.set_visible(true, ports),
            AppCommand::HidePet => self.set_visible(false, ports),
            AppCommand::Quit => {
                info!("Quit requested");
                self.quit_requested = true;
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current pet state.
    pub fn state(&self) -> PetState {
        self.fsm.current_state()
    }

    pub fn idle_frequency(&self) -> IdleFrequency {
        self.fsm.idle_frequency()
    }

    pub fn dock(&self) -> DockOrientation {
        self.dock.current()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn last_cpu_reading(&self) -> Option<CpuReading> {
        self.cpu.last_reading()
    }

    /// Deadline of the pending idle activity, if armed.
    pub fn idle_timer_due_ms(&self) -> Option<u64> {
        self.scheduler.due_ms(TimerId::IdleTimeout)
    }

    /// Whether a screen-change re-placement is waiting on its debounce.
    pub fn screen_change_pending(&self) -> bool {
        self.scheduler.is_armed(TimerId::ScreenDebounce)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Total loop ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Whether settings have unsaved changes.
    pub fn is_settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_event(&mut self, event: PetEvent, ports: &mut PlatformPorts<'_>) -> PetState {
        let mut reaction = StateReaction {
            animator: &mut self.animator,
            sprites: &mut *ports.sprites,
            sink: &mut *ports.sink,
            now_ms: ports.clock.now_ms(),
        };
        self.fsm.handle_event(event, &mut reaction)
    }

    fn set_state(&mut self, state: PetState, ports: &mut PlatformPorts<'_>) -> bool {
        let mut reaction = StateReaction {
            animator: &mut self.animator,
            sprites: &mut *ports.sprites,
            sink: &mut *ports.sink,
            now_ms: ports.clock.now_ms(),
        };
        self.fsm.set_state(state, &mut reaction)
    }

    /// (Re)start the animation of the current state.
    fn play_current(&mut self, ports: &mut PlatformPorts<'_>, now_ms: u64) {
        let state = self.fsm.current_state();
        let frames = ports.sprites.frames(state);
        let started = self.animator.play(state, frames, now_ms);
        ports.sink.emit(&started);
    }

    fn place_window(&mut self, ports: &mut PlatformPorts<'_>) {
        let screen = ports.display.main_screen().unwrap_or(self.config.display);
        let dock = self.dock.current();
        let origin = placement::place_window(
            dock,
            &screen,
            self.config.pet_size,
            self.config.window_margin,
            self.settings.relative_offset,
        );
        ports.window.set_origin(origin);
        ports.sink.emit(&AppEvent::WindowPlaced { origin, dock });
    }

    fn set_visible(&mut self, visible: bool, ports: &mut PlatformPorts<'_>) {
        if ports.window.is_visible() == visible {
            return;
        }
        ports.window.set_visible(visible);
        ports.sink.emit(&AppEvent::VisibilityChanged(visible));
    }

    fn idle_range(&self) -> IdleRange {
        match self.fsm.idle_frequency() {
            IdleFrequency::Low => self.config.idle_low,
            IdleFrequency::Medium => self.config.idle_medium,
            IdleFrequency::High => self.config.idle_high,
        }
    }

    fn rearm_idle_timer(&mut self, now_ms: u64) {
        let range = self.idle_range();
        let secs = self.rng.range_inclusive(range.min_secs, range.max_secs);
        self.scheduler.arm(
            Timer {
                label: "idle-timeout",
                id: TimerId::IdleTimeout,
                kind: TimerKind::OneShot {
                    delay_ms: u64::from(secs) * 1000,
                },
            },
            now_ms,
        );
    }

    fn persist_settings(&mut self, ports: &mut PlatformPorts<'_>) {
        match self.settings.persist(&mut *ports.storage) {
            Ok(()) => self.settings_dirty = false,
            Err(e) => {
                warn!("Settings save failed: {}", e);
                self.settings_dirty = true;
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Listener glue
// ───────────────────────────────────────────────────────────────

/// Plays the new state's animation and reports the change.
struct StateReaction<'a> {
    animator: &'a mut Animator,
    sprites: &'a mut dyn SpritePort,
    sink: &'a mut dyn EventSink,
    now_ms: u64,
}

impl StateListener for StateReaction<'_> {
    fn on_state_changed(&mut self, from: PetState, to: PetState) {
        self.sink.emit(&AppEvent::StateChanged { from, to });
        let frames = self.sprites.frames(to);
        let started = self.animator.play(to, frames, self.now_ms);
        self.sink.emit(&started);
    }
}

/// Feeds each CPU sample into the state machine's idle cadence.
struct CpuReaction<'a> {
    fsm: &'a mut PetStateMachine,
    sink: &'a mut dyn EventSink,
}

impl CpuListener for CpuReaction<'_> {
    fn on_cpu_usage(&mut self, usage: f64, frequency: IdleFrequency, measured: bool) {
        self.fsm.set_idle_frequency(frequency);
        self.sink.emit(&AppEvent::CpuSampled {
            usage,
            frequency,
            measured,
        });
    }
}

#[derive(Default)]
struct DockReaction {
    moved: Option<(DockOrientation, DockOrientation)>,
}

impl DockListener for DockReaction {
    fn on_dock_moved(&mut self, from: DockOrientation, to: DockOrientation) {
        self.moved = Some((from, to));
    }
}

/// Forwards scheduler fires into the event queue.
struct QueueDelegate<'a> {
    events: &'a mut EventQueue,
}

impl SchedulerDelegate for QueueDelegate<'_> {
    fn on_timer_fired(&mut self, label: &str, timer: TimerId) {
        debug!("Timer '{}' fired", label);
        let event = match timer {
            TimerId::CpuPoll => Event::CpuPollTick,
            TimerId::DockPoll => Event::DockPollTick,
            TimerId::ScreenDebounce => Event::ScreenSettled,
            TimerId::IdleTimeout => Event::IdleTimeout,
        };
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delegate_maps_every_timer() {
        let mut events = EventQueue::new();
        let mut delegate = QueueDelegate {
            events: &mut events,
        };
        delegate.on_timer_fired("a", TimerId::CpuPoll);
        delegate.on_timer_fired("b", TimerId::DockPoll);
        delegate.on_timer_fired("c", TimerId::ScreenDebounce);
        delegate.on_timer_fired("d", TimerId::IdleTimeout);

        let mut seen = Vec::new();
        events.drain(|e| seen.push(e));
        assert_eq!(
            seen,
            vec![
                Event::CpuPollTick,
                Event::DockPollTick,
                Event::ScreenSettled,
                Event::IdleTimeout
            ]
        );
    }

    #[test]
    fn new_service_is_idle_and_stopped() {
        let app = AppService::new(AppConfig::default(), Settings::default(), 1);
        assert_eq!(app.state(), PetState::Idle);
        assert_eq!(app.idle_frequency(), IdleFrequency::Low);
        assert!(!app.is_running());
        assert!(!app.quit_requested());
        assert!(app.idle_timer_due_ms().is_none());
    }
}
