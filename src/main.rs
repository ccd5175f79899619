//! DockLambda — Main Entry Point
//!
//! Hexagonal architecture with a single timer-driven loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HostTicks        SystemDockPreference  StaticDisplay          │
//! │  (TickSource)     (DockPreferencePort)  (DisplayPort)          │
//! │  HeadlessWindow   SpriteLoader          PrefsStore             │
//! │  (WindowPort)     (SpritePort)          (Config+Storage)       │
//! │  LogEventSink     SystemClock           stdin reader thread    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  FSM · CPU sampler · Dock detector · Placement         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (delegate-driven) · EventQueue                      │
//! └────────────────────────────────────────────────────────────────┘
//! ```

mod cli;

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::TryRecvError;
use log::{info, warn};

use docklambda::adapters::display::{HeadlessWindow, StaticDisplay};
use docklambda::adapters::dock_prefs::{FixedDockPreference, SystemDockPreference};
use docklambda::adapters::input::{InputLine, spawn_stdin_reader};
use docklambda::adapters::log_sink::LogEventSink;
use docklambda::adapters::prefs::PrefsStore;
use docklambda::adapters::sprites::SpriteLoader;
use docklambda::adapters::ticks::HostTicks;
use docklambda::adapters::time::SystemClock;
use docklambda::app::ports::{ConfigPort, DockPreferencePort, PlatformPorts};
use docklambda::app::service::AppService;
use docklambda::app::settings::Settings;
use docklambda::config::AppConfig;
use docklambda::rng::Prng;
use docklambda::sensors::dock::DockOrientation;

use cli::Cli;

fn main() -> Result<()> {
    // ── 1. Logging + flags ────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    info!("DockLambda v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Preference store, config and settings ──────────────
    let mut prefs = if cli.ephemeral {
        PrefsStore::in_memory()
    } else {
        let dir = cli
            .prefs_dir
            .clone()
            .or_else(PrefsStore::default_dir)
            .context("no platform config directory; pass --prefs-dir or --ephemeral")?;
        match PrefsStore::open(&dir) {
            Ok(store) => store,
            Err(e) => {
                warn!("Preference store unavailable ({}), running without persistence", e);
                PrefsStore::in_memory()
            }
        }
    };

    let config = match prefs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            AppConfig::default()
        }
    };
    let settings = Settings::load(&prefs);

    let sprite_dir = cli
        .sprites
        .clone()
        .or_else(|| config.sprite_dir.clone())
        .or_else(|| prefs.dir().map(|d| d.join("Sprites")));

    // ── 3. Construct adapters ─────────────────────────────────
    let dock_prefs: Box<dyn DockPreferencePort> = match cli.dock {
        Some(edge) => Box::new(FixedDockPreference(Some(
            DockOrientation::from(edge).to_string(),
        ))),
        None => Box::new(SystemDockPreference::new()),
    };
    let display = StaticDisplay::new(Some(config.display));
    let clock = SystemClock::new();
    let mut ticks = HostTicks::default();
    let mut window = HeadlessWindow::new();
    let mut sprites = SpriteLoader::new(sprite_dir);
    let mut sink = LogEventSink::new();

    let mut ports = PlatformPorts {
        ticks: &mut ticks,
        dock_prefs: &*dock_prefs,
        display: &display,
        clock: &clock,
        window: &mut window,
        sprites: &mut sprites,
        storage: &mut prefs,
        sink: &mut sink,
    };

    // ── 4. Construct app service ──────────────────────────────
    let mut app = AppService::new(config.clone(), settings, Prng::from_entropy().next_u64());
    app.start(&mut ports);

    let (input_rx, _input_thread) = spawn_stdin_reader();
    let mut input_open = true;

    info!("Ready. Entering main loop.");

    // ── 5. Main loop ──────────────────────────────────────────
    let period = Duration::from_millis(u64::from(config.loop_period_ms));
    let deadline = cli
        .exit_after
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    while !app.quit_requested() {
        let started = Instant::now();

        // Drain input without blocking.
        loop {
            match input_rx.try_recv() {
                Ok(InputLine::App(cmd)) => app.handle_command(cmd, &mut ports),
                Ok(InputLine::Screen(screen)) => {
                    if display.set_geometry(Some(screen)) {
                        app.notify_screen_changed();
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if input_open {
                        info!("Input closed; the pet keeps running");
                        input_open = false;
                    }
                    break;
                }
            }
        }

        app.tick(&mut ports);

        if deadline.is_some_and(|d| Instant::now() >= d) {
            info!("--exit-after elapsed");
            break;
        }

        let elapsed = started.elapsed();
        if elapsed < period {
            thread::sleep(period - elapsed);
        }
    }

    // ── 6. Teardown ───────────────────────────────────────────
    app.shutdown(&mut ports);
    Ok(())
}
