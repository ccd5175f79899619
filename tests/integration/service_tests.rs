//! Integration tests for the AppService → sensors/FSM → ports pipeline.
//!
//! Everything runs against [`Platform`](super::mock_platform::Platform)
//! with a manual clock, so timer behaviour is exact.

use std::path::PathBuf;

use docklambda::app::commands::AppCommand;
use docklambda::app::events::{AppEvent, FileKind};
use docklambda::app::ports::WindowPort;
use docklambda::app::service::AppService;
use docklambda::app::settings::Settings;
use docklambda::config::AppConfig;
use docklambda::fsm::{IdleFrequency, PetState};
use docklambda::geometry::{Point, Rect, ScreenGeometry};
use docklambda::sensors::cpu::TickSnapshot;
use docklambda::sensors::dock::DockOrientation;

use super::mock_platform::{BrokenStore, Platform};

/// Bottom-right corner of the default display for a 120pt pet, 12pt margin.
const BASE: Point = Point::new(1440.0 - 120.0 - 12.0, 70.0 + 12.0);

fn started(settings: Settings) -> (AppService, Platform) {
    let mut p = Platform::new();
    let mut app = AppService::new(AppConfig::default(), settings, 7);
    app.start(&mut p.ports());
    (app, p)
}

fn is_placed(e: &AppEvent) -> bool {
    matches!(e, AppEvent::WindowPlaced { .. })
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_places_window_and_plays_idle() {
    let (app, p) = started(Settings::default());

    assert!(app.is_running());
    assert_eq!(app.state(), PetState::Idle);
    assert_eq!(app.dock(), DockOrientation::Bottom);
    assert_eq!(p.window.origin(), BASE);
    assert!(p.window.is_visible());
    assert!(!p.window.click_through());

    assert!(p.sink.events.contains(&AppEvent::Started(PetState::Idle)));
    assert!(p.sink.events.contains(&AppEvent::WindowPlaced {
        origin: BASE,
        dock: DockOrientation::Bottom,
    }));
    assert!(p.sink.events.contains(&AppEvent::AnimationStarted {
        state: PetState::Idle,
        frames: 1,
        placeholder: true,
        frame_secs: 2.0,
    }));
    // The CPU sampler was primed.
    assert_eq!(p.ticks.reads, 1);
}

#[test]
fn start_applies_persisted_settings() {
    let settings = Settings {
        click_through: true,
        lock_position: false,
        relative_offset: Point::new(-100.0, 40.0),
    };
    let (_app, p) = started(settings);
    assert!(p.window.click_through());
    assert_eq!(p.window.origin(), Point::new(BASE.x - 100.0, BASE.y + 40.0));
}

// ── Clicks ────────────────────────────────────────────────────

#[test]
fn click_feeds_then_returns_to_idle() {
    let (mut app, mut p) = started(Settings::default());
    p.sink.clear();

    app.handle_command(AppCommand::Click, &mut p.ports());
    assert_eq!(app.state(), PetState::Eat);
    assert_eq!(
        p.sink.events[0],
        AppEvent::StateChanged {
            from: PetState::Idle,
            to: PetState::Eat
        }
    );

    // Eat plays once for 1.5 s.
    p.run_until(&mut app, 1_400, 100);
    assert_eq!(app.state(), PetState::Eat);
    p.run_until(&mut app, 1_500, 100);
    assert_eq!(app.state(), PetState::Idle);
    assert!(p.sink.events.contains(&AppEvent::StateChanged {
        from: PetState::Eat,
        to: PetState::Idle
    }));
}

#[test]
fn double_click_dances_with_sprite_frames() {
    let mut p = Platform::new();
    p.sprites.frame_counts.insert(PetState::Dance, 5);
    let mut app = AppService::new(AppConfig::default(), Settings::default(), 7);
    app.start(&mut p.ports());

    app.handle_command(AppCommand::DoubleClick, &mut p.ports());
    assert_eq!(app.state(), PetState::Dance);
    assert!(p.sink.events.contains(&AppEvent::AnimationStarted {
        state: PetState::Dance,
        frames: 5,
        placeholder: false,
        frame_secs: 0.5,
    }));
    assert_eq!(p.sprites.requests.last(), Some(&PetState::Dance));
}

#[test]
fn feeding_while_eating_is_silent() {
    let (mut app, mut p) = started(Settings::default());
    app.handle_command(AppCommand::Click, &mut p.ports());
    p.sink.clear();
    app.handle_command(AppCommand::Click, &mut p.ports());
    assert_eq!(app.state(), PetState::Eat);
    assert_eq!(
        p.sink.count(|e| matches!(e, AppEvent::StateChanged { .. })),
        0
    );
}

// ── CPU sampler ───────────────────────────────────────────────

#[test]
fn cpu_poll_drives_idle_frequency() {
    let mut p = Platform::new();
    p.ticks.script.push_back(Ok(TickSnapshot::new(100, 50, 50, 0)));
    p.ticks.script.push_back(Ok(TickSnapshot::new(120, 60, 60, 0)));
    let mut app = AppService::new(AppConfig::default(), Settings::default(), 7);
    app.start(&mut p.ports());

    p.run_until(&mut app, 9_900, 100);
    assert_eq!(p.sink.count(|e| matches!(e, AppEvent::CpuSampled { .. })), 0);

    p.run_until(&mut app, 10_000, 100);
    assert!(p.sink.events.contains(&AppEvent::CpuSampled {
        usage: 0.75,
        frequency: IdleFrequency::Medium,
        measured: true,
    }));
    assert_eq!(app.idle_frequency(), IdleFrequency::Medium);
}

#[test]
fn unreadable_counters_fall_back() {
    let (mut app, mut p) = started(Settings::default());
    p.run_until(&mut app, 10_000, 500);

    let sample = p
        .sink
        .last_matching(|e| matches!(e, AppEvent::CpuSampled { .. }))
        .cloned();
    match sample {
        Some(AppEvent::CpuSampled {
            usage, measured, ..
        }) => {
            assert!(!measured);
            assert!((0.0..=1.0).contains(&usage));
        }
        other => panic!("expected a CPU sample, got {other:?}"),
    }
    assert!(app.last_cpu_reading().is_some());
}

// ── Dock + screen ─────────────────────────────────────────────

#[test]
fn dock_move_replaces_window() {
    let mut p = Platform::new();
    p.dock_prefs.0 = Some("bottom".into());
    let mut app = AppService::new(AppConfig::default(), Settings::default(), 7);
    app.start(&mut p.ports());

    p.dock_prefs.0 = Some("left".into());
    p.run_until(&mut app, 2_900, 100);
    assert_eq!(app.dock(), DockOrientation::Bottom);

    p.run_until(&mut app, 3_000, 100);
    assert_eq!(app.dock(), DockOrientation::Left);
    assert!(p.sink.events.contains(&AppEvent::DockMoved {
        from: DockOrientation::Bottom,
        to: DockOrientation::Left,
    }));
    assert_eq!(p.window.origin(), Point::new(12.0, 82.0));

    // Further polls on the same edge stay quiet.
    p.run_until(&mut app, 9_000, 100);
    assert_eq!(p.sink.count(|e| matches!(e, AppEvent::DockMoved { .. })), 1);
}

#[test]
fn screen_change_bursts_coalesce() {
    let (mut app, mut p) = started(Settings::default());
    let placed_before = p.sink.count(is_placed);

    let big = ScreenGeometry::new(
        Rect::new(0.0, 0.0, 1920.0, 1080.0),
        Rect::new(0.0, 60.0, 1920.0, 995.0),
    );
    p.display.set_geometry(Some(big));
    app.notify_screen_changed();
    p.run_until(&mut app, 100, 100); // debounce armed at 100
    app.notify_screen_changed();
    p.run_until(&mut app, 300, 100);
    app.notify_screen_changed();
    p.run_until(&mut app, 400, 100); // re-armed at 400 -> due 900
    assert!(app.screen_change_pending());

    p.run_until(&mut app, 800, 100);
    assert_eq!(p.sink.count(is_placed), placed_before);

    p.run_until(&mut app, 1_000, 100);
    assert_eq!(p.sink.count(is_placed), placed_before + 1);
    assert!(!app.screen_change_pending());
    assert_eq!(p.window.origin(), Point::new(1920.0 - 132.0, 72.0));
}

// ── Option-drag ───────────────────────────────────────────────

#[test]
fn drag_moves_window_and_persists_offset() {
    let (mut app, mut p) = started(Settings::default());

    app.handle_command(AppCommand::DragStart, &mut p.ports());
    assert!(app.is_dragging());
    app.handle_command(AppCommand::DragMove { dx: -50.0, dy: 20.0 }, &mut p.ports());
    app.handle_command(AppCommand::DragMove { dx: -10.0, dy: 0.0 }, &mut p.ports());
    assert_eq!(p.window.origin(), Point::new(BASE.x - 60.0, BASE.y + 20.0));

    app.handle_command(AppCommand::DragEnd, &mut p.ports());
    assert!(!app.is_dragging());
    let offset = Point::new(-60.0, 20.0);
    assert_eq!(app.settings().relative_offset, offset);
    assert!(p.sink.events.contains(&AppEvent::OffsetSaved(offset)));
    assert_eq!(Settings::load(&*p.storage).relative_offset, offset);

    // A second drag accumulates onto the stored offset.
    app.handle_command(AppCommand::DragStart, &mut p.ports());
    app.handle_command(AppCommand::DragMove { dx: 5.0, dy: 5.0 }, &mut p.ports());
    app.handle_command(AppCommand::DragEnd, &mut p.ports());
    assert_eq!(app.settings().relative_offset, Point::new(-55.0, 25.0));
}

#[test]
fn locked_position_ignores_drag() {
    let (mut app, mut p) = started(Settings::default());
    app.handle_command(AppCommand::ToggleLockPosition, &mut p.ports());
    assert!(app.settings().lock_position);

    app.handle_command(AppCommand::DragStart, &mut p.ports());
    app.handle_command(AppCommand::DragMove { dx: 300.0, dy: 300.0 }, &mut p.ports());
    app.handle_command(AppCommand::DragEnd, &mut p.ports());

    assert!(!app.is_dragging());
    assert_eq!(p.window.origin(), BASE);
    assert_eq!(app.settings().relative_offset, Point::ZERO);
}

#[test]
fn reset_position_clears_offset() {
    let settings = Settings {
        relative_offset: Point::new(-200.0, 100.0),
        ..Settings::default()
    };
    let (mut app, mut p) = started(settings);
    assert_ne!(p.window.origin(), BASE);

    app.handle_command(AppCommand::ResetPosition, &mut p.ports());
    assert_eq!(p.window.origin(), BASE);
    assert_eq!(app.settings().relative_offset, Point::ZERO);
    assert_eq!(Settings::load(&*p.storage).relative_offset, Point::ZERO);
}

// ── File drops ────────────────────────────────────────────────

#[test]
fn dropped_files_are_classified() {
    let (mut app, mut p) = started(Settings::default());
    p.sink.clear();

    app.handle_command(
        AppCommand::DropFiles(vec![PathBuf::from("/tmp/cat.png"), PathBuf::from("notes.txt")]),
        &mut p.ports(),
    );
    assert_eq!(
        p.sink.events,
        vec![
            AppEvent::Joy,
            AppEvent::FileDropped {
                name: "cat.png".into(),
                kind: FileKind::Image
            },
            AppEvent::FileDropped {
                name: "notes.txt".into(),
                kind: FileKind::Text
            },
        ]
    );
    assert_eq!(app.state(), PetState::Idle);
}

#[test]
fn dropped_audio_makes_the_pet_dance() {
    let (mut app, mut p) = started(Settings::default());
    app.handle_command(
        AppCommand::DropFiles(vec![PathBuf::from("song.mp3")]),
        &mut p.ports(),
    );
    assert_eq!(app.state(), PetState::Dance);
}

// ── Status commands ───────────────────────────────────────────

#[test]
fn click_through_toggles_and_persists() {
    let (mut app, mut p) = started(Settings::default());
    app.handle_command(AppCommand::ToggleClickThrough, &mut p.ports());
    assert!(p.window.click_through());
    assert!(Settings::load(&*p.storage).click_through);
    assert!(p.sink.events.contains(&AppEvent::ClickThroughChanged(true)));

    app.handle_command(AppCommand::ToggleClickThrough, &mut p.ports());
    assert!(!p.window.click_through());
    assert!(!Settings::load(&*p.storage).click_through);
}

#[test]
fn hide_and_show_report_only_changes() {
    let (mut app, mut p) = started(Settings::default());
    app.handle_command(AppCommand::ShowPet, &mut p.ports());
    assert_eq!(p.sink.count(|e| matches!(e, AppEvent::VisibilityChanged(_))), 0);

    app.handle_command(AppCommand::HidePet, &mut p.ports());
    app.handle_command(AppCommand::HidePet, &mut p.ports());
    assert!(!p.window.is_visible());
    app.handle_command(AppCommand::ShowPet, &mut p.ports());
    assert!(p.window.is_visible());
    assert_eq!(p.sink.count(|e| matches!(e, AppEvent::VisibilityChanged(_))), 2);
}

#[test]
fn quit_then_shutdown() {
    let (mut app, mut p) = started(Settings::default());
    app.handle_command(AppCommand::Quit, &mut p.ports());
    assert!(app.quit_requested());

    app.shutdown(&mut p.ports());
    assert!(!app.is_running());
    assert_eq!(p.sink.events.last(), Some(&AppEvent::Stopped));
    assert!(app.idle_timer_due_ms().is_none());

    // Ticks after shutdown do nothing.
    let n = p.sink.events.len();
    p.run_until(&mut app, 20_000, 1_000);
    assert_eq!(p.sink.events.len(), n);
}

#[test]
fn failed_settings_write_stays_dirty() {
    let mut p = Platform::new();
    p.storage = Box::new(BrokenStore);
    let mut app = AppService::new(AppConfig::default(), Settings::default(), 7);
    app.start(&mut p.ports());

    app.handle_command(AppCommand::ToggleLockPosition, &mut p.ports());
    assert!(app.settings().lock_position);
    assert!(app.is_settings_dirty());

    app.shutdown(&mut p.ports());
    assert!(app.is_settings_dirty());
    assert_eq!(p.sink.events.last(), Some(&AppEvent::Stopped));
}

// ── Idle timer ────────────────────────────────────────────────

#[test]
fn idle_timer_is_armed_in_low_range() {
    let (app, _p) = started(Settings::default());
    let due = app.idle_timer_due_ms().unwrap();
    assert!((10_000..=30_000).contains(&due), "due at {due}");
}

#[test]
fn idle_timeout_picks_an_activity_and_rearms() {
    let (mut app, mut p) = started(Settings::default());
    let due = app.idle_timer_due_ms().unwrap();

    p.run_until(&mut app, due, 100);
    assert!(matches!(app.state(), PetState::Idle | PetState::Sleep));

    // The CPU poll may have shifted the cadence before the re-arm.
    let range = match app.idle_frequency() {
        IdleFrequency::Low => app.config().idle_low,
        IdleFrequency::Medium => app.config().idle_medium,
        IdleFrequency::High => app.config().idle_high,
    };
    let next = app.idle_timer_due_ms().unwrap();
    let lo = due + u64::from(range.min_secs) * 1000;
    let hi = due + u64::from(range.max_secs) * 1000;
    assert!((lo..=hi).contains(&next), "next at {next}");
}

#[test]
fn interaction_postpones_idle_activity() {
    let (mut app, mut p) = started(Settings::default());
    p.run_until(&mut app, 9_000, 500);

    app.handle_command(AppCommand::Click, &mut p.ports());
    let due = app.idle_timer_due_ms().unwrap();
    assert!(due >= 9_000 + 10_000, "due at {due}");
}

#[test]
fn sleep_returns_to_idle_after_its_animation() {
    // Seeds vary the coin flip; try until one lands on Sleep.
    for seed in 0..64 {
        let mut p = Platform::new();
        let mut app = AppService::new(AppConfig::default(), Settings::default(), seed);
        app.start(&mut p.ports());
        let due = app.idle_timer_due_ms().unwrap();
        p.run_until(&mut app, due, 100);
        if app.state() != PetState::Sleep {
            continue;
        }
        p.run_until(&mut app, due + 2_900, 100);
        assert_eq!(app.state(), PetState::Sleep);
        p.run_until(&mut app, due + 3_000, 100);
        assert_eq!(app.state(), PetState::Idle);
        return;
    }
    panic!("no seed produced a nap");
}
