//! Settings and config survive a restart through the on-disk store.

use docklambda::adapters::prefs::PrefsStore;
use docklambda::app::commands::AppCommand;
use docklambda::app::ports::{ConfigError, ConfigPort, WindowPort};
use docklambda::app::service::AppService;
use docklambda::app::settings::Settings;
use docklambda::config::AppConfig;
use docklambda::geometry::Point;

use super::mock_platform::Platform;

#[test]
fn dragged_offset_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = PrefsStore::open(dir.path()).unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings, Settings::default());

        let mut p = Platform::new();
        p.storage = Box::new(store);
        let mut app = AppService::new(AppConfig::default(), settings, 3);
        app.start(&mut p.ports());
        app.handle_command(AppCommand::DragStart, &mut p.ports());
        app.handle_command(AppCommand::DragMove { dx: -40.0, dy: 15.0 }, &mut p.ports());
        app.handle_command(AppCommand::DragEnd, &mut p.ports());
        app.handle_command(AppCommand::ToggleClickThrough, &mut p.ports());
        app.shutdown(&mut p.ports());
    }

    let store = PrefsStore::open(dir.path()).unwrap();
    let restored = Settings::load(&store);
    assert_eq!(restored.relative_offset, Point::new(-40.0, 15.0));
    assert!(restored.click_through);
    assert!(!restored.lock_position);

    // A fresh service places the window with the restored offset.
    let mut p = Platform::new();
    p.storage = Box::new(store);
    let mut app = AppService::new(AppConfig::default(), restored, 3);
    app.start(&mut p.ports());
    assert_eq!(p.window.origin(), Point::new(1308.0 - 40.0, 82.0 + 15.0));
    assert!(p.window.click_through());
}

#[test]
fn config_round_trips_and_rejects_bad_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let store = PrefsStore::open(dir.path()).unwrap();

    let mut cfg = store.load().unwrap();
    assert_eq!(cfg.cpu_poll_interval_ms, AppConfig::default().cpu_poll_interval_ms);

    cfg.window_margin = 20.0;
    cfg.dock_poll_interval_ms = 5_000;
    store.save(&cfg).unwrap();

    let reopened = PrefsStore::open(dir.path()).unwrap();
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded.window_margin, 20.0);
    assert_eq!(loaded.dock_poll_interval_ms, 5_000);

    cfg.cpu_medium_threshold = 0.9;
    cfg.cpu_high_threshold = 0.4;
    assert!(matches!(
        reopened.save(&cfg),
        Err(ConfigError::ValidationFailed(_))
    ));
}

#[test]
fn corrupt_store_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("prefs.json"), b"{ not json").unwrap();

    let store = PrefsStore::open(dir.path()).unwrap();
    assert_eq!(Settings::load(&store), Settings::default());
}
