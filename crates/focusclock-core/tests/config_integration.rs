//! Integration tests for loading and saving the TOML configuration.

use focusclock_core::{Config, ConfigError, CoreError, SessionController};

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
    assert_eq!(cfg, Config::default());
    // Loading never writes.
    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn test_save_then_load_preserves_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.set("settings.focus_minutes", "45").unwrap();
    cfg.set("settings.auto_start_next", "true").unwrap();
    cfg.set("ticker.interval_ms", "250").unwrap();
    cfg.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.settings.focus_minutes, 45);
    assert!(loaded.settings.auto_start_next);
    assert_eq!(loaded.tick_interval().as_millis(), 250);

    let controller = SessionController::new(loaded.settings);
    assert_eq!(controller.remaining_secs(), 45.0 * 60.0);
}

#[test]
fn test_out_of_range_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[settings]\ncycles_before_long_break = 12\n").unwrap();

    match Config::load_from(&path) {
        Err(CoreError::Config(ConfigError::InvalidValue { key, .. })) => {
            assert_eq!(key, "settings.cycles_before_long_break");
        }
        other => panic!("expected invalid value, got {other:?}"),
    }
}

#[test]
fn test_malformed_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[settings\nfocus_minutes = ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
    assert!(err.to_string().contains("config.toml"));
}
