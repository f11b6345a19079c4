use tempfile::tempdir;
use traceviewer_core::signals::SignalKind;
use traceviewer_settings::{Config, SettingsError, SettingsManager};

#[test]
fn test_toml_round_trip() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("settings.toml");

    let mut config = Config::new();
    config.signals.caller_identification = true;
    config.signals.depth_warning_threshold = 8;
    config.logging.json = true;
    config.save_to_file(&path).expect("Should save");

    let loaded = Config::load_from_file(&path).expect("Should load");
    assert_eq!(loaded, config);
}

#[test]
fn test_json_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "logging": { "level": "debug" } }"#).expect("write");

    let loaded = Config::load_from_file(&path).expect("Should load");
    assert_eq!(loaded.logging.level, "debug");
    assert!(loaded.signals.isolate_panics);
}

#[test]
fn test_invalid_file_rejected() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[logging]\nlevel = \"loud\"\n").expect("write");

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Config(_)));

    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        Config::load_from_file(&missing),
        Err(SettingsError::IoError(_))
    ));
}

#[test]
fn test_manager_defaults_when_missing() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("settings.toml");

    let mut settings = SettingsManager::load_from(&path).expect("Should load defaults");
    assert_eq!(settings.config(), &Config::default());

    settings.config_mut().signals.caller_identification = true;
    settings.save().expect("Should save");
    assert!(path.exists());

    let reloaded = SettingsManager::load_from(&path).expect("Should reload");
    assert!(reloaded.config().signals.caller_identification);
}

#[test]
fn test_manager_builds_configured_bus() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[signals]\ncaller_identification = false\n").expect("write");

    let settings = SettingsManager::load_from(&path).expect("Should load");
    let bus = settings.build_signal_manager();
    assert!(!bus.config().caller_identification);

    let sub = bus.subscribe(SignalKind::ThemeChanged, "Palette", |_| Ok(()));
    assert!(sub.registrant().is_unknown());
    assert!(bus.fire_theme_changed("light"));
}
