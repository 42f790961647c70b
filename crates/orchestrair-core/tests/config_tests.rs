use orchestrair_core::config::MAX_CONFIG_FILE_SIZE;
use orchestrair_core::{AppConfig, CoreError, Instrument, KeyRegistry, KeySpec};
use std::fs;

#[test]
fn test_toml_save_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orchestrair.toml");

    let mut config = AppConfig::default();
    config.backend.instrument = Instrument::Drums;
    config.midi.enabled = true;
    config.midi.port = Some("IAC".to_string());
    config.keys = KeyRegistry::white_keys().to_specs();

    config.save(&path).unwrap();
    let loaded = AppConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.key_registry().unwrap(), KeyRegistry::white_keys());
}

#[test]
fn test_json_save_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("orchestrair.json");

    let mut config = AppConfig::default();
    config.log.level = "debug".to_string();

    config.save(&path).unwrap();
    assert_eq!(AppConfig::load(&path).unwrap(), config);
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orchestrair.yaml");
    fs::write(&path, "backend: {}").unwrap();

    assert!(matches!(
        AppConfig::load(&path),
        Err(CoreError::UnsupportedFormat(ext)) if ext == "yaml"
    ));
    assert!(matches!(
        AppConfig::default().save(&path),
        Err(CoreError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        AppConfig::load(&dir.path().join("absent.toml")),
        Err(CoreError::Io(_))
    ));
}

#[test]
fn test_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"backend\": ").unwrap();
    assert!(matches!(AppConfig::load(&path), Err(CoreError::Json(_))));
}

#[test]
fn test_load_rejects_inverted_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");
    let config = AppConfig {
        keys: vec![KeySpec::new("C", 20.0, 10.0, 0.0, 10.0)],
        ..Default::default()
    };
    fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

    assert!(matches!(
        AppConfig::load(&path),
        Err(CoreError::InvalidKeyRegion { note, .. }) if note == "C"
    ));
}

#[test]
fn test_oversized_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.toml");
    fs::write(&path, vec![b'#'; MAX_CONFIG_FILE_SIZE as usize + 1]).unwrap();
    assert!(matches!(
        AppConfig::load(&path),
        Err(CoreError::FileTooLarge { .. })
    ));
}
