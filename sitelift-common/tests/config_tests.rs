//! Unit tests for configuration resolution and graceful degradation
//!
//! Tests that manipulate SITELIFT_ROOT_FOLDER are marked with #[serial]
//! so they never race each other.

use serial_test::serial;
use sitelift_common::config::{
    CompiledDefaults, ConfigSource, RootFolderInitializer, RootFolderResolver, TomlConfig,
    ROOT_FOLDER_ENV,
};
use std::env;
use std::path::PathBuf;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert!(defaults.root_folder.to_string_lossy().contains("sitelift"));
    assert_eq!(defaults.port, 3001);
    assert_eq!(defaults.max_upload_bytes, 100 * 1024 * 1024);
    assert_eq!(defaults.log_level, "info");
}

#[test]
#[serial]
fn test_cli_override_wins_over_env() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/sitelift-env-root");

    let resolver = RootFolderResolver::new("test-module")
        .with_cli_override(Some(PathBuf::from("/tmp/sitelift-cli-root")));
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/sitelift-cli-root"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_env_wins_over_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/sitelift-env-root");

    let toml = TomlConfig {
        root_folder: Some("/tmp/sitelift-toml-root".to_string()),
        ..Default::default()
    };
    let resolver = RootFolderResolver::new("test-module").with_toml_config(toml);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/sitelift-env-root"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_toml_used_when_env_missing() {
    env::remove_var(ROOT_FOLDER_ENV);

    let toml = TomlConfig {
        root_folder: Some("/tmp/sitelift-toml-root".to_string()),
        ..Default::default()
    };
    let resolver = RootFolderResolver::new("test-module").with_toml_config(toml);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/sitelift-toml-root"));
}

#[test]
#[serial]
fn test_falls_back_to_compiled_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let resolver =
        RootFolderResolver::new("test-module").with_toml_config(TomlConfig::default());
    assert_eq!(
        resolver.resolve(),
        CompiledDefaults::for_current_platform().root_folder
    );
}

#[test]
fn test_broken_toml_file_reports_config_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("broken.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    let err = TomlConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_full_toml_file_loads() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("convert.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/sitelift"
port = 8088
bind_address = "0.0.0.0"
max_upload_mb = 25

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.root_folder.as_deref(), Some("/srv/sitelift"));
    assert_eq!(config.port, Some(8088));
    assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0"));
    assert_eq!(config.max_upload_bytes(), Some(25 * 1024 * 1024));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_initializer_paths() {
    let initializer = RootFolderInitializer::new(PathBuf::from("/data/sitelift"));
    assert_eq!(initializer.uploads_dir(), PathBuf::from("/data/sitelift/uploads"));
    assert_eq!(initializer.scratch_dir(), PathBuf::from("/data/sitelift/temp"));
    assert_eq!(
        initializer.downloads_dir(),
        PathBuf::from("/data/sitelift/downloads")
    );
}

#[test]
fn test_broken_toml_file_falls_back_with_invalid_source() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("broken.toml");
    std::fs::write(&path, "port = [unterminated").unwrap();

    let (config, source) = TomlConfig::load_from(Some(path));
    assert!(matches!(source, ConfigSource::Invalid(_)));
    assert!(source.is_defaults());
    assert!(config.port.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_toml_file_reports_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("absent.toml");

    let (config, source) = TomlConfig::load_from(Some(path.clone()));
    match source {
        ConfigSource::NotFound(reported) => assert_eq!(reported, path),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(config.root_folder.is_none());
    assert!(matches!(
        TomlConfig::load_from(None).1,
        ConfigSource::NoConfigDir
    ));
}

#[test]
fn test_valid_toml_file_reports_its_path() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("convert.toml");
    std::fs::write(&path, "port = 9090\n").unwrap();

    let (config, source) = TomlConfig::load_from(Some(path.clone()));
    assert_eq!(config.port, Some(9090));
    assert!(!source.is_defaults());
    assert!(matches!(source, ConfigSource::File(p) if p == path));
}
