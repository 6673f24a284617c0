//! Loading gate configuration from disk.

use assert_matches::assert_matches;
use soteria_gate::{ConfigError, GateConfig};
use std::io::Write;
use std::path::PathBuf;

const OWNER_HEX: &str = "0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a";

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn toml_file_fills_unset_fields_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "gate.toml",
        &format!("app_id = 42\nowner = \"{OWNER_HEX}\"\nlock_gpio_pin = 17\n"),
    );

    let config = GateConfig::load_from_file(&path).unwrap();

    assert_eq!(config.app_id, 42);
    assert_eq!(config.lock_gpio_pin, 17);
    assert_eq!(config.access_grant_duration_secs, 10);
    assert_eq!(config.storage_path, PathBuf::from("./storage/keys"));
    config.validate().unwrap();
}

#[test]
fn json_file_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "gate.json",
        &format!(
            r#"{{"app_id": 9, "owner": "{OWNER_HEX}", "default_guest_name": "Visitor"}}"#
        ),
    );

    let config = GateConfig::load_from_file(&path).unwrap();
    assert_eq!(config.app_id, 9);
    assert_eq!(config.default_guest_name, "Visitor");
}

#[test]
fn unknown_extension_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "gate.yaml", "app_id: 1\n");

    assert_matches!(
        GateConfig::load_from_file(&path),
        Err(ConfigError::UnsupportedFormat { .. })
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert_matches!(
        GateConfig::load_from_file(&dir.path().join("absent.toml")),
        Err(ConfigError::Io { .. })
    );
}

#[test]
fn broken_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "gate.toml", "app_id = \"forty-two\"\n");

    assert_matches!(
        GateConfig::load_from_file(&path),
        Err(ConfigError::Parse { .. })
    );
}

#[test]
fn overlong_grant_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "gate.toml",
        &format!("app_id = 42\nowner = \"{OWNER_HEX}\"\naccess_grant_duration_secs = 7200\n"),
    );

    let config = GateConfig::load_from_file(&path).unwrap();
    assert_matches!(
        config.validate(),
        Err(ConfigError::Invalid {
            field: "access_grant_duration_secs",
            ..
        })
    );
}
