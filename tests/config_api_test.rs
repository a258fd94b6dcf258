//! Integration tests for config module public API.

use fims::config::{load_config, load_merged_config, BackendKind, FimsConfig, PositionProvider};
use fims::FimsError;
use std::fs;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join(".fims")).unwrap();
    for (name, content) in files {
        fs::write(temp.path().join(".fims").join(name), content).unwrap();
    }
    temp
}

#[test]
fn defaults_without_files() {
    let temp = TempDir::new().unwrap();
    let config = load_merged_config(temp.path()).unwrap();
    assert_eq!(config, FimsConfig::default());
    assert_eq!(config.backend.kind, BackendKind::Local);
    assert_eq!(config.geolocation.provider, PositionProvider::Manual);
    assert!(config.geolocation.timeout_secs >= 10 && config.geolocation.timeout_secs <= 15);
}

#[test]
fn local_layer_overrides_project_layer() {
    let temp = project(&[
        (
            "config.yml",
            "inspector: A. Patil\nbackend:\n  kind: rest\n  url: https://db.example.org\n",
        ),
        ("config.local.yml", "backend:\n  kind: local\n"),
    ]);

    let config = load_merged_config(temp.path()).unwrap();

    assert_eq!(config.inspector.as_deref(), Some("A. Patil"));
    assert_eq!(config.backend.kind, BackendKind::Local);
    assert_eq!(config.backend.url.as_deref(), Some("https://db.example.org"));
}

#[test]
fn explicit_file_skips_layers() {
    let temp = project(&[("config.yml", "inspector: A. Patil\n")]);
    let other = temp.path().join("field.yml");
    fs::write(&other, "geolocation:\n  provider: ip\n").unwrap();

    let config = load_config(temp.path(), Some(&other)).unwrap();

    assert!(config.inspector.is_none());
    assert_eq!(config.geolocation.provider, PositionProvider::Ip);
}

#[test]
fn malformed_yaml_names_the_file() {
    let temp = project(&[("config.yml", "backend: [unterminated\n")]);
    let err = load_merged_config(temp.path()).unwrap_err();
    assert!(matches!(err, FimsError::ConfigParseError { .. }));
    assert!(err.to_string().contains("config.yml"));
}
