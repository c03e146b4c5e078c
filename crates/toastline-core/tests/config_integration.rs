//! Integration tests for config parsing against the real config.toml.

use std::path::PathBuf;
use toastline_core::{Config, Position};

fn project_root() -> PathBuf {
    // Navigate from crates/toastline-core/ up to project root
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent() // crates/
        .unwrap()
        .parent() // toastline/
        .unwrap()
        .to_path_buf()
}

#[test]
fn test_load_real_config() {
    let config_path = project_root().join("config.toml");

    let config = Config::load(&config_path).expect("Failed to load config.toml");

    // Verify config loads and has expected structure
    // (specific values may change, so we test for validity rather than exact values)
    assert!(config.toast.duration_ms > 0, "Duration should be positive");
    assert!(config.toast.fadeout_ms > 0, "Fadeout should be positive");
    assert!(
        Position::ALL.contains(&config.toast.position),
        "Position should be valid"
    );
}

#[test]
fn test_real_config_validates() {
    let config_path = project_root().join("config.toml");
    let config = Config::load(&config_path).unwrap();

    // The real config should pass validation with no warnings
    config.validate().expect("Real config.toml should be valid");
    assert!(
        config.warnings().is_empty(),
        "Real config.toml should produce no warnings: {:?}",
        config.warnings()
    );
}

#[test]
fn test_find_and_load_with_explicit_path() {
    let config_path = project_root().join("config.toml");

    let result = Config::find_and_load(Some(&config_path)).unwrap();

    assert!(!result.used_defaults);
    assert!(result.source.is_some());
    assert_eq!(result.source.unwrap(), config_path);

    result
        .config
        .validate()
        .expect("Loaded config should validate");
}

#[test]
fn test_find_and_load_missing_explicit_path_errors() {
    let missing = project_root().join("no-such-config.toml");
    let result = Config::find_and_load(Some(&missing));
    assert!(result.is_err(), "Explicit missing path must not fall back");
}

#[test]
fn test_summary_of_real_config() {
    let config_path = project_root().join("config.toml");
    let config = Config::load(&config_path).unwrap();

    let summary = config.summary();
    assert!(summary.contains("Toast Configuration:"));
    assert!(summary.contains("Theme:"));
    assert!(summary.contains("duration:"));
}
