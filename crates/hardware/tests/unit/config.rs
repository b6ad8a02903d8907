//! # Configuration Tests
//!
//! Tests for configuration structures, deserialization, defaults, and validation.

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use tomasim_core::common::ConfigError;
use tomasim_core::config::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.station.capacity, 16);
    assert_eq!(config.station.dispatch_width, 4);
    assert_eq!(config.station.broadcast_width, 4);
    assert_eq!(config.station.issue_ports, 2);
    assert_eq!(config.station.arbitration, Arbitration::RoundRobin);
    assert_eq!(config.general.max_cycles, 10_000);
    assert!(config.general.honor_backpressure);
}

#[test]
fn test_partial_json_fills_defaults() {
    let config = Config::from_json(r#"{ "station": { "issue_ports": 4 } }"#).unwrap();
    assert_eq!(config.station.issue_ports, 4);
    assert_eq!(config.station.capacity, 16);
    assert_eq!(config.general, GeneralConfig::default());
}

#[test]
fn test_arbitration_names() {
    for (name, policy) in [
        ("RoundRobin", Arbitration::RoundRobin),
        ("FixedPriority", Arbitration::FixedPriority),
        ("OldestFirst", Arbitration::OldestFirst),
    ] {
        let json = format!(r#"{{ "station": {{ "arbitration": "{name}" }} }}"#);
        assert_eq!(Config::from_json(&json).unwrap().station.arbitration, policy);
    }
}

#[test]
fn test_unknown_arbitration_rejected() {
    let err = Config::from_json(r#"{ "station": { "arbitration": "Lottery" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_json_roundtrip_of_custom_config() {
    let mut config = Config::default();
    config.station.capacity = 32;
    config.station.arbitration = Arbitration::OldestFirst;
    config.general.honor_backpressure = false;
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(Config::from_json(&text).unwrap(), config);
}

#[test]
fn test_validation_errors() {
    let cases = [
        (
            StationConfig {
                capacity: 0,
                ..StationConfig::default()
            },
            "capacity",
        ),
        (
            StationConfig {
                issue_ports: 0,
                ..StationConfig::default()
            },
            "port",
        ),
        (
            StationConfig {
                dispatch_width: 17,
                ..StationConfig::default()
            },
            "dispatch width",
        ),
    ];
    for (station, needle) in cases {
        let err = station.validate().unwrap_err();
        assert!(
            err.to_string().contains(needle),
            "'{err}' does not mention {needle}"
        );
    }
}

#[test]
fn test_invalid_json_config_rejected_at_load() {
    let err = Config::from_json(r#"{ "station": { "broadcast_width": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroBroadcastWidth));
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "general": {{ "max_cycles": 77 }} }}"#).unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.general.max_cycles, 77);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
