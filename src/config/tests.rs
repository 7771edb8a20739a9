use super::validation::validate_config;
use super::*;
use crate::chart::{ChartOptions, EngineChoice};
use crate::constants::*;
use crate::pillar::HourBoundary;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn with_config_home<T>(dir: &std::path::Path, f: impl FnOnce() -> T) -> T {
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", dir);
    }

    let result = f();

    unsafe {
        match original {
            Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
    result
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_config_load_missing_file_gives_defaults() {
    let temp_dir = tempdir().unwrap();

    let config = with_config_home(temp_dir.path(), Config::load).unwrap();

    assert_eq!(config.hour_boundary, Some(HourBoundary::Traditional));
    assert_eq!(config.engine, Some(EngineChoice::Meeus));
    assert_eq!(config.daeun_count, Some(DEFAULT_DAEUN_COUNT));
    // Loading never writes a file
    assert!(!temp_dir.path().join("saju").join("saju.toml").exists());
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_config_load_from_xdg_dir() {
    let temp_dir = tempdir().unwrap();
    let saju_dir = temp_dir.path().join("saju");
    fs::create_dir_all(&saju_dir).unwrap();
    fs::write(
        saju_dir.join("saju.toml"),
        "hour_boundary = \"modern\"\nengine = \"approximate\"\ndaeun_count = 8\n",
    )
    .unwrap();

    let config = with_config_home(temp_dir.path(), Config::load).unwrap();

    assert_eq!(config.hour_boundary, Some(HourBoundary::Modern));
    assert_eq!(config.engine, Some(EngineChoice::Approximate));
    assert_eq!(config.daeun_count, Some(8));
    assert_eq!(config.true_solar_time, Some(DEFAULT_TRUE_SOLAR_TIME));
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_config_path_under_xdg_dir() {
    let temp_dir = tempdir().unwrap();

    let path = with_config_home(temp_dir.path(), get_config_path).unwrap();

    assert_eq!(path, temp_dir.path().join("saju").join("saju.toml"));
}

#[test]
fn test_load_from_path_applies_defaults() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("saju.toml");
    fs::write(&path, "sinyak_below = 35.0\nhidden_weights = [7.0, 2.0, 1.0]\n").unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.sinyak_below, Some(35.0));
    assert_eq!(config.singang_above, Some(DEFAULT_SINGANG_ABOVE));
    assert_eq!(config.hidden_weights, Some([7.0, 2.0, 1.0]));

    let options = ChartOptions::from(&config);
    assert_eq!(options.analysis.sinyak_below, 35.0);
    assert_eq!(options.analysis.hidden_weights, [7.0, 2.0, 1.0]);
}

#[test]
fn test_load_from_path_missing_file_is_error() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("absent.toml");
    assert!(Config::load_from_path(&path).is_err());
}

#[test]
fn test_load_rejects_unknown_fields_and_values() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("saju.toml");

    fs::write(&path, "night_temp = 3300\n").unwrap();
    assert!(Config::load_from_path(&path).is_err());

    fs::write(&path, "engine = \"swiss\"\n").unwrap();
    assert!(Config::load_from_path(&path).is_err());

    fs::write(&path, "daeun_count = 0\n").unwrap();
    let err = Config::load_from_path(&path).unwrap_err();
    assert!(format!("{err:#}").contains("daeun_count"));
}

#[test]
fn test_default_options_match_empty_config() {
    let mut config = Config::default();
    config.apply_defaults();
    assert_eq!(ChartOptions::from(&config), ChartOptions::default());
    assert_eq!(ChartOptions::from(&Config::default()), ChartOptions::default());
}

#[test]
fn test_validation_timeout_range() {
    let mut config = Config {
        ephemeris_timeout_ms: Some(MINIMUM_EPHEMERIS_TIMEOUT_MS),
        ..Config::default()
    };
    assert!(validate_config(&config).is_ok());

    config.ephemeris_timeout_ms = Some(MAXIMUM_EPHEMERIS_TIMEOUT_MS);
    assert!(validate_config(&config).is_ok());

    config.ephemeris_timeout_ms = Some(MINIMUM_EPHEMERIS_TIMEOUT_MS - 1);
    assert!(validate_config(&config).is_err());

    config.ephemeris_timeout_ms = Some(MAXIMUM_EPHEMERIS_TIMEOUT_MS + 1);
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_thresholds() {
    let ok = Config {
        sinyak_below: Some(30.0),
        singang_above: Some(70.0),
        ..Config::default()
    };
    assert!(validate_config(&ok).is_ok());

    let inverted = Config {
        sinyak_below: Some(65.0),
        singang_above: Some(55.0),
        ..Config::default()
    };
    assert!(validate_config(&inverted).is_err());

    // Only one side set still has to clear the other side's default
    let crosses_default = Config {
        sinyak_below: Some(DEFAULT_SINGANG_ABOVE),
        ..Config::default()
    };
    assert!(validate_config(&crosses_default).is_err());

    let out_of_range = Config {
        singang_above: Some(120.0),
        ..Config::default()
    };
    assert!(validate_config(&out_of_range).is_err());
}

#[test]
fn test_validation_hidden_weights() {
    let increasing = Config {
        hidden_weights: Some([1.0, 3.0, 6.0]),
        ..Config::default()
    };
    assert!(validate_config(&increasing).is_err());

    let negative = Config {
        hidden_weights: Some([6.0, 3.0, -1.0]),
        ..Config::default()
    };
    assert!(validate_config(&negative).is_err());

    let flat = Config {
        hidden_weights: Some([5.0, 5.0, 5.0]),
        ..Config::default()
    };
    assert!(validate_config(&flat).is_ok());
}

#[test]
fn test_validation_luck_and_weights() {
    for bad in [
        Config {
            daeun_days_per_year: Some(0.0),
            ..Config::default()
        },
        Config {
            daeun_count: Some(MAXIMUM_DAEUN_COUNT + 1),
            ..Config::default()
        },
        Config {
            seasonal_multiplier: Some(0.5),
            ..Config::default()
        },
        Config {
            visible_weight: Some(-10.0),
            ..Config::default()
        },
    ] {
        assert!(validate_config(&bad).is_err(), "{bad:?}");
    }
}
