// Integration tests for configuration loading and validation

mod common;

use common::create_test_config;
use gann_trading_bot::{BasePriceSource, Config, ConfigError, TradingError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_config_values() {
    let config = Config::default();

    assert_eq!(config.trading.pair, "EURUSD-OTC");
    assert_eq!(config.trading.expiry_minutes, 1);
    assert_eq!(config.trading.base_price, BasePriceSource::Fixed { price: 144.0 });
    assert_eq!(config.signal.angle_step, 45.0);
    assert_eq!(config.signal.volume_lookback, 5);
    assert_eq!(config.signal.volume_ratio_threshold, 2.0);
    assert_eq!(config.signal.spread_limit, 2.0);
    assert_eq!(config.stake.multiplier, 2.0);
    assert_eq!(config.stake.max_levels, 2);
    assert_eq!(config.stake.stop_loss_pct, 0.05);
    assert_eq!(config.timing.jitter_tolerance_ms, 500);
    assert_eq!(config.retry.max_attempts, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_serialization_deserialization() {
    let config = create_test_config();

    let toml_string = toml::to_string(&config).expect("Failed to serialize config");
    assert!(toml_string.contains("EURUSD-OTC"));
    assert!(toml_string.contains("mode = \"fixed\""));

    let deserialized: Config = toml::from_str(&toml_string).expect("Failed to deserialize config");
    assert_eq!(deserialized.trading.pair, config.trading.pair);
    assert_eq!(deserialized.stake.base_stake, config.stake.base_stake);
    assert_eq!(deserialized.signal.point_size, config.signal.point_size);
}

#[test]
fn test_config_file_loading() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");

    create_test_config().to_file(&config_path).expect("Failed to write config");
    let loaded = Config::from_file(&config_path).expect("Failed to load config");

    assert_eq!(loaded.trading.pair, "EURUSD-OTC");
    assert_eq!(loaded.stake.base_stake, 10.0);
}

#[test]
fn test_minimal_file_fills_in_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[trading]
pair = "GBPJPY-OTC"
expiry_minutes = 1
starting_balance = 250.0
base_price = { mode = "session_open" }
"#,
    )
    .unwrap();

    let config = Config::from_file(&config_path).expect("Failed to load config");
    assert_eq!(config.trading.pair, "GBPJPY-OTC");
    assert_eq!(config.trading.base_price, BasePriceSource::SessionOpen);
    assert_eq!(config.signal.volume_lookback, 5);
    assert_eq!(config.paper.win_probability, 0.6);
}

#[test]
fn test_load_or_create_writes_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");

    let created = Config::load_or_create(&config_path).expect("Failed to create config");
    assert!(config_path.exists());

    let reloaded = Config::load_or_create(&config_path).expect("Failed to reload config");
    assert_eq!(created.trading.pair, reloaded.trading.pair);
}

#[test]
fn test_invalid_angle_step_rejected() {
    let mut config = create_test_config();
    config.signal.angle_step = 50.0; // 360 / 50 is not whole
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn test_invalid_values_rejected() {
    let cases: Vec<Box<dyn Fn(&mut Config)>> = vec![
        Box::new(|c| c.trading.expiry_minutes = 0),
        Box::new(|c| c.trading.starting_balance = 0.0),
        Box::new(|c| c.stake.base_stake = -1.0),
        Box::new(|c| c.stake.stop_loss_pct = 1.5),
        Box::new(|c| c.signal.volume_lookback = 0),
        Box::new(|c| c.paper.win_probability = 1.2),
        Box::new(|c| c.backtest.volume_spike_probability = -0.1),
    ];

    for mutate in cases {
        let mut config = create_test_config();
        mutate(&mut config);
        assert!(config.validate().is_err());
    }
}

#[test]
fn test_missing_file_is_not_found_error() {
    let err = Config::from_file("does/not/exist.toml").unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));

    let trading: TradingError = err.into();
    assert!(matches!(trading, TradingError::ConfigNotFound(_)));
    assert!(trading.user_message().contains("gann-bot init"));
}

#[test]
fn test_non_finite_values_rejected() {
    let mut config = create_test_config();
    config.signal.angle_step = f64::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

    let mut config = create_test_config();
    config.trading.base_price = BasePriceSource::Fixed { price: f64::NAN };
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

    let mut config = create_test_config();
    config.stake.base_stake = f64::INFINITY;
    assert!(config.validate().is_err());
}

#[test]
fn test_synthetic_start_outside_bounds_rejected() {
    let mut config = create_test_config();
    config.backtest.start_price = 200.0;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}
