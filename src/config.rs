// Configuration management for the Gann trading bot

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    pub pair: String,
    pub expiry_minutes: u32,
    pub starting_balance: f64,
    pub base_price: BasePriceSource,
}

/// Where the evaluator takes its Square of Nine base price from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BasePriceSource {
    Fixed { price: f64 },
    SessionOpen, // First close the session sees
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    pub angle_step: f64,              // Degrees between reference levels
    pub volume_lookback: usize,       // Samples averaged for the volume ratio
    pub volume_ratio_threshold: f64,  // Latest volume must exceed this multiple
    pub spread_limit: f64,            // Max spread in points
    pub point_size: f64,              // Price units per point
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            angle_step: 45.0,
            volume_lookback: 5,
            volume_ratio_threshold: 2.0,
            spread_limit: 2.0,
            point_size: 0.0001, // One pip on EURUSD
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeConfig {
    pub base_stake: f64,
    pub multiplier: f64,
    pub max_levels: u32,
    pub stop_loss_pct: f64, // Of starting balance
}

impl Default for StakeConfig {
    fn default() -> Self {
        Self {
            base_stake: 1.0,
            multiplier: 2.0,
            max_levels: 2,
            stop_loss_pct: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    pub period_secs: u64,
    pub jitter_tolerance_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            period_secs: 60,
            jitter_tolerance_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperConfig {
    pub win_probability: f64,
    pub payout_rate: f64,     // Profit per unit staked on a win
    pub seed: u64,
    pub wait_for_expiry: bool,
    pub failure_rate: f64,    // Injected transient failures, 0 disables
    pub spread_points: f64,   // Spread quoted by the simulated market
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            win_probability: 0.6,
            payout_rate: 0.8,
            seed: 42,
            wait_for_expiry: true,
            failure_rate: 0.0,
            spread_points: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub trade_log_dir: String,
    pub enable_signal_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            trade_log_dir: "logs".to_string(),
            enable_signal_logging: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub samples: usize,
    pub start_price: f64,
    pub price_floor: f64,              // Walk reflects off these bounds
    pub price_ceiling: f64,
    pub volatility: f64,               // Max absolute close-to-close move
    pub volume_min: f64,
    pub volume_max: f64,
    pub volume_spike_probability: f64,
    pub seed: u64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            samples: 10_080, // One week of M1 bars
            start_price: 150.0,
            price_floor: 144.0,   // Default base price
            price_ceiling: 169.0, // One revolution above it
            volatility: 0.5,
            volume_min: 100.0,
            volume_max: 1000.0,
            volume_spike_probability: 0.1,
            seed: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub trading: TradingConfig,
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub stake: StakeConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub paper: PaperConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub backtest: BacktestConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trading: TradingConfig {
                pair: "EURUSD-OTC".to_string(),
                expiry_minutes: 1,
                starting_balance: 1000.0,
                base_price: BasePriceSource::Fixed { price: 144.0 },
            },
            signal: SignalConfig::default(),
            stake: StakeConfig::default(),
            timing: TimingConfig::default(),
            retry: RetryConfig::default(),
            paper: PaperConfig::default(),
            logging: LoggingConfig::default(),
            backtest: BacktestConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if !path.as_ref().exists() {
            return Err(ConfigError::NotFound(path.as_ref().display().to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or create default if file doesn't exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(&path)?;
            tracing::info!("📁 Created default config file: {}", path.as_ref().display());
            Ok(config)
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trading.expiry_minutes == 0 {
            return Err(ConfigError::Validation("expiry_minutes must be greater than 0".to_string()));
        }

        if !self.trading.starting_balance.is_finite() || self.trading.starting_balance <= 0.0 {
            return Err(ConfigError::Validation("starting_balance must be positive".to_string()));
        }

        if let BasePriceSource::Fixed { price } = self.trading.base_price {
            if !price.is_finite() || price <= 0.0 {
                return Err(ConfigError::Validation("base_price must be positive".to_string()));
            }
        }

        let step = self.signal.angle_step;
        if !step.is_finite() || step <= 0.0 || step > 360.0 || (360.0 / step).fract().abs() > 1e-9 {
            return Err(ConfigError::Validation("angle_step must divide 360 evenly".to_string()));
        }

        if self.signal.volume_lookback == 0 {
            return Err(ConfigError::Validation("volume_lookback must be greater than 0".to_string()));
        }

        if !self.signal.volume_ratio_threshold.is_finite() || self.signal.volume_ratio_threshold <= 0.0 {
            return Err(ConfigError::Validation("volume_ratio_threshold must be positive".to_string()));
        }

        if !self.signal.spread_limit.is_finite() || self.signal.spread_limit < 0.0 {
            return Err(ConfigError::Validation("spread_limit must be non-negative".to_string()));
        }

        if !self.signal.point_size.is_finite() || self.signal.point_size <= 0.0 {
            return Err(ConfigError::Validation("point_size must be positive".to_string()));
        }

        if !self.stake.base_stake.is_finite() || self.stake.base_stake <= 0.0 {
            return Err(ConfigError::Validation("base_stake must be positive".to_string()));
        }

        if !self.stake.multiplier.is_finite() || self.stake.multiplier < 1.0 {
            return Err(ConfigError::Validation("multiplier must be at least 1.0".to_string()));
        }

        if !self.stake.stop_loss_pct.is_finite() || self.stake.stop_loss_pct <= 0.0 || self.stake.stop_loss_pct > 1.0 {
            return Err(ConfigError::Validation("stop_loss_pct must be between 0 and 1".to_string()));
        }

        if self.timing.period_secs == 0 {
            return Err(ConfigError::Validation("period_secs must be greater than 0".to_string()));
        }

        if !(0.0..=1.0).contains(&self.paper.win_probability) {
            return Err(ConfigError::Validation("win_probability must be between 0 and 1".to_string()));
        }

        if !(0.0..1.0).contains(&self.paper.failure_rate) {
            return Err(ConfigError::Validation("failure_rate must be in [0, 1)".to_string()));
        }

        if !self.paper.payout_rate.is_finite() || self.paper.payout_rate <= 0.0 {
            return Err(ConfigError::Validation("payout_rate must be positive".to_string()));
        }

        if self.backtest.volume_min <= 0.0 || self.backtest.volume_max <= self.backtest.volume_min {
            return Err(ConfigError::Validation("volume range must be positive and non-empty".to_string()));
        }

        if !(0.0..=1.0).contains(&self.backtest.volume_spike_probability) {
            return Err(ConfigError::Validation("volume_spike_probability must be between 0 and 1".to_string()));
        }

        let bt = &self.backtest;
        if !bt.volatility.is_finite() || bt.volatility < 0.0 {
            return Err(ConfigError::Validation("volatility must be non-negative".to_string()));
        }

        if !(bt.price_floor > 0.0 && bt.price_ceiling.is_finite()) {
            return Err(ConfigError::Validation("backtest price bounds must be positive".to_string()));
        }

        if !(bt.price_floor <= bt.start_price && bt.start_price <= bt.price_ceiling) {
            return Err(ConfigError::Validation("start_price must lie within the price bounds".to_string()));
        }

        if bt.price_ceiling - bt.price_floor <= 2.0 * bt.volatility {
            return Err(ConfigError::Validation("price bounds must be wider than two volatility steps".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
