//! Unified error handling for the Gann trading bot
//!
//! One error type for the whole crate, with operator-facing messages and a
//! retryability flag the tick loop uses to decide between retrying and
//! skipping.

use std::fmt;
use std::io;

/// Main error type for the trading bot
#[derive(Debug, Clone)]
pub enum TradingError {
    // Configuration errors
    ConfigNotFound(String),
    ConfigParse(String),
    ConfigValidation(String),

    // Broker / feed errors
    ApiConnection(String),
    ApiTimeout(String),
    ApiResponse(String),

    // Data quality
    InsufficientData(usize, usize), // (needed, available)

    // Trading errors
    OrderFailed(String),
    OrderRejected(String),
    SessionHalted(String),
    RetriesExhausted(u32, String), // (attempts, last error)

    // IO errors
    FileNotFound(String),
    FileRead(String),
    FileWrite(String),

    // General errors
    Internal(String),
}

impl TradingError {
    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            TradingError::ConfigNotFound(path) => {
                format!(
                    "Configuration file not found: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: gann-bot init\n\
                    2. Review config.toml (stake, stop loss, pair)\n\
                    3. Try again",
                    path
                )
            }
            TradingError::ConfigValidation(msg) => {
                format!(
                    "Configuration validation error: {}\n\n\
                    💡 Check config.toml for:\n\
                    - Positive stakes and balances\n\
                    - Percentages between 0 and 1\n\
                    - An angle step that divides 360",
                    msg
                )
            }
            TradingError::SessionHalted(reason) => {
                format!(
                    "Trading session halted: {}\n\n\
                    💡 Halts never clear on their own.\n\
                    Start a new session once you have reviewed the trade log.",
                    reason
                )
            }
            TradingError::RetriesExhausted(attempts, last) => {
                format!(
                    "Gave up after {} attempts: {}\n\n\
                    💡 The tick was skipped; the next one will try again",
                    attempts, last
                )
            }
            TradingError::InsufficientData(needed, available) => {
                format!(
                    "Not enough price samples: needed {}, got {}\n\n\
                    💡 Wait for more bars or shorten volume_lookback",
                    needed, available
                )
            }
            TradingError::ConfigParse(msg) => {
                format!(
                    "Configuration parse error: {}\n\n\
                    💡 Compare your file with one written by: gann-bot init",
                    msg
                )
            }
            TradingError::FileNotFound(path) => {
                format!(
                    "File not found: {}\n\n\
                    💡 Check the path, or run gann-bot init to create the workspace",
                    path
                )
            }
            _ => self.to_string(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TradingError::ApiConnection(_) | TradingError::ApiTimeout(_)
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            TradingError::ConfigNotFound(_)
            | TradingError::ConfigParse(_)
            | TradingError::ConfigValidation(_) => "config",

            TradingError::ApiConnection(_)
            | TradingError::ApiTimeout(_)
            | TradingError::ApiResponse(_) => "api",

            TradingError::InsufficientData(_, _) => "data",

            TradingError::OrderFailed(_)
            | TradingError::OrderRejected(_)
            | TradingError::SessionHalted(_)
            | TradingError::RetriesExhausted(_, _) => "trading",

            TradingError::FileNotFound(_)
            | TradingError::FileRead(_)
            | TradingError::FileWrite(_) => "io",

            TradingError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for TradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path)
            }
            TradingError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            TradingError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }

            TradingError::ApiConnection(msg) => {
                write!(f, "API connection error: {}", msg)
            }
            TradingError::ApiTimeout(msg) => {
                write!(f, "API timeout: {}", msg)
            }
            TradingError::ApiResponse(msg) => {
                write!(f, "API response error: {}", msg)
            }

            TradingError::InsufficientData(needed, available) => {
                write!(
                    f,
                    "Insufficient data: needed {} samples, available {}",
                    needed, available
                )
            }

            TradingError::OrderFailed(msg) => {
                write!(f, "Order failed: {}", msg)
            }
            TradingError::OrderRejected(msg) => {
                write!(f, "Order rejected: {}", msg)
            }
            TradingError::SessionHalted(reason) => {
                write!(f, "Session halted: {}", reason)
            }
            TradingError::RetriesExhausted(attempts, last) => {
                write!(f, "Retries exhausted after {} attempts: {}", attempts, last)
            }

            TradingError::FileNotFound(path) => {
                write!(f, "File not found: {}", path)
            }
            TradingError::FileRead(msg) => {
                write!(f, "File read error: {}", msg)
            }
            TradingError::FileWrite(msg) => {
                write!(f, "File write error: {}", msg)
            }

            TradingError::Internal(msg) => {
                write!(f, "Internal error: {}", msg)
            }
        }
    }
}

impl std::error::Error for TradingError {}

// Conversion implementations for common error types

impl From<io::Error> for TradingError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => TradingError::FileNotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => TradingError::FileWrite(err.to_string()),
            io::ErrorKind::TimedOut => TradingError::ApiTimeout(err.to_string()),
            io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => {
                TradingError::ApiConnection(err.to_string())
            }
            _ => TradingError::Internal(format!("IO error: {}", err)),
        }
    }
}

impl From<csv::Error> for TradingError {
    fn from(err: csv::Error) -> Self {
        TradingError::FileWrite(format!("CSV error: {}", err))
    }
}

impl From<serde_json::Error> for TradingError {
    fn from(err: serde_json::Error) -> Self {
        TradingError::FileWrite(format!("JSON error: {}", err))
    }
}

impl From<toml::de::Error> for TradingError {
    fn from(err: toml::de::Error) -> Self {
        TradingError::ConfigParse(format!("TOML parse error: {}", err))
    }
}

impl From<crate::config::ConfigError> for TradingError {
    fn from(err: crate::config::ConfigError) -> Self {
        use crate::config::ConfigError;
        match err {
            ConfigError::NotFound(path) => TradingError::ConfigNotFound(path),
            ConfigError::FileRead(msg) => TradingError::FileRead(msg),
            ConfigError::FileWrite(msg) => TradingError::FileWrite(msg),
            ConfigError::Parse(msg) => TradingError::ConfigParse(msg),
            ConfigError::Serialize(msg) => TradingError::Internal(msg),
            ConfigError::Validation(msg) => TradingError::ConfigValidation(msg),
        }
    }
}

impl From<String> for TradingError {
    fn from(msg: String) -> Self {
        TradingError::Internal(msg)
    }
}

impl From<&str> for TradingError {
    fn from(msg: &str) -> Self {
        TradingError::Internal(msg.to_string())
    }
}

/// Result type alias using TradingError
pub type TradingResult<T> = Result<T, TradingError>;
