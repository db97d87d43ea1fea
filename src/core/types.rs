// Common types used across the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One closed one-minute bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub timestamp: DateTime<Utc>,
    pub bid: f64,
    pub ask: f64,
}

impl Quote {
    /// Spread expressed in points of `point_size`
    pub fn spread_points(&self, point_size: f64) -> f64 {
        (self.ask - self.bid).abs() / point_size
    }

    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "call")]
    Up,
    #[serde(rename = "put")]
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "call"),
            Direction::Down => write!(f, "put"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLevel {
    pub angle: f64, // Degrees
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub direction: Direction,
    pub level: ReferenceLevel,
    pub volume_ratio: f64,
    pub spread: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Win,
    Loss,
}

impl TradeResult {
    pub fn is_win(&self) -> bool {
        matches!(self, TradeResult::Win)
    }
}

/// What the executor is asked to place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderRequest {
    pub direction: Direction,
    pub stake: f64,
    pub expiry_minutes: u32,
}

/// What the executor reports once the option expires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub result: TradeResult,
    pub profit: f64, // Negative on a loss
}

/// One line of the trade journal; written once, never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    pub entry_price: f64,
    pub signal_type: String,
    pub direction: Direction,
    pub stake: f64,
    pub result: TradeResult,
    pub profit: f64,
}
