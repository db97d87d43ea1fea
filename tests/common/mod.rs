// Common test utilities and helpers
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;

use gann_trading_bot::{
    Config, OrderRequest, PriceSample, Settlement, TradeExecutor, TradeRecord, TradeResult, TradeSink,
    TradingError, TradingResult,
};

/// Configuration with the stock defaults, a 1.0 point size so spreads read
/// directly in price units, and no retry delay.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.signal.point_size = 1.0;
    config.stake.base_stake = 10.0;
    config.retry.delay_ms = 0;
    config.paper.wait_for_expiry = false;
    config.logging.enable_signal_logging = false;
    config
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap()
}

/// One-minute bars from `start_time()` with the given closes and volumes
pub fn bars(closes: &[f64], volumes: &[f64]) -> Vec<PriceSample> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&close, &volume))| PriceSample {
            timestamp: start_time() + Duration::minutes(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume,
        })
        .collect()
}

/// Bars that cross the 45° level above base 144 upward on every other bar,
/// with a confirming volume spike on each crossing. The first crossing is
/// at index 6.
pub fn repeated_breakouts(crossings: usize) -> Vec<PriceSample> {
    let mut closes = vec![145.0, 145.2, 145.4, 145.6, 145.8, 146.0];
    let mut volumes = vec![100.0; 6];
    for _ in 0..crossings {
        closes.push(147.5);
        volumes.push(1000.0);
        closes.push(146.0);
        volumes.push(100.0);
    }
    bars(&closes, &volumes)
}

/// Settles orders from a fixed script, recording every stake it sees.
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<TradeResult>>,
    stakes: Mutex<Vec<f64>>,
    payout_rate: f64,
}

impl ScriptedExecutor {
    pub fn new(script: &[TradeResult]) -> Self {
        Self {
            script: Mutex::new(script.iter().copied().collect()),
            stakes: Mutex::new(Vec::new()),
            payout_rate: 0.8,
        }
    }

    pub fn stakes(&self) -> Vec<f64> {
        self.stakes.lock().unwrap().clone()
    }
}

#[async_trait]
impl TradeExecutor for ScriptedExecutor {
    async fn execute(&self, order: &OrderRequest) -> TradingResult<Settlement> {
        self.stakes.lock().unwrap().push(order.stake);
        let result = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TradingError::OrderRejected("script exhausted".to_string()))?;
        let profit = match result {
            TradeResult::Win => order.stake * self.payout_rate,
            TradeResult::Loss => -order.stake,
        };
        Ok(Settlement { result, profit })
    }
}

/// Fails every call with the given error, counting attempts.
pub struct FailingExecutor {
    error: TradingError,
    attempts: Mutex<u32>,
}

impl FailingExecutor {
    pub fn new(error: TradingError) -> Self {
        Self {
            error,
            attempts: Mutex::new(0),
        }
    }

    pub fn attempts(&self) -> u32 {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl TradeExecutor for FailingExecutor {
    async fn execute(&self, _order: &OrderRequest) -> TradingResult<Settlement> {
        *self.attempts.lock().unwrap() += 1;
        Err(self.error.clone())
    }
}

/// A journal whose disk is always full
#[derive(Default)]
pub struct BrokenJournal;

impl TradeSink for BrokenJournal {
    fn append(&mut self, _record: &TradeRecord) -> TradingResult<()> {
        Err(TradingError::FileWrite("disk full".to_string()))
    }
}
