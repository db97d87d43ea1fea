// Backtesting engine: drives a TradingSession tick by tick over recorded bars

use chrono::{DateTime, TimeZone, Utc};
use std::time::Duration;
use tracing::info;

use crate::backtesting::{BacktestReport, PerformanceSummary};
use crate::clients::{PaperExecutor, ReplayFeed, SampleGenerator};
use crate::config::Config;
use crate::core::retry::RetryPolicy;
use crate::core::session::{TickOutcome, TradingSession};
use crate::core::types::PriceSample;
use crate::error::{TradingError, TradingResult};
use crate::journal::{MemoryJournal, TradeSink};
use crate::progress::BacktestProgress;

// 2024-01-01T00:00:00Z; synthetic data is anchored here so runs are reproducible
const SYNTHETIC_EPOCH_SECS: i64 = 1_704_067_200;

pub struct BacktestEngine {
    config: Config,
    show_progress: bool,
}

impl BacktestEngine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `count` seeded one-minute bars from the `[backtest]` settings.
    pub fn synthetic_samples(&self, count: usize) -> Vec<PriceSample> {
        let start = Utc
            .timestamp_opt(SYNTHETIC_EPOCH_SECS, 0)
            .single()
            .unwrap_or_default();
        SampleGenerator::new(&self.config.backtest).generate(start, count)
    }

    pub async fn run(&self, samples: Vec<PriceSample>) -> TradingResult<BacktestReport> {
        self.run_with_journal(samples, MemoryJournal::new()).await
    }

    /// Replay `samples` in timestamp order, one tick per bar, journaling to `sink`.
    /// Stops early once the session halts.
    pub async fn run_with_journal<S: TradeSink>(&self, samples: Vec<PriceSample>, sink: S) -> TradingResult<BacktestReport> {
        let config = &self.config;
        let feed = ReplayFeed::new(samples, config.paper.spread_points * config.signal.point_size);

        let required = config.signal.volume_lookback.max(1) + 1;
        if feed.len() < required {
            return Err(TradingError::InsufficientData(required, feed.len()));
        }

        let ticks: Vec<DateTime<Utc>> = feed.samples().iter().map(|s| s.timestamp).collect();
        let executor = PaperExecutor::new(&config.paper).instant();
        let mut session = TradingSession::new(config, feed, executor, sink)
            .with_retry(RetryPolicy::new(config.retry.max_attempts, Duration::ZERO));

        info!("🚀 Starting backtest: {} samples on {}", ticks.len(), config.trading.pair);

        let progress = if self.show_progress {
            BacktestProgress::new(ticks.len())
        } else {
            BacktestProgress::hidden(ticks.len())
        };

        let mut signals = Vec::new();
        let mut records = Vec::new();
        let mut halted = None;

        for as_of in ticks.iter().copied() {
            match session.run_tick(as_of).await {
                TickOutcome::Traded { signal, record } => {
                    signals.push(signal);
                    records.push(record);
                }
                TickOutcome::Halted(reason) => {
                    halted = Some(reason);
                    break;
                }
                TickOutcome::NoSignal(_) | TickOutcome::Skipped(_) => {}
            }
            progress.tick(session.stats().trades, session.stake().balance());

            if let Some(reason) = session.stake().halt_reason() {
                halted = Some(reason);
                break;
            }
        }

        let initial_balance = config.trading.starting_balance;
        let summary = PerformanceSummary::from_records(&records, initial_balance);
        match halted {
            Some(reason) => progress.finish_halted(&reason.to_string()),
            None => progress.finish(session.stats().trades, summary.total_return_pct),
        }

        Ok(BacktestReport {
            session_id: session.id(),
            pair: config.trading.pair.clone(),
            samples: ticks.len(),
            initial_balance,
            final_balance: session.stake().balance(),
            halted,
            stats: session.stats().clone(),
            summary,
            signals,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TradeResult;
    use chrono::Duration as ChronoDuration;

    fn flat_then_breakout(start: DateTime<Utc>) -> Vec<PriceSample> {
        // Five quiet bars under the 45° level, then a high-volume break above it
        let closes = [145.0, 145.2, 145.4, 145.6, 145.8, 147.5];
        let volumes = [100.0, 100.0, 100.0, 100.0, 100.0, 400.0];
        closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&close, volume))| PriceSample {
                timestamp: start + ChronoDuration::minutes(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume,
            })
            .collect()
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.signal.point_size = 0.01;
        config.paper.win_probability = 1.0;
        config
    }

    #[tokio::test]
    async fn test_breakout_produces_one_call_trade() {
        let engine = BacktestEngine::new(config());
        let samples = flat_then_breakout(Utc::now());
        let report = engine.run(samples).await.unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.signals.len(), 1);
        assert_eq!(report.records[0].signal_type, "Gann");
        assert_eq!(report.records[0].entry_price, 147.5);
        assert_eq!(report.records[0].result, TradeResult::Win);
        assert!((report.total_profit() - 0.8).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_too_few_samples_is_an_error() {
        let engine = BacktestEngine::new(config());
        let samples = flat_then_breakout(Utc::now())[..3].to_vec();
        assert!(matches!(engine.run(samples).await, Err(TradingError::InsufficientData(6, 3))));
    }

    #[tokio::test]
    async fn test_synthetic_backtest_is_reproducible() {
        let engine = BacktestEngine::new(Config::default());
        let a = engine.run(engine.synthetic_samples(2_000)).await.unwrap();
        let b = engine.run(engine.synthetic_samples(2_000)).await.unwrap();

        assert!(!a.records.is_empty());
        assert_eq!(a.records, b.records);
        assert_eq!(a.signals, b.signals);
        assert_eq!(a.stats, b.stats);
    }
}
