// Integration tests for the live loop's stop conditions

mod common;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use common::{create_test_config, repeated_breakouts, ScriptedExecutor};
use gann_trading_bot::{
    HaltReason, LiveRunner, MarketFeed, MemoryJournal, PaperExecutor, PriceSample, Quote, ReplayFeed,
    SimulatedMarket, StopReason, TickSchedule, TradeResult, TradingResult, TradingSession,
};

/// Replay feed whose window fetch takes `delay` of wall-clock time
struct SlowFeed {
    inner: ReplayFeed,
    delay: std::time::Duration,
}

#[async_trait]
impl MarketFeed for SlowFeed {
    async fn window(&self, as_of: DateTime<Utc>, count: usize) -> TradingResult<Vec<PriceSample>> {
        tokio::time::sleep(self.delay).await;
        self.inner.window(as_of, count).await
    }

    async fn quote(&self, as_of: DateTime<Utc>) -> TradingResult<Quote> {
        self.inner.quote(as_of).await
    }
}

// One-second boundaries keep the wall-clock tests short
fn fast_schedule(tolerance_ms: i64) -> TickSchedule {
    TickSchedule::new(Duration::seconds(1), Duration::milliseconds(tolerance_ms))
}

#[tokio::test]
async fn test_past_deadline_stops_before_first_tick() {
    let config = create_test_config();
    let feed = SimulatedMarket::new(&config.backtest, Utc::now(), 6, 0.0001);
    let mut session = TradingSession::new(&config, feed, PaperExecutor::new(&config.paper), MemoryJournal::new());

    let runner = LiveRunner::new(TickSchedule::from_config(&config.timing)).with_deadline(Utc::now());
    let stop = runner.run_until(&mut session, std::future::pending::<()>()).await;

    assert_eq!(stop, StopReason::Deadline);
    assert_eq!(session.stats().ticks, 0);
}

#[tokio::test]
async fn test_shutdown_signal_stops_between_ticks() {
    let config = create_test_config();
    let feed = SimulatedMarket::new(&config.backtest, Utc::now(), 6, 0.0001);
    let mut session = TradingSession::new(&config, feed, PaperExecutor::new(&config.paper), MemoryJournal::new());

    let runner = LiveRunner::new(TickSchedule::from_config(&config.timing)).with_deadline(Utc::now() + Duration::hours(1));
    let stop = runner.run_until(&mut session, async {}).await;

    assert_eq!(stop, StopReason::Interrupted);
    assert_eq!(session.stats().ticks, 0);
}

#[tokio::test]
async fn test_halted_session_is_not_resumed() {
    let config = create_test_config();
    let samples = repeated_breakouts(3);
    let ticks: Vec<_> = samples.iter().map(|s| s.timestamp).collect();

    let executor = ScriptedExecutor::new(&[TradeResult::Loss, TradeResult::Loss, TradeResult::Loss]);
    let mut session = TradingSession::new(&config, ReplayFeed::new(samples, 1.0), executor, MemoryJournal::new());
    for as_of in ticks {
        session.run_tick(as_of).await;
    }
    assert!(session.is_halted());

    let runner = LiveRunner::new(TickSchedule::from_config(&config.timing));
    let stop = runner.run_until(&mut session, std::future::pending::<()>()).await;
    assert_eq!(stop, StopReason::Halted(HaltReason::StreakExhausted));
}

#[tokio::test]
async fn test_on_time_boundary_runs_a_tick() {
    let config = create_test_config();
    let feed = ReplayFeed::new(repeated_breakouts(1), 1.0);
    let mut session = TradingSession::new(&config, feed, PaperExecutor::new(&config.paper), MemoryJournal::new());

    let runner = LiveRunner::new(fast_schedule(900)).with_deadline(Utc::now() + Duration::milliseconds(1_500));
    let stop = runner.run_until(&mut session, std::future::pending::<()>()).await;

    assert_eq!(stop, StopReason::Deadline);
    assert!(session.stats().ticks >= 1);
    assert_eq!(session.stats().timing_skips, 0);
}

#[tokio::test]
async fn test_late_wake_up_is_skipped_not_run() {
    let config = create_test_config();
    let feed = ReplayFeed::new(repeated_breakouts(1), 1.0);
    let mut session = TradingSession::new(&config, feed, PaperExecutor::new(&config.paper), MemoryJournal::new());

    // Zero tolerance: any wake-up after the boundary is outside it
    let runner = LiveRunner::new(fast_schedule(0)).with_deadline(Utc::now() + Duration::milliseconds(2_500));
    let stop = runner.run_until(&mut session, std::future::pending::<()>()).await;

    assert_eq!(stop, StopReason::Deadline);
    assert_eq!(session.stats().ticks, 0);
    assert!(session.stats().timing_skips >= 1);
}

#[tokio::test]
async fn test_boundaries_passed_during_a_slow_tick_are_counted() {
    let config = create_test_config();
    let feed = SlowFeed {
        inner: ReplayFeed::new(repeated_breakouts(1), 1.0),
        delay: std::time::Duration::from_millis(2_200),
    };
    let mut session = TradingSession::new(&config, feed, PaperExecutor::new(&config.paper), MemoryJournal::new());

    let runner = LiveRunner::new(fast_schedule(900)).with_deadline(Utc::now() + Duration::milliseconds(1_500));
    let stop = runner.run_until(&mut session, std::future::pending::<()>()).await;

    assert_eq!(stop, StopReason::Deadline);
    assert_eq!(session.stats().ticks, 1);
    assert!(session.stats().timing_skips >= 2);
}
