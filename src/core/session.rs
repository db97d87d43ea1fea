// One trading session: evaluate -> size -> place -> settle -> journal, one tick at a time

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clients::{MarketFeed, TradeExecutor};
use crate::config::{BasePriceSource, Config};
use crate::core::evaluator::{Assessment, SignalEvaluator};
use crate::core::retry::RetryPolicy;
use crate::core::stake::{HaltReason, StakeController};
use crate::core::types::{OrderRequest, Signal, TradeRecord};
use crate::error::TradingError;
use crate::journal::TradeSink;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub ticks: u64,
    pub signals: u64,
    pub trades: u64,
    pub wins: u64,
    pub losses: u64,
    pub no_signal: u64,
    pub data_skips: u64,
    pub connectivity_skips: u64,
    pub rejected_orders: u64,
    pub timing_skips: u64,
    pub journal_failures: u64,
    pub net_profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Connectivity(String),
    DataQuality(String),
    Rejected(String), // Broker refused the order
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Traded { signal: Signal, record: TradeRecord },
    NoSignal(Assessment),
    Skipped(SkipReason),
    Halted(HaltReason),
}

pub struct TradingSession<F, X, S> {
    id: Uuid,
    pair: String,
    expiry_minutes: u32,
    base_source: BasePriceSource,
    anchored_base: Option<f64>,
    log_signals: bool,
    evaluator: SignalEvaluator,
    stake: StakeController,
    retry: RetryPolicy,
    feed: F,
    executor: X,
    sink: S,
    stats: SessionStats,
}

impl<F, X, S> TradingSession<F, X, S>
where
    F: MarketFeed,
    X: TradeExecutor,
    S: TradeSink,
{
    pub fn new(config: &Config, feed: F, executor: X, sink: S) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            pair: config.trading.pair.clone(),
            expiry_minutes: config.trading.expiry_minutes,
            base_source: config.trading.base_price,
            anchored_base: None,
            log_signals: config.logging.enable_signal_logging,
            evaluator: SignalEvaluator::new(config.signal.clone()),
            stake: StakeController::new(config.stake.clone(), config.trading.starting_balance),
            retry: RetryPolicy::from_config(&config.retry),
            feed,
            executor,
            sink,
            stats: SessionStats::default(),
        };

        info!(
            "🚀 Session {} on {} - balance {:.2}, base stake {:.2}",
            session.id, session.pair, config.trading.starting_balance, config.stake.base_stake
        );
        session
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn stake(&self) -> &StakeController {
        &self.stake
    }

    pub fn is_halted(&self) -> bool {
        self.stake.is_halted()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Ticks dropped by the scheduler for arriving outside tolerance.
    pub fn record_timing_skips(&mut self, count: u64) {
        self.stats.timing_skips += count;
    }

    /// Explicit operator reset: new session id, fresh stake state, new anchor.
    pub fn reset(&mut self, starting_balance: f64) {
        self.id = Uuid::new_v4();
        self.stake.reset(starting_balance);
        self.anchored_base = None;
        self.stats = SessionStats::default();
        info!("🔁 Session reset as {} with balance {:.2}", self.id, starting_balance);
    }

    /// Process the tick for the bar closing at `as_of` to completion.
    /// Never returns an error: failures become skips, risk limits become halts.
    pub async fn run_tick(&mut self, as_of: DateTime<Utc>) -> TickOutcome {
        self.stats.ticks += 1;

        if let Some(reason) = self.stake.halt_reason() {
            return TickOutcome::Halted(reason);
        }

        let needed = self.evaluator.required_samples();
        let feed = &self.feed;
        let fetched = self.retry.execute("fetch window", move || feed.window(as_of, needed)).await;
        let window = match fetched {
            Ok(window) => window,
            Err(e) => return self.skip(as_of, e),
        };
        let fetched = self.retry.execute("fetch quote", move || feed.quote(as_of)).await;
        let quote = match fetched {
            Ok(quote) => quote,
            Err(e) => return self.skip(as_of, e),
        };

        let latest = match window.last() {
            Some(sample) => *sample,
            None => return self.skip(as_of, TradingError::InsufficientData(needed, 0)),
        };

        let base_price = match self.base_source {
            BasePriceSource::Fixed { price } => price,
            BasePriceSource::SessionOpen => self.anchored_base.unwrap_or(window[0].close),
        };

        let assessment = self.evaluator.assess(&window, &quote, base_price);

        // Anchor on the first window that passes the data checks
        if self.base_source == BasePriceSource::SessionOpen
            && self.anchored_base.is_none()
            && !assessment.is_data_failure()
            && base_price.is_finite()
            && base_price > 0.0
        {
            self.anchored_base = Some(base_price);
            info!("📌 Session {} anchored at base price {:.5}", self.id, base_price);
        }
        let signal = match assessment.signal() {
            Some(signal) => signal,
            None => {
                if assessment.is_data_failure() {
                    self.stats.data_skips += 1;
                    warn!("⚠️  Tick {} skipped on data quality: {:?}", as_of, assessment);
                } else {
                    self.stats.no_signal += 1;
                    debug!("Tick {}: no signal ({:?})", as_of, assessment);
                }
                return TickOutcome::NoSignal(assessment);
            }
        };

        self.stats.signals += 1;
        if self.log_signals {
            info!(
                "⚡ {} signal at {:.5}: crossed {:.0}° level {:.5} (volume {:.2}x, spread {:.1})",
                signal.direction.to_string().to_uppercase(),
                latest.close,
                signal.level.angle,
                signal.level.price,
                signal.volume_ratio,
                signal.spread
            );
        }

        let stake = match self.stake.current_stake() {
            Some(stake) => stake,
            None => return self.halted(),
        };
        let signal_type = self.stake.signal_label();
        let order = OrderRequest {
            direction: signal.direction,
            stake,
            expiry_minutes: self.expiry_minutes,
        };

        info!("💸 Placing {} {:.2} ({}) on {}", order.direction, order.stake, signal_type, self.pair);
        let executor = &self.executor;
        let request = &order;
        let placed = self.retry.execute("place trade", move || executor.execute(request)).await;
        let settlement = match placed {
            Ok(settlement) => settlement,
            Err(e) => return self.skip(as_of, e),
        };

        if let Err(e) = self.stake.record(&settlement) {
            error!("❌ Settlement ignored: {}", e);
            return self.halted();
        }

        let record = TradeRecord {
            timestamp: latest.timestamp,
            entry_price: latest.close,
            signal_type,
            direction: signal.direction,
            stake,
            result: settlement.result,
            profit: settlement.profit,
        };

        self.stats.trades += 1;
        self.stats.net_profit += settlement.profit;
        if settlement.result.is_win() {
            self.stats.wins += 1;
            info!("✅ WIN {:+.2} | balance {:.2}", settlement.profit, self.stake.balance());
        } else {
            self.stats.losses += 1;
            info!("❌ LOSS {:+.2} | balance {:.2}", settlement.profit, self.stake.balance());
        }

        if let Err(e) = self.sink.append(&record) {
            self.stats.journal_failures += 1;
            error!("❌ Failed to journal trade: {}", e);
        }

        TickOutcome::Traded { signal, record }
    }

    fn skip(&mut self, as_of: DateTime<Utc>, error: TradingError) -> TickOutcome {
        let reason = match error {
            TradingError::InsufficientData(_, _) | TradingError::ApiResponse(_) => {
                self.stats.data_skips += 1;
                SkipReason::DataQuality(error.to_string())
            }
            TradingError::OrderRejected(_) | TradingError::OrderFailed(_) => {
                self.stats.rejected_orders += 1;
                SkipReason::Rejected(error.to_string())
            }
            _ => {
                self.stats.connectivity_skips += 1;
                SkipReason::Connectivity(error.to_string())
            }
        };
        warn!("⚠️  Tick {} skipped: {:?}", as_of, reason);
        TickOutcome::Skipped(reason)
    }

    fn halted(&self) -> TickOutcome {
        TickOutcome::Halted(self.stake.halt_reason().unwrap_or(HaltReason::StreakExhausted))
    }
}
