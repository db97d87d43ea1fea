// Live loop: wake on each boundary, run one tick, stop on halt, deadline or Ctrl-C

use chrono::{DateTime, Utc};
use std::future::Future;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::clients::{MarketFeed, TradeExecutor};
use crate::core::schedule::{TickSchedule, TickTiming};
use crate::core::session::{TickOutcome, TradingSession};
use crate::core::stake::HaltReason;
use crate::journal::TradeSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Halted(HaltReason),
    Deadline,
    Interrupted,
}

pub struct LiveRunner {
    schedule: TickSchedule,
    deadline: Option<DateTime<Utc>>,
}

impl LiveRunner {
    pub fn new(schedule: TickSchedule) -> Self {
        Self {
            schedule,
            deadline: None,
        }
    }

    /// No tick is scheduled past `deadline`.
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Run until halted, the deadline passes or Ctrl-C.
    pub async fn run<F, X, S>(&self, session: &mut TradingSession<F, X, S>) -> StopReason
    where
        F: MarketFeed,
        X: TradeExecutor,
        S: TradeSink,
    {
        self.run_until(session, async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal handler available; rely on the deadline or a halt
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Same as `run`, stopping when `shutdown` resolves. Shutdown is only
    /// observed between ticks; a tick in flight always completes.
    pub async fn run_until<F, X, S, Sd>(&self, session: &mut TradingSession<F, X, S>, shutdown: Sd) -> StopReason
    where
        F: MarketFeed,
        X: TradeExecutor,
        S: TradeSink,
        Sd: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut last_tick: Option<DateTime<Utc>> = None;

        loop {
            if let Some(reason) = session.stake().halt_reason() {
                warn!("🛑 Session halted: {} - reset required to resume", reason);
                return StopReason::Halted(reason);
            }

            let now = Utc::now();
            if let Some(last) = last_tick {
                let missed = self.schedule.missed_boundaries(last, now);
                if missed > 0 {
                    warn!("⏭️  {} tick(s) missed while the previous tick was running", missed);
                    session.record_timing_skips(missed);
                }
            }

            let boundary = self.schedule.next_boundary(now);
            if self.deadline.is_some_and(|deadline| boundary > deadline) {
                info!("⏰ Session duration reached");
                return StopReason::Deadline;
            }

            let wait = (boundary - now).to_std().unwrap_or_default();
            tokio::select! {
                _ = sleep(wait) => {}
                _ = &mut shutdown => {
                    info!("🛑 Received shutdown signal");
                    return StopReason::Interrupted;
                }
            }

            last_tick = Some(boundary);
            match self.schedule.classify(boundary, Utc::now()) {
                TickTiming::OnTime => {
                    let outcome = session.run_tick(boundary).await;
                    log_outcome(boundary, &outcome);
                }
                TickTiming::OutsideTolerance(ms) => {
                    warn!("⏭️  Tick {} skipped: woke {} ms off the boundary", boundary.format("%H:%M:%S"), ms);
                    session.record_timing_skips(1);
                }
            }
        }
    }
}

fn log_outcome(boundary: DateTime<Utc>, outcome: &TickOutcome) {
    match outcome {
        TickOutcome::Traded { record, .. } => debug!(
            "Tick {} traded {} {:.2} -> {:?}",
            boundary.format("%H:%M:%S"),
            record.direction,
            record.stake,
            record.result
        ),
        TickOutcome::NoSignal(assessment) => debug!("Tick {}: {:?}", boundary.format("%H:%M:%S"), assessment),
        TickOutcome::Skipped(reason) => debug!("Tick {} skipped: {:?}", boundary.format("%H:%M:%S"), reason),
        TickOutcome::Halted(reason) => debug!("Tick {} halted: {}", boundary.format("%H:%M:%S"), reason),
    }
}
