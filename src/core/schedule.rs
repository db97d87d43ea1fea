// Tick timing: one-minute boundaries with a jitter tolerance

use chrono::{DateTime, Duration, DurationRound, Utc};

use crate::config::TimingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickTiming {
    OnTime,
    OutsideTolerance(i64), // Signed lateness in ms
}

#[derive(Debug, Clone, Copy)]
pub struct TickSchedule {
    period: Duration,
    tolerance: Duration,
}

impl TickSchedule {
    pub fn new(period: Duration, tolerance: Duration) -> Self {
        Self { period, tolerance }
    }

    pub fn from_config(config: &TimingConfig) -> Self {
        Self::new(
            Duration::seconds(config.period_secs.max(1) as i64),
            Duration::milliseconds(config.jitter_tolerance_ms as i64),
        )
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// First boundary strictly after `now`.
    pub fn next_boundary(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let floor = now.duration_trunc(self.period).unwrap_or(now);
        floor + self.period
    }

    pub fn classify(&self, scheduled: DateTime<Utc>, actual: DateTime<Utc>) -> TickTiming {
        let lateness = actual - scheduled;
        if lateness.abs() <= self.tolerance {
            TickTiming::OnTime
        } else {
            TickTiming::OutsideTolerance(lateness.num_milliseconds())
        }
    }

    /// Boundaries that passed between the tick at `last` and the next one
    /// reachable from `now`, e.g. while a trade was waiting to expire.
    pub fn missed_boundaries(&self, last: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        let next = self.next_boundary(now);
        let span = (next - last).num_milliseconds();
        let period = self.period.num_milliseconds().max(1);
        (span / period - 1).max(0) as u64
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::from_config(&TimingConfig::default())
    }
}
