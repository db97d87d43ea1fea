// Replays a fixed bar sequence as if it were arriving live

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::clients::MarketFeed;
use crate::core::types::{PriceSample, Quote};
use crate::error::{TradingError, TradingResult};

pub struct ReplayFeed {
    samples: Vec<PriceSample>,
    half_spread: f64, // Price units either side of the close
}

impl ReplayFeed {
    /// `spread` is in price units, quoted symmetrically around each close.
    pub fn new(mut samples: Vec<PriceSample>, spread: f64) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self {
            samples,
            half_spread: spread.abs() / 2.0,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    // Number of samples stamped at or before `as_of`
    fn visible(&self, as_of: DateTime<Utc>) -> usize {
        self.samples.partition_point(|s| s.timestamp <= as_of)
    }
}

#[async_trait]
impl MarketFeed for ReplayFeed {
    async fn window(&self, as_of: DateTime<Utc>, count: usize) -> TradingResult<Vec<PriceSample>> {
        let end = self.visible(as_of);
        let start = end.saturating_sub(count);
        Ok(self.samples[start..end].to_vec())
    }

    async fn quote(&self, as_of: DateTime<Utc>) -> TradingResult<Quote> {
        let end = self.visible(as_of);
        if end == 0 {
            return Err(TradingError::InsufficientData(1, 0));
        }

        let last = &self.samples[end - 1];
        Ok(Quote {
            timestamp: last.timestamp,
            bid: last.close - self.half_spread,
            ask: last.close + self.half_spread,
        })
    }
}
