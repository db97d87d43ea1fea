// Seeded random-walk market used for paper trading and synthetic backtests

use async_trait::async_trait;
use chrono::{DateTime, Duration, DurationRound, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::clients::MarketFeed;
use crate::config::BacktestConfig;
use crate::core::types::{PriceSample, Quote};
use crate::error::{TradingError, TradingResult};

/// Produces one-minute bars from a uniform random walk that reflects off
/// `[price_floor, price_ceiling]`, with occasional volume spikes.
/// Same seed, same bars.
pub struct SampleGenerator {
    rng: StdRng,
    price: f64,
    floor: f64,
    ceiling: f64,
    volatility: f64,
    volume_min: f64,
    volume_max: f64,
    spike_probability: f64,
}

impl SampleGenerator {
    pub fn new(config: &BacktestConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            price: config.start_price,
            floor: config.price_floor,
            ceiling: config.price_ceiling,
            volatility: config.volatility,
            volume_min: config.volume_min,
            volume_max: config.volume_max,
            spike_probability: config.volume_spike_probability.clamp(0.0, 1.0),
        }
    }

    pub fn next_sample(&mut self, timestamp: DateTime<Utc>) -> PriceSample {
        let open = self.price;
        let movement = self.rng.gen_range(-self.volatility..=self.volatility);
        let close = self.reflect(open + movement);
        let wick = self.rng.gen_range(0.0..=self.volatility / 2.0);

        let mut volume = self.rng.gen_range(self.volume_min..self.volume_max);
        if self.rng.gen_bool(self.spike_probability) {
            volume *= 3.0;
        }

        self.price = close;
        PriceSample {
            timestamp,
            open,
            high: open.max(close) + wick,
            low: (open.min(close) - wick).max(f64::EPSILON),
            close,
            volume: volume.round(),
        }
    }

    fn reflect(&self, price: f64) -> f64 {
        let bounced = if price > self.ceiling {
            2.0 * self.ceiling - price
        } else if price < self.floor {
            2.0 * self.floor - price
        } else {
            price
        };
        bounced.clamp(self.floor, self.ceiling).max(f64::EPSILON)
    }

    /// `count` consecutive bars, one minute apart, starting at `start`.
    pub fn generate(&mut self, start: DateTime<Utc>, count: usize) -> Vec<PriceSample> {
        (0..count)
            .map(|i| self.next_sample(start + Duration::minutes(i as i64)))
            .collect()
    }
}

struct MarketState {
    generator: SampleGenerator,
    samples: Vec<PriceSample>,
}

/// Live-style feed that generates bars lazily up to whatever time it is asked about.
pub struct SimulatedMarket {
    state: Mutex<MarketState>,
    half_spread: f64,
    history_limit: usize,
}

impl SimulatedMarket {
    /// Seeds `warmup` bars of history ending at the minute before `start`.
    pub fn new(config: &BacktestConfig, start: DateTime<Utc>, warmup: usize, spread: f64) -> Self {
        let mut generator = SampleGenerator::new(config);
        let first = floor_minute(start) - Duration::minutes(warmup as i64);
        let samples = generator.generate(first, warmup);

        Self {
            state: Mutex::new(MarketState { generator, samples }),
            half_spread: spread.abs() / 2.0,
            history_limit: 1440,
        }
    }

    fn advance_to(&self, as_of: DateTime<Utc>) -> TradingResult<Vec<PriceSample>> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| TradingError::Internal("simulated market lock poisoned".to_string()))?;

        let target = floor_minute(as_of);
        let mut next = match state.samples.last() {
            Some(last) => last.timestamp + Duration::minutes(1),
            None => target,
        };
        while next <= target {
            let sample = state.generator.next_sample(next);
            state.samples.push(sample);
            next += Duration::minutes(1);
        }

        let excess = state.samples.len().saturating_sub(self.history_limit);
        if excess > 0 {
            state.samples.drain(..excess);
        }

        Ok(state.samples.clone())
    }
}

fn floor_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t.duration_trunc(Duration::minutes(1)).unwrap_or(t)
}

#[async_trait]
impl MarketFeed for SimulatedMarket {
    async fn window(&self, as_of: DateTime<Utc>, count: usize) -> TradingResult<Vec<PriceSample>> {
        let samples = self.advance_to(as_of)?;
        let start = samples.len().saturating_sub(count);
        Ok(samples[start..].to_vec())
    }

    async fn quote(&self, as_of: DateTime<Utc>) -> TradingResult<Quote> {
        let samples = self.advance_to(as_of)?;
        let last = samples.last().ok_or(TradingError::InsufficientData(1, 0))?;
        Ok(Quote {
            timestamp: as_of,
            bid: last.close - self.half_spread,
            ask: last.close + self.half_spread,
        })
    }
}
