// External collaborators: where prices come from and where trades go

pub mod paper;
pub mod replay;
pub mod simulated;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::types::{OrderRequest, PriceSample, Quote, Settlement};
use crate::error::TradingResult;

/// Read-only source of one-minute bars and quotes. The core never manages
/// the connection behind it.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Up to `count` most recent bars closed at or before `as_of`, oldest first.
    async fn window(&self, as_of: DateTime<Utc>, count: usize) -> TradingResult<Vec<PriceSample>>;

    /// Bid/ask at `as_of`.
    async fn quote(&self, as_of: DateTime<Utc>) -> TradingResult<Quote>;
}

/// Places a fixed-expiry option and resolves once it has expired.
#[async_trait]
pub trait TradeExecutor: Send + Sync {
    async fn execute(&self, order: &OrderRequest) -> TradingResult<Settlement>;
}

pub use paper::PaperExecutor;
pub use replay::ReplayFeed;
pub use simulated::{SampleGenerator, SimulatedMarket};
