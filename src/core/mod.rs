// Core trading logic modules

pub mod types;
pub mod gann;
pub mod evaluator;
pub mod stake;
pub mod retry;
pub mod session;
pub mod schedule;
pub mod live;

// Re-export commonly used types
pub use types::{Direction, OrderRequest, PriceSample, Quote, ReferenceLevel, Settlement, Signal, TradeRecord, TradeResult};
pub use evaluator::{Assessment, SignalEvaluator};
pub use stake::{HaltReason, StakeController, StakeState};
pub use retry::RetryPolicy;
pub use session::{SessionStats, SkipReason, TickOutcome, TradingSession};
pub use schedule::{TickSchedule, TickTiming};
pub use live::{LiveRunner, StopReason};
