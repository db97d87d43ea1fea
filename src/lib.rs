// Gann Trading Bot Library
//
// Square of Nine crossing signals with volume and spread filters, sized by a
// capped Martingale stake controller, for fixed-expiry binary options

pub mod core;
pub mod clients;
pub mod config;
pub mod error;       // Unified error handling
pub mod journal;     // CSV trade journal
pub mod progress;
pub mod backtesting;

// Re-export core trading types
pub use core::{
    Assessment, Direction, HaltReason, LiveRunner, OrderRequest, PriceSample, Quote, ReferenceLevel,
    RetryPolicy, SessionStats, Settlement, Signal, SignalEvaluator, SkipReason, StakeController,
    StakeState, StopReason, TickOutcome, TickSchedule, TickTiming, TradeRecord, TradeResult,
    TradingSession,
};
pub use core::gann::{level_price, reference_levels};

// Re-export error types
pub use error::{TradingError, TradingResult};

// Re-export client types
pub use clients::{MarketFeed, PaperExecutor, ReplayFeed, SampleGenerator, SimulatedMarket, TradeExecutor};

// Re-export configuration
pub use config::{
    BacktestConfig, BasePriceSource, Config, ConfigError, LoggingConfig, PaperConfig, RetryConfig,
    SignalConfig, StakeConfig, TimingConfig, TradingConfig,
};

pub use journal::{read_journal, CsvJournal, MemoryJournal, TradeSink};
pub use progress::{BacktestProgress, Spinner};

// Re-export backtesting components
pub use backtesting::{BacktestEngine, BacktestReport, PerformanceSummary};
