// Backtesting: replay bars through the live session code and report on it

pub mod analytics;
pub mod engine;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::core::session::SessionStats;
use crate::core::stake::HaltReason;
use crate::core::types::{Signal, TradeRecord};

pub use analytics::PerformanceSummary;
pub use engine::BacktestEngine;

#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub session_id: Uuid,
    pub pair: String,
    pub samples: usize,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub halted: Option<HaltReason>,
    pub stats: SessionStats,
    pub summary: PerformanceSummary,
    pub signals: Vec<Signal>,
    pub records: Vec<TradeRecord>,
}

impl BacktestReport {
    pub fn total_profit(&self) -> f64 {
        self.final_balance - self.initial_balance
    }

    pub fn log_summary(&self) {
        info!("📊 Backtest results for {} ({} samples)", self.pair, self.samples);
        info!("   💰 Balance: {:.2} -> {:.2} ({:+.2})", self.initial_balance, self.final_balance, self.total_profit());
        info!(
            "   🔄 Trades: {} ({} wins / {} losses, {:.1}% win rate)",
            self.summary.total_trades, self.summary.winning_trades, self.summary.losing_trades, self.summary.win_rate_pct
        );
        info!("   📉 Max drawdown: {:.2}%", self.summary.max_drawdown_pct);
        info!("   ⚡ Signals: {} | no signal: {} | data skips: {}", self.stats.signals, self.stats.no_signal, self.stats.data_skips);
        if let Some(reason) = self.halted {
            info!("   🛑 Halted: {}", reason);
        }
    }
}
