// Martingale stake sizing with a loss-streak cap and a session stop loss

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::config::StakeConfig;
use crate::core::types::{Settlement, TradeResult};
use crate::error::{TradingError, TradingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    StreakExhausted, // A loss at the last Martingale level
    LossLimit,       // Cumulative loss reached the stop-loss share of the starting balance
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::StreakExhausted => write!(f, "martingale levels exhausted"),
            HaltReason::LossLimit => write!(f, "stop loss reached"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeState {
    Base,
    Martingale(u32),
    Halted(HaltReason),
}

impl StakeState {
    pub fn is_halted(&self) -> bool {
        matches!(self, StakeState::Halted(_))
    }
}

#[derive(Debug, Clone)]
pub struct StakeController {
    config: StakeConfig,
    state: StakeState,
    consecutive_losses: u32,
    starting_balance: f64,
    realized_pnl: f64,
}

impl StakeController {
    pub fn new(config: StakeConfig, starting_balance: f64) -> Self {
        Self {
            config,
            state: StakeState::Base,
            consecutive_losses: 0,
            starting_balance,
            realized_pnl: 0.0,
        }
    }

    pub fn state(&self) -> StakeState {
        self.state
    }

    pub fn consecutive_losses(&self) -> u32 {
        self.consecutive_losses
    }

    pub fn is_halted(&self) -> bool {
        self.state.is_halted()
    }

    pub fn halt_reason(&self) -> Option<HaltReason> {
        match self.state {
            StakeState::Halted(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn starting_balance(&self) -> f64 {
        self.starting_balance
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn balance(&self) -> f64 {
        self.starting_balance + self.realized_pnl
    }

    /// Stake for the next trade; `None` once halted.
    pub fn current_stake(&self) -> Option<f64> {
        match self.state {
            StakeState::Base => Some(self.config.base_stake),
            StakeState::Martingale(level) => {
                Some(self.config.base_stake * self.config.multiplier.powi(level as i32))
            }
            StakeState::Halted(_) => None,
        }
    }

    /// Journal label for trades placed in the current state
    pub fn signal_label(&self) -> String {
        match self.state {
            StakeState::Martingale(level) => format!("Gann_M{}", level),
            _ => "Gann".to_string(),
        }
    }

    /// Feed a settled trade back. Rejected once halted.
    pub fn record(&mut self, settlement: &Settlement) -> TradingResult<StakeState> {
        if let StakeState::Halted(reason) = self.state {
            return Err(TradingError::SessionHalted(reason.to_string()));
        }

        self.realized_pnl += settlement.profit;

        match settlement.result {
            TradeResult::Win => {
                if self.consecutive_losses > 0 {
                    info!("🔄 Resetting martingale after profitable trade");
                }
                self.consecutive_losses = 0;
                self.state = StakeState::Base;
            }
            TradeResult::Loss => {
                if self.consecutive_losses >= self.config.max_levels {
                    self.state = StakeState::Halted(HaltReason::StreakExhausted);
                } else {
                    self.consecutive_losses += 1;
                    self.state = StakeState::Martingale(self.consecutive_losses);
                    info!(
                        "📈 Martingale level {} - next stake {:.2}",
                        self.consecutive_losses,
                        self.current_stake().unwrap_or_default()
                    );
                }
            }
        }

        if !self.state.is_halted() && self.loss_limit_reached() {
            self.state = StakeState::Halted(HaltReason::LossLimit);
        }

        if let StakeState::Halted(reason) = self.state {
            warn!(
                "🛑 Trading halted: {} (balance {:.2}, P&L {:.2})",
                reason,
                self.balance(),
                self.realized_pnl
            );
        }

        Ok(self.state)
    }

    fn loss_limit_reached(&self) -> bool {
        -self.realized_pnl >= self.starting_balance * self.config.stop_loss_pct
    }

    /// Start a new session: clears the streak, the halt and the P&L.
    pub fn reset(&mut self, starting_balance: f64) {
        self.state = StakeState::Base;
        self.consecutive_losses = 0;
        self.starting_balance = starting_balance;
        self.realized_pnl = 0.0;
    }
}
