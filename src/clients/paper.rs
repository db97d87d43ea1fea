// Paper executor: settles options from a seeded coin with a fixed payout

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::clients::TradeExecutor;
use crate::config::PaperConfig;
use crate::core::types::{OrderRequest, Settlement, TradeResult};
use crate::error::{TradingError, TradingResult};

pub struct PaperExecutor {
    rng: Mutex<StdRng>,
    win_probability: f64,
    payout_rate: f64,
    failure_rate: f64,
    wait_for_expiry: bool,
}

impl PaperExecutor {
    pub fn new(config: &PaperConfig) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(config.seed)),
            win_probability: config.win_probability.clamp(0.0, 1.0),
            payout_rate: config.payout_rate,
            failure_rate: config.failure_rate.clamp(0.0, 1.0),
            wait_for_expiry: config.wait_for_expiry,
        }
    }

    /// Settle immediately instead of sleeping through the expiry.
    pub fn instant(mut self) -> Self {
        self.wait_for_expiry = false;
        self
    }
}

#[async_trait]
impl TradeExecutor for PaperExecutor {
    async fn execute(&self, order: &OrderRequest) -> TradingResult<Settlement> {
        if order.stake <= 0.0 || !order.stake.is_finite() {
            return Err(TradingError::OrderRejected(format!("invalid stake {}", order.stake)));
        }

        let (failed, won) = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| TradingError::Internal("paper executor lock poisoned".to_string()))?;
            let failed = self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate);
            let won = rng.gen_bool(self.win_probability);
            (failed, won)
        };

        if failed {
            return Err(TradingError::ApiConnection("simulated connection drop".to_string()));
        }

        if self.wait_for_expiry {
            sleep(Duration::from_secs(u64::from(order.expiry_minutes) * 60)).await;
        }

        let settlement = if won {
            Settlement {
                result: TradeResult::Win,
                profit: order.stake * self.payout_rate,
            }
        } else {
            Settlement {
                result: TradeResult::Loss,
                profit: -order.stake,
            }
        };

        debug!("📄 Paper {} {:.2} -> {:?} {:+.2}", order.direction, order.stake, settlement.result, settlement.profit);
        Ok(settlement)
    }
}
