// Performance analytics over a trade journal

use serde::Serialize;

use crate::core::types::TradeRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate_pct: f64,
    pub net_profit: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub total_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub max_losing_streak: usize,
    pub martingale_trades: usize, // Trades placed above the base stake
    pub final_balance: f64,
}

impl PerformanceSummary {
    pub fn from_records(records: &[TradeRecord], initial_balance: f64) -> Self {
        if records.is_empty() {
            return Self {
                final_balance: initial_balance,
                ..Self::default()
            };
        }

        let (winning_trades, losing_trades, gross_profit, gross_loss) = trading_stats(records);
        let net_profit = gross_profit - gross_loss;
        let total_trades = records.len();

        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let equity_curve = equity_curve(records, initial_balance);

        Self {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate_pct: winning_trades as f64 / total_trades as f64 * 100.0,
            net_profit,
            gross_profit,
            gross_loss,
            profit_factor,
            avg_win: if winning_trades > 0 { gross_profit / winning_trades as f64 } else { 0.0 },
            avg_loss: if losing_trades > 0 { gross_loss / losing_trades as f64 } else { 0.0 },
            total_return_pct: if initial_balance > 0.0 { net_profit / initial_balance * 100.0 } else { 0.0 },
            max_drawdown_pct: max_drawdown(&equity_curve) * 100.0,
            max_losing_streak: max_losing_streak(records),
            martingale_trades: records.iter().filter(|r| r.signal_type != "Gann").count(),
            final_balance: initial_balance + net_profit,
        }
    }
}

fn trading_stats(records: &[TradeRecord]) -> (usize, usize, f64, f64) {
    let mut wins = 0;
    let mut losses = 0;
    let mut gross_profit = 0.0;
    let mut gross_loss = 0.0;

    for record in records {
        if record.result.is_win() {
            wins += 1;
            gross_profit += record.profit;
        } else {
            losses += 1;
            gross_loss += record.profit.abs();
        }
    }

    (wins, losses, gross_profit, gross_loss)
}

fn equity_curve(records: &[TradeRecord], initial_balance: f64) -> Vec<f64> {
    let mut curve = Vec::with_capacity(records.len() + 1);
    let mut balance = initial_balance;
    curve.push(balance);
    for record in records {
        balance += record.profit;
        curve.push(balance);
    }
    curve
}

fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut max_drawdown: f64 = 0.0;
    let mut peak = match equity_curve.first() {
        Some(&first) => first,
        None => return 0.0,
    };

    for &value in equity_curve.iter().skip(1) {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            max_drawdown = max_drawdown.max((peak - value) / peak);
        }
    }

    max_drawdown
}

fn max_losing_streak(records: &[TradeRecord]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for record in records {
        if record.result.is_win() {
            current = 0;
        } else {
            current += 1;
            longest = longest.max(current);
        }
    }
    longest
}
