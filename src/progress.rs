//! Progress bar utilities for long-running operations
//!
//! Visual feedback for backtests and session start-up using the indicatif
//! crate. Bars can be hidden so library callers and tests stay quiet.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar for backtesting operations
pub struct BacktestProgress {
    pub progress: ProgressBar,
}

impl BacktestProgress {
    /// Create a new backtest progress bar
    pub fn new(total_ticks: usize) -> Self {
        let progress = ProgressBar::new(total_ticks as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ticks\n{msg}")
        {
            progress.set_style(style.progress_chars("#>-"));
        }

        Self { progress }
    }

    /// A bar that draws nothing
    pub fn hidden(total_ticks: usize) -> Self {
        let progress = ProgressBar::hidden();
        progress.set_length(total_ticks as u64);
        Self { progress }
    }

    /// Advance one tick and show the running totals
    pub fn tick(&self, trades: u64, balance: f64) {
        self.progress.inc(1);
        self.progress.set_message(format!("📊 {} trades | balance {:.2}", trades, balance));
    }

    pub fn finish(&self, total_trades: u64, return_pct: f64) {
        self.progress.finish_with_message(format!(
            "✅ Backtest complete! {} trades, {:.2}% return",
            total_trades, return_pct
        ));
    }

    pub fn finish_halted(&self, reason: &str) {
        self.progress.abandon_with_message(format!("🛑 Backtest halted: {}", reason));
    }
}

/// Spinner for quick operations
pub struct Spinner {
    pub spinner: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(message.to_string());

        Self { spinner }
    }

    pub fn update(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    /// Finish spinner with success
    pub fn finish(&self, message: &str) {
        self.spinner.finish_with_message(format!("✅ {}", message));
    }

    /// Finish spinner with error
    pub fn finish_with_error(&self, message: &str) {
        self.spinner.finish_with_message(format!("❌ {}", message));
    }
}
