// Trade command implementations
use chrono::Utc;
use tracing::{error, info, warn};
use gann_trading_bot::{
    read_journal, Config, CsvJournal, LiveRunner, PaperExecutor, PerformanceSummary, SimulatedMarket,
    StopReason, TickSchedule, TradingSession,
};

pub async fn start_trading(
    balance: Option<f64>,
    hours: Option<f64>,
    minutes: Option<f64>,
    mut config: Config,
) -> gann_trading_bot::TradingResult<()> {
    if let Some(balance) = balance {
        config.trading.starting_balance = balance;
    }
    config.validate()?;

    info!("🧪 PAPER TRADING on simulated {} market", config.trading.pair);
    info!("💰 Balance: {:.2} | base stake {:.2} | stop loss {:.1}%",
        config.trading.starting_balance,
        config.stake.base_stake,
        config.stake.stop_loss_pct * 100.0
    );

    let duration = if let Some(h) = hours {
        Some(chrono::Duration::seconds((h * 3600.0) as i64))
    } else {
        minutes.map(|m| chrono::Duration::seconds((m * 60.0) as i64))
    };

    let started_at = Utc::now();
    let warmup = config.signal.volume_lookback + 1;
    let spread = config.paper.spread_points * config.signal.point_size;
    let feed = SimulatedMarket::new(&config.backtest, started_at, warmup, spread);
    let executor = PaperExecutor::new(&config.paper);
    let journal = CsvJournal::in_dir(&config.logging.trade_log_dir, started_at)?;
    let journal_path = journal.path().to_path_buf();

    let mut session = TradingSession::new(&config, feed, executor, journal);

    let mut runner = LiveRunner::new(TickSchedule::from_config(&config.timing));
    match duration {
        Some(duration) => {
            let deadline = started_at + duration;
            info!("🎯 Trading until {} - Press Ctrl+C to stop early", deadline.format("%H:%M:%S UTC"));
            runner = runner.with_deadline(deadline);
        }
        None => info!("🎯 Trading - Press Ctrl+C to stop"),
    }

    match runner.run(&mut session).await {
        StopReason::Halted(reason) => warn!("🛑 Stopped: {} (run `trade start` again to open a new session)", reason),
        StopReason::Deadline => info!("⏰ Trading session completed after scheduled duration"),
        StopReason::Interrupted => info!("✅ Stopped by operator"),
    }

    let stats = session.stats().clone();
    info!("📊 Final Session Summary:");
    info!("   🔄 Ticks: {} | signals: {} | trades: {}", stats.ticks, stats.signals, stats.trades);
    info!("   ⏭️  Skipped: {} data, {} connectivity, {} timing", stats.data_skips, stats.connectivity_skips, stats.timing_skips);

    match read_journal(&journal_path) {
        Ok(records) => {
            let summary = PerformanceSummary::from_records(&records, config.trading.starting_balance);
            info!("   💰 Final balance: {:.2} ({:+.2}%)", summary.final_balance, summary.total_return_pct);
            info!("   ✅ Wins: {} | ❌ Losses: {} | win rate {:.1}%", summary.winning_trades, summary.losing_trades, summary.win_rate_pct);
        }
        Err(e) => error!("❌ Could not read back journal {}: {}", journal_path.display(), e),
    }
    info!("📝 Journal: {}", journal_path.display());

    Ok(())
}
