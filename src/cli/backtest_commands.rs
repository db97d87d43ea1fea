// Backtest command implementations
use std::fs;
use tracing::info;
use gann_trading_bot::{BacktestEngine, BacktestReport, Config, CsvJournal, Spinner};

/// Number of bars in the quick demo run: one day of M1 bars
const DEMO_SAMPLES: usize = 1_440;

pub async fn run_demo_backtest(config: Config) -> gann_trading_bot::TradingResult<()> {
    info!("🚀 Demo backtest on {} ({} synthetic bars)", config.trading.pair, DEMO_SAMPLES);

    let engine = BacktestEngine::new(config);
    let samples = engine.synthetic_samples(DEMO_SAMPLES);
    let report = engine.run(samples).await?;

    report.log_summary();
    log_recent_trades(&report, 10);
    Ok(())
}

pub async fn run_backtest(
    samples: Option<usize>,
    seed: Option<u64>,
    output: Option<String>,
    journal: bool,
    mut config: Config,
) -> gann_trading_bot::TradingResult<()> {
    if let Some(samples) = samples {
        config.backtest.samples = samples;
    }
    if let Some(seed) = seed {
        config.backtest.seed = seed;
    }
    config.validate()?;

    let spinner = Spinner::new(&format!("Generating {} bars (seed {})...", config.backtest.samples, config.backtest.seed));
    let engine = BacktestEngine::new(config.clone()).with_progress(true);
    let bars = engine.synthetic_samples(config.backtest.samples);
    spinner.finish(&format!("Generated {} bars", bars.len()));

    let report = if journal {
        let sink = CsvJournal::in_dir(&config.logging.trade_log_dir, chrono::Utc::now())?;
        info!("📝 Journaling trades to {}", sink.path().display());
        engine.run_with_journal(bars, sink).await?
    } else {
        engine.run(bars).await?
    };

    report.log_summary();
    log_recent_trades(&report, 5);

    if let Some(path) = output {
        fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        info!("💾 Report saved to {}", path);
    }

    Ok(())
}

fn log_recent_trades(report: &BacktestReport, count: usize) {
    if report.records.is_empty() {
        info!("   No trades were placed");
        return;
    }

    info!("   Last {} trades:", count.min(report.records.len()));
    let start = report.records.len().saturating_sub(count);
    for record in &report.records[start..] {
        info!(
            "   {} {:>8} {:<4} {:>7.2} @ {:.5} -> {:?} {:+.2}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.signal_type,
            record.direction,
            record.stake,
            record.entry_price,
            record.result,
            record.profit
        );
    }
}
