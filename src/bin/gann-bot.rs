// Gann Trading Bot - CLI
// Single entry point for levels, backtests and paper trading

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use gann_trading_bot::{reference_levels, BasePriceSource, Config, TradingError, TradingResult};

// Load command modules from cli directory
#[path = "../cli/backtest_commands.rs"]
mod backtest_commands;
#[path = "../cli/trade_commands.rs"]
mod trade_commands;

#[derive(Parser)]
#[command(name = "gann-bot")]
#[command(version = "0.1.0")]
#[command(about = "Gann Square of Nine Binary Options Bot", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and workspace
    Init,

    /// Print the Square of Nine reference levels
    Levels {
        /// Base price (defaults to the configured fixed base)
        #[arg(short, long)]
        base: Option<f64>,

        /// Degrees between levels
        #[arg(short, long)]
        step: Option<f64>,
    },

    /// Run backtests on synthetic data
    #[command(subcommand)]
    Backtest(BacktestCommands),

    /// Paper trading
    #[command(subcommand)]
    Trade(TradeCommands),
}

#[derive(Subcommand)]
enum BacktestCommands {
    /// Run quick demo backtest
    Demo,

    /// Run backtest with custom parameters
    Run {
        /// Number of one-minute bars
        #[arg(short, long)]
        samples: Option<usize>,

        /// Random seed for the bar generator
        #[arg(long)]
        seed: Option<u64>,

        /// Write a JSON report to this path
        #[arg(short, long)]
        output: Option<String>,

        /// Also write the CSV trade journal
        #[arg(short, long)]
        journal: bool,
    },
}

#[derive(Subcommand)]
enum TradeCommands {
    /// Start a paper trading session
    Start {
        /// Starting balance
        #[arg(short, long)]
        balance: Option<f64>,

        /// Trading duration in hours
        #[arg(long)]
        hours: Option<f64>,

        /// Trading duration in minutes
        #[arg(short, long)]
        minutes: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging first (before config load so we can see config errors)
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        Config::from_file(&cli.config)
            .map(|c| c.logging.level)
            .unwrap_or_else(|_| "info".to_string())
    };
    std::env::set_var("RUST_LOG", log_level);
    tracing_subscriber::fmt::init();

    info!("🚀 Gann Trading Bot v0.1.0");
    info!("📁 Config: {}", cli.config);

    match cli.command {
        // Init doesn't require config (it creates it)
        Commands::Init => {
            init_workspace(&cli.config)?;
        }

        // Levels work with or without a config file
        Commands::Levels { base, step } => {
            let config = Config::from_file(&cli.config).unwrap_or_default();
            print_levels(base, step, &config)?;
        }

        Commands::Backtest(cmd) => {
            let config = load_config_or_exit(&cli.config);
            let result = match cmd {
                BacktestCommands::Demo => backtest_commands::run_demo_backtest(config).await,
                BacktestCommands::Run { samples, seed, output, journal } => {
                    backtest_commands::run_backtest(samples, seed, output, journal, config).await
                }
            };
            exit_on_error(result);
        }

        Commands::Trade(TradeCommands::Start { balance, hours, minutes }) => {
            let config = load_config_or_exit(&cli.config);
            exit_on_error(trade_commands::start_trading(balance, hours, minutes, config).await);
        }
    }

    Ok(())
}

/// Load config or exit with helpful error message
fn load_config_or_exit(path: &str) -> Config {
    match Config::from_file(path) {
        Ok(config) => config,
        Err(e) => report_and_exit(e.into()),
    }
}

fn exit_on_error(result: TradingResult<()>) {
    if let Err(e) = result {
        report_and_exit(e);
    }
}

fn report_and_exit(err: TradingError) -> ! {
    error!("❌ {} error", err.category());
    for line in err.user_message().lines() {
        error!("{}", line);
    }
    std::process::exit(1);
}

fn init_workspace(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("🔧 Initializing workspace...");

    if std::path::Path::new(config_path).exists() {
        warn!("⚠️  {} already exists, skipping", config_path);
    }
    let config = Config::load_or_create(config_path)?;

    std::fs::create_dir_all(&config.logging.trade_log_dir)?;

    info!("✅ Workspace initialized successfully!");
    info!("💡 Next steps:");
    info!("   1. Edit {} (base price, stake, stop loss)", config_path);
    info!("   2. Run: gann-bot backtest demo");
    info!("   3. Run: gann-bot trade start --minutes 30");

    Ok(())
}

fn print_levels(base: Option<f64>, step: Option<f64>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let base = match (base, config.trading.base_price) {
        (Some(base), _) => base,
        (None, BasePriceSource::Fixed { price }) => price,
        (None, BasePriceSource::SessionOpen) => {
            return Err("base price is taken from the session open; pass --base".into());
        }
    };
    let step = step.unwrap_or(config.signal.angle_step);

    let levels = reference_levels(base, step);
    if levels.is_empty() {
        return Err(format!("no levels for base {} and step {}", base, step).into());
    }

    info!("📐 Square of Nine levels from {} ({}° steps)", base, step);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for level in &levels {
        info!("   {:>5.0}°  {:.5}", level.angle, level.price);
    }
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    Ok(())
}
