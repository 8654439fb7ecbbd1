use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use nestegg::market_data::{QuoteProvider, QuoteService, YahooChartProvider};
use nestegg::report::render_states;
use nestegg::run_log::RunLog;
use nestegg::{DataDirectory, Session, SessionOptions, init_logging};

#[derive(Parser, Debug)]
#[command(name = "nestegg")]
#[command(about = "Withdrawal, tax and portfolio survival analysis for retirees")]
struct Args {
    /// Path to the data directory (default: ~/.nestegg/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one or more retiree profiles
    Analyze {
        /// Profile YAML files, analyzed in order
        #[arg(required = true)]
        profiles: Vec<PathBuf>,

        /// Continue past plausibility warnings without asking
        #[arg(short, long)]
        yes: bool,

        /// Skip the market data fetch and use the manual quote
        #[arg(long)]
        offline: bool,

        /// Master seed for the survival simulation
        #[arg(long)]
        seed: Option<u64>,

        /// Number of simulated trajectories
        #[arg(long)]
        trajectories: Option<usize>,

        /// Manual one-year market return, e.g. 0.12
        #[arg(long, allow_hyphen_values = true)]
        market_return: Option<f64>,

        /// Manual dividend yield, e.g. 0.015
        #[arg(long)]
        dividend_yield: Option<f64>,

        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the built-in state tax table
    States,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = DataDirectory::new(args.data_dir.unwrap_or_else(DataDirectory::default_path));
    data_dir.init()?;
    let mut settings = data_dir
        .load_settings()
        .wrap_err_with(|| format!("loading {}", data_dir.settings_path().display()))?;

    init_logging(data_dir.root(), &args.log_level)?;

    match args.command {
        Commands::States => {
            let config = settings.engine_config(0);
            print!("{}", render_states(&config.states));
        }
        Commands::Analyze {
            profiles,
            yes,
            offline,
            seed,
            trajectories,
            market_return,
            dividend_yield,
            json,
        } => {
            if let Some(trajectories) = trajectories {
                settings.trajectories = trajectories;
            }
            if let Some(one_year_return) = market_return {
                settings.manual_quote.one_year_return = one_year_return;
            }
            if let Some(dividend_yield) = dividend_yield {
                settings.manual_quote.dividend_yield = dividend_yield;
            }

            let seed = seed.or(settings.seed).unwrap_or_else(rand::random);
            let config = settings.engine_config(seed);
            config.validate()?;
            tracing::info!(seed, trajectories = settings.trajectories, "starting session");

            // A manual return on the command line means the operator has the figure already
            let provider: Option<Box<dyn QuoteProvider>> = if offline || market_return.is_some() {
                None
            } else {
                Some(Box::new(YahooChartProvider::new(settings.fetch_timeout())?))
            };
            let quotes = QuoteService::new(
                provider,
                &settings.ticker,
                settings.fetch_timeout(),
                settings.cache_ttl(),
                settings.manual_quote,
            );

            let options = SessionOptions {
                assume_yes: yes,
                json,
            };
            let mut session = Session::new(
                config,
                quotes,
                RunLog::new(data_dir.run_log_path()),
                options,
                io::stdin().lock(),
                io::stdout(),
            )?;
            let summary = session.run(&profiles);

            eprintln!(
                "{} completed, {} skipped, {} failed",
                summary.completed, summary.cancelled, summary.failed
            );
            if summary.failed > 0 {
                std::process::exit(1);
            }
        }
    }

    tracing::info!("nestegg shutting down");
    Ok(())
}
