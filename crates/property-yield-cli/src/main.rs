mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::property::{AnalyzeArgs, BreakevenInterestArgs, BreakevenRentArgs, PropertyArgs};
use commands::scenarios::{CompareArgs, SensitivityArgs};

/// Year-one cashflow, DSCR and break-even calculations for rental property
#[derive(Parser)]
#[command(
    name = "pyield",
    version,
    about = "Year-one cashflow, DSCR and break-even calculations for rental property",
    long_about = "A CLI for evaluating buy-to-let properties with decimal precision. \
                  Computes monthly cashflow, DSCR and cash-on-cash return, rates the \
                  result with a traffic light, and solves for the break-even rent and \
                  the maximum tolerable interest rate."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log solver and sanitisation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate year-one cashflow, DSCR and cash-on-cash
    Evaluate(PropertyArgs),
    /// Minimum cold rent for a target
    BreakevenRent(BreakevenRentArgs),
    /// Maximum interest rate for a target
    BreakevenInterest(BreakevenInterestArgs),
    /// Full analysis: valuation, traffic light, break-evens, waterfall
    Analyze(AnalyzeArgs),
    /// Compare two properties side by side
    Compare(CompareArgs),
    /// Interest / rent sensitivity grid
    Sensitivity(SensitivityArgs),
    /// List the built-in presets
    Presets,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::property::run_evaluate(args),
        Commands::BreakevenRent(args) => commands::property::run_breakeven_rent(args),
        Commands::BreakevenInterest(args) => commands::property::run_breakeven_interest(args),
        Commands::Analyze(args) => commands::property::run_analyze(args),
        Commands::Compare(args) => commands::scenarios::run_compare(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Presets => commands::scenarios::run_presets(),
        Commands::Version => {
            println!("pyield {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
