mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::calculate::CalculateArgs;
use commands::development::ProjectCostArgs;
use commands::market::{CapRateArgs, HospitalityArgs};
use commands::regulations::RegulationsArgs;

/// REIT and FIBRA property investment calculations
#[derive(Parser)]
#[command(
    name = "reitcalc",
    version,
    about = "REIT and FIBRA property investment calculations",
    long_about = "Evaluates whether a property fits a US REIT or Peru FIBRA portfolio: \
                  regulation-adjusted cap rates, NOI, valuation, financing, ROI, NPV and \
                  IRR, computed with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log each calculation step to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full REIT/FIBRA investment calculation
    Calculate(CalculateArgs),
    /// Analyse development returns on a cost basis
    ProjectCost(ProjectCostArgs),
    /// Look up the market cap rate for a property profile
    CapRate(CapRateArgs),
    /// Hotel REIT operating metrics
    Hospitality(HospitalityArgs),
    /// List jurisdiction regulations
    Regulations(RegulationsArgs),
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
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::calculate::run_calculate(args),
        Commands::ProjectCost(args) => commands::development::run_project_cost(args),
        Commands::CapRate(args) => commands::market::run_cap_rate(args),
        Commands::Hospitality(args) => commands::market::run_hospitality(args),
        Commands::Regulations(args) => commands::regulations::run_regulations(args),
        Commands::Version => {
            println!("reitcalc {}", env!("CARGO_PKG_VERSION"));
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
