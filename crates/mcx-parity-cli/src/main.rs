mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::parity::ParityArgs;
use commands::quantity::QuantityArgs;
use commands::session::SessionArgs;

/// CME to MCX quantity tables and parity
#[derive(Parser)]
#[command(
    name = "mcxp",
    version,
    about = "CME to MCX quantity tables and parity",
    long_about = "Converts a CME reference price into the MCX quantity table for gold and \
                  silver options/futures, and computes the parity between a CME benchmark \
                  (converted with the IU price) and MCX futures or put-call-parity options."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the quantity table from a CME price and compare with observed values
    Quantity(QuantityArgs),
    /// Compute CME/MCX parity for futures or options
    Parity(ParityArgs),
    /// List instrument profiles and their multipliers
    Profiles,
    /// Replay a recorded sequence of calculator events
    Session(SessionArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Quantity(args) => commands::quantity::run_quantity(args),
        Commands::Parity(args) => commands::parity::run_parity(args),
        Commands::Profiles => commands::quantity::run_profiles(),
        Commands::Session(args) => commands::session::run_session(args),
        Commands::Version => {
            println!("mcxp {}", env!("CARGO_PKG_VERSION"));
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
