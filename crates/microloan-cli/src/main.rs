mod commands;
mod input;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::documents::{ContractArgs, ScheduleDocArgs};
use commands::loan::LoanArgs;

/// Daily-interest microloan quotes and documents
#[derive(Parser)]
#[command(
    name = "loan",
    version,
    about = "Daily-interest microloan quotes and documents",
    long_about = "Computes flat daily-interest microloan totals and repayment schedules \
                  with decimal precision, and exports loan contracts and payment \
                  schedules as PDF or plain text."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Document configuration (YAML or JSON): page, margins, lender, terms
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log more (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Total interest, total repayable and daily payment
    Totals(LoanArgs),
    /// Day-by-day repayment schedule with totals
    Schedule(LoanArgs),
    /// Export a loan contract for a borrower
    Contract(ContractArgs),
    /// Export the payment schedule document
    ScheduleDoc(ScheduleDocArgs),
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
    logging::init(cli.verbose);

    let config = cli.config.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Totals(args) => commands::loan::run_totals(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Contract(args) => commands::documents::run_contract(args, config),
        Commands::ScheduleDoc(args) => commands::documents::run_schedule_doc(args, config),
        Commands::Version => {
            println!("loan {}", env!("CARGO_PKG_VERSION"));
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
