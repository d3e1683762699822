mod commands;
mod currency;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::installments::{CompareArgs, InvoiceDateArgs, NetEarningsArgs};

/// Pay upfront with a discount, or invest the money and pay in installments?
#[derive(Parser)]
#[command(
    name = "poi",
    version,
    about = "Compare a discounted upfront payment against investing and paying in installments",
    long_about = "Computes whether paying in full with a discount beats keeping the money \
                  invested at a reference rate and paying in installments. Earnings are \
                  compounded daily over business days and taxed with regressive income tax \
                  brackets and short-term withholding."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log accrual periods to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare paying in full against paying in installments
    Compare(CompareArgs),
    /// Resolve the next invoice date for a day of month
    InvoiceDate(InvoiceDateArgs),
    /// Apply income tax and short-term withholding to gross earnings
    NetEarnings(NetEarningsArgs),
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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compare(args) => commands::installments::run_compare(args),
        Commands::InvoiceDate(args) => commands::installments::run_invoice_date(args),
        Commands::NetEarnings(args) => commands::installments::run_net_earnings(args),
        Commands::Version => {
            println!("poi {}", env!("CARGO_PKG_VERSION"));
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
