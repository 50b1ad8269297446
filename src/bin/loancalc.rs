//! loancalc - personal loan calculator

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::process;

use loan_calculator_rs::render::{comparison_table, history_table, schedule_table, summary_table};
use loan_calculator_rs::{
    CalculatorConfig, CalculatorError, FileStorage, HistoryStore, LoanCalculator, LoanParameters,
    SafeTimeProvider, TermUnit, TimeSource, Uuid,
};

#[derive(Parser)]
#[command(name = "loancalc", version, about = "Personal loan calculator with amortization schedules")]
struct Cli {
    /// Data directory for saved calculations (overrides the config file)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute payment, interest and payoff date for a loan
    Calculate {
        /// Amount borrowed
        #[arg(long)]
        amount: f64,
        /// Annual interest rate in percent
        #[arg(long)]
        rate: f64,
        /// Loan term
        #[arg(long)]
        term: u32,
        /// Unit of the term: months or years
        #[arg(long, default_value = "months")]
        unit: TermUnit,
        /// One-time extra principal payment
        #[arg(long, requires = "prepay_date")]
        prepay_amount: Option<f64>,
        /// Date of the extra payment (YYYY-MM-DD)
        #[arg(long, requires = "prepay_amount")]
        prepay_date: Option<NaiveDate>,
        /// Print the full amortization schedule
        #[arg(long)]
        schedule: bool,
        /// Compare interest with and without the prepayment
        #[arg(long)]
        compare: bool,
        /// Do not save the calculation to history
        #[arg(long)]
        no_save: bool,
    },

    /// Manage saved calculations
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved calculations, newest first
    List,
    /// Delete a saved calculation
    Delete {
        id: Uuid,
    },
    /// Export saved calculations as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete every saved calculation
    Clear,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loan_calculator_rs=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        if let Some(CalculatorError::InvalidParameters { errors }) = e.downcast_ref::<CalculatorError>() {
            for field in errors {
                eprintln!("  - {}", field.to_string().yellow());
            }
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => CalculatorConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CalculatorConfig::default(),
    };
    if let Some(data) = cli.data {
        config.history.data_dir = data;
    }

    let storage = FileStorage::new(&config.history.data_dir)
        .with_context(|| format!("opening data directory {}", config.history.data_dir.display()))?;
    let store = HistoryStore::from_config(storage, &config.history)
        .with_date_format(&config.display.date_format);
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut calculator = LoanCalculator::new(store, time, config);

    match cli.command {
        Commands::Calculate {
            amount,
            rate,
            term,
            unit,
            prepay_amount,
            prepay_date,
            schedule,
            compare,
            no_save,
        } => {
            let mut parameters = LoanParameters::new(amount, rate, term, unit);
            if let (Some(amount), Some(date)) = (prepay_amount, prepay_date) {
                parameters = parameters.with_prepayment(amount, date);
            }

            let comparison = if compare {
                calculator.compare(&parameters)?
            } else {
                None
            };

            let record = if no_save {
                calculator.preview(parameters)?
            } else {
                calculator.calculate(parameters)?
            };

            let display = &calculator.config().display;
            println!("{}", summary_table(&record.result, display));
            if let Some(comparison) = comparison {
                println!("\n{}", comparison_table(&comparison, display));
            }
            if schedule {
                println!("\n{}", schedule_table(&record.result.schedule, display));
            }
            if !no_save {
                println!("\n{} {}", "saved as".dimmed(), record.id);
            }
        }
        Commands::History { action } => match action {
            HistoryAction::List => {
                let records = calculator.history()?;
                println!("{}", history_table(&records, &calculator.config().display));
            }
            HistoryAction::Delete { id } => {
                calculator.delete(id)?;
                println!("{} {}", "deleted".green(), id);
            }
            HistoryAction::Export { out } => {
                let csv = calculator.export_csv()?;
                match out {
                    Some(path) => {
                        fs::write(&path, csv)
                            .with_context(|| format!("writing {}", path.display()))?;
                        println!("{} {}", "exported to".green(), path.display());
                    }
                    None => println!("{csv}"),
                }
            }
            HistoryAction::Clear => {
                calculator.clear_history()?;
                println!("{}", "history cleared".green());
            }
        },
    }

    Ok(())
}
