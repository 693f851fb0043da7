use crate::models::date_range::DateRange;
use crate::operations::dashboard::DashboardFormat;
use crate::operations::validation::{TransactionForm, parse_date};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "extrack", version, about = "Track personal income and expenses")]
pub struct Cli {
    /// SQLite database file, created on first use.
    #[arg(long, global = true, env = "EXTRACK_DATABASE", default_value = "expense_tracker.db")]
    pub database: PathBuf,

    /// Increase log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Totals, balance and expenses per category.
    Dashboard {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(long, value_enum, default_value_t = DashboardFormat::Text)]
        format: DashboardFormat,
    },
    /// List transactions, most recent first.
    List {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Show a single transaction.
    Show { id: i64 },
    /// Record a new transaction.
    Add(TransactionArgs),
    /// Change fields of an existing transaction.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: TransactionArgs,
    },
    /// Delete a transaction after confirmation.
    Delete {
        id: i64,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Bulk-create transactions from a headerless CSV file
    /// (date,description,amount,type,category).
    Import { path: PathBuf },
    /// Manage categories.
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    List,
    Add { name: String },
    Remove { id: i64 },
}

#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// First day to include (YYYY-MM-DD).
    #[arg(long = "from", value_parser = parse_date)]
    pub from_date: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD).
    #[arg(long = "to", value_parser = parse_date)]
    pub to_date: Option<NaiveDate>,
}

impl From<RangeArgs> for DateRange {
    fn from(args: RangeArgs) -> Self {
        DateRange::new(args.from_date, args.to_date)
    }
}

#[derive(Debug, Clone, Args)]
pub struct TransactionArgs {
    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// YYYY-MM-DD or YYYY-MM-DD HH:MM; defaults to now.
    #[arg(long)]
    pub date: Option<String>,

    /// income or expense; defaults to expense.
    #[arg(short = 't', long = "type")]
    pub transaction_type: Option<String>,

    /// Category id or name.
    #[arg(short, long)]
    pub category: Option<String>,
}

impl From<TransactionArgs> for TransactionForm {
    fn from(args: TransactionArgs) -> Self {
        TransactionForm {
            description: args.description,
            amount: args.amount,
            date: args.date,
            transaction_type: args.transaction_type,
            category: args.category,
        }
    }
}
