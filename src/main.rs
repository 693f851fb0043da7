mod cli;
mod db;
mod error;
mod models;
mod operations;

use clap::Parser;
use cli::{CategoryCommand, Cli, Command};
use error::TrackerError;
use models::date_range::DateRange;
use operations::{add, categories, dashboard, edit, import, list, remove};
use rusqlite::Connection;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let conn = db::connection::establish_connection(&cli.database)?;
    db::category_repository::seed_default_categories(&conn)?;
    execute(&conn, cli.command)?;
    Ok(())
}

fn execute(conn: &Connection, command: Command) -> Result<(), TrackerError> {
    match command {
        Command::Dashboard { range, format } => {
            dashboard::run_dashboard(conn, &DateRange::from(range), format)?;
        }
        Command::List { range } => {
            let transactions = list::list_transactions_db(conn, &DateRange::from(range))?;
            println!("{}", list::format_transactions_table(&transactions));
        }
        Command::Show { id } => {
            let transaction = db::transaction_repository::get_transaction(conn, id)?;
            println!("{}", list::format_transaction_details(&transaction));
        }
        Command::Add(args) => {
            let stored = add::add_transaction_to_db(conn, &args.into())?;
            println!("Transaction {} added.", stored.id);
        }
        Command::Edit { id, fields } => {
            let stored = edit::edit_transaction_in_db(conn, id, &fields.into())?;
            println!("{}", list::format_transaction_details(&stored));
        }
        Command::Delete { id, yes } => {
            let stdin = io::stdin();
            let removed = remove::remove_transaction_from_db(
                conn,
                id,
                yes,
                &mut stdin.lock(),
                &mut io::stdout(),
            )?;
            if removed {
                println!("Transaction {} deleted.", id);
            } else {
                println!("Nothing deleted.");
            }
        }
        Command::Import { path } => {
            let count = import::import_transactions_to_db(conn, &path)?;
            println!("Successfully imported {} transactions.", count);
        }
        Command::Categories(command) => match command {
            CategoryCommand::List => {
                let all = categories::list_categories_db(conn)?;
                println!("{}", categories::format_categories(&all));
            }
            CategoryCommand::Add { name } => {
                let category = categories::add_category_db(conn, &name)?;
                println!("Category {} '{}' added.", category.id, category.name);
            }
            CategoryCommand::Remove { id } => {
                let category = categories::remove_category_db(conn, id)?;
                println!("Category {} '{}' removed.", category.id, category.name);
            }
        },
    }
    Ok(())
}

fn report_error(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<TrackerError>() {
        Some(tracker_error) if tracker_error.is_user_error() => {
            tracing::warn!(error = %tracker_error, "request rejected");
            eprintln!("Error: {}", tracker_error);
            ExitCode::from(2)
        }
        _ => {
            let trace_id = uuid::Uuid::new_v4();
            tracing::error!(%trace_id, error = ?err, "unexpected failure");
            eprintln!("An unexpected error occurred: {:#}", err);
            eprintln!("Trace ID: {}", trace_id);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
