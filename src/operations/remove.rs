use super::list::format_transaction_details;
use crate::db::transaction_repository;
use crate::error::Result;
use rusqlite::Connection;
use std::io::{BufRead, Write};

/// Shows the transaction and deletes it once the user answers `y`.
///
/// Returns whether the transaction was deleted.
pub fn remove_transaction_from_db<R: BufRead, W: Write>(
    conn: &Connection,
    id: i64,
    skip_confirmation: bool,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    let transaction = transaction_repository::get_transaction(conn, id)?;

    if !skip_confirmation {
        writeln!(output, "{}", format_transaction_details(&transaction))?;
        write!(output, "Delete this transaction? [y/N] ")?;
        output.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            tracing::debug!(id, "deletion cancelled");
            return Ok(false);
        }
    }

    transaction_repository::remove_transaction(conn, id)?;
    Ok(true)
}
