use super::validation::{TransactionForm, validate_transaction};
use crate::db::transaction_repository;
use crate::error::{Result, TrackerError};
use chrono::Local;
use rusqlite::Connection;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const COLUMNS: usize = 5;

/// Imports a headerless CSV of `date,description,amount,type,category` rows.
///
/// Every row is validated before anything is written; one bad row aborts the import.
pub fn import_transactions_to_db(conn: &Connection, path: &Path) -> Result<usize> {
    let file = File::open(path)?;
    let forms = read_csv(file)?;

    let now = Local::now().naive_local();
    let tx = conn.unchecked_transaction()?;
    for (index, form) in forms.iter().enumerate() {
        let new_transaction =
            validate_transaction(&tx, form, now).map_err(|e| at_line(index + 1, e))?;
        transaction_repository::add_transaction(&tx, &new_transaction)?;
    }
    tx.commit()?;

    tracing::info!(count = forms.len(), path = %path.display(), "transactions imported");
    Ok(forms.len())
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<TransactionForm>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut forms = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let line = index + 1;
        let record = result.map_err(|e| TrackerError::Import {
            line,
            message: format!("CSV parse error: {}", e),
        })?;

        if record.len() != COLUMNS {
            return Err(TrackerError::Import {
                line,
                message: format!(
                    "Invalid number of columns: expected {}, got {}",
                    COLUMNS,
                    record.len()
                ),
            });
        }

        let field = |i: usize| record.get(i).map(str::to_string);
        forms.push(TransactionForm {
            date: field(0),
            description: field(1),
            amount: field(2),
            transaction_type: field(3),
            category: field(4),
        });
    }
    Ok(forms)
}

fn at_line(line: usize, err: TrackerError) -> TrackerError {
    match err {
        TrackerError::Validation(errors) => TrackerError::Import {
            line,
            message: errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        },
        other => other,
    }
}
