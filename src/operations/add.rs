use super::validation::{TransactionForm, validate_transaction};
use crate::db::transaction_repository;
use crate::error::Result;
use crate::models::transaction::Transaction;
use chrono::Local;
use rusqlite::Connection;

pub fn add_transaction_to_db(conn: &Connection, form: &TransactionForm) -> Result<Transaction> {
    let now = Local::now().naive_local();
    let new_transaction = validate_transaction(conn, form, now)?;
    let id = transaction_repository::add_transaction(conn, &new_transaction)?;
    transaction_repository::get_transaction(conn, id)
}
