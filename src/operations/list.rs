use crate::db::transaction_repository;
use crate::error::Result;
use crate::models::date_range::DateRange;
use crate::models::transaction::Transaction;
use rusqlite::Connection;

pub fn list_transactions_db(conn: &Connection, range: &DateRange) -> Result<Vec<Transaction>> {
    transaction_repository::list_transactions(conn, range)
}

pub fn format_transactions_table(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let mut lines = vec![format!(
        "{:>5}  {:16}  {:7}  {:>12}  {:15}  {}",
        "ID", "Date", "Type", "Amount", "Category", "Description"
    )];
    for t in transactions {
        lines.push(format!(
            "{:>5}  {:16}  {:7}  {:>12}  {:15}  {}",
            t.id,
            t.date.format("%Y-%m-%d %H:%M").to_string(),
            t.transaction_type.to_string(),
            t.amount.to_string(),
            t.category.name,
            t.description
        ));
    }
    lines.join("\n")
}

pub fn format_transaction_details(t: &Transaction) -> String {
    [
        format!("ID:          {}", t.id),
        format!("Date:        {}", t.date.format("%Y-%m-%d %H:%M:%S")),
        format!("Type:        {}", t.transaction_type),
        format!("Amount:      {}", t.amount),
        format!("Category:    {}", t.category.name),
        format!("Description: {}", t.description),
    ]
    .join("\n")
}
