use crate::error::{Result, TrackerError};
use crate::models::category::Category;
use crate::models::date_range::DateRange;
use crate::models::transaction::{DATE_TIME_FORMAT, NewTransaction, Transaction};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

const SELECT_HYDRATED: &str = "
    SELECT t.id, t.description, t.amount, t.date, t.transaction_type, c.id, c.name
    FROM transactions t
    JOIN categories c ON c.id = t.category_id";

pub fn add_transaction(conn: &Connection, transaction: &NewTransaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions (description, amount, date, transaction_type, category_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            &transaction.description,
            transaction.amount.to_string(),
            transaction.date.format(DATE_TIME_FORMAT).to_string(),
            transaction.transaction_type.as_str(),
            transaction.category_id,
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(
        id,
        amount = %transaction.amount,
        kind = transaction.transaction_type.as_str(),
        "transaction added"
    );
    Ok(id)
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction> {
    let transaction = conn
        .query_row(&format!("{SELECT_HYDRATED} WHERE t.id = ?1"), [id], map_row)
        .optional()?;
    transaction.ok_or_else(|| TrackerError::not_found("Transaction", id))
}

/// Transactions inside `range`, most recent first, each joined with its category.
pub fn list_transactions(conn: &Connection, range: &DateRange) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_HYDRATED}
         WHERE (?1 IS NULL OR date(t.date) >= ?1)
           AND (?2 IS NULL OR date(t.date) <= ?2)
         ORDER BY t.date DESC, t.id DESC"
    ))?;

    let iter = stmt.query_map(
        rusqlite::params![range.from_param(), range.to_param()],
        map_row,
    )?;

    let mut transactions = Vec::new();
    for transaction in iter {
        transactions.push(transaction?);
    }
    tracing::debug!(
        count = transactions.len(),
        from = ?range.from,
        to = ?range.to,
        "transactions listed"
    );
    Ok(transactions)
}

pub fn update_transaction(conn: &Connection, id: i64, transaction: &NewTransaction) -> Result<()> {
    let rows = conn.execute(
        "UPDATE transactions
         SET description = ?1, amount = ?2, date = ?3, transaction_type = ?4, category_id = ?5
         WHERE id = ?6",
        rusqlite::params![
            &transaction.description,
            transaction.amount.to_string(),
            transaction.date.format(DATE_TIME_FORMAT).to_string(),
            transaction.transaction_type.as_str(),
            transaction.category_id,
            id,
        ],
    )?;

    if rows == 0 {
        return Err(TrackerError::not_found("Transaction", id));
    }
    tracing::info!(id, "transaction updated");
    Ok(())
}

pub fn remove_transaction(conn: &Connection, id: i64) -> Result<()> {
    let rows = conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;

    if rows == 0 {
        return Err(TrackerError::not_found("Transaction", id));
    }
    tracing::info!(id, "transaction removed");
    Ok(())
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let amount_str: String = row.get(2)?;
    let date_str: String = row.get(3)?;
    let type_str: String = row.get(4)?;

    Ok(Transaction::new(
        row.get(0)?,
        row.get(1)?,
        Decimal::from_str(&amount_str).map_err(|e| conversion_error(2, e))?,
        NaiveDateTime::parse_from_str(&date_str, DATE_TIME_FORMAT)
            .map_err(|e| conversion_error(3, e))?,
        type_str.parse().map_err(|e: String| conversion_error(4, e))?,
        Category::new(row.get(5)?, row.get(6)?),
    ))
}

fn conversion_error(
    column: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, err.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::category_repository::{add_category, seed_default_categories};
    use crate::db::connection::establish_test_connection;
    use crate::models::transaction::TransactionType;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_transaction(
        description: &str,
        cents: i64,
        date: NaiveDateTime,
        transaction_type: TransactionType,
        category_id: i64,
    ) -> NewTransaction {
        NewTransaction {
            description: description.to_string(),
            amount: Decimal::new(cents, 2),
            date,
            transaction_type,
            category_id,
        }
    }

    /// Inserts a 1.00 Food expense.
    fn add_expense(conn: &Connection, description: &str, date: NaiveDateTime) -> i64 {
        add_transaction(
            conn,
            &new_transaction(description, 100, date, TransactionType::Expense, 1),
        )
        .unwrap()
    }

    fn seeded() -> Connection {
        let conn = establish_test_connection().unwrap();
        seed_default_categories(&conn).unwrap();
        conn
    }

    #[test]
    fn test_add_and_get_transaction_hydrates_category() {
        let conn = seeded();
        let id = add_transaction(
            &conn,
            &new_transaction("Groceries", 4250, at(2024, 1, 5, 10), TransactionType::Expense, 1),
        )
        .unwrap();

        let stored = get_transaction(&conn, id).unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.description, "Groceries");
        assert_eq!(stored.amount, Decimal::new(4250, 2));
        assert_eq!(stored.date, at(2024, 1, 5, 10));
        assert_eq!(stored.transaction_type, TransactionType::Expense);
        assert_eq!(stored.category, Category::new(1, "Food".to_string()));
    }

    #[test]
    fn test_add_transaction_unknown_category_fails() {
        let conn = seeded();
        let result = add_transaction(
            &conn,
            &new_transaction("Ghost", 100, at(2024, 1, 5, 10), TransactionType::Expense, 99),
        );
        assert!(matches!(result, Err(TrackerError::Database(_))));
    }

    #[test]
    fn test_get_transaction_not_found() {
        let conn = seeded();
        let result = get_transaction(&conn, 404);
        assert!(matches!(
            result,
            Err(TrackerError::NotFound { entity: "Transaction", id: 404 })
        ));
    }

    #[test]
    fn test_list_transactions_empty() {
        let conn = seeded();
        let result = list_transactions(&conn, &DateRange::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_list_transactions_most_recent_first() {
        let conn = seeded();
        add_transaction(
            &conn,
            &new_transaction("a", 100, at(2024, 1, 1, 9), TransactionType::Income, 4),
        )
        .unwrap();
        add_expense(&conn, "b", at(2024, 3, 1, 9));
        add_expense(&conn, "c", at(2024, 2, 1, 9));

        let descriptions: Vec<String> = list_transactions(&conn, &DateRange::default())
            .unwrap()
            .into_iter()
            .map(|t| t.description)
            .collect();
        assert_eq!(descriptions, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_list_transactions_filter_is_inclusive() {
        let conn = seeded();
        add_expense(&conn, "jan", at(2024, 1, 31, 23));
        add_expense(&conn, "feb-first", at(2024, 2, 1, 0));
        add_expense(&conn, "feb-last", at(2024, 2, 29, 18));
        add_expense(&conn, "mar", at(2024, 3, 1, 0));

        let range = DateRange::new(Some(day(2024, 2, 1)), Some(day(2024, 2, 29)));
        let descriptions: Vec<String> = list_transactions(&conn, &range)
            .unwrap()
            .into_iter()
            .map(|t| t.description)
            .collect();
        assert_eq!(descriptions, vec!["feb-last", "feb-first"]);
    }

    #[test]
    fn test_list_transactions_filter_matches_in_memory_filter() {
        let conn = seeded();
        for d in 1..=28 {
            add_expense(&conn, "t", at(2024, 2, d, 12));
        }
        let all = list_transactions(&conn, &DateRange::default()).unwrap();

        let range = DateRange::new(Some(day(2024, 2, 10)), Some(day(2024, 2, 15)));
        let from_db: Vec<i64> = list_transactions(&conn, &range)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        let in_memory: Vec<i64> = all
            .iter()
            .filter(|t| range.contains(t.date))
            .map(|t| t.id)
            .collect();

        assert_eq!(from_db.len(), 6);
        assert_eq!(from_db, in_memory);
    }

    #[test]
    fn test_list_transactions_inverted_range_is_empty() {
        let conn = seeded();
        add_expense(&conn, "x", at(2024, 2, 15, 12));

        let range = DateRange::new(Some(day(2024, 3, 1)), Some(day(2024, 2, 1)));
        assert!(list_transactions(&conn, &range).unwrap().is_empty());
    }

    #[test]
    fn test_update_transaction_success() {
        let conn = seeded();
        let id = add_transaction(
            &conn,
            &new_transaction("Bus", 250, at(2024, 1, 2, 8), TransactionType::Expense, 2),
        )
        .unwrap();

        let changed = new_transaction(
            "Paycheck",
            300000,
            at(2024, 1, 31, 9),
            TransactionType::Income,
            4,
        );
        update_transaction(&conn, id, &changed).unwrap();

        let stored = get_transaction(&conn, id).unwrap();
        assert_eq!(stored.description, "Paycheck");
        assert_eq!(stored.amount, Decimal::new(300000, 2));
        assert_eq!(stored.transaction_type, TransactionType::Income);
        assert_eq!(stored.category.name, "Salary");
    }

    #[test]
    fn test_update_transaction_not_found() {
        let conn = seeded();
        let changed = new_transaction("x", 100, at(2024, 1, 1, 0), TransactionType::Income, 4);
        let result = update_transaction(&conn, 12, &changed);
        assert!(matches!(result, Err(TrackerError::NotFound { .. })));
    }

    #[test]
    fn test_remove_transaction_success() {
        let conn = seeded();
        let id = add_expense(&conn, "x", at(2024, 1, 1, 0));

        remove_transaction(&conn, id).unwrap();
        assert!(list_transactions(&conn, &DateRange::default()).unwrap().is_empty());
    }

    #[test]
    fn test_remove_transaction_not_found() {
        let conn = seeded();
        let result = remove_transaction(&conn, 5);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_amount_round_trips_exactly() {
        let conn = establish_test_connection().unwrap();
        let category = add_category(&conn, "Misc").unwrap();
        let amount = Decimal::from_str("0.10").unwrap() + Decimal::from_str("0.20").unwrap();
        let id = add_transaction(
            &conn,
            &NewTransaction {
                description: "cents".to_string(),
                amount,
                date: at(2024, 1, 1, 0),
                transaction_type: TransactionType::Expense,
                category_id: category.id,
            },
        )
        .unwrap();

        assert_eq!(
            get_transaction(&conn, id).unwrap().amount,
            Decimal::from_str("0.30").unwrap()
        );
    }
}
