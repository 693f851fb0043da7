use super::validation::{TransactionForm, validate_transaction};
use crate::db::transaction_repository;
use crate::error::Result;
use crate::models::transaction::{DATE_TIME_FORMAT, Transaction};
use rusqlite::Connection;

/// Applies the fields present in `changes` on top of the stored transaction.
///
/// The merged record goes through the same validation as a new one.
pub fn edit_transaction_in_db(
    conn: &Connection,
    id: i64,
    changes: &TransactionForm,
) -> Result<Transaction> {
    let current = transaction_repository::get_transaction(conn, id)?;
    let merged = merge(&current, changes);

    let updated = validate_transaction(conn, &merged, current.date)?;
    transaction_repository::update_transaction(conn, id, &updated)?;
    transaction_repository::get_transaction(conn, id)
}

fn merge(current: &Transaction, changes: &TransactionForm) -> TransactionForm {
    TransactionForm {
        description: changes
            .description
            .clone()
            .or_else(|| Some(current.description.clone())),
        amount: changes
            .amount
            .clone()
            .or_else(|| Some(current.amount.to_string())),
        date: changes
            .date
            .clone()
            .or_else(|| Some(current.date.format(DATE_TIME_FORMAT).to_string())),
        transaction_type: changes
            .transaction_type
            .clone()
            .or_else(|| Some(current.transaction_type.as_str().to_string())),
        category: changes
            .category
            .clone()
            .or_else(|| Some(current.category.id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::category_repository::seed_default_categories;
    use crate::db::connection::establish_test_connection;
    use crate::error::TrackerError;
    use crate::operations::add::add_transaction_to_db;
    use rust_decimal::Decimal;

    fn setup() -> (Connection, Transaction) {
        let conn = establish_test_connection().unwrap();
        seed_default_categories(&conn).unwrap();
        let stored = add_transaction_to_db(
            &conn,
            &TransactionForm {
                description: Some("Train ticket".to_string()),
                amount: Some("42.00".to_string()),
                date: Some("2024-03-02 07:10".to_string()),
                transaction_type: Some("expense".to_string()),
                category: Some("Transport".to_string()),
            },
        )
        .unwrap();
        (conn, stored)
    }

    #[test]
    fn test_edit_keeps_unchanged_fields() {
        let (conn, original) = setup();

        let changes = TransactionForm {
            amount: Some("45.50".to_string()),
            ..Default::default()
        };
        let edited = edit_transaction_in_db(&conn, original.id, &changes).unwrap();

        assert_eq!(edited.amount, Decimal::new(4550, 2));
        assert_eq!(edited.description, original.description);
        assert_eq!(edited.date, original.date);
        assert_eq!(edited.category, original.category);
        assert_eq!(edited.transaction_type, original.transaction_type);
    }

    #[test]
    fn test_edit_moves_to_other_category() {
        let (conn, original) = setup();

        let changes = TransactionForm {
            category: Some("Other".to_string()),
            ..Default::default()
        };
        let edited = edit_transaction_in_db(&conn, original.id, &changes).unwrap();
        assert_eq!(edited.category.name, "Other");
    }

    #[test]
    fn test_edit_rejects_invalid_change() {
        let (conn, original) = setup();

        let changes = TransactionForm {
            amount: Some("0".to_string()),
            ..Default::default()
        };
        let result = edit_transaction_in_db(&conn, original.id, &changes);
        assert!(matches!(result, Err(TrackerError::Validation(_))));

        let stored = transaction_repository::get_transaction(&conn, original.id).unwrap();
        assert_eq!(stored.amount, original.amount);
    }

    #[test]
    fn test_edit_missing_transaction() {
        let (conn, _) = setup();
        let result = edit_transaction_in_db(&conn, 999, &TransactionForm::default());
        assert!(matches!(result, Err(TrackerError::NotFound { id: 999, .. })));
    }
}
