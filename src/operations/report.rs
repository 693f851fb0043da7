use crate::db::transaction_repository;
use crate::error::Result;
use crate::models::date_range::DateRange;
use crate::models::transaction::{Transaction, TransactionType};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// Smallest id among the categories carrying this name.
    pub category_id: i64,
    pub category_name: String,
    pub total: Decimal,
}

/// Totals over a set of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// `total_income - total_expense`; negative when spending exceeds income.
    pub balance: Decimal,
    /// Expense totals per category name, ordered by the smallest category id of each name.
    pub category_breakdown: Vec<CategoryTotal>,
}

pub fn build_report(conn: &Connection, range: &DateRange) -> Result<ReportSummary> {
    let transactions = transaction_repository::list_transactions(conn, range)?;
    let summary = summarize(&transactions);
    tracing::debug!(
        transactions = transactions.len(),
        income = %summary.total_income,
        expense = %summary.total_expense,
        "report built"
    );
    Ok(summary)
}

pub fn summarize(transactions: &[Transaction]) -> ReportSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut by_name: HashMap<&str, CategoryTotal> = HashMap::new();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => {
                total_expense += transaction.amount;
                let category = &transaction.category;
                let entry = by_name
                    .entry(category.name.as_str())
                    .or_insert_with(|| CategoryTotal {
                        category_id: category.id,
                        category_name: category.name.clone(),
                        total: Decimal::ZERO,
                    });
                entry.category_id = entry.category_id.min(category.id);
                entry.total += transaction.amount;
            }
        }
    }

    let mut category_breakdown: Vec<CategoryTotal> = by_name.into_values().collect();
    category_breakdown.sort_by_key(|c| c.category_id);

    ReportSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        category_breakdown,
    }
}
