use crate::models::category::Category;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Storage format for transaction timestamps. Sorts lexicographically.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!(
                "Invalid transaction type '{}'. Use 'income' or 'expense'.",
                other
            )),
        }
    }
}

/// A stored transaction, hydrated with its category.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub transaction_type: TransactionType,
    pub category: Category,
}

impl Transaction {
    pub fn new(
        id: i64,
        description: String,
        amount: Decimal,
        date: NaiveDateTime,
        transaction_type: TransactionType,
        category: Category,
    ) -> Self {
        Self {
            id,
            description,
            amount,
            date,
            transaction_type,
            category,
        }
    }
}

/// A validated transaction that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub transaction_type: TransactionType,
    pub category_id: i64,
}
