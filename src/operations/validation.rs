use crate::db::category_repository;
use crate::error::{FieldError, Result, TrackerError};
use crate::models::category::Category;
use crate::models::transaction::{NewTransaction, TransactionType};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

const MAX_DESCRIPTION_LEN: usize = 255;
const MAX_CATEGORY_NAME_LEN: usize = 50;
const AMOUNT_SCALE: u32 = 2;
// decimal(10,2): eight digits before the point.
const AMOUNT_LIMIT: i64 = 100_000_000;

const DATE_TIME_INPUT_FORMATS: [&str; 3] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Raw transaction input as it arrives from the command line or a CSV row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
    pub transaction_type: Option<String>,
    /// Category id or name.
    pub category: Option<String>,
}

/// Checks every field of `form` and reports all problems at once.
///
/// A missing date falls back to `now`, a missing type to `Expense`.
pub fn validate_transaction(
    conn: &Connection,
    form: &TransactionForm,
    now: NaiveDateTime,
) -> Result<NewTransaction> {
    let mut errors = Vec::new();

    let description = non_blank(&form.description);
    match description {
        None => errors.push(FieldError::new("description", "Description is required")),
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => errors.push(FieldError::new(
            "description",
            format!("Description must be at most {} characters", MAX_DESCRIPTION_LEN),
        )),
        Some(_) => {}
    }

    let amount = match non_blank(&form.amount) {
        None => {
            errors.push(FieldError::new("amount", "Amount is required"));
            None
        }
        Some(raw) => match parse_amount(raw) {
            Ok(amount) => Some(amount),
            Err(message) => {
                errors.push(FieldError::new("amount", message));
                None
            }
        },
    };

    let date = match non_blank(&form.date) {
        None => Some(now),
        Some(raw) => match parse_date_time(raw) {
            Ok(date) => Some(date),
            Err(message) => {
                errors.push(FieldError::new("date", message));
                None
            }
        },
    };

    let transaction_type = match non_blank(&form.transaction_type) {
        None => Some(TransactionType::Expense),
        Some(raw) => match raw.parse::<TransactionType>() {
            Ok(t) => Some(t),
            Err(message) => {
                errors.push(FieldError::new("type", message));
                None
            }
        },
    };

    let category = match non_blank(&form.category) {
        None => {
            errors.push(FieldError::new("category", "Category is required"));
            None
        }
        Some(raw) => {
            let found = resolve_category(conn, raw)?;
            if found.is_none() {
                errors.push(FieldError::new(
                    "category",
                    format!("Category '{}' does not exist", raw),
                ));
            }
            found
        }
    };

    match (description, amount, date, transaction_type, category) {
        (Some(description), Some(amount), Some(date), Some(transaction_type), Some(category))
            if errors.is_empty() =>
        {
            Ok(NewTransaction {
                description: description.to_string(),
                amount,
                date,
                transaction_type,
                category_id: category.id,
            })
        }
        _ => {
            tracing::warn!(fields = errors.len(), "transaction input rejected");
            Err(TrackerError::Validation(errors))
        }
    }
}

pub fn validate_category_name(name: &str) -> Result<String> {
    let name = name.trim();
    let message = if name.is_empty() {
        "Name is required".to_string()
    } else if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        format!("Name must be at most {} characters", MAX_CATEGORY_NAME_LEN)
    } else {
        return Ok(name.to_string());
    };
    Err(TrackerError::Validation(vec![FieldError::new("name", message)]))
}

/// Parses a strictly positive amount with at most two decimal places.
pub fn parse_amount(raw: &str) -> std::result::Result<Decimal, String> {
    let mut amount = Decimal::from_str(raw.trim())
        .map_err(|_| format!("Invalid amount '{}'. Must be a valid number", raw.trim()))?;

    if amount <= Decimal::ZERO {
        return Err("Amount must be greater than 0".to_string());
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err("Amount can have at most 2 decimal places".to_string());
    }
    if amount >= Decimal::from(AMOUNT_LIMIT) {
        return Err(format!("Amount must be less than {}", AMOUNT_LIMIT));
    }

    amount.rescale(AMOUNT_SCALE);
    Ok(amount)
}

/// Accepts `YYYY-MM-DD` (midnight) or a date with a time of day.
pub fn parse_date_time(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }
    DATE_TIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| {
            format!(
                "Invalid date '{}'. Please use YYYY-MM-DD or YYYY-MM-DD HH:MM",
                raw
            )
        })
}

pub fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Please use YYYY-MM-DD", raw.trim()))
}

/// Numeric input is tried as an id first, then as a name.
fn resolve_category(conn: &Connection, raw: &str) -> Result<Option<Category>> {
    if let Ok(id) = raw.parse::<i64>() {
        if let Some(category) = category_repository::find_category(conn, id)? {
            return Ok(Some(category));
        }
    }
    category_repository::find_category_by_name(conn, raw)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
