use super::validation::validate_category_name;
use crate::db::category_repository;
use crate::error::Result;
use crate::models::category::Category;
use rusqlite::Connection;

pub fn list_categories_db(conn: &Connection) -> Result<Vec<Category>> {
    category_repository::get_all_categories(conn)
}

pub fn add_category_db(conn: &Connection, name: &str) -> Result<Category> {
    let name = validate_category_name(name)?;
    category_repository::add_category(conn, &name)
}

/// Removes a category and returns what was removed.
pub fn remove_category_db(conn: &Connection, id: i64) -> Result<Category> {
    let category = category_repository::get_category(conn, id)?;
    category_repository::remove_category(conn, id)?;
    Ok(category)
}

pub fn format_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories defined.".to_string();
    }
    categories
        .iter()
        .map(|c| format!("{:>5}  {}", c.id, c.name))
        .collect::<Vec<_>>()
        .join("\n")
}
