use crate::error::{Result, TrackerError};
use crate::models::category::{Category, DEFAULT_CATEGORIES};
use rusqlite::{Connection, OptionalExtension};

/// Inserts the default categories when the table is empty. Returns how many were inserted.
pub fn seed_default_categories(conn: &Connection) -> Result<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    if existing > 0 {
        tracing::debug!(existing, "categories already present, skipping seed");
        return Ok(0);
    }

    let mut stmt = conn.prepare("INSERT INTO categories (name) VALUES (?1)")?;
    for name in DEFAULT_CATEGORIES {
        stmt.execute([name])?;
    }
    tracing::info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    Ok(DEFAULT_CATEGORIES.len())
}

pub fn add_category(conn: &Connection, name: &str) -> Result<Category> {
    conn.execute("INSERT INTO categories (name) VALUES (?1)", [name])?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, name, "category added");
    Ok(Category::new(id, name.to_string()))
}

pub fn get_all_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id ASC")?;
    let iter = stmt.query_map([], |row| Ok(Category::new(row.get(0)?, row.get(1)?)))?;

    let mut categories = Vec::new();
    for category in iter {
        categories.push(category?);
    }
    Ok(categories)
}

pub fn get_category(conn: &Connection, id: i64) -> Result<Category> {
    find_category(conn, id)?.ok_or_else(|| TrackerError::not_found("Category", id))
}

pub fn find_category(conn: &Connection, id: i64) -> Result<Option<Category>> {
    let category = conn
        .query_row("SELECT id, name FROM categories WHERE id = ?1", [id], |row| {
            Ok(Category::new(row.get(0)?, row.get(1)?))
        })
        .optional()?;
    Ok(category)
}

/// Case-insensitive lookup by name. The first match by id wins when names repeat.
pub fn find_category_by_name(conn: &Connection, name: &str) -> Result<Option<Category>> {
    let category = conn
        .query_row(
            "SELECT id, name FROM categories WHERE LOWER(name) = LOWER(?1) ORDER BY id ASC LIMIT 1",
            [name.trim()],
            |row| Ok(Category::new(row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    Ok(category)
}

/// Deletes a category. Refuses while any transaction still references it.
pub fn remove_category(conn: &Connection, id: i64) -> Result<()> {
    let in_use: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id = ?1",
        [id],
        |row| row.get(0),
    )?;
    if in_use > 0 {
        return Err(TrackerError::CategoryInUse {
            id,
            transactions: in_use,
        });
    }

    let rows = conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
    if rows == 0 {
        return Err(TrackerError::not_found("Category", id));
    }
    tracing::info!(id, "category removed");
    Ok(())
}
