/// Categories inserted on first start when the table is empty.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Rent",
    "Salary",
    "Entertainment",
    "Other",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub fn new(id: i64, name: String) -> Self {
        Self { id, name }
    }
}
