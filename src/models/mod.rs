pub mod category;
pub mod date_range;
pub mod transaction;
