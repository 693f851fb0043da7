pub mod add;
pub mod categories;
pub mod dashboard;
pub mod edit;
pub mod import;
pub mod list;
pub mod remove;
pub mod report;
pub mod validation;
