use chrono::NaiveDate;
#[cfg(test)]
use chrono::NaiveDateTime;

/// Inclusive date filter. A missing bound leaves that side open.
///
/// Bounds compare against the calendar day of a timestamp, so `to` covers the
/// whole of its day. Each bound is checked on its own: a range whose `from`
/// lies after its `to` matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// In-memory form of the filter the transaction query applies in SQL.
    #[cfg(test)]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        let day = timestamp.date();
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }

    pub fn from_param(&self) -> Option<String> {
        self.from.map(|d| d.format("%Y-%m-%d").to_string())
    }

    pub fn to_param(&self) -> Option<String> {
        self.to.map(|d| d.format("%Y-%m-%d").to_string())
    }
}
