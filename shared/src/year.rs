use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Calendar year the stats are collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub year: i32,
}

impl YearRange {
    pub const fn new(year: i32) -> Self {
        Self { year }
    }

    pub fn current() -> Self {
        Self::new(Utc::now().year())
    }

    pub fn start(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(self.year, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_default()
    }

    pub fn end(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(self.year, 12, 31, 23, 59, 59)
            .single()
            .unwrap_or_default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year
    }

    /// GraphQL `DateTime` scalars for the `from`/`to` query variables.
    pub fn as_query_bounds(&self) -> (String, String) {
        (
            self.start().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            self.end().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        )
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(2024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_whole_year() {
        let range = YearRange::new(2024);
        let (from, to) = range.as_query_bounds();
        assert_eq!(from, "2024-01-01T00:00:00Z");
        assert_eq!(to, "2024-12-31T23:59:59Z");
    }

    #[test]
    fn contains_only_dates_of_the_year() {
        let range = YearRange::new(2024);
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
    }
}
