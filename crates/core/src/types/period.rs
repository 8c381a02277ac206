//! Month/year filter for order history.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`MonthFilter`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("month must be a number between 1 and 12")]
    InvalidMonth,
    #[error("year must be a four digit number")]
    InvalidYear,
}

/// Optional month and year narrowing an order-history query.
///
/// Either part may be absent; the backend fills a missing part with the
/// current month or year. An empty filter means "all orders".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MonthFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl MonthFilter {
    const MIN_YEAR: i32 = 1970;
    const MAX_YEAR: i32 = 9999;

    /// Filter for the month containing `date`.
    #[must_use]
    pub fn containing(date: impl Datelike) -> Self {
        Self {
            month: Some(date.month()),
            year: Some(date.year()),
        }
    }

    /// Parse raw form values. Blank values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a present value is not a valid month or year.
    pub fn parse(month: Option<&str>, year: Option<&str>) -> Result<Self, PeriodError> {
        let month = match month.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => {
                let value: u32 = raw.parse().map_err(|_| PeriodError::InvalidMonth)?;
                if !(1..=12).contains(&value) {
                    return Err(PeriodError::InvalidMonth);
                }
                Some(value)
            }
            None => None,
        };

        let year = match year.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => {
                let value: i32 = raw.parse().map_err(|_| PeriodError::InvalidYear)?;
                if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&value) {
                    return Err(PeriodError::InvalidYear);
                }
                Some(value)
            }
            None => None,
        };

        Ok(Self { month, year })
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.month.is_none() && self.year.is_none()
    }

    /// Query pairs in the order the backend expects them.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(month) = self.month {
            pairs.push(("month", month.to_string()));
        }
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_parse_blank_is_empty() {
        let filter = MonthFilter::parse(Some(""), None).unwrap();
        assert!(filter.is_empty());
        assert!(filter.query_pairs().is_empty());
    }

    #[test]
    fn test_parse_month_and_year() {
        let filter = MonthFilter::parse(Some(" 7 "), Some("2025")).unwrap();
        assert_eq!(filter.month, Some(7));
        assert_eq!(filter.year, Some(2025));
        assert_eq!(
            filter.query_pairs(),
            vec![("month", "7".to_string()), ("year", "2025".to_string())]
        );
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(
            MonthFilter::parse(Some("13"), None),
            Err(PeriodError::InvalidMonth)
        );
        assert_eq!(
            MonthFilter::parse(Some("0"), None),
            Err(PeriodError::InvalidMonth)
        );
        assert_eq!(
            MonthFilter::parse(None, Some("25")),
            Err(PeriodError::InvalidYear)
        );
        assert_eq!(
            MonthFilter::parse(None, Some("twenty")),
            Err(PeriodError::InvalidYear)
        );
    }

    #[test]
    fn test_containing_date() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        let filter = MonthFilter::containing(date);
        assert_eq!(filter.month, Some(11));
        assert_eq!(filter.year, Some(2024));
    }
}
