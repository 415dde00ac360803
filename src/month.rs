//! Month bucketing for `YYYY-MM` query parameters.

use std::{fmt::Display, ops::Range, str::FromStr};

use time::{Date, Month, OffsetDateTime};

use crate::ValidationError;

/// The half-open date range `[first day of month, first day of next month)`.
///
/// Bounds are interpreted as midnight UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    /// The first day of the month, included in the range.
    pub start: Date,
    /// The first day of the following month, excluded from the range.
    pub end: Date,
}

impl MonthRange {
    /// The range as UTC timestamps, suitable for filtering on creation time.
    pub fn as_timestamps(&self) -> Range<OffsetDateTime> {
        self.start.midnight().assume_utc()..self.end.midnight().assume_utc()
    }

    /// Whether `timestamp` falls inside the range.
    pub fn contains(&self, timestamp: OffsetDateTime) -> bool {
        self.as_timestamps().contains(&timestamp)
    }

    /// Parse an optional query parameter, treating an absent value as an error.
    pub fn parse_required(month: Option<&str>) -> Result<Self, ValidationError> {
        match month {
            Some(month) => month.parse(),
            None => Err(ValidationError::MissingMonth),
        }
    }
}

impl FromStr for MonthRange {
    type Err = ValidationError;

    /// Parse a strict `YYYY-MM` string, e.g. "2024-12".
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMonth(text.to_owned());

        let (year, month) = text.split_once('-').ok_or_else(invalid)?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|byte| byte.is_ascii_digit())
            || !month.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        let start = Date::from_calendar_date(year, month, 1).map_err(|_| invalid())?;

        let (next_year, next_month) = match month {
            Month::December => (year + 1, Month::January),
            month => (year, month.next()),
        };
        // Fails for 9999-12, whose successor is outside the supported calendar.
        let end = Date::from_calendar_date(next_year, next_month, 1).map_err(|_| invalid())?;

        Ok(Self { start, end })
    }
}

impl Display for MonthRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.start.year(), u8::from(self.start.month()))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{MonthRange, ValidationError};

    #[test]
    fn parses_mid_year_month() {
        let range: MonthRange = "2024-06".parse().unwrap();

        assert_eq!(range.start, date!(2024 - 06 - 01));
        assert_eq!(range.end, date!(2024 - 07 - 01));
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        let range: MonthRange = "2024-12".parse().unwrap();

        assert_eq!(range.start, date!(2024 - 12 - 01));
        assert_eq!(range.end, date!(2025 - 01 - 01));
    }

    #[test]
    fn february_in_leap_year_ends_on_march_first() {
        let range: MonthRange = "2024-02".parse().unwrap();

        assert_eq!(range.end, date!(2024 - 03 - 01));
    }

    #[test]
    fn range_is_half_open() {
        let range: MonthRange = "2024-12".parse().unwrap();

        assert!(range.contains(datetime!(2024 - 12 - 01 00:00:00 UTC)));
        assert!(range.contains(datetime!(2024 - 12 - 31 23:59:59.999 UTC)));
        assert!(!range.contains(datetime!(2025 - 01 - 01 00:00:00 UTC)));
        assert!(!range.contains(datetime!(2024 - 11 - 30 23:59:59 UTC)));
    }

    #[test]
    fn rejects_malformed_months() {
        for text in [
            "2023-13", "2023-00", "2023-1", "23-01", "2023/01", "2023-01-01", "", "abcd-ef",
            "+202-01", "2023--1", "9999-12",
        ] {
            assert_eq!(
                text.parse::<MonthRange>(),
                Err(ValidationError::InvalidMonth(text.to_owned())),
                "expected {text:?} to be rejected"
            );
        }
    }

    #[test]
    fn missing_month_is_rejected_when_required() {
        assert_eq!(
            MonthRange::parse_required(None),
            Err(ValidationError::MissingMonth)
        );
    }

    #[test]
    fn displays_as_query_value() {
        let range: MonthRange = "0999-03".parse().unwrap();

        assert_eq!(range.to_string(), "0999-03");
    }
}
