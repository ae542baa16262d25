//! Calendar ranges for reports.
//!
//! All ranges are half-open `[start, end)` over local calendar dates, so a
//! record belongs to a range when the local date of its start does.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Local calendar date of an instant.
pub fn local_date(at: &DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "period", rename_all = "lowercase")]
pub enum ReportPeriod {
    Today,
    /// Sunday through Saturday containing today.
    Week,
    Month,
    /// Both ends inclusive.
    Custom { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
}

impl DateRange {
    /// # Errors
    /// `InvalidDateRange` unless `start < end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The single day `day`.
    pub fn day(day: NaiveDate) -> Result<Self, ValidationError> {
        Self::new(day, next_day(day)?)
    }

    /// Resolve a period relative to `today`.
    ///
    /// # Errors
    /// `InvalidDateRange` for a custom range ending before it starts.
    pub fn for_period(period: ReportPeriod, today: NaiveDate) -> Result<Self, ValidationError> {
        match period {
            ReportPeriod::Today => Self::day(today),
            ReportPeriod::Week => {
                let back = u64::from(today.weekday().num_days_from_sunday());
                let start = today
                    .checked_sub_days(Days::new(back))
                    .ok_or_else(|| out_of_range("week"))?;
                let end = start
                    .checked_add_days(Days::new(7))
                    .ok_or_else(|| out_of_range("week"))?;
                Self::new(start, end)
            }
            ReportPeriod::Month => {
                let start = today.with_day(1).ok_or_else(|| out_of_range("month"))?;
                let end = if start.month() == 12 {
                    NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
                }
                .ok_or_else(|| out_of_range("month"))?;
                Self::new(start, end)
            }
            ReportPeriod::Custom { start, end } => {
                if end < start {
                    return Err(ValidationError::InvalidDateRange { start, end });
                }
                Self::new(start, next_day(end)?)
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Whether the local date of `at` falls in the range.
    pub fn contains_instant(&self, at: &DateTime<Utc>) -> bool {
        self.contains(local_date(at))
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

fn next_day(day: NaiveDate) -> Result<NaiveDate, ValidationError> {
    day.succ_opt().ok_or_else(|| out_of_range("day"))
}

fn out_of_range(field: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message: "date out of supported range".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_is_one_day() {
        let r = DateRange::for_period(ReportPeriod::Today, date(2024, 5, 15)).unwrap();
        assert_eq!(r.start, date(2024, 5, 15));
        assert_eq!(r.end, date(2024, 5, 16));
        assert!(r.contains(date(2024, 5, 15)));
        assert!(!r.contains(date(2024, 5, 16)));
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-05-15 is a Wednesday.
        let r = DateRange::for_period(ReportPeriod::Week, date(2024, 5, 15)).unwrap();
        assert_eq!(r.start, date(2024, 5, 12));
        assert_eq!(r.end, date(2024, 5, 19));

        // A Sunday starts its own week.
        let r = DateRange::for_period(ReportPeriod::Week, date(2024, 5, 19)).unwrap();
        assert_eq!(r.start, date(2024, 5, 19));
        assert_eq!(r.len_days(), 7);
    }

    #[test]
    fn month_rolls_over_year_end() {
        let r = DateRange::for_period(ReportPeriod::Month, date(2024, 12, 31)).unwrap();
        assert_eq!(r.start, date(2024, 12, 1));
        assert_eq!(r.end, date(2025, 1, 1));

        let r = DateRange::for_period(ReportPeriod::Month, date(2024, 2, 10)).unwrap();
        assert_eq!(r.len_days(), 29);
    }

    #[test]
    fn custom_end_is_inclusive() {
        let r = DateRange::for_period(
            ReportPeriod::Custom {
                start: date(2024, 1, 1),
                end: date(2024, 1, 3),
            },
            date(2024, 6, 1),
        )
        .unwrap();
        assert_eq!(r.end, date(2024, 1, 4));
        assert!(r.contains(date(2024, 1, 3)));

        let same_day = DateRange::for_period(
            ReportPeriod::Custom {
                start: date(2024, 1, 1),
                end: date(2024, 1, 1),
            },
            date(2024, 6, 1),
        )
        .unwrap();
        assert_eq!(same_day.len_days(), 1);
    }

    #[test]
    fn backwards_custom_range_is_rejected() {
        let err = DateRange::for_period(
            ReportPeriod::Custom {
                start: date(2024, 1, 3),
                end: date(2024, 1, 1),
            },
            date(2024, 6, 1),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
    }
}
