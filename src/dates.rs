use std::fmt;
use std::str::FromStr;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde::{Serialize, Deserialize};
use crate::error::PlannerError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A local calendar day with no timezone attached.
/// Serialized as `YYYY-MM-DD`; ordering agrees with that string's lexicographic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalendarDate)
    }

    /// Parse the canonical `YYYY-MM-DD` form.
    pub fn parse(s: &str) -> Result<Self, PlannerError> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(CalendarDate)
            .map_err(|e| PlannerError::new(
                format!("Invalid date '{}': {}", s, e),
                "date_parse"
            ))
    }

    /// Today in the local calendar.
    pub fn today() -> Self {
        CalendarDate(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn add_days(&self, days: i64) -> Self {
        CalendarDate(self.0 + Duration::days(days))
    }

    /// Whole days from `self` to `other`; negative when `other` is earlier.
    pub fn days_until(&self, other: CalendarDate) -> i64 {
        (other.0 - self.0).num_days()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn is_saturday(&self) -> bool {
        self.weekday() == Weekday::Sat
    }

    /// Monday of the week containing this date.
    pub fn week_start(&self) -> Self {
        self.add_days(-(self.weekday().num_days_from_monday() as i64))
    }

    pub fn first_of_month(&self) -> Self {
        CalendarDate(self.0.with_day(1).unwrap_or(self.0))
    }

    /// First day of the following month.
    pub fn next_month_start(&self) -> Self {
        let (year, month) = if self.month() == 12 {
            (self.year() + 1, 1)
        } else {
            (self.year(), self.month() + 1)
        };
        CalendarDate::from_ymd(year, month, 1).unwrap_or_else(|| self.add_days(31))
    }

    /// `YYYY.MM`, used for milestone labels.
    pub fn month_label(&self) -> String {
        format!("{}.{:02}", self.year(), self.month())
    }

    /// Every date of the given calendar month, in order. Empty for an invalid month.
    pub fn month_days(year: i32, month: u32) -> Vec<CalendarDate> {
        let Some(first) = CalendarDate::from_ymd(year, month, 1) else {
            return Vec::new();
        };
        let next = first.next_month_start();
        (0..first.days_until(next)).map(|i| first.add_days(i)).collect()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarDate::parse(s)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        assert_eq!(d("2025-01-08").to_string(), "2025-01-08");
        assert_eq!("2025-01-08".parse::<CalendarDate>().unwrap(), d("2025-01-08"));
        assert!(CalendarDate::parse("2025-13-01").is_err());
        assert!(CalendarDate::parse("not a date").is_err());
    }

    #[test]
    fn test_add_days_crosses_month_and_year() {
        assert_eq!(d("2025-01-01").add_days(30), d("2025-01-31"));
        assert_eq!(d("2024-12-30").add_days(3), d("2025-01-02"));
        assert_eq!(d("2025-03-01").add_days(-1), d("2025-02-28"));
    }

    #[test]
    fn test_days_until_is_signed() {
        assert_eq!(d("2025-01-01").days_until(d("2025-01-11")), 10);
        assert_eq!(d("2025-01-11").days_until(d("2025-01-01")), -10);
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-01-04 is a Saturday, 2025-01-05 a Sunday
        assert_eq!(d("2025-01-04").week_start(), d("2024-12-30"));
        assert_eq!(d("2025-01-05").week_start(), d("2024-12-30"));
        assert_eq!(d("2025-01-06").week_start(), d("2025-01-06"));
        assert!(d("2025-01-04").is_saturday());
    }

    #[test]
    fn test_month_days() {
        assert_eq!(CalendarDate::month_days(2024, 2).len(), 29);
        assert_eq!(CalendarDate::month_days(2025, 12).last().copied(), Some(d("2025-12-31")));
        assert!(CalendarDate::month_days(2025, 13).is_empty());
    }

    #[test]
    fn test_ordering_matches_string_order() {
        let a = d("2025-09-30");
        let b = d("2025-10-01");
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&d("2025-01-31")).unwrap();
        assert_eq!(json, "\"2025-01-31\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d("2025-01-31"));
    }
}
