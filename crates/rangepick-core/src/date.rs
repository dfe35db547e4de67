use std::fmt;

use anyhow::{Context, anyhow};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const NOT_SELECTED: &str = "Not selected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    fn step(self) -> i32 {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

/// The month a calendar widget is showing. Only year and month are kept, so
/// shifting never spills into a neighbouring month because of a day number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn month_index(&self) -> u32 {
        self.month - 1
    }

    // Stays put at the edge of the representable calendar.
    #[must_use]
    pub fn shift(self, months: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(months);
        i32::try_from(total.div_euclid(12))
            .ok()
            .and_then(|year| Self::new(year, total.rem_euclid(12) as u32 + 1))
            .unwrap_or(self)
    }

    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        self.shift(direction.step())
    }

    #[must_use]
    pub fn with_month_index(self, month_index: u32) -> Option<Self> {
        month_index
            .checked_add(1)
            .and_then(|month| Self::new(self.year, month))
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        (28..=31)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
            .unwrap_or_else(|| self.first_day())
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let (year, month) = (self.year, self.month);
        (1..=self.days_in_month()).filter_map(move |day| NaiveDate::from_ymd_opt(year, month, day))
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month_index() as usize]
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_month_year(cursor: MonthCursor) -> String {
    format!("{} {}", &cursor.month_name()[..3], cursor.year())
}

pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_display_date)
        .unwrap_or_else(|| NOT_SELECTED.to_string())
}

pub fn parse_iso_date(raw: &str) -> anyhow::Result<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("date cannot be empty"));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .with_context(|| format!("expected YYYY-MM-DD, got: {trimmed}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn shift_rolls_year_both_ways() {
        let jan = MonthCursor::new(2024, 1).expect("valid month");
        assert_eq!(jan.step(Direction::Prev), MonthCursor::new(2023, 12).expect("valid month"));

        let dec = MonthCursor::new(2024, 12).expect("valid month");
        assert_eq!(dec.step(Direction::Next), MonthCursor::new(2025, 1).expect("valid month"));
        assert_eq!(dec.shift(-25), MonthCursor::new(2022, 11).expect("valid month"));
    }

    #[test]
    fn cursor_from_month_end_does_not_skip_february() {
        let cursor = MonthCursor::containing(date(2025, 1, 31));
        let next = cursor.step(Direction::Next);
        assert_eq!(next.month(), 2);
        assert_eq!(next.days_in_month(), 28);
    }

    #[test]
    fn month_lengths_and_leap_years() {
        assert_eq!(MonthCursor::new(2024, 2).expect("valid month").days_in_month(), 29);
        assert_eq!(MonthCursor::new(1900, 2).expect("valid month").days_in_month(), 28);
        assert_eq!(MonthCursor::new(2000, 2).expect("valid month").days_in_month(), 29);
        assert_eq!(MonthCursor::new(2024, 12).expect("valid month").days_in_month(), 31);
    }

    #[test]
    fn leading_blanks_count_from_sunday() {
        // 2024-09-01 is a Sunday, 2024-03-01 a Friday.
        assert_eq!(MonthCursor::new(2024, 9).expect("valid month").leading_blanks(), 0);
        assert_eq!(MonthCursor::new(2024, 3).expect("valid month").leading_blanks(), 5);
    }

    #[test]
    fn month_index_bounds() {
        let cursor = MonthCursor::new(2024, 5).expect("valid month");
        assert_eq!(cursor.with_month_index(0), MonthCursor::new(2024, 1));
        assert_eq!(cursor.with_month_index(11), MonthCursor::new(2024, 12));
        assert_eq!(cursor.with_month_index(12), None);
        assert_eq!(MonthCursor::new(2024, 0), None);
    }

    #[test]
    fn cursor_rejects_years_outside_the_calendar() {
        assert_eq!(MonthCursor::new(i32::MAX, 1), None);
        assert_eq!(MonthCursor::new(i32::MIN, 12), None);

        let last = MonthCursor::containing(NaiveDate::MAX);
        assert_eq!(last.step(Direction::Next), last);
        assert_eq!(last.first_day().day(), 1);
        assert_eq!(last.last_day(), NaiveDate::MAX);

        let first = MonthCursor::containing(NaiveDate::MIN);
        assert_eq!(first.step(Direction::Prev), first);
    }

    #[test]
    fn formats_match_en_us_short_style() {
        assert_eq!(format_display_date(date(2024, 3, 5)), "Mar 5, 2024");
        assert_eq!(format_month_year(MonthCursor::containing(date(2023, 12, 1))), "Dec 2023");
        assert_eq!(MonthCursor::containing(date(2024, 3, 1)).title(), "March 2024");
        assert_eq!(format_optional_date(None), NOT_SELECTED);
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_iso_date(" 2024-03-10 ").expect("parse"), date(2024, 3, 10));
        assert!(parse_iso_date("2024-13-01").is_err());
        assert!(parse_iso_date("").is_err());
    }
}
