use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::Serialize;

use crate::date::format_display_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSide {
    Start,
    End,
}

impl CalendarSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarSide::Start => "start",
            CalendarSide::End => "end",
        }
    }
}

impl fmt::Display for CalendarSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarSide {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Ok(CalendarSide::Start),
            "end" | "e" => Ok(CalendarSide::End),
            other => Err(anyhow!("expected start or end calendar, got: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickCase {
    Future,
    StartKeepEnd,
    StartDropEnd,
    EndFirstPick,
    EndSwap,
    EndExtend,
}

/// An inclusive pair of optional bounds. When both are set, `start <= end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RangeSelection {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl RangeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(a), Some(b)) if b < a => Self {
                start: Some(b),
                end: Some(a),
            },
            _ => Self { start, end },
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn classify_click(
        &self,
        side: CalendarSide,
        date: NaiveDate,
        today: NaiveDate,
    ) -> ClickCase {
        if date > today {
            return ClickCase::Future;
        }

        match (side, self.start, self.end) {
            (CalendarSide::Start, _, Some(end)) if end < date => ClickCase::StartDropEnd,
            (CalendarSide::Start, _, _) => ClickCase::StartKeepEnd,
            (CalendarSide::End, None, _) => ClickCase::EndFirstPick,
            (CalendarSide::End, Some(start), _) if date < start => ClickCase::EndSwap,
            (CalendarSide::End, Some(_), _) => ClickCase::EndExtend,
        }
    }

    pub fn click(&mut self, side: CalendarSide, date: NaiveDate, today: NaiveDate) -> ClickCase {
        let case = self.classify_click(side, date, today);
        match case {
            ClickCase::Future => {}
            ClickCase::StartKeepEnd => {
                self.start = Some(date);
            }
            ClickCase::StartDropEnd => {
                self.start = Some(date);
                self.end = None;
            }
            ClickCase::EndFirstPick => {
                self.start = Some(date);
                self.end = Some(date);
            }
            ClickCase::EndSwap => {
                self.end = self.start;
                self.start = Some(date);
            }
            ClickCase::EndExtend => {
                self.end = Some(date);
            }
        }
        case
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }

    pub fn is_endpoint(&self, date: NaiveDate) -> bool {
        self.start == Some(date) || self.end == Some(date)
    }

    pub fn display(&self) -> Option<String> {
        let (start, end) = (self.start?, self.end?);
        Some(format!(
            "{} - {}",
            format_display_date(start),
            format_display_date(end)
        ))
    }
}
