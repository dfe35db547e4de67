use chrono::NaiveDate;
use serde::Serialize;

use crate::date::MonthCursor;
use crate::range::RangeSelection;

pub const MAX_GRID_CELLS: usize = 42;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayFlags {
    pub is_today: bool,
    pub is_selected: bool,
    pub is_in_range: bool,
    pub is_future: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayClass {
    Selected,
    InRange,
    Today,
    Future,
    Plain,
}

impl DayFlags {
    pub fn class(&self) -> DayClass {
        if self.is_selected {
            DayClass::Selected
        } else if self.is_in_range {
            DayClass::InRange
        } else if self.is_today {
            DayClass::Today
        } else if self.is_future {
            DayClass::Future
        } else {
            DayClass::Plain
        }
    }

    /// The small dot under today's number, hidden once today is a bound.
    pub fn shows_today_marker(&self) -> bool {
        self.is_today && !self.is_selected
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayCell {
    Blank,
    Day {
        date: NaiveDate,
        flags: DayFlags,
        class: DayClass,
        clickable: bool,
    },
}

impl DayCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DayCell::Blank => None,
            DayCell::Day { date, .. } => Some(*date),
        }
    }

    pub fn class(&self) -> Option<DayClass> {
        match self {
            DayCell::Blank => None,
            DayCell::Day { class, .. } => Some(*class),
        }
    }
}

pub fn classify_day(date: NaiveDate, selection: &RangeSelection, today: NaiveDate) -> DayFlags {
    DayFlags {
        is_today: date == today,
        is_selected: selection.is_endpoint(date),
        is_in_range: selection.contains(date),
        is_future: date > today,
    }
}

#[tracing::instrument(level = "trace", skip(selection))]
pub fn build_grid(month: MonthCursor, selection: &RangeSelection, today: NaiveDate) -> Vec<DayCell> {
    let blanks = month.leading_blanks() as usize;
    let mut cells = Vec::with_capacity(blanks + month.days_in_month() as usize);
    cells.extend(std::iter::repeat_n(DayCell::Blank, blanks));

    for date in month.days() {
        let flags = classify_day(date, selection, today);
        cells.push(DayCell::Day {
            date,
            flags,
            class: flags.class(),
            clickable: !flags.is_future,
        });
    }

    debug_assert!(cells.len() <= MAX_GRID_CELLS);
    tracing::trace!(cells = cells.len(), blanks, "built month grid");
    cells
}

pub fn weeks(cells: &[DayCell]) -> impl Iterator<Item = &[DayCell]> {
    cells.chunks(7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::CalendarSide;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn month(y: i32, m: u32) -> MonthCursor {
        MonthCursor::new(y, m).expect("valid month")
    }

    fn cell_for(cells: &[DayCell], day: NaiveDate) -> DayCell {
        cells
            .iter()
            .find(|cell| cell.date() == Some(day))
            .cloned()
            .expect("day present in grid")
    }

    #[test]
    fn march_2024_starts_on_friday() {
        let cells = build_grid(month(2024, 3), &RangeSelection::new(), date(2024, 6, 1));
        assert_eq!(cells.len(), 5 + 31);
        assert!(cells[..5].iter().all(|cell| *cell == DayCell::Blank));
        assert_eq!(cells[5].date(), Some(date(2024, 3, 1)));
        assert_eq!(cells.last().and_then(DayCell::date), Some(date(2024, 3, 31)));
    }

    #[test]
    fn grid_never_exceeds_six_weeks() {
        let today = date(2030, 1, 1);
        let mut cursor = month(2020, 1);
        for _ in 0..120 {
            let cells = build_grid(cursor, &RangeSelection::new(), today);
            assert!(cells.len() <= MAX_GRID_CELLS, "{cursor} has {} cells", cells.len());
            assert!(weeks(&cells).count() <= 6);
            cursor = cursor.shift(1);
        }
    }

    #[test]
    fn february_starting_sunday_has_no_blanks() {
        // 2026-02-01 is a Sunday.
        let cells = build_grid(month(2026, 2), &RangeSelection::new(), date(2026, 3, 1));
        assert_eq!(cells.len(), 28);
        assert_eq!(weeks(&cells).count(), 4);
    }

    #[test]
    fn future_days_are_disabled() {
        let today = date(2024, 3, 15);
        let cells = build_grid(month(2024, 3), &RangeSelection::new(), today);

        match cell_for(&cells, date(2024, 3, 16)) {
            DayCell::Day { class, clickable, .. } => {
                assert_eq!(class, DayClass::Future);
                assert!(!clickable);
            }
            DayCell::Blank => panic!("expected a day cell"),
        }
        assert_eq!(cell_for(&cells, today).class(), Some(DayClass::Today));
        assert_eq!(cell_for(&cells, date(2024, 3, 14)).class(), Some(DayClass::Plain));
    }

    #[test]
    fn selection_outranks_range_and_today() {
        let today = date(2024, 3, 15);
        let mut sel = RangeSelection::new();
        sel.click(CalendarSide::Start, date(2024, 3, 10), today);
        sel.click(CalendarSide::End, today, today);

        let cells = build_grid(month(2024, 3), &sel, today);
        assert_eq!(cell_for(&cells, date(2024, 3, 10)).class(), Some(DayClass::Selected));
        assert_eq!(cell_for(&cells, date(2024, 3, 12)).class(), Some(DayClass::InRange));
        assert_eq!(cell_for(&cells, today).class(), Some(DayClass::Selected));
        assert_eq!(cell_for(&cells, date(2024, 3, 9)).class(), Some(DayClass::Plain));
    }

    #[test]
    fn in_range_outranks_today() {
        let today = date(2024, 3, 15);
        let sel = RangeSelection::from_bounds(Some(date(2024, 3, 1)), Some(date(2024, 3, 20)));
        let flags = classify_day(today, &sel, date(2024, 3, 15));
        assert_eq!(flags.class(), DayClass::InRange);
        assert!(flags.shows_today_marker());
    }

    #[test]
    fn today_marker_hidden_when_selected() {
        let today = date(2024, 3, 15);
        let sel = RangeSelection::from_bounds(Some(today), Some(today));
        let flags = classify_day(today, &sel, today);
        assert!(flags.is_today && flags.is_selected);
        assert!(!flags.shows_today_marker());
    }
}
