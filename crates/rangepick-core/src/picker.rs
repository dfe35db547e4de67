use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::date::{Direction, MONTH_NAMES, MonthCursor, WEEKDAY_LABELS, format_optional_date};
use crate::grid::{DayCell, build_grid};
use crate::range::{CalendarSide, ClickCase, RangeSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CalendarPane {
    month: MonthCursor,
    dropdown_open: bool,
}

impl CalendarPane {
    fn new(month: MonthCursor) -> Self {
        Self {
            month,
            dropdown_open: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePicker {
    selection: RangeSelection,
    start_pane: CalendarPane,
    end_pane: CalendarPane,
    today: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    pub month_index: u32,
    pub label: String,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    pub side: CalendarSide,
    pub month: MonthCursor,
    pub title: String,
    pub weekdays: [&'static str; 7],
    pub cells: Vec<DayCell>,
    pub dropdown_open: bool,
    pub month_options: Vec<MonthOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerView {
    pub start: CalendarView,
    pub end: CalendarView,
    pub start_text: String,
    pub end_text: String,
    pub can_apply: bool,
}

impl RangePicker {
    pub fn open(today: NaiveDate) -> Self {
        let current = MonthCursor::containing(today);
        Self {
            selection: RangeSelection::new(),
            start_pane: CalendarPane::new(current),
            end_pane: CalendarPane::new(current.shift(1)),
            today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        if today != self.today {
            debug!(from = %self.today, to = %today, "today changed");
            self.today = today;
        }
    }

    pub fn selection(&self) -> &RangeSelection {
        &self.selection
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.selection.start()
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.selection.end()
    }

    pub fn displayed_month(&self, side: CalendarSide) -> MonthCursor {
        self.pane(side).month
    }

    pub fn is_dropdown_open(&self, side: CalendarSide) -> bool {
        self.pane(side).dropdown_open
    }

    fn pane(&self, side: CalendarSide) -> &CalendarPane {
        match side {
            CalendarSide::Start => &self.start_pane,
            CalendarSide::End => &self.end_pane,
        }
    }

    fn pane_mut(&mut self, side: CalendarSide) -> &mut CalendarPane {
        match side {
            CalendarSide::Start => &mut self.start_pane,
            CalendarSide::End => &mut self.end_pane,
        }
    }

    #[tracing::instrument(skip(self), fields(today = %self.today))]
    pub fn click_day(&mut self, date: NaiveDate, side: CalendarSide) -> ClickCase {
        let case = self.selection.click(side, date, self.today);
        if case == ClickCase::Future {
            debug!("ignored click on a future day");
        } else {
            debug!(
                ?case,
                start = ?self.selection.start(),
                end = ?self.selection.end(),
                "selection updated"
            );
        }
        case
    }

    #[tracing::instrument(skip(self))]
    pub fn clear(&mut self) {
        self.selection.clear();
    }

    #[tracing::instrument(skip(self))]
    pub fn navigate_month(&mut self, side: CalendarSide, direction: Direction) {
        let pane = self.pane_mut(side);
        pane.month = pane.month.step(direction);
        debug!(month = %pane.month, "navigated");
    }

    #[tracing::instrument(skip(self))]
    pub fn jump_to_month(&mut self, side: CalendarSide, month_index: u32) -> bool {
        let pane = self.pane_mut(side);
        let Some(month) = pane.month.with_month_index(month_index) else {
            debug!("ignored out-of-range month index");
            return false;
        };
        pane.month = month;
        pane.dropdown_open = false;
        debug!(month = %pane.month, "jumped to month");
        true
    }

    #[tracing::instrument(skip(self))]
    pub fn toggle_month_dropdown(&mut self, side: CalendarSide) {
        let pane = self.pane_mut(side);
        pane.dropdown_open = !pane.dropdown_open;
    }

    pub fn is_in_range(&self, date: NaiveDate) -> bool {
        self.selection.contains(date)
    }

    pub fn is_selected(&self, date: NaiveDate) -> bool {
        self.selection.is_endpoint(date)
    }

    pub fn can_apply(&self) -> bool {
        self.selection.is_complete()
    }

    #[tracing::instrument(skip(self))]
    pub fn apply(&self) -> Option<String> {
        let label = self.selection.display();
        if label.is_none() {
            debug!("apply ignored; range incomplete");
        }
        label
    }

    pub fn calendar_view(&self, side: CalendarSide) -> CalendarView {
        let pane = self.pane(side);
        let year = pane.month.year();
        let month_options = MONTH_NAMES
            .iter()
            .zip(0_u32..)
            .map(|(name, month_index)| MonthOption {
                month_index,
                label: format!("{name} {year}"),
                current: month_index == pane.month.month_index(),
            })
            .collect();

        CalendarView {
            side,
            month: pane.month,
            title: pane.month.title(),
            weekdays: WEEKDAY_LABELS,
            cells: build_grid(pane.month, &self.selection, self.today),
            dropdown_open: pane.dropdown_open,
            month_options,
        }
    }

    pub fn view(&self) -> PickerView {
        PickerView {
            start: self.calendar_view(CalendarSide::Start),
            end: self.calendar_view(CalendarSide::End),
            start_text: format_optional_date(self.selection.start()),
            end_text: format_optional_date(self.selection.end()),
            can_apply: self.can_apply(),
        }
    }
}
