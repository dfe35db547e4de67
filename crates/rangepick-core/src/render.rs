use std::io::{self, IsTerminal, Write};

use chrono::Datelike;

use crate::config::Config;
use crate::grid::{DayCell, DayClass, weeks};
use crate::picker::{CalendarView, PickerView};
use crate::selector::{PanelBody, PanelView, Selection, SelectorView};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: cfg.color && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn write_selection<W: Write>(&self, out: &mut W, selection: &Selection) -> anyhow::Result<()> {
        writeln!(
            out,
            "selected  {} ({})",
            self.paint(&selection.label, "1"),
            selection.tab
        )?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    pub fn write_view<W: Write>(&self, out: &mut W, view: &SelectorView) -> anyhow::Result<()> {
        writeln!(out, "[ {} ]", view.label)?;
        if let Some(panel) = &view.panel {
            self.write_panel(out, panel)?;
        }
        Ok(())
    }

    fn write_panel<W: Write>(&self, out: &mut W, panel: &PanelView) -> anyhow::Result<()> {
        let tabs = panel
            .tabs
            .iter()
            .map(|tab| {
                if tab.active {
                    self.paint(&format!("*{}*", tab.label), "1")
                } else {
                    tab.label.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(out, "  {tabs}")?;
        writeln!(out)?;

        match &panel.body {
            PanelBody::Period { heading, label } => {
                writeln!(out, "  {heading}")?;
                writeln!(out, "  {label}")?;
            }
            PanelBody::Picker(picker) => self.write_picker(out, picker)?,
        }
        Ok(())
    }

    fn write_picker<W: Write>(&self, out: &mut W, picker: &PickerView) -> anyhow::Result<()> {
        self.write_calendar(out, &picker.start)?;
        writeln!(out)?;
        self.write_calendar(out, &picker.end)?;
        writeln!(out)?;

        writeln!(out, "  Start Date  {}", picker.start_text)?;
        writeln!(out, "  End Date    {}", picker.end_text)?;
        let apply = if picker.can_apply {
            "[Apply]".to_string()
        } else {
            self.paint("(Apply)", "2")
        };
        writeln!(out, "  [Clear] {apply}")?;
        Ok(())
    }

    fn write_calendar<W: Write>(&self, out: &mut W, calendar: &CalendarView) -> anyhow::Result<()> {
        let caret = if calendar.dropdown_open { '^' } else { 'v' };
        writeln!(out, "  {} {caret}   ({})", calendar.title, calendar.side)?;

        if calendar.dropdown_open {
            for option in &calendar.month_options {
                let mark = if option.current { '>' } else { ' ' };
                writeln!(out, "   {mark} {:>2} {}", option.month_index, option.label)?;
            }
        }

        let header = calendar
            .weekdays
            .iter()
            .map(|day| format!("{day:>4}"))
            .collect::<String>();
        writeln!(out, "  {header}")?;

        for week in weeks(&calendar.cells) {
            let row = week.iter().map(|cell| self.cell_text(cell)).collect::<String>();
            writeln!(out, "  {}", row.trim_end())?;
        }
        Ok(())
    }

    fn cell_text(&self, cell: &DayCell) -> String {
        let DayCell::Day { date, flags, class, .. } = cell else {
            return "    ".to_string();
        };
        let day = date.day();

        match class {
            DayClass::Selected => self.paint(&format!("[{day:>2}]"), "7"),
            DayClass::InRange if flags.shows_today_marker() => {
                self.paint(&format!("({day:>2}*"), "34;4")
            }
            DayClass::InRange => self.paint(&format!("({day:>2})"), "34"),
            DayClass::Today => self.paint(&format!(" {day:>2}*"), "4"),
            DayClass::Plain => format!(" {day:>2} "),
            DayClass::Future => self.paint(&format!(" {day:>2}-"), "2"),
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::clock::FixedClock;
    use crate::date::MonthCursor;
    use crate::grid::build_grid;
    use crate::preset::Preset;
    use crate::range::{CalendarSide, RangeSelection};
    use crate::selector::{DateRangeSelector, Intent};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn render(view: &SelectorView) -> String {
        let mut buf = Vec::new();
        Renderer::plain()
            .write_view(&mut buf, view)
            .expect("render view");
        String::from_utf8(buf).expect("utf8 output")
    }

    #[test]
    fn closed_selector_shows_only_trigger() {
        let sel = DateRangeSelector::new(FixedClock(date(2024, 3, 15)));
        assert_eq!(render(&sel.view()), "[ Select date ]\n");
    }

    #[test]
    fn picker_marks_bounds_range_today_and_future() {
        let mut sel = DateRangeSelector::new(FixedClock(date(2024, 3, 15)));
        sel.dispatch(Intent::Toggle);
        sel.dispatch(Intent::ClickDay(CalendarSide::Start, date(2024, 3, 4)));
        sel.dispatch(Intent::ClickDay(CalendarSide::End, date(2024, 3, 6)));

        let text = render(&sel.view());
        assert!(text.contains("*Till Date*"));
        assert!(text.contains("March 2024 v"));
        assert!(text.contains("April 2024 v"));
        assert!(text.contains("[ 4]( 5)[ 6]"));
        assert!(text.contains(" 15*"));
        assert!(text.contains(" 16-"));
        assert!(text.contains("Start Date  Mar 4, 2024"));
        assert!(text.contains("[Clear] [Apply]"));
    }

    #[test]
    fn today_inside_range_keeps_its_marker() {
        let today = date(2024, 3, 15);
        let sel = RangeSelection::from_bounds(Some(date(2024, 3, 1)), Some(date(2024, 3, 20)));
        let cells = build_grid(MonthCursor::containing(today), &sel, today);
        let row = weeks(&cells)
            .find(|week| week.iter().any(|cell| cell.date() == Some(today)))
            .expect("week containing today");

        let renderer = Renderer::plain();
        let text = row.iter().map(|cell| renderer.cell_text(cell)).collect::<String>();
        assert!(text.contains("(14)(15*(16)"));
    }

    #[test]
    fn open_dropdown_lists_months() {
        let mut sel = DateRangeSelector::new(FixedClock(date(2024, 3, 15)));
        sel.dispatch(Intent::Toggle);
        sel.dispatch(Intent::ToggleMonthDropdown(CalendarSide::Start));

        let text = render(&sel.view());
        assert!(text.contains("March 2024 ^"));
        assert!(text.contains(">  2 March 2024"));
        assert!(text.contains("11 December 2024"));
        assert!(text.contains("(Apply)"));
    }

    #[test]
    fn preset_body_shows_period() {
        let mut sel = DateRangeSelector::new(FixedClock(date(2024, 3, 15)));
        sel.dispatch(Intent::Toggle);
        sel.dispatch(Intent::SelectTab(Preset::ThisMonth));
        sel.dispatch(Intent::Toggle);

        let text = render(&sel.view());
        assert!(text.starts_with("[ Mar 2024 ]\n"));
        assert!(text.contains("Selected Period\n  Mar 2024"));
    }
}
