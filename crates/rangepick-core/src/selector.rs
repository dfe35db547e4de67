use std::str::FromStr;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::date::{Direction, parse_iso_date};
use crate::picker::{PickerView, RangePicker};
use crate::preset::{DEFAULT_LABEL, Preset};
use crate::range::CalendarSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Toggle,
    SelectTab(Preset),
    ClickDay(CalendarSide, NaiveDate),
    Clear,
    NavigateMonth(CalendarSide, Direction),
    JumpToMonth(CalendarSide, u32),
    ToggleMonthDropdown(CalendarSide),
    Apply,
}

/// Text form used by the CLI:
///
/// `toggle`, `tab=<id>`, `click=<side>:<YYYY-MM-DD>`, `clear`,
/// `prev=<side>`, `next=<side>`, `month=<side>:<0-11>`, `dropdown=<side>`,
/// `apply`.
impl FromStr for Intent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let (name, arg) = match token.split_once('=') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (token, None),
        };
        let need_arg = || arg.ok_or_else(|| anyhow!("intent {name} needs an argument"));

        let intent = match name.to_ascii_lowercase().as_str() {
            "toggle" | "open" | "close" => Intent::Toggle,
            "clear" => Intent::Clear,
            "apply" => Intent::Apply,
            "tab" => Intent::SelectTab(need_arg()?.parse()?),
            "prev" => Intent::NavigateMonth(need_arg()?.parse()?, Direction::Prev),
            "next" => Intent::NavigateMonth(need_arg()?.parse()?, Direction::Next),
            "dropdown" => Intent::ToggleMonthDropdown(need_arg()?.parse()?),
            "click" => {
                let (side, date) = split_side(need_arg()?)?;
                Intent::ClickDay(side, parse_iso_date(date)?)
            }
            "month" => {
                let (side, index) = split_side(need_arg()?)?;
                let index = index
                    .parse::<u32>()
                    .with_context(|| format!("invalid month index: {index}"))?;
                Intent::JumpToMonth(side, index)
            }
            other => return Err(anyhow!("unknown intent: {other}")),
        };

        if arg.is_some()
            && matches!(intent, Intent::Toggle | Intent::Clear | Intent::Apply)
        {
            return Err(anyhow!("intent {name} takes no argument"));
        }

        Ok(intent)
    }
}

fn split_side(arg: &str) -> anyhow::Result<(CalendarSide, &str)> {
    let (side, rest) = arg
        .split_once(':')
        .ok_or_else(|| anyhow!("expected <start|end>:<value>, got: {arg}"))?;
    Ok((side.parse()?, rest.trim()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub label: String,
    pub tab: Preset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabView {
    pub preset: Preset,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PanelBody {
    Picker(PickerView),
    Period { heading: &'static str, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub tabs: Vec<TabView>,
    pub body: PanelBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorView {
    pub label: String,
    pub panel: Option<PanelView>,
}

#[derive(Debug)]
pub struct DateRangeSelector<C> {
    clock: C,
    label: String,
    open: bool,
    active_tab: Preset,
    picker: Option<RangePicker>,
}

impl<C: Clock> DateRangeSelector<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            label: DEFAULT_LABEL.to_string(),
            open: false,
            active_tab: Preset::TillDate,
            picker: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn active_tab(&self) -> Preset {
        self.active_tab
    }

    pub fn picker(&self) -> Option<&RangePicker> {
        self.picker.as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    #[tracing::instrument(skip(self))]
    pub fn dispatch(&mut self, intent: Intent) -> Option<Selection> {
        let today = self.clock.today();
        if let Some(picker) = self.picker.as_mut() {
            picker.set_today(today);
        }

        match intent {
            Intent::Toggle => {
                self.set_open(!self.open, today);
                None
            }
            Intent::SelectTab(tab) => self.select_tab(tab, today),
            Intent::Apply => {
                let label = self.picker.as_ref()?.apply()?;
                Some(self.commit(label, Preset::TillDate))
            }
            Intent::ClickDay(side, date) => {
                self.with_picker(|picker| {
                    picker.click_day(date, side);
                });
                None
            }
            Intent::Clear => {
                self.with_picker(RangePicker::clear);
                None
            }
            Intent::NavigateMonth(side, direction) => {
                self.with_picker(|picker| picker.navigate_month(side, direction));
                None
            }
            Intent::JumpToMonth(side, month_index) => {
                self.with_picker(|picker| {
                    picker.jump_to_month(side, month_index);
                });
                None
            }
            Intent::ToggleMonthDropdown(side) => {
                self.with_picker(|picker| picker.toggle_month_dropdown(side));
                None
            }
        }
    }

    fn with_picker(&mut self, f: impl FnOnce(&mut RangePicker)) {
        match self.picker.as_mut() {
            Some(picker) => f(picker),
            None => debug!("no range picker on screen; intent ignored"),
        }
    }

    fn set_open(&mut self, open: bool, today: NaiveDate) {
        self.open = open;
        if open && self.active_tab.is_custom_range() {
            self.picker = Some(RangePicker::open(today));
        } else if !open {
            self.picker = None;
        }
        debug!(open, tab = %self.active_tab, "panel toggled");
    }

    fn select_tab(&mut self, tab: Preset, today: NaiveDate) -> Option<Selection> {
        if !self.open {
            debug!(%tab, "panel closed; tab selection ignored");
            return None;
        }

        self.active_tab = tab;
        match tab.resolve(today) {
            Some(label) => Some(self.commit(label, tab)),
            None => {
                if self.picker.is_none() {
                    self.picker = Some(RangePicker::open(today));
                }
                None
            }
        }
    }

    fn commit(&mut self, label: String, tab: Preset) -> Selection {
        info!(label = %label, %tab, "selection committed");
        self.label = label.clone();
        self.open = false;
        self.picker = None;
        Selection { label, tab }
    }

    pub fn view(&self) -> SelectorView {
        let panel = self.open.then(|| {
            let tabs = Preset::ALL
                .into_iter()
                .map(|preset| TabView {
                    preset,
                    label: preset.tab_label(),
                    active: preset == self.active_tab,
                })
                .collect();

            let body = match (&self.picker, self.active_tab.resolve(self.clock.today())) {
                (Some(picker), _) => PanelBody::Picker(picker.view()),
                (None, label) => PanelBody::Period {
                    heading: "Selected Period",
                    label: label.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
                },
            };

            PanelView { tabs, body }
        });

        SelectorView {
            label: self.label.clone(),
            panel,
        }
    }
}
