use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::date::{MonthCursor, format_display_date, format_month_year};

pub const DEFAULT_LABEL: &str = "Select date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    Today,
    ThisMonth,
    LastMonth,
    ThisYear,
    TillDate,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Today,
        Preset::ThisMonth,
        Preset::LastMonth,
        Preset::ThisYear,
        Preset::TillDate,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Preset::Today => "today",
            Preset::ThisMonth => "thisMonth",
            Preset::LastMonth => "lastMonth",
            Preset::ThisYear => "thisYear",
            Preset::TillDate => "tillDate",
        }
    }

    pub fn tab_label(&self) -> &'static str {
        match self {
            Preset::Today => "Today",
            Preset::ThisMonth => "This Month",
            Preset::LastMonth => "Last Month",
            Preset::ThisYear => "This Year",
            Preset::TillDate => "Till Date",
        }
    }

    // Ids are matched exactly; the CLI goes through the forgiving `FromStr`.
    pub fn from_id(id: &str) -> Option<Preset> {
        Preset::ALL.into_iter().find(|preset| preset.id() == id)
    }

    pub fn is_custom_range(&self) -> bool {
        matches!(self, Preset::TillDate)
    }

    pub fn resolve(&self, today: NaiveDate) -> Option<String> {
        let label = match self {
            Preset::Today => format_display_date(today),
            Preset::ThisMonth => format_month_year(MonthCursor::containing(today)),
            Preset::LastMonth => format_month_year(MonthCursor::containing(today).shift(-1)),
            Preset::ThisYear => today.year().to_string(),
            Preset::TillDate => return None,
        };
        Some(label)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Preset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Preset::ALL
            .into_iter()
            .find(|preset| preset.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow!("unknown preset: {wanted}"))
    }
}

pub fn label_for(preset_id: &str, today: NaiveDate) -> String {
    Preset::from_id(preset_id)
        .and_then(|preset| preset.resolve(today))
        .unwrap_or_else(|| DEFAULT_LABEL.to_string())
}
