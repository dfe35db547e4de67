use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::date::parse_iso_date;
use crate::selector::Intent;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rangepick",
    version,
    about = "Replays date-range selector intents and prints the result",
    after_help = "INTENTS: toggle, tab=<today|thisMonth|lastMonth|thisYear|tillDate>, \
                  click=<start|end>:<YYYY-MM-DD>, clear, prev=<start|end>, next=<start|end>, \
                  month=<start|end>:<0-11>, dropdown=<start|end>, apply"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Pin "today" instead of reading the clock.
    #[arg(long = "today", value_parser = clap::builder::ValueParser::new(parse_iso_date))]
    pub today: Option<NaiveDate>,

    /// Emit selections and the final view as JSON.
    #[arg(long = "json")]
    pub json: bool,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub intents: Vec<String>,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[tracing::instrument(skip(tokens))]
pub fn parse_intents(tokens: &[String]) -> anyhow::Result<Vec<Intent>> {
    tokens
        .iter()
        .enumerate()
        .map(|(idx, token)| {
            let intent = token
                .parse::<Intent>()
                .with_context(|| format!("invalid intent #{}: {token}", idx + 1))?;
            debug!(token = %token, ?intent, "parsed intent");
            Ok(intent)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::CalendarSide;

    #[test]
    fn parses_flags_and_trailing_intents() {
        let cli = GlobalCli::try_parse_from([
            "rangepick",
            "-vv",
            "--today",
            "2024-03-25",
            "--rc",
            "color=off",
            "--json",
            "toggle",
            "click=end:2024-03-10",
            "apply",
        ])
        .expect("parse cli");

        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 3, 25));
        assert_eq!(cli.rc_overrides.len(), 1);
        assert_eq!(cli.rc_overrides[0].key, "color");
        assert_eq!(cli.intents.len(), 3);
    }

    #[test]
    fn rejects_bad_today() {
        assert!(GlobalCli::try_parse_from(["rangepick", "--today", "yesterday"]).is_err());
    }

    #[test]
    fn intent_errors_name_the_position() {
        let tokens = vec!["toggle".to_string(), "click=end:2024-02-30".to_string()];
        let err = parse_intents(&tokens).expect_err("bad date");
        assert!(format!("{err:#}").contains("invalid intent #2"));

        let ok = parse_intents(&["dropdown=end".to_string()]).expect("parse");
        assert_eq!(ok, vec![Intent::ToggleMonthDropdown(CalendarSide::End)]);
    }
}
