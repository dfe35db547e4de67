pub mod cli;
pub mod clock;
pub mod config;
pub mod date;
pub mod grid;
pub mod picker;
pub mod preset;
pub mod range;
pub mod render;
pub mod selector;

use std::ffi::OsString;
use std::io::Write;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use crate::clock::{Clock, FixedClock};
use crate::selector::DateRangeSelector;

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting rangepick"
    );

    let mut cfg = config::Config::load(cli.config.as_deref())?;
    cfg.apply_overrides(
        cli.rc_overrides
            .into_iter()
            .map(|kv| (kv.key, kv.value)),
    )
    .context("failed to apply --rc overrides")?;

    let clock: Box<dyn Clock> = match cli.today {
        Some(day) => {
            debug!(today = %day, "using pinned today");
            Box::new(FixedClock(day))
        }
        None => Box::new(cfg.clock()?),
    };

    let intents = cli::parse_intents(&cli.intents)?;
    let mut selector = DateRangeSelector::new(clock);
    let renderer = render::Renderer::new(&cfg);
    let mut stdout = std::io::stdout().lock();

    for intent in intents {
        let Some(selection) = selector.dispatch(intent) else {
            continue;
        };
        if cli.json {
            serde_json::to_writer(&mut stdout, &selection)?;
            writeln!(stdout)?;
        } else {
            renderer.write_selection(&mut stdout, &selection)?;
        }
    }

    let view = selector.view();
    if cli.json {
        serde_json::to_writer_pretty(&mut stdout, &view)?;
        writeln!(stdout)?;
    } else {
        renderer.write_view(&mut stdout, &view)?;
    }
    stdout.flush()?;

    info!("done");
    Ok(())
}
