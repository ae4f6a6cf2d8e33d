//! `bethini` command-line entry point.
use std::io;

use anyhow::{Context as _, Result};
use bethini::cli::{Cli, Command};
use bethini::commands;
use bethini::context::AppContext;
use bethini::logging::{self, LogSettings};
use bethini::preferences::{self, Preferences};
use clap::Parser;
use tracing::level_filters::LevelFilter;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let mut out = io::stdout().lock();

    if matches!(args.command, Command::Version) {
        return commands::version::run(&mut out);
    }

    let root = commands::resolve_root(&args.global)?;
    let mut ctx = AppContext::open(&root)
        .with_context(|| format!("failed to open Bethini.ini in {}", root.display()))?;

    let (prefs, invalid) = Preferences::read(&ctx.app_config().borrow());
    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        prefs.log_level.into()
    };
    if let Some(path) = logging::init_subscriber(&LogSettings {
        level,
        root: Some(&root),
        command: args.command.name(),
        max_logs: prefs.max_logs,
    }) {
        tracing::debug!("logging to {}", path.display());
    }
    preferences::warn_invalid(&invalid);

    commands::select_game(&mut ctx, &args.global)?;
    commands::run(&args.command, &args.global, &mut ctx, &mut out)
}
