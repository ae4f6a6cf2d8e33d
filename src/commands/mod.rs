//! Subcommand implementations.
//!
//! Every command writes its user-facing output to a caller-supplied writer;
//! progress and diagnostics go through `tracing`.
pub mod edit;
pub mod preferences;
pub mod preset;
pub mod query;
pub mod version;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::{Command, GlobalOpts};
use crate::context::AppContext;
use crate::ini::{IniName, SharedIni};
use crate::logging::{DRY_RUN_TARGET, STAGE_TARGET};

/// Environment variable naming the application directory.
pub const ROOT_ENV: &str = "BETHINI_ROOT";

/// Determine the application directory: `--root`, then `BETHINI_ROOT`, then
/// the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(root) = &global.root {
        return Ok(root.clone());
    }
    if let Ok(root) = std::env::var(ROOT_ENV)
        && !root.is_empty()
    {
        return Ok(PathBuf::from(root));
    }
    std::env::current_dir().context("cannot determine the application directory")
}

/// Load the game named by `--game`, or the `sAppName` preference.
///
/// A game named on the command line must load. A game remembered in the
/// preferences that no longer loads is reported and skipped, so commands on
/// `Bethini.ini` keep working.
///
/// # Errors
///
/// Returns an error if `--game` names a game that cannot be loaded.
pub fn select_game(ctx: &mut AppContext, global: &GlobalOpts) -> Result<()> {
    if let Some(game) = &global.game {
        ctx.load_game(game)
            .with_context(|| format!("failed to load game '{game}'"))?;
        return Ok(());
    }
    if let Some(game) = ctx.preferences().app_name
        && let Err(e) = ctx.load_game(&game)
    {
        tracing::warn!("ignoring saved game '{game}': {e}");
    }
    Ok(())
}

/// Run `command` against `ctx`.
///
/// # Errors
///
/// Returns an error if the command fails.
pub fn run(
    command: &Command,
    global: &GlobalOpts,
    ctx: &mut AppContext,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Get(opts) => query::get(opts, ctx, out),
        Command::Set(opts) => edit::set(opts, global, ctx, out),
        Command::Remove(opts) => edit::remove(opts, global, ctx, out),
        Command::Sections(opts) => query::sections(opts, ctx, out),
        Command::Settings(opts) => query::settings(opts, ctx, out),
        Command::Resolve(opts) => query::resolve(opts, ctx, out),
        Command::Sort(opts) => edit::sort(opts, global, ctx, out),
        Command::Preset(opts) => preset::run(opts, global, ctx, out),
        Command::Prefs(opts) => preferences::run(opts, global, ctx, out),
        Command::Version => version::run(out),
    }
}

/// Look up `name` and return its live store.
pub(crate) fn open_target(ctx: &mut AppContext, name: &str) -> Result<(IniName, SharedIni)> {
    let ini = ctx.find_ini(name)?;
    let store = ctx
        .open_ini(&ini)
        .with_context(|| format!("failed to open {ini}"))?;
    Ok((ini, store))
}

/// Print pending changes for every modified file, then save them unless
/// `dry_run`. Game INIs are sorted before saving when `sort` is set.
///
/// Returns how many files were written.
pub(crate) fn review_and_save(
    ctx: &AppContext,
    dry_run: bool,
    sort: bool,
    out: &mut dyn Write,
) -> Result<usize> {
    let modified: Vec<SharedIni> = ctx.registry().modified().cloned().collect();
    if modified.is_empty() {
        writeln!(out, "No changes.")?;
        return Ok(0);
    }

    for store in &modified {
        let store = store.borrow();
        tracing::info!(target: STAGE_TARGET, "{}", store.name());
        writeln!(out, "{}:", store.name())?;
        if store.changes().is_empty() {
            writeln!(out, "  (order only)")?;
        }
        for change in store.changes() {
            writeln!(out, "  {change}")?;
        }
    }

    if dry_run {
        tracing::info!(target: DRY_RUN_TARGET, "{} file(s) left unsaved", modified.len());
        writeln!(out, "Dry run: nothing saved.")?;
        return Ok(0);
    }
    let saved = ctx.save_all(sort).context("failed to save INI files")?;
    writeln!(out, "Saved {saved} file(s).")?;
    Ok(saved)
}
