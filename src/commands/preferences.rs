//! Command: show or change application preferences.
use std::io::Write;

use anyhow::Result;

use super::review_and_save;
use crate::cli::{GlobalOpts, PrefsOpts};
use crate::context::AppContext;
use crate::preferences::Preferences;

/// Print the preferences, or apply the given changes and save.
///
/// # Errors
///
/// Returns an error if `Bethini.ini` cannot be saved.
pub fn run(
    opts: &PrefsOpts,
    global: &GlobalOpts,
    ctx: &mut AppContext,
    out: &mut dyn Write,
) -> Result<()> {
    let current = ctx.preferences();
    if !opts.has_changes() {
        write!(out, "{current}")?;
        return Ok(());
    }

    let updated = Preferences {
        app_name: opts.app_name.clone().or(current.app_name),
        log_level: opts.log_level.unwrap_or(current.log_level),
        max_backups: opts.max_backups.unwrap_or(current.max_backups),
        max_logs: opts.max_logs.unwrap_or(current.max_logs),
        always_select_game: opts.always_select_game.unwrap_or(current.always_select_game),
    };
    updated.apply(&mut ctx.app_config().borrow_mut())?;
    review_and_save(ctx, global.dry_run, false, out)?;
    Ok(())
}
