//! Mutating commands: `set`, `remove`, `sort`.
use std::io::Write;

use anyhow::{Context as _, Result};

use super::{open_target, review_and_save};
use crate::cli::{GlobalOpts, IniOpts, RemoveOpts, SetOpts};
use crate::context::AppContext;

/// Assign one setting, then review and save.
///
/// # Errors
///
/// Returns an error if the INI is unknown, cannot be opened, or cannot be
/// saved.
pub fn set(
    opts: &SetOpts,
    global: &GlobalOpts,
    ctx: &mut AppContext,
    out: &mut dyn Write,
) -> Result<()> {
    let (ini, store) = open_target(ctx, &opts.ini)?;
    let written = store
        .borrow_mut()
        .assign(&opts.section, &opts.setting, &opts.value)
        .with_context(|| format!("cannot set {} in {ini}", opts.setting))?;
    if !written {
        tracing::info!("[{}] {} in {ini} already has that value", opts.section, opts.setting);
    }
    if opts.sort {
        store.borrow_mut().sort();
    }
    review_and_save(ctx, global.dry_run, opts.sort, out)?;
    Ok(())
}

/// Remove a setting, or a whole section when no setting is given, then
/// review and save.
///
/// # Errors
///
/// Returns an error if the INI is unknown, cannot be opened, or cannot be
/// saved.
pub fn remove(
    opts: &RemoveOpts,
    global: &GlobalOpts,
    ctx: &mut AppContext,
    out: &mut dyn Write,
) -> Result<()> {
    let (ini, store) = open_target(ctx, &opts.ini)?;
    let removed = match &opts.setting {
        Some(setting) => store.borrow_mut().remove_setting(&opts.section, setting),
        None => store.borrow_mut().remove_section(&opts.section),
    };
    if !removed {
        let what = opts.setting.as_deref().map_or_else(
            || format!("[{}]", opts.section),
            |setting| format!("[{}] {setting}", opts.section),
        );
        tracing::warn!("{what} does not exist in {ini}");
    }
    review_and_save(ctx, global.dry_run, false, out)?;
    Ok(())
}

/// Sort sections and settings by name, then review and save.
///
/// # Errors
///
/// Returns an error if the INI is unknown, cannot be opened, or cannot be
/// saved.
pub fn sort(
    opts: &IniOpts,
    global: &GlobalOpts,
    ctx: &mut AppContext,
    out: &mut dyn Write,
) -> Result<()> {
    let (_, store) = open_target(ctx, &opts.ini)?;
    store.borrow_mut().sort();
    review_and_save(ctx, global.dry_run, true, out)?;
    Ok(())
}
