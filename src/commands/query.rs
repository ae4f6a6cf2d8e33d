//! Read-only commands: `get`, `sections`, `settings`, `resolve`.
use std::io::Write;

use anyhow::{Result, bail};

use super::open_target;
use crate::cli::{IniOpts, LookupOpts, SettingsOpts};
use crate::context::AppContext;

/// Print the value of one setting.
///
/// # Errors
///
/// Returns an error if the INI is unknown or cannot be opened, or the
/// setting is not present.
pub fn get(opts: &LookupOpts, ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    let (ini, store) = open_target(ctx, &opts.ini)?;
    let store = store.borrow();
    let Some(value) = store.get_value(&opts.section, &opts.setting) else {
        bail!("[{}] {} is not set in {ini}", opts.section, opts.setting);
    };
    writeln!(out, "{value}")?;
    Ok(())
}

/// Print section names in file order.
///
/// # Errors
///
/// Returns an error if the INI is unknown or cannot be opened.
pub fn sections(opts: &IniOpts, ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    let (_, store) = open_target(ctx, &opts.ini)?;
    for section in store.borrow().sections() {
        writeln!(out, "{section}")?;
    }
    Ok(())
}

/// Print the setting names of a section in file order.
///
/// # Errors
///
/// Returns an error if the INI is unknown or cannot be opened.
pub fn settings(opts: &SettingsOpts, ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    let (_, store) = open_target(ctx, &opts.ini)?;
    for setting in store.borrow().settings(&opts.section, opts.original_case) {
        writeln!(out, "{setting}")?;
    }
    Ok(())
}

/// Print the file that supplies a setting, and its value there if set.
///
/// # Errors
///
/// Returns an error if the INI is unknown or a candidate file cannot be
/// opened.
pub fn resolve(opts: &LookupOpts, ctx: &mut AppContext, out: &mut dyn Write) -> Result<()> {
    let ini = ctx.find_ini(&opts.ini)?;
    let winner = ctx.resolve(&ini, &opts.section, &opts.setting)?;
    let mut value = None;
    if ctx.locate(&winner)?.is_some() {
        let store = ctx.open_ini(&winner)?;
        value = store
            .borrow()
            .get_value(&opts.section, &opts.setting)
            .map(str::to_string);
    }
    match value {
        Some(value) => writeln!(out, "{winner}: {value}")?,
        None => writeln!(out, "{winner}: <unset>")?,
    }
    Ok(())
}
