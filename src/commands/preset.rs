//! Command: apply a named preset to the selected game's INI files.
use std::io::Write;

use anyhow::{Context as _, Result, bail};

use super::review_and_save;
use crate::cli::{GlobalOpts, PresetOpts};
use crate::context::AppContext;
use crate::ini::document::same_name;

/// Write every value of the preset into the file that currently supplies
/// the setting, then review and save.
///
/// Settings listed in `presetsIgnoreTheseSettings`, and settings without a
/// target INI, are skipped.
///
/// # Errors
///
/// Returns an error if no game is selected, the preset is empty, or a
/// target file cannot be opened or saved.
pub fn run(
    opts: &PresetOpts,
    global: &GlobalOpts,
    ctx: &mut AppContext,
    out: &mut dyn Write,
) -> Result<()> {
    let game = ctx
        .game()
        .context("no game selected; pass --game or set sAppName")?;
    let values = game.preset_values(&opts.name);
    if values.is_empty() {
        bail!("preset '{}' has no values for {}", opts.name, game.name());
    }
    let ignored = game.definition().presets_ignore_these_settings().to_vec();

    let mut applied = 0usize;
    for value in values {
        if ignored.iter().any(|name| same_name(name, &value.name)) {
            tracing::debug!("preset skips {}", value.name);
            continue;
        }
        let Some(ini) = value.ini else {
            tracing::warn!("{} has no target INI, skipped", value.name);
            continue;
        };
        let target = ctx.resolve(&ini, &value.section, &value.name)?;
        let store = ctx
            .open_ini(&target)
            .with_context(|| format!("failed to open {target}"))?;
        if store
            .borrow_mut()
            .assign(&value.section, &value.name, &value.value)
            .with_context(|| format!("preset value {} cannot be written to {target}", value.name))?
        {
            applied += 1;
        }
    }
    tracing::info!("preset '{}' changed {applied} setting(s)", opts.name);
    review_and_save(ctx, global.dry_run, opts.sort, out)?;
    Ok(())
}
