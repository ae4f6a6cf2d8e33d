//! Game definitions loaded from `<root>/apps/<game>/`.
//!
//! A game is described by two JSON files: `Bethini.json` declares its INI
//! files, their directory settings and pecking order; `settings.json` lists
//! every known setting with its default and preset values.
mod definition;
mod settings;

pub use definition::AppDefinition;
pub use settings::{GameSettings, SettingInfo, ini_text};

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::DefinitionError;
use crate::ini::IniName;
use crate::ini::document::same_name;

/// Directory under the application root holding one folder per game.
pub const APPS_DIR: &str = "apps";

/// A setting value destined for a specific INI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetValue {
    /// Setting name.
    pub name: String,
    /// Target INI, `None` when neither the setting nor the game names one.
    pub ini: Option<IniName>,
    /// Target section.
    pub section: String,
    /// Value as INI text.
    pub value: String,
}

/// A loaded game definition.
#[derive(Debug, Clone)]
pub struct Game {
    dir: PathBuf,
    definition: AppDefinition,
    settings: GameSettings,
}

/// Read and deserialize a JSON file.
fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, DefinitionError> {
    let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DefinitionError::Json {
        path: path.display().to_string(),
        source,
    })
}

impl Game {
    /// Load `<root>/apps/<name>/Bethini.json` and `settings.json`.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] if either file is missing or malformed.
    pub fn load(root: &Path, name: &str) -> Result<Self, DefinitionError> {
        let dir = root.join(APPS_DIR).join(name);
        let definition: AppDefinition = load_json(&dir.join("Bethini.json"))?;
        let settings: GameSettings = load_json(&dir.join("settings.json"))?;
        tracing::debug!(
            "loaded game {} ({} settings, {} INIs)",
            settings.game_name,
            settings.ini_values.len(),
            definition.inis().count()
        );
        Ok(Self::new(dir, definition, settings))
    }

    /// Assemble a game from already parsed parts.
    #[must_use]
    pub const fn new(dir: PathBuf, definition: AppDefinition, settings: GameSettings) -> Self {
        Self {
            dir,
            definition,
            settings,
        }
    }

    /// Folder the definition was loaded from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Display name of the game.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.settings.game_name
    }

    /// Contents of `Bethini.json`.
    #[must_use]
    pub const fn definition(&self) -> &AppDefinition {
        &self.definition
    }

    /// Contents of `settings.json`.
    #[must_use]
    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// INI a setting belongs to, falling back to the default INI.
    #[must_use]
    pub fn ini_for<'a>(&'a self, info: &'a SettingInfo) -> Option<&'a IniName> {
        info.ini.as_ref().or_else(|| self.definition.default_ini())
    }

    /// Names of all known settings, in declaration order.
    pub fn setting_names(&self) -> impl Iterator<Item = &str> {
        self.settings.ini_values.iter().map(|s| s.name.as_str())
    }

    /// Distinct section names of all known settings, sorted.
    #[must_use]
    pub fn sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = self
            .settings
            .ini_values
            .iter()
            .map(|s| s.section.as_str())
            .collect();
        sections.sort_unstable();
        sections.dedup();
        sections
    }

    /// The `value_type` value of the named setting. Only value types the
    /// definition declares in `valueTypes` are visible.
    #[must_use]
    pub fn setting_value(&self, name: &str, value_type: &str) -> Option<String> {
        if !self.definition.value_types().iter().any(|t| t == value_type) {
            return None;
        }
        self.settings
            .ini_values
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.value(value_type))
    }

    /// Whether the definition knows `setting` in `section` of `ini`, ignoring
    /// case of section and setting.
    #[must_use]
    pub fn does_setting_exist(&self, ini: &IniName, section: &str, setting: &str) -> bool {
        self.settings.ini_values.iter().any(|s| {
            self.ini_for(s) == Some(ini)
                && same_name(&s.section, section)
                && same_name(&s.name, setting)
        })
    }

    /// Values every setting takes under `preset`. Settings without a value
    /// for the preset are left out.
    #[must_use]
    pub fn preset_values(&self, preset: &str) -> Vec<PresetValue> {
        self.collect_values(|info| info.value(preset))
    }

    /// Settings that must be written even when equal to the default, with
    /// their fixed default (or default) value.
    #[must_use]
    pub fn always_print(&self) -> Vec<PresetValue> {
        self.collect_values(|info| {
            info.always_print
                .then(|| info.value("fixedDefault").or_else(|| info.value("default")))
                .flatten()
        })
    }

    /// Settings that may be dropped from an INI when they hold their default
    /// value, with that default.
    #[must_use]
    pub fn can_remove(&self) -> Vec<PresetValue> {
        self.collect_values(|info| {
            (!info.always_print)
                .then(|| info.value("default"))
                .flatten()
        })
    }

    /// One entry per setting name; a later declaration of the same name
    /// replaces the earlier value in place.
    fn collect_values(&self, pick: impl Fn(&SettingInfo) -> Option<String>) -> Vec<PresetValue> {
        let mut values: Vec<PresetValue> = Vec::new();
        for info in &self.settings.ini_values {
            let Some(value) = pick(info) else {
                continue;
            };
            let entry = PresetValue {
                name: info.name.clone(),
                ini: self.ini_for(info).cloned(),
                section: info.section.clone(),
                value,
            };
            match values.iter_mut().find(|v| v.name == info.name) {
                Some(existing) => *existing = entry,
                None => values.push(entry),
            }
        }
        values
    }
}
