//! `Bethini.json`: the INI files a game uses and where they live.
use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::ResolveError;
use crate::ini::IniName;
use crate::pecking::PeckingOrder;

/// Parsed `Bethini.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppDefinition {
    /// INI file -> `[Directories]` setting naming its folder, in declaration
    /// order. An empty setting means the application directory.
    #[serde(rename = "INIs", deserialize_with = "ordered_entries")]
    inis: Vec<(IniName, String)>,

    #[serde(rename = "INI_pecking_order", default)]
    pecking_order: PeckingOrder,

    #[serde(rename = "presetsIgnoreTheseSettings", default)]
    presets_ignore_these_settings: Vec<String>,

    #[serde(rename = "valueTypes", default)]
    value_types: Vec<String>,
}

/// Deserialize a JSON object into its entries, keeping document order.
fn ordered_entries<'de, D, K, V>(deserializer: D) -> Result<Vec<(K, V)>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    struct Entries<K, V>(PhantomData<(K, V)>);

    impl<'de, K: Deserialize<'de>, V: Deserialize<'de>> Visitor<'de> for Entries<K, V> {
        type Value = Vec<(K, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(Entries(PhantomData))
}

impl AppDefinition {
    /// Declared INI files in declaration order.
    pub fn inis(&self) -> impl Iterator<Item = &IniName> {
        self.inis.iter().map(|(ini, _)| ini)
    }

    /// Declared game INI files, excluding the application INI.
    pub fn ini_files_used(&self) -> impl Iterator<Item = &IniName> {
        self.inis().filter(|ini| !ini.is_app_config())
    }

    /// INI assumed for settings that do not name one: the third declared
    /// file, after the application INI and the launcher INI.
    #[must_use]
    pub fn default_ini(&self) -> Option<&IniName> {
        self.inis().nth(2)
    }

    /// The `[Directories]` setting naming the folder of `ini`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownIni`] if `ini` is not declared.
    pub fn location_setting(&self, ini: &IniName) -> Result<&str, ResolveError> {
        self.inis
            .iter()
            .find(|(declared, _)| declared == ini)
            .map(|(_, setting)| setting.as_str())
            .ok_or_else(|| ResolveError::UnknownIni(ini.to_string()))
    }

    /// Declared INI whose file name matches `name`, ignoring case.
    #[must_use]
    pub fn find_ini(&self, name: &str) -> Option<&IniName> {
        self.inis().find(|ini| ini.matches(name))
    }

    /// Override lists for INIs read in layers.
    #[must_use]
    pub const fn pecking_order(&self) -> &PeckingOrder {
        &self.pecking_order
    }

    /// Settings that presets never touch.
    #[must_use]
    pub fn presets_ignore_these_settings(&self) -> &[String] {
        &self.presets_ignore_these_settings
    }

    /// Named value columns a setting may carry (`default`, presets, ...).
    #[must_use]
    pub fn value_types(&self) -> &[String] {
        &self.value_types
    }
}
