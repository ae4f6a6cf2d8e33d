//! Pecking order: which of several overlapping INI files supplies a setting.
//!
//! Some games read a base INI and then one or more override files (for
//! example `Skyrim.ini` followed by `SkyrimCustom.ini`). When more than one
//! defines the same setting, the later file wins. The table here is declared
//! per logical INI, lowest precedence first.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::app::AppDefinition;
use crate::error::{BethiniError, ResolveError};
use crate::ini::{IniName, IniRegistry, IniStore, OpenOptions};

/// Section of the application INI holding INI directories.
pub const DIRECTORIES_SECTION: &str = "Directories";

/// Maps an INI to the directory it lives in.
#[cfg_attr(test, mockall::automock)]
pub trait IniLocator {
    /// Directory holding `ini`, or `None` when no location is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownIni`] if `ini` is not a known logical
    /// INI at all.
    fn locate(&self, ini: &IniName) -> Result<Option<PathBuf>, ResolveError>;
}

/// Override lists per logical INI, lowest precedence first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PeckingOrder(BTreeMap<IniName, Vec<IniName>>);

impl FromIterator<(IniName, Vec<IniName>)> for PeckingOrder {
    fn from_iter<T: IntoIterator<Item = (IniName, Vec<IniName>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PeckingOrder {
    /// The override list declared for `ini`.
    #[must_use]
    pub fn candidates(&self, ini: &IniName) -> Option<&[IniName]> {
        self.0.get(ini).map(Vec::as_slice)
    }

    /// The logical INI whose list contains `file`, or `file` itself.
    #[must_use]
    pub fn main_ini_for<'a>(&'a self, file: &'a IniName) -> &'a IniName {
        self.0
            .iter()
            .find(|(_, files)| files.contains(file))
            .map_or(file, |(main, _)| main)
    }

    /// Find the file that currently supplies `section`/`setting` for `ini`.
    ///
    /// Candidates are probed from highest precedence down, stopping at `ini`
    /// itself if it appears in its own list. A candidate whose location is
    /// not configured is skipped. If no candidate defines the setting, `ini`
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the locator does not know a candidate, or if a
    /// candidate file cannot be loaded.
    pub fn resolve(
        &self,
        ini: &IniName,
        section: &str,
        setting: &str,
        locator: &dyn IniLocator,
        registry: &mut IniRegistry,
    ) -> Result<IniName, BethiniError> {
        let Some(candidates) = self.candidates(ini) else {
            return Ok(ini.clone());
        };
        let probed = candidates
            .iter()
            .position(|c| c == ini)
            .and_then(|pos| candidates.get(pos..))
            .unwrap_or(candidates);

        for candidate in probed.iter().rev() {
            let Some(directory) = locator.locate(candidate)? else {
                tracing::debug!("{candidate} has no configured location, trying the next file");
                continue;
            };
            let store = match registry.get(candidate, &directory) {
                Some(store) => store,
                None => registry.open(candidate, &directory, OpenOptions::default())?,
            };
            if store.borrow().contains(section, setting) {
                tracing::debug!("[{section}] {setting} for {ini} comes from {candidate}");
                return Ok(candidate.clone());
            }
        }
        Ok(ini.clone())
    }
}

/// Locator backed by the `[Directories]` section of the application INI and
/// the location setting names declared by the game definition.
#[derive(Debug)]
pub struct Directories<'a> {
    definition: &'a AppDefinition,
    app_config: &'a IniStore,
}

impl<'a> Directories<'a> {
    /// Build a locator over a game definition and the application INI.
    #[must_use]
    pub const fn new(definition: &'a AppDefinition, app_config: &'a IniStore) -> Self {
        Self {
            definition,
            app_config,
        }
    }

    fn app_dir(&self) -> PathBuf {
        self.app_config
            .path()
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }
}

impl IniLocator for Directories<'_> {
    fn locate(&self, ini: &IniName) -> Result<Option<PathBuf>, ResolveError> {
        if ini.is_app_config() {
            return Ok(Some(self.app_dir()));
        }
        let setting = self.definition.location_setting(ini)?;
        if setting.is_empty() {
            return Ok(Some(self.app_dir()));
        }
        Ok(self
            .app_config
            .get_value(DIRECTORIES_SECTION, setting)
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    fn custom(name: &str) -> IniName {
        IniName::custom(name).unwrap()
    }

    fn abc_order() -> PeckingOrder {
        [(custom("A.ini"), vec![custom("A.ini"), custom("B.ini"), custom("C.ini")])]
            .into_iter()
            .collect()
    }

    /// Locator returning the same directory for every file except those in
    /// `unconfigured`.
    fn locator_for(dir: &Path, unconfigured: &'static [&'static str]) -> MockIniLocator {
        let dir = dir.to_path_buf();
        let mut locator = MockIniLocator::new();
        locator.expect_locate().returning(move |ini| {
            if unconfigured.iter().any(|u| ini.matches(u)) {
                Ok(None)
            } else {
                Ok(Some(dir.clone()))
            }
        });
        locator
    }

    #[test]
    fn setting_only_in_base_resolves_to_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.ini"), "[Display]\niSize W=1920\n").unwrap();
        fs::write(dir.path().join("B.ini"), "[Display]\niOther=1\n").unwrap();
        let locator = locator_for(dir.path(), &[]);
        let mut registry = IniRegistry::new();

        let winner = abc_order()
            .resolve(&custom("A.ini"), "display", "isize w", &locator, &mut registry)
            .unwrap();
        assert_eq!(winner, custom("A.ini"));
    }

    #[test]
    fn highest_precedence_definition_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.ini"), "[Display]\niSize W=1920\n").unwrap();
        fs::write(dir.path().join("C.ini"), "[DISPLAY]\nISIZE W=800\n").unwrap();
        let locator = locator_for(dir.path(), &[]);
        let mut registry = IniRegistry::new();

        let winner = abc_order()
            .resolve(&custom("A.ini"), "Display", "iSize W", &locator, &mut registry)
            .unwrap();
        assert_eq!(winner, custom("C.ini"));
    }

    #[test]
    fn unconfigured_location_falls_through_to_next_candidate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.ini"), "[Display]\niSize W=1920\n").unwrap();
        fs::write(dir.path().join("B.ini"), "[Display]\niSize W=1280\n").unwrap();
        fs::write(dir.path().join("C.ini"), "[Display]\niSize W=800\n").unwrap();
        let locator = locator_for(dir.path(), &["C.ini"]);
        let mut registry = IniRegistry::new();

        let winner = abc_order()
            .resolve(&custom("A.ini"), "Display", "iSize W", &locator, &mut registry)
            .unwrap();
        assert_eq!(winner, custom("B.ini"));
    }

    #[test]
    fn undefined_anywhere_resolves_to_requested() {
        let dir = tempfile::tempdir().unwrap();
        let locator = locator_for(dir.path(), &[]);
        let mut registry = IniRegistry::new();

        let winner = abc_order()
            .resolve(&custom("A.ini"), "Display", "iMissing", &locator, &mut registry)
            .unwrap();
        assert_eq!(winner, custom("A.ini"));
    }

    #[test]
    fn ini_without_order_is_its_own_winner() {
        let mut locator = MockIniLocator::new();
        locator.expect_locate().never();
        let mut registry = IniRegistry::new();

        let winner = abc_order()
            .resolve(&IniName::Ultra, "Display", "iSize W", &locator, &mut registry)
            .unwrap();
        assert_eq!(winner, IniName::Ultra);
        assert!(registry.is_empty());
    }

    #[test]
    fn lower_precedence_files_cannot_override_requested() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.ini"), "[Display]\niSize W=1920\n").unwrap();
        let locator = locator_for(dir.path(), &[]);
        let mut registry = IniRegistry::new();

        let order: PeckingOrder = [(
            custom("B.ini"),
            vec![custom("A.ini"), custom("B.ini"), custom("C.ini")],
        )]
        .into_iter()
        .collect();
        let winner = order
            .resolve(&custom("B.ini"), "Display", "iSize W", &locator, &mut registry)
            .unwrap();
        assert_eq!(winner, custom("B.ini"));
    }

    #[test]
    fn unknown_candidate_is_an_error() {
        let mut locator = MockIniLocator::new();
        locator
            .expect_locate()
            .returning(|ini| Err(ResolveError::UnknownIni(ini.to_string())));
        let mut registry = IniRegistry::new();

        let err = abc_order()
            .resolve(&custom("A.ini"), "Display", "iSize W", &locator, &mut registry)
            .unwrap_err();
        assert!(matches!(
            err,
            BethiniError::Resolve(ResolveError::UnknownIni(ref name)) if name == "C.ini"
        ));
    }

    #[test]
    fn resolve_sees_unsaved_edits_through_registry() {
        let dir = tempfile::tempdir().unwrap();
        let locator = locator_for(dir.path(), &[]);
        let mut registry = IniRegistry::new();
        registry
            .open(&custom("B.ini"), dir.path(), OpenOptions::default())
            .unwrap()
            .borrow_mut()
            .assign("Display", "iSize W", "640")
            .unwrap();

        let winner = abc_order()
            .resolve(&custom("A.ini"), "Display", "iSize W", &locator, &mut registry)
            .unwrap();
        assert_eq!(winner, custom("B.ini"));
    }

    #[test]
    fn main_ini_for_reverse_lookup() {
        let order = abc_order();
        assert_eq!(order.main_ini_for(&custom("C.ini")), &custom("A.ini"));
        assert_eq!(order.main_ini_for(&IniName::Ultra), &IniName::Ultra);
    }

    #[test]
    fn deserialize_from_json() {
        let order: PeckingOrder =
            serde_json::from_str(r#"{"Skyrim.ini": ["Skyrim.ini", "SkyrimCustom.ini"]}"#).unwrap();
        assert_eq!(
            order.candidates(&IniName::Skyrim).unwrap(),
            [IniName::Skyrim, IniName::SkyrimCustom]
        );
    }
}
