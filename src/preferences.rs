//! Application preferences stored in the `[General]` section of `Bethini.ini`.
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::error::IniError;
use crate::ini::IniStore;

/// Section of the application INI holding preferences.
pub const GENERAL_SECTION: &str = "General";

const APP_NAME: &str = "sAppName";
const LOG_LEVEL: &str = "sLogLevel";
const MAX_BACKUPS: &str = "iMaxBackups";
const MAX_LOGS: &str = "iMaxLogs";
const ALWAYS_SELECT_GAME: &str = "bAlwaysSelectGame";

/// Console log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Only failures that stop the program.
    Critical,
    /// Errors.
    Error,
    /// Warnings and errors.
    Warning,
    /// Normal progress output.
    #[default]
    Info,
    /// Everything.
    Debug,
}

/// A string that is not one of the log level names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level '{0}' (expected Critical, Error, Warning, Info or Debug)")]
pub struct UnknownLogLevel(String);

impl LogLevel {
    /// Name as stored in `Bethini.ini`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Info => "Info",
            Self::Debug => "Debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(UnknownLogLevel(s.to_string())),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Critical | LogLevel::Error => Self::ERROR,
            LogLevel::Warning => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
        }
    }
}

/// Typed view of the `[General]` preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    /// Game selected last, used when `--game` is not given.
    pub app_name: Option<String>,
    /// Console log verbosity.
    pub log_level: LogLevel,
    /// Backups to keep, `-1` for all.
    pub max_backups: i32,
    /// Log files to keep, `-1` for all.
    pub max_logs: i32,
    /// Skip the game picker when a game is already selected.
    pub always_select_game: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            app_name: None,
            log_level: LogLevel::Info,
            max_backups: -1,
            max_logs: 5,
            always_select_game: true,
        }
    }
}

impl Preferences {
    /// Read preferences, falling back to defaults for missing or invalid
    /// values.
    #[must_use]
    pub fn from_store(store: &IniStore) -> Self {
        Self::read(store).0
    }

    /// Like [`from_store`](Self::from_store), but also returns the keys whose
    /// stored values were invalid and replaced by defaults, so they can be
    /// reported once logging is up.
    #[must_use]
    pub fn read(store: &IniStore) -> (Self, Vec<&'static str>) {
        let defaults = Self::default();
        let get = |key: &str| store.get_value(GENERAL_SECTION, key).map(str::trim);
        let mut invalid = Vec::new();

        let prefs = Self {
            app_name: get(APP_NAME).filter(|v| !v.is_empty()).map(str::to_string),
            log_level: parse_or(get(LOG_LEVEL), LOG_LEVEL, defaults.log_level, &mut invalid),
            max_backups: parse_or(get(MAX_BACKUPS), MAX_BACKUPS, defaults.max_backups, &mut invalid),
            max_logs: parse_or(get(MAX_LOGS), MAX_LOGS, defaults.max_logs, &mut invalid),
            always_select_game: get(ALWAYS_SELECT_GAME)
                .map_or(defaults.always_select_game, |v| v != "0"),
        };
        (prefs, invalid)
    }

    /// Write preferences back through [`IniStore::assign`].
    ///
    /// Returns `true` if any value changed.
    ///
    /// # Errors
    ///
    /// Returns the [`IniError`] raised by [`IniStore::assign`] for a value
    /// that cannot be written, such as an `sAppName` with a line break.
    pub fn apply(&self, store: &mut IniStore) -> Result<bool, IniError> {
        let mut changed = false;
        if let Some(app_name) = &self.app_name {
            changed |= store.assign(GENERAL_SECTION, APP_NAME, app_name)?;
        }
        changed |= store.assign(GENERAL_SECTION, LOG_LEVEL, self.log_level.as_str())?;
        changed |= store.assign(GENERAL_SECTION, MAX_BACKUPS, &self.max_backups.to_string())?;
        changed |= store.assign(GENERAL_SECTION, MAX_LOGS, &self.max_logs.to_string())?;
        changed |= store.assign(
            GENERAL_SECTION,
            ALWAYS_SELECT_GAME,
            if self.always_select_game { "1" } else { "0" },
        )?;
        Ok(changed)
    }
}

/// Report preference keys that [`Preferences::read`] replaced by defaults.
pub fn warn_invalid(keys: &[&str]) {
    for key in keys {
        tracing::warn!("ignoring invalid [{GENERAL_SECTION}] {key}, using the default");
    }
}

impl fmt::Display for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{APP_NAME}={}", self.app_name.as_deref().unwrap_or(""))?;
        writeln!(f, "{LOG_LEVEL}={}", self.log_level)?;
        writeln!(f, "{MAX_BACKUPS}={}", self.max_backups)?;
        writeln!(f, "{MAX_LOGS}={}", self.max_logs)?;
        writeln!(f, "{ALWAYS_SELECT_GAME}={}", u8::from(self.always_select_game))
    }
}

fn parse_or<T: FromStr>(
    raw: Option<&str>,
    key: &'static str,
    default: T,
    invalid: &mut Vec<&'static str>,
) -> T {
    match raw.map(str::parse::<T>) {
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            invalid.push(key);
            default
        }
        None => default,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::ini::{IniName, OpenOptions};

    fn store(content: &str) -> IniStore {
        IniStore::parse(IniName::Bethini, "Bethini.ini", content, OpenOptions::default()).unwrap()
    }

    #[test]
    fn defaults_when_section_missing() {
        assert_eq!(Preferences::from_store(&store("")), Preferences::default());
    }

    #[test]
    fn reads_values_ignoring_key_case() {
        let prefs = Preferences::from_store(&store(
            "[general]\nsappname=Skyrim Special Edition\nSLOGLEVEL=debug\niMaxLogs=-1\nbAlwaysSelectGame=0\n",
        ));
        assert_eq!(prefs.app_name.as_deref(), Some("Skyrim Special Edition"));
        assert_eq!(prefs.log_level, LogLevel::Debug);
        assert_eq!(prefs.max_logs, -1);
        assert_eq!(prefs.max_backups, -1);
        assert!(!prefs.always_select_game);
    }

    #[test]
    fn invalid_values_fall_back_and_are_reported() {
        let (prefs, invalid) =
            Preferences::read(&store("[General]\nsLogLevel=Loud\niMaxLogs=many\niMaxBackups=3\n"));
        assert_eq!(prefs.log_level, LogLevel::Info);
        assert_eq!(prefs.max_logs, 5);
        assert_eq!(prefs.max_backups, 3);
        assert_eq!(invalid, ["sLogLevel", "iMaxLogs"]);
    }

    #[test]
    fn valid_values_report_nothing() {
        let (_, invalid) = Preferences::read(&store("[General]\nsLogLevel=Debug\niMaxLogs=2\n"));
        assert!(invalid.is_empty());
    }

    #[test]
    fn apply_rejects_unwritable_app_name() {
        let mut store = store("[General]\nsLogLevel=Info\n");
        let prefs = Preferences {
            app_name: Some("Skyrim\nSpecial".to_string()),
            ..Preferences::default()
        };
        assert!(matches!(
            prefs.apply(&mut store).unwrap_err(),
            IniError::InvalidValue { .. }
        ));
    }

    #[test]
    fn apply_reuses_existing_spelling_and_reports_change() {
        let mut store = store("[GENERAL]\nSLOGLEVEL=Info\n");
        let prefs = Preferences {
            log_level: LogLevel::Warning,
            ..Preferences::default()
        };
        assert!(prefs.apply(&mut store).unwrap());
        assert_eq!(store.settings("General", true)[0], "SLOGLEVEL");
        assert_eq!(store.get_value("general", "sloglevel"), Some("Warning"));
        assert!(!prefs.apply(&mut store).unwrap());
    }

    #[test]
    fn log_level_parse_and_filter() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LevelFilter::from(LogLevel::Critical), LevelFilter::ERROR);
        assert_eq!(LogLevel::Debug.to_string(), "Debug");
    }
}
