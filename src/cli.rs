//! Command-line arguments.
use clap::{Parser, Subcommand};

use crate::preferences::LogLevel;

/// Top-level CLI entry point for the INI editor.
#[derive(Parser, Debug)]
#[command(
    name = "bethini",
    about = "Case-insensitive editor for game INI files",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Game folder under apps/ (defaults to the sAppName preference)
    #[arg(short, long, global = true)]
    pub game: Option<String>,

    /// Show changes without saving
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the application directory holding Bethini.ini and apps/
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value of a setting
    Get(LookupOpts),
    /// Set a setting, creating the section if needed
    Set(SetOpts),
    /// Remove a setting, or a whole section
    Remove(RemoveOpts),
    /// List the sections of an INI file
    Sections(IniOpts),
    /// List the settings of a section
    Settings(SettingsOpts),
    /// Show which file of a layered INI supplies a setting
    Resolve(LookupOpts),
    /// Sort sections and settings by name
    Sort(IniOpts),
    /// Apply a named preset to the game's INI files
    Preset(PresetOpts),
    /// Show or change application preferences
    Prefs(PrefsOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Short name used for log file names.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Get(_) => "get",
            Self::Set(_) => "set",
            Self::Remove(_) => "remove",
            Self::Sections(_) => "sections",
            Self::Settings(_) => "settings",
            Self::Resolve(_) => "resolve",
            Self::Sort(_) => "sort",
            Self::Preset(_) => "preset",
            Self::Prefs(_) => "prefs",
            Self::Version => "version",
        }
    }
}

/// Options naming one setting.
#[derive(Parser, Debug, Clone)]
pub struct LookupOpts {
    /// INI file name, e.g. Skyrim.ini
    pub ini: String,
    /// Section name
    pub section: String,
    /// Setting name
    pub setting: String,
}

/// Options for the `set` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SetOpts {
    /// INI file name, e.g. Skyrim.ini
    pub ini: String,
    /// Section name
    pub section: String,
    /// Setting name
    pub setting: String,
    /// New value
    #[arg(allow_hyphen_values = true)]
    pub value: String,
    /// Sort the file before saving
    #[arg(long)]
    pub sort: bool,
}

/// Options for the `remove` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RemoveOpts {
    /// INI file name, e.g. Skyrim.ini
    pub ini: String,
    /// Section name
    pub section: String,
    /// Setting name; omit to remove the whole section
    pub setting: Option<String>,
}

/// Options naming one INI file.
#[derive(Parser, Debug, Clone)]
pub struct IniOpts {
    /// INI file name, e.g. Skyrim.ini
    pub ini: String,
}

/// Options for the `settings` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SettingsOpts {
    /// INI file name, e.g. Skyrim.ini
    pub ini: String,
    /// Section name
    pub section: String,
    /// Print setting names as spelled in the file instead of lower case
    #[arg(long)]
    pub original_case: bool,
}

/// Options for the `preset` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct PresetOpts {
    /// Preset name, e.g. "Bethini High"
    pub name: String,
    /// Sort the files before saving
    #[arg(long)]
    pub sort: bool,
}

/// Options for the `prefs` subcommand. Without options the current
/// preferences are printed.
#[derive(Parser, Debug, Clone, Default)]
pub struct PrefsOpts {
    /// Console log level (Critical, Error, Warning, Info, Debug)
    #[arg(long)]
    pub log_level: Option<LogLevel>,
    /// Log files to keep, -1 for all
    #[arg(long, allow_negative_numbers = true)]
    pub max_logs: Option<i32>,
    /// Backups to keep, -1 for all
    #[arg(long, allow_negative_numbers = true)]
    pub max_backups: Option<i32>,
    /// Skip the game picker when a game is selected
    #[arg(long)]
    pub always_select_game: Option<bool>,
    /// Game to select by default
    #[arg(long)]
    pub app_name: Option<String>,
}

impl PrefsOpts {
    /// Whether any preference is being changed.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.log_level.is_some()
            || self.max_logs.is_some()
            || self.max_backups.is_some()
            || self.always_select_game.is_some()
            || self.app_name.is_some()
    }
}
