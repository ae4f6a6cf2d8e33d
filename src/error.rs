//! Domain-specific error types for the INI editing engine.
//!
//! Library modules return the typed errors below; command handlers at the
//! CLI boundary convert them to [`anyhow::Error`] via the `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! BethiniError
//! ├── Ini(IniError)                  load, parse, save, unwritable input, registry conflicts
//! ├── Name(IniNameError)             strings that are not INI file names
//! ├── Definition(DefinitionError)    game definition JSON
//! └── Resolve(ResolveError)          unknown or unconfigured INI files
//! ```

use thiserror::Error;

/// Top-level error type for the engine.
#[derive(Error, Debug)]
pub enum BethiniError {
    /// INI loading, parsing, saving, or registry error.
    #[error("INI error: {0}")]
    Ini(#[from] IniError),

    /// Invalid INI file name.
    #[error("INI name error: {0}")]
    Name(#[from] IniNameError),

    /// Game definition could not be loaded.
    #[error("Game definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Logical INI identifier could not be resolved.
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),
}

/// A syntax problem found while parsing INI text, before a file path is known.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    /// One-based line number.
    pub line: usize,
    /// Human-readable description.
    pub message: String,
}

/// Errors raised while loading, parsing, or persisting INI files.
#[derive(Error, Debug)]
pub enum IniError {
    /// The file contains a syntax error.
    #[error("Invalid INI syntax in {path} at line {line}: {message}")]
    Parse {
        /// Path of the offending file.
        path: String,
        /// One-based line number.
        line: usize,
        /// Human-readable description.
        message: String,
    },

    /// Reading or writing the file failed.
    #[error("IO error on INI file {path}: {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A section or setting name that would not survive a save and reload.
    #[error("invalid {kind} name '{name}': {reason}")]
    InvalidName {
        /// `section` or `setting`.
        kind: &'static str,
        /// The rejected name.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A value that would not survive a save and reload.
    #[error("invalid value for [{section}] {setting}: {reason}")]
    InvalidValue {
        /// Section of the setting.
        section: String,
        /// Setting being assigned.
        setting: String,
        /// What is wrong with the value.
        reason: &'static str,
    },

    /// The file is already open with incompatible options.
    #[error("{name} in {directory} is already open with preserve_case={existing}")]
    ConfigConflict {
        /// INI file name.
        name: String,
        /// Directory the file was opened from.
        directory: String,
        /// `preserve_case` of the live instance.
        existing: bool,
    },
}

impl IniError {
    /// Attach a file path to a [`SyntaxError`].
    pub(crate) fn parse(path: &std::path::Path, err: SyntaxError) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            line: err.line,
            message: err.message,
        }
    }
}

/// Errors raised when a string is not an acceptable INI file name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IniNameError {
    /// The name is not one of the known INI files.
    #[error("unknown INI file '{0}'")]
    Unknown(String),

    /// The name cannot be used as an ad hoc INI file name.
    #[error("'{0}' is not an INI file name")]
    Invalid(String),
}

/// Errors raised while loading a game definition.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The definition file could not be read.
    #[error("IO error reading game definition {path}: {source}")]
    Io {
        /// Path of the definition file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The definition file is not valid JSON for its schema.
    #[error("Invalid game definition {path}: {source}")]
    Json {
        /// Path of the definition file.
        path: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Errors raised while mapping logical INI identifiers to files.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The INI is not declared in the game definition's `INIs` map.
    #[error("{0} is not declared by the game definition")]
    UnknownIni(String),

    /// No game definition is loaded, so only the application INI is available.
    #[error("no game is loaded; cannot locate {0}")]
    NoGame(String),

    /// The INI is declared but its directory setting is empty or missing.
    #[error("no directory is configured for {0}")]
    Unconfigured(String),
}
