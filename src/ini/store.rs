//! Case-insensitive, order-preserving access to one INI file.
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::changes::{Change, ModificationLog};
use super::document::{IniDocument, Section, fold};
use super::name::IniName;
use super::parser;
use crate::error::IniError;

/// Options fixed for the lifetime of an open INI file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    /// Keep setting names as spelled in the file. When off, names are folded
    /// to lower case on load and on first write.
    pub preserve_case: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            preserve_case: true,
        }
    }
}

/// One INI file held in memory.
///
/// The store keeps two views in step: the case-preserving [`IniDocument`]
/// that is written back to disk, and a folded index used for lookups. Only
/// the mutating methods below touch either view.
#[derive(Debug)]
pub struct IniStore {
    name: IniName,
    path: PathBuf,
    options: OpenOptions,
    document: IniDocument,
    /// folded section -> folded setting -> value
    index: HashMap<String, HashMap<String, String>>,
    modified: bool,
    changes: ModificationLog,
}

impl IniStore {
    /// Load `name` from `directory`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::Io`] if the file exists but cannot be read, or
    /// [`IniError::Parse`] if its content is malformed.
    pub fn load(name: IniName, directory: &Path, options: OpenOptions) -> Result<Self, IniError> {
        let path = directory.join(name.file_name());
        let document = match fs::read(&path) {
            Ok(bytes) => parser::parse_str(&parser::decode(&bytes), options.preserve_case)
                .map_err(|e| IniError::parse(&path, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet, starting empty", path.display());
                IniDocument::new()
            }
            Err(source) => {
                return Err(IniError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        tracing::debug!("loaded {}", path.display());
        Ok(Self::from_document(name, path, options, document))
    }

    /// Build a store from INI text that will be saved to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::Parse`] if `content` is malformed.
    pub fn parse(
        name: IniName,
        path: impl Into<PathBuf>,
        content: &str,
        options: OpenOptions,
    ) -> Result<Self, IniError> {
        let path = path.into();
        let document =
            parser::parse_str(content, options.preserve_case).map_err(|e| IniError::parse(&path, e))?;
        Ok(Self::from_document(name, path, options, document))
    }

    fn from_document(
        name: IniName,
        path: PathBuf,
        options: OpenOptions,
        document: IniDocument,
    ) -> Self {
        let index = document
            .sections()
            .map(|section| {
                let keys = section
                    .entries()
                    .map(|(k, v)| (fold(k), v.to_string()))
                    .collect();
                (fold(section.name()), keys)
            })
            .collect();
        Self {
            name,
            path,
            options,
            document,
            index,
            modified: false,
            changes: ModificationLog::new(),
        }
    }

    /// Which INI this is.
    #[must_use]
    pub const fn name(&self) -> &IniName {
        &self.name
    }

    /// Full path the store is saved to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options the store was opened with.
    #[must_use]
    pub const fn options(&self) -> OpenOptions {
        self.options
    }

    /// The case-preserving document.
    #[must_use]
    pub const fn document(&self) -> &IniDocument {
        &self.document
    }

    /// Whether there are unsaved changes (including a sort).
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Setting changes since load or last save.
    #[must_use]
    pub const fn changes(&self) -> &ModificationLog {
        &self.changes
    }

    /// Stored spelling of `section` if a case variant exists, otherwise
    /// `section` unchanged.
    #[must_use]
    pub fn existing_section<'a>(&'a self, section: &'a str) -> &'a str {
        self.document.find_section(section).unwrap_or(section)
    }

    /// Stored spelling of `setting` within `section` if a case variant
    /// exists, otherwise `setting` unchanged.
    #[must_use]
    pub fn existing_setting<'a>(&'a self, section: &str, setting: &'a str) -> &'a str {
        let section = self.existing_section(section);
        self.document
            .section(section)
            .and_then(|s| s.find_key(setting))
            .unwrap_or(setting)
    }

    /// Value of `setting` in `section`, ignoring the case of both.
    #[must_use]
    pub fn get_value(&self, section: &str, setting: &str) -> Option<&str> {
        let section = self.existing_section(section);
        self.index
            .get(&fold(section))?
            .get(&fold(setting))
            .map(String::as_str)
    }

    /// Value of `setting` in `section`, or `default` when absent.
    #[must_use]
    pub fn get_value_or<'a>(&'a self, section: &str, setting: &str, default: &'a str) -> &'a str {
        self.get_value(section, setting).unwrap_or(default)
    }

    /// Whether `setting` exists in `section`, ignoring case.
    #[must_use]
    pub fn contains(&self, section: &str, setting: &str) -> bool {
        self.get_value(section, setting).is_some()
    }

    /// Section names in file order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.document.sections().map(Section::name)
    }

    /// Setting names of `section` in file order, folded to lower case unless
    /// `original_case`. An unknown section yields an empty list.
    #[must_use]
    pub fn settings(&self, section: &str, original_case: bool) -> Vec<String> {
        let section = self.existing_section(section);
        self.document.section(section).map_or_else(Vec::new, |s| {
            s.keys()
                .map(|k| if original_case { k.to_string() } else { fold(k) })
                .collect()
        })
    }

    /// Set `setting` in `section` to `value` if it differs from the current
    /// value, reusing existing spellings of both names and creating the
    /// section if needed.
    ///
    /// Returns `true` if a write occurred.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::InvalidName`] or [`IniError::InvalidValue`] if the
    /// input would not read back unchanged after a save. The store is left
    /// untouched.
    pub fn assign(&mut self, section: &str, setting: &str, value: &str) -> Result<bool, IniError> {
        if let Some(reason) = section_problem(section) {
            return Err(IniError::InvalidName {
                kind: "section",
                name: section.to_string(),
                reason,
            });
        }
        if let Some(reason) = setting_problem(setting) {
            return Err(IniError::InvalidName {
                kind: "setting",
                name: setting.to_string(),
                reason,
            });
        }
        if let Some(reason) = value_problem(value) {
            return Err(IniError::InvalidValue {
                section: section.to_string(),
                setting: setting.to_string(),
                reason,
            });
        }

        let section_name = self.existing_section(section).to_string();
        let stored = self
            .document
            .section(&section_name)
            .and_then(|s| s.find_key(setting));
        let setting_name = match stored {
            Some(existing) => existing.to_string(),
            None if self.options.preserve_case => setting.to_string(),
            None => fold(setting),
        };

        let previous = self.get_value(&section_name, &setting_name).map(str::to_string);
        if previous.as_deref() == Some(value) {
            return Ok(false);
        }

        self.document.ensure_section(&section_name).set(&setting_name, value);
        self.index
            .entry(fold(&section_name))
            .or_default()
            .insert(fold(&setting_name), value.to_string());
        tracing::debug!(
            "{}: [{section_name}] {setting_name}={value}",
            self.name.file_name()
        );
        self.changes.record(
            &section_name,
            &setting_name,
            previous,
            Change::Set(value.to_string()),
        );
        self.modified = true;
        Ok(true)
    }

    /// Remove `setting` from `section`, ignoring case.
    ///
    /// Returns `false` if the section or setting does not exist.
    pub fn remove_setting(&mut self, section: &str, setting: &str) -> bool {
        let section_name = self.existing_section(section).to_string();
        let Some((key, value)) = self
            .document
            .section_mut(&section_name)
            .and_then(|s| s.remove(setting))
        else {
            return false;
        };
        if let Some(keys) = self.index.get_mut(&fold(&section_name)) {
            keys.remove(&fold(&key));
        }
        tracing::debug!("{}: removed [{section_name}] {key}", self.name.file_name());
        self.changes
            .record(&section_name, &key, Some(value), Change::Removed);
        self.modified = true;
        true
    }

    /// Remove `section` and all its settings, ignoring case.
    ///
    /// Returns `false` if the section does not exist.
    pub fn remove_section(&mut self, section: &str) -> bool {
        let Some(removed) = self.document.remove_section(section) else {
            return false;
        };
        self.index.remove(&fold(removed.name()));
        for (key, value) in removed.entries() {
            self.changes.record(
                removed.name(),
                key,
                Some(value.to_string()),
                Change::Removed,
            );
        }
        tracing::debug!("{}: removed [{}]", self.name.file_name(), removed.name());
        self.modified = true;
        true
    }

    /// Order sections and settings by name.
    pub fn sort(&mut self) {
        self.document.sort();
        self.modified = true;
    }

    /// The text [`save`](Self::save) would write.
    #[must_use]
    pub fn render(&self) -> String {
        self.document.to_string()
    }

    /// Write the file, optionally sorting first, then clear the dirty flag
    /// and the modification log.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::Io`] if the file cannot be written. Nothing is
    /// retried.
    pub fn save(&mut self, sort: bool) -> Result<(), IniError> {
        if sort {
            self.sort();
        }
        fs::write(&self.path, self.render()).map_err(|source| IniError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        tracing::info!("saved {}", self.path.display());
        self.modified = false;
        self.changes.clear();
        Ok(())
    }

    /// Panic unless the folded index mirrors the document exactly.
    #[cfg(test)]
    #[allow(clippy::panic)]
    pub(crate) fn assert_consistent(&self) {
        let mut expected: HashMap<String, HashMap<String, String>> = HashMap::new();
        for section in self.document.sections() {
            let keys = expected.entry(fold(section.name())).or_default();
            for (k, v) in section.entries() {
                assert!(
                    keys.insert(fold(k), v.to_string()).is_none(),
                    "duplicate key spelling for {k} in [{}]",
                    section.name()
                );
            }
        }
        if expected != self.index {
            panic!("index out of sync: {:?} vs {:?}", self.index, expected);
        }
    }
}

fn name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("is empty")
    } else if name.trim() != name {
        Some("has leading or trailing whitespace")
    } else if name.contains(['\r', '\n']) {
        Some("contains a line break")
    } else {
        None
    }
}

fn section_problem(name: &str) -> Option<&'static str> {
    name_problem(name).or_else(|| name.contains(']').then_some("contains ']'"))
}

fn setting_problem(name: &str) -> Option<&'static str> {
    name_problem(name).or_else(|| {
        if name.contains(['=', ':']) {
            Some("contains '=' or ':'")
        } else if name.starts_with(['[', ';', '#']) {
            Some("starts with a comment or header character")
        } else {
            None
        }
    })
}

fn value_problem(value: &str) -> Option<&'static str> {
    if value.contains(['\r', '\n']) {
        Some("contains a line break")
    } else if value.trim() != value {
        Some("has leading or trailing whitespace")
    } else {
        None
    }
}
