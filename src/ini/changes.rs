//! Record of unsaved changes, used to review edits before they are written.
use std::fmt;

use super::document::same_name;

/// What happened to a setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// The setting now holds this value.
    Set(String),
    /// The setting was removed.
    Removed,
}

/// One changed setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    /// Section name as stored in the document.
    pub section: String,
    /// Setting name as stored in the document.
    pub setting: String,
    /// Value before the first recorded change, if the setting existed.
    pub previous: Option<String>,
    /// Latest change.
    pub change: Change,
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let before = self.previous.as_deref().unwrap_or("<unset>");
        match &self.change {
            Change::Set(value) => {
                write!(f, "[{}] {}: {before} -> {value}", self.section, self.setting)
            }
            Change::Removed => write!(f, "[{}] {}: {before} -> <removed>", self.section, self.setting),
        }
    }
}

/// Changes since the document was loaded or last saved, in first-change order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModificationLog {
    entries: Vec<Modification>,
}

impl ModificationLog {
    /// Create an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a change. A later change to the same setting (ignoring case)
    /// replaces the earlier one but keeps its position and previous value.
    pub fn record(&mut self, section: &str, setting: &str, previous: Option<String>, change: Change) {
        let existing = self
            .entries
            .iter_mut()
            .find(|m| same_name(&m.section, section) && same_name(&m.setting, setting));
        match existing {
            Some(entry) => entry.change = change,
            None => self.entries.push(Modification {
                section: section.to_string(),
                setting: setting.to_string(),
                previous,
                change,
            }),
        }
    }

    /// The latest change to a setting, ignoring case.
    #[must_use]
    pub fn get(&self, section: &str, setting: &str) -> Option<&Modification> {
        self.entries
            .iter()
            .find(|m| same_name(&m.section, section) && same_name(&m.setting, setting))
    }

    /// All recorded changes.
    pub fn iter(&self) -> impl Iterator<Item = &Modification> {
        self.entries.iter()
    }

    /// Number of changed settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget all changes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a ModificationLog {
    type Item = &'a Modification;
    type IntoIter = std::slice::Iter<'a, Modification>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
