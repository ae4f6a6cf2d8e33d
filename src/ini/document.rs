//! Ordered, case-preserving INI document model and its serializer.
use std::fmt;

/// Fold a section or setting name for case-insensitive comparison.
#[must_use]
pub fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Whether two names are equal ignoring case.
#[must_use]
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || fold(a) == fold(b)
}

/// One `[Section]` and its settings in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    /// Create an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// The stored (original-case) section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Settings as `(key, value)` pairs in order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Setting names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the section has no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Stored spelling of `key`, compared ignoring case.
    #[must_use]
    pub fn find_key(&self, key: &str) -> Option<&str> {
        if let Some((k, _)) = self.entries.iter().find(|(k, _)| k == key) {
            return Some(k);
        }
        let folded = fold(key);
        self.entries
            .iter()
            .find(|(k, _)| fold(k) == folded)
            .map(|(k, _)| k.as_str())
    }

    /// Set `key` to `value`, overwriting any case variant of `key` in place.
    ///
    /// Returns the previous value, if any.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        let folded = fold(key);
        if let Some((_, v)) = self.entries.iter_mut().find(|(k, _)| fold(k) == folded) {
            return Some(std::mem::replace(v, value));
        }
        self.entries.push((key.to_string(), value));
        None
    }

    /// Remove `key` (ignoring case), returning its stored spelling and value.
    pub fn remove(&mut self, key: &str) -> Option<(String, String)> {
        let folded = fold(key);
        let pos = self.entries.iter().position(|(k, _)| fold(k) == folded)?;
        Some(self.entries.remove(pos))
    }

    fn sort(&mut self) {
        self.entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
}

/// An INI document: sections in order, each with ordered settings.
///
/// Section names are unique ignoring case; adding a case variant of an
/// existing section reuses it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    /// Create an empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Sections in order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Whether the document has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section named exactly `name`.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Mutable section named exactly `name`.
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Stored spelling of section `name`, compared ignoring case.
    #[must_use]
    pub fn find_section(&self, name: &str) -> Option<&str> {
        if let Some(section) = self.section(name) {
            return Some(&section.name);
        }
        let folded = fold(name);
        self.sections
            .iter()
            .find(|s| fold(&s.name) == folded)
            .map(|s| s.name.as_str())
    }

    /// Return the section matching `name` ignoring case, appending a new one
    /// spelled as `name` if none exists.
    #[allow(clippy::indexing_slicing)] // pos comes from position() or the push
    pub fn ensure_section(&mut self, name: &str) -> &mut Section {
        let folded = fold(name);
        let pos = match self.sections.iter().position(|s| fold(&s.name) == folded) {
            Some(pos) => pos,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[pos]
    }

    /// Remove the section matching `name` ignoring case.
    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        let folded = fold(name);
        let pos = self.sections.iter().position(|s| fold(&s.name) == folded)?;
        Some(self.sections.remove(pos))
    }

    /// Order sections, then the settings within each, by name.
    pub fn sort(&mut self) {
        self.sections.sort_by(|a, b| a.name.cmp(&b.name));
        for section in &mut self.sections {
            section.sort();
        }
    }
}

/// Serializes as `[Section]` headers with `key=value` lines and a blank line
/// after each section.
impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in section.entries() {
                writeln!(f, "{key}={value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
