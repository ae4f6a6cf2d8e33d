//! One live [`IniStore`] per (file, directory).
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::name::IniName;
use super::store::{IniStore, OpenOptions};
use crate::error::IniError;

/// A store shared by everything that opened the same file.
pub type SharedIni = Rc<RefCell<IniStore>>;

/// Registry of open INI files.
///
/// Opening the same file twice returns the same store, so unsaved edits made
/// through one handle are visible through the other. The registry is owned by
/// the application context and passed to whoever needs file access.
#[derive(Debug, Default)]
pub struct IniRegistry {
    open: BTreeMap<(IniName, PathBuf), SharedIni>,
}

/// Normalize a directory so equivalent spellings share one registry entry.
fn registry_dir(directory: &Path) -> PathBuf {
    dunce::canonicalize(directory).unwrap_or_else(|_| directory.to_path_buf())
}

impl IniRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live store for `name` in `directory`, loading it on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::ConfigConflict`] if the file is already open with
    /// different options, or any load error from [`IniStore::load`].
    pub fn open(
        &mut self,
        name: &IniName,
        directory: &Path,
        options: OpenOptions,
    ) -> Result<SharedIni, IniError> {
        let key = (name.clone(), registry_dir(directory));
        if let Some(existing) = self.open.get(&key) {
            let existing_options = existing.borrow().options();
            if existing_options != options {
                return Err(IniError::ConfigConflict {
                    name: name.to_string(),
                    directory: key.1.display().to_string(),
                    existing: existing_options.preserve_case,
                });
            }
            return Ok(Rc::clone(existing));
        }

        let store = Rc::new(RefCell::new(IniStore::load(name.clone(), &key.1, options)?));
        tracing::debug!("registered {name} in {}", key.1.display());
        self.open.insert(key, Rc::clone(&store));
        Ok(store)
    }

    /// The live store for `name` in `directory`, if open.
    #[must_use]
    pub fn get(&self, name: &IniName, directory: &Path) -> Option<SharedIni> {
        self.open
            .get(&(name.clone(), registry_dir(directory)))
            .map(Rc::clone)
    }

    /// Forget a store, discarding unsaved changes held only by the registry.
    pub fn close(&mut self, name: &IniName, directory: &Path) -> Option<SharedIni> {
        self.open.remove(&(name.clone(), registry_dir(directory)))
    }

    /// Stores with unsaved changes.
    pub fn modified(&self) -> impl Iterator<Item = &SharedIni> {
        self.open.values().filter(|s| s.borrow().is_modified())
    }

    /// Save every modified store. Stops at the first failure.
    ///
    /// `Bethini.ini` is always saved sorted; other files only when `sort`
    /// is set. Returns how many files were written.
    ///
    /// # Errors
    ///
    /// Returns the first [`IniError`] raised by [`IniStore::save`].
    pub fn save_all(&self, sort: bool) -> Result<usize, IniError> {
        let mut saved = 0;
        for store in self.modified() {
            let mut store = store.borrow_mut();
            let sort = sort || store.name().is_app_config();
            store.save(sort)?;
            saved += 1;
        }
        Ok(saved)
    }

    /// Number of open stores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Whether nothing is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
