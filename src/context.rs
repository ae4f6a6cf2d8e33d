//! Application context: the application INI, the registry of open files,
//! and the selected game.
use std::path::{Path, PathBuf};

use crate::app::Game;
use crate::error::{BethiniError, ResolveError};
use crate::ini::{IniName, IniRegistry, OpenOptions, SharedIni};
use crate::pecking::{Directories, IniLocator};
use crate::preferences::Preferences;

/// Everything a command needs, owned in one place.
#[derive(Debug)]
pub struct AppContext {
    root: PathBuf,
    registry: IniRegistry,
    app_config: SharedIni,
    game: Option<Game>,
}

impl AppContext {
    /// Open `<root>/Bethini.ini` through a fresh registry. No game is loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if `Bethini.ini` exists but cannot be read or parsed.
    pub fn open(root: &Path) -> Result<Self, BethiniError> {
        let mut registry = IniRegistry::new();
        let app_config = registry.open(&IniName::Bethini, root, OpenOptions::default())?;
        Ok(Self {
            root: root.to_path_buf(),
            registry,
            app_config,
            game: None,
        })
    }

    /// Load `<root>/apps/<name>/` as the selected game.
    ///
    /// # Errors
    ///
    /// Returns [`BethiniError::Definition`] if the definition cannot be loaded.
    pub fn load_game(&mut self, name: &str) -> Result<&Game, BethiniError> {
        let game = Game::load(&self.root, name)?;
        tracing::info!("selected {}", game.name());
        Ok(self.game.insert(game))
    }

    /// Application directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The live `Bethini.ini` store.
    #[must_use]
    pub const fn app_config(&self) -> &SharedIni {
        &self.app_config
    }

    /// The selected game, if any.
    #[must_use]
    pub const fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// The registry of open INI files.
    #[must_use]
    pub const fn registry(&self) -> &IniRegistry {
        &self.registry
    }

    /// Current preferences from `Bethini.ini`.
    #[must_use]
    pub fn preferences(&self) -> Preferences {
        Preferences::from_store(&self.app_config.borrow())
    }

    /// Map a user-supplied file name to an INI the context can open:
    /// `Bethini.ini`, or a file declared by the selected game.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoGame`] if a game INI is named but no game
    /// is loaded, or [`ResolveError::UnknownIni`] if the game does not
    /// declare it.
    pub fn find_ini(&self, name: &str) -> Result<IniName, BethiniError> {
        if IniName::Bethini.matches(name) {
            return Ok(IniName::Bethini);
        }
        let game = self
            .game
            .as_ref()
            .ok_or_else(|| ResolveError::NoGame(name.trim().to_string()))?;
        game.definition()
            .find_ini(name)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownIni(name.trim().to_string()).into())
    }

    /// Directory `ini` lives in, or `None` if it is not configured.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if no game is loaded or `ini` is not declared.
    pub fn locate(&self, ini: &IniName) -> Result<Option<PathBuf>, BethiniError> {
        if ini.is_app_config() {
            return Ok(Some(self.root.clone()));
        }
        let game = self
            .game
            .as_ref()
            .ok_or_else(|| ResolveError::NoGame(ini.to_string()))?;
        let config = self.app_config.borrow();
        Ok(Directories::new(game.definition(), &config).locate(ini)?)
    }

    /// The live store for `ini`, loaded on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Unconfigured`] if `ini` has no directory, or
    /// any load error.
    pub fn open_ini(&mut self, ini: &IniName) -> Result<SharedIni, BethiniError> {
        let directory = self
            .locate(ini)?
            .ok_or_else(|| ResolveError::Unconfigured(ini.to_string()))?;
        if let Some(store) = self.registry.get(ini, &directory) {
            return Ok(store);
        }
        Ok(self.registry.open(ini, &directory, OpenOptions::default())?)
    }

    /// File that currently supplies `section`/`setting` for `ini`, following
    /// the game's pecking order.
    ///
    /// # Errors
    ///
    /// See [`PeckingOrder::resolve`](crate::pecking::PeckingOrder::resolve).
    pub fn resolve(
        &mut self,
        ini: &IniName,
        section: &str,
        setting: &str,
    ) -> Result<IniName, BethiniError> {
        let Some(game) = &self.game else {
            return Ok(ini.clone());
        };
        let config = self.app_config.borrow();
        let locator = Directories::new(game.definition(), &config);
        game.definition()
            .pecking_order()
            .resolve(ini, section, setting, &locator, &mut self.registry)
    }

    /// Save every modified store. `Bethini.ini` is always saved sorted;
    /// game INIs are sorted only when `sort_games` is set.
    ///
    /// Returns how many files were written.
    ///
    /// # Errors
    ///
    /// Returns the first save failure.
    pub fn save_all(&self, sort_games: bool) -> Result<usize, BethiniError> {
        Ok(self.registry.save_all(sort_games)?)
    }
}
