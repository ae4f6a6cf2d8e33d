// Shared helpers for integration tests.
//
// Provides a temporary application directory (Bethini.ini, a game definition
// under apps/, and a game INI folder) and a fluent builder so each
// integration test can set up an isolated environment without repeating
// filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bethini::cli::Cli;
use bethini::commands;
use bethini::context::AppContext;
use clap::Parser;

/// Folder name of the test game under `apps/`.
pub const GAME: &str = "Skyrim Special Edition";

/// `[Directories]` setting naming the game INI folder.
pub const INI_PATH_SETTING: &str = "sSkyrim Special EditionINIPath";

const BETHINI_JSON: &str = r#"{
    "INIs": {
        "Bethini.ini": "",
        "SkyrimPrefs.ini": "sSkyrim Special EditionINIPath",
        "Skyrim.ini": "sSkyrim Special EditionINIPath",
        "SkyrimCustom.ini": "sSkyrim Special EditionINIPath"
    },
    "INI_pecking_order": {
        "Skyrim.ini": ["Skyrim.ini", "SkyrimCustom.ini"],
        "SkyrimPrefs.ini": ["SkyrimPrefs.ini", "SkyrimCustom.ini"]
    },
    "presetsIgnoreTheseSettings": ["iSize W", "iSize H"],
    "valueTypes": ["default", "fixedDefault", "Bethini Low", "Bethini High"],
    "displayTabs": {}
}"#;

const SETTINGS_JSON: &str = r#"{
    "gameName": "Skyrim Special Edition",
    "gameId": "489830",
    "iniValues": [
        {"name": "sLanguage", "section": "General",
         "value": {"default": "ENGLISH"}},
        {"name": "fShadowDistance", "section": "Display", "ini": "SkyrimPrefs.ini",
         "value": {"default": 3000, "Bethini Low": 2000.0, "Bethini High": 8000.0}},
        {"name": "iShadowMapResolution", "section": "Display", "ini": "SkyrimPrefs.ini",
         "value": {"default": 2048, "Bethini Low": 1024, "Bethini High": 4096}},
        {"name": "bTreesReceiveShadows", "section": "Display", "ini": "SkyrimPrefs.ini",
         "value": {"default": 0, "Bethini High": true}},
        {"name": "iSize W", "section": "Display", "ini": "SkyrimPrefs.ini",
         "value": {"default": 1280, "Bethini High": 3840}},
        {"name": "bEnableFileSelection", "section": "Launcher", "ini": "SkyrimPrefs.ini",
         "alwaysPrint": true, "value": {"default": 0, "fixedDefault": 1}}
    ]
}"#;

/// An isolated application directory backed by a [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Temporary application directory.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a context with the test game definition and an empty game INI
    /// folder registered in `Bethini.ini`.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let app = root.path().join("apps").join(GAME);
        fs::create_dir_all(&app).expect("create app dir");
        fs::write(app.join("Bethini.json"), BETHINI_JSON).expect("write Bethini.json");
        fs::write(app.join("settings.json"), SETTINGS_JSON).expect("write settings.json");

        let ctx = Self { root };
        fs::create_dir_all(ctx.game_dir()).expect("create game ini dir");
        ctx.write_app_config(&format!(
            "[Directories]\n{INI_PATH_SETTING}={}\n\n[General]\nsAppName={GAME}\niMaxLogs=-1\n",
            ctx.game_dir().display()
        ));
        ctx
    }

    /// Application directory.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Folder holding the game INI files.
    pub fn game_dir(&self) -> PathBuf {
        self.root.path().join("My Games").join(GAME)
    }

    /// Overwrite `Bethini.ini`.
    pub fn write_app_config(&self, content: &str) {
        fs::write(self.root.path().join("Bethini.ini"), content).expect("write Bethini.ini");
    }

    /// Write a game INI file.
    pub fn write_game_ini(&self, name: &str, content: &str) {
        fs::write(self.game_dir().join(name), content).expect("write game ini");
    }

    /// Read a game INI file back.
    pub fn read_game_ini(&self, name: &str) -> String {
        fs::read_to_string(self.game_dir().join(name)).expect("read game ini")
    }

    /// Read `Bethini.ini` back.
    pub fn read_app_config(&self) -> String {
        fs::read_to_string(self.root.path().join("Bethini.ini")).expect("read Bethini.ini")
    }

    /// Open an [`AppContext`] with the test game selected.
    pub fn open(&self) -> AppContext {
        let mut ctx = AppContext::open(self.root.path()).expect("open context");
        ctx.load_game(GAME).expect("load game");
        ctx
    }

    /// Run the CLI with `args` against this directory and return its output.
    pub fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        let root = self.root.path().display().to_string();
        let argv = ["bethini", "--root", root.as_str()]
            .into_iter()
            .chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv)?;
        let mut ctx = AppContext::open(self.root.path())?;
        commands::select_game(&mut ctx, &cli.global)?;
        let mut out = Vec::new();
        commands::run(&cli.command, &cli.global, &mut ctx, &mut out)?;
        Ok(String::from_utf8(out)?)
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write a game INI file.
    pub fn with_game_ini(self, name: &str, content: &str) -> Self {
        self.ctx.write_game_ini(name, content);
        self
    }

    /// Replace `Bethini.ini`, so the game INI folder is not configured
    /// unless `content` configures it.
    pub fn with_app_config(self, content: &str) -> Self {
        self.ctx.write_app_config(content);
        self
    }

    /// Finalise the context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
