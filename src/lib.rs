//! INI editing engine for Bethesda game settings.
//!
//! Reads and writes game INI files with case-insensitive section and
//! setting names while preserving the spelling and order found on disk,
//! and resolves which of several layered INI files supplies a setting.
//!
//! The public API is organised into these layers:
//!
//! - **[`ini`]**: parse, query, edit and save single INI files; share open
//!   files through a registry
//! - **[`app`]**: game definitions (`Bethini.json`, `settings.json`)
//! - **[`pecking`]**: pecking-order resolution across layered INI files
//! - **[`context`]**: the application INI, registry and selected game in one place
//! - **[`commands`]**: subcommand orchestration for the `bethini` binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod ini;
pub mod logging;
pub mod pecking;
pub mod preferences;
