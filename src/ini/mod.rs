//! INI files: parsing, the ordered document model, the case-insensitive
//! store, and the registry of open files.

pub mod changes;
pub mod document;
pub mod name;
pub mod parser;
pub mod registry;
pub mod store;

pub use changes::{Change, Modification, ModificationLog};
pub use document::{IniDocument, Section};
pub use name::{IniName, KNOWN_INIS};
pub use registry::{IniRegistry, SharedIni};
pub use store::{IniStore, OpenOptions};
