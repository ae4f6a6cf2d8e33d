//! Identifiers for the INI files the editor knows how to manage.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::IniNameError;

/// A known INI file, or an ad hoc one created through [`IniName::custom`].
///
/// Parsing with [`FromStr`] only accepts the known names (case-insensitively),
/// so a typo in a hard-coded name is caught where the name is built.
///
/// ```
/// use bethini::ini::IniName;
///
/// let name: IniName = "skyrimprefs.ini".parse().unwrap();
/// assert_eq!(name, IniName::SkyrimPrefs);
/// assert_eq!(name.to_string(), "SkyrimPrefs.ini");
/// assert!("SkyrimPerfs.ini".parse::<IniName>().is_err());
/// ```
///
/// Equality, ordering and hashing ignore ASCII case in [`IniName::Custom`]
/// names, the same way the file system the games run on does.
#[derive(Debug, Clone)]
pub enum IniName {
    /// The editor's own settings file.
    Bethini,
    /// `Fallout4.ini`
    Fallout4,
    /// `Fallout4Prefs.ini`
    Fallout4Prefs,
    /// `Fallout4Custom.ini`
    Fallout4Custom,
    /// `Fallout.ini`
    Fallout,
    /// `FalloutPrefs.ini`
    FalloutPrefs,
    /// `FalloutCustom.ini`
    FalloutCustom,
    /// `Skyrim.ini`
    Skyrim,
    /// `SkyrimPrefs.ini`
    SkyrimPrefs,
    /// `SkyrimCustom.ini`
    SkyrimCustom,
    /// `StarfieldCustom.ini`
    StarfieldCustom,
    /// `StarfieldPrefs.ini`
    StarfieldPrefs,
    /// `Ultra.ini`
    Ultra,
    /// Any other file ending in `.ini`, spelled as given.
    Custom(String),
}

/// Every known variant, in declaration order.
pub const KNOWN_INIS: &[IniName] = &[
    IniName::Bethini,
    IniName::Fallout4,
    IniName::Fallout4Prefs,
    IniName::Fallout4Custom,
    IniName::Fallout,
    IniName::FalloutPrefs,
    IniName::FalloutCustom,
    IniName::Skyrim,
    IniName::SkyrimPrefs,
    IniName::SkyrimCustom,
    IniName::StarfieldCustom,
    IniName::StarfieldPrefs,
    IniName::Ultra,
];

impl IniName {
    /// The file name on disk.
    #[must_use]
    pub fn file_name(&self) -> &str {
        match self {
            Self::Bethini => "Bethini.ini",
            Self::Fallout4 => "Fallout4.ini",
            Self::Fallout4Prefs => "Fallout4Prefs.ini",
            Self::Fallout4Custom => "Fallout4Custom.ini",
            Self::Fallout => "Fallout.ini",
            Self::FalloutPrefs => "FalloutPrefs.ini",
            Self::FalloutCustom => "FalloutCustom.ini",
            Self::Skyrim => "Skyrim.ini",
            Self::SkyrimPrefs => "SkyrimPrefs.ini",
            Self::SkyrimCustom => "SkyrimCustom.ini",
            Self::StarfieldCustom => "StarfieldCustom.ini",
            Self::StarfieldPrefs => "StarfieldPrefs.ini",
            Self::Ultra => "Ultra.ini",
            Self::Custom(name) => name,
        }
    }

    /// Look up a known name, ignoring case.
    #[must_use]
    pub fn known(name: &str) -> Option<Self> {
        KNOWN_INIS
            .iter()
            .find(|k| k.file_name().eq_ignore_ascii_case(name.trim()))
            .cloned()
    }

    /// Build a name for a file that may not be in the known list.
    ///
    /// Known spellings map back to their variant, so `custom("skyrim.ini")`
    /// equals [`IniName::Skyrim`].
    ///
    /// # Errors
    ///
    /// Returns [`IniNameError::Invalid`] if the name is empty, contains a
    /// path separator, or does not end in `.ini`.
    pub fn custom(name: &str) -> Result<Self, IniNameError> {
        let trimmed = name.trim();
        if let Some(known) = Self::known(trimmed) {
            return Ok(known);
        }
        let has_stem = trimmed.len() > ".ini".len();
        let has_ext = trimmed
            .get(trimmed.len().saturating_sub(4)..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".ini"));
        if !has_stem || !has_ext || trimmed.contains(['/', '\\']) {
            return Err(IniNameError::Invalid(name.to_string()));
        }
        Ok(Self::Custom(trimmed.to_string()))
    }

    /// Whether this is the editor's own settings file.
    #[must_use]
    pub const fn is_app_config(&self) -> bool {
        matches!(self, Self::Bethini)
    }

    /// Position in the variant order; all custom names share the last slot.
    const fn rank(&self) -> u8 {
        match self {
            Self::Bethini => 0,
            Self::Fallout4 => 1,
            Self::Fallout4Prefs => 2,
            Self::Fallout4Custom => 3,
            Self::Fallout => 4,
            Self::FalloutPrefs => 5,
            Self::FalloutCustom => 6,
            Self::Skyrim => 7,
            Self::SkyrimPrefs => 8,
            Self::SkyrimCustom => 9,
            Self::StarfieldCustom => 10,
            Self::StarfieldPrefs => 11,
            Self::Ultra => 12,
            Self::Custom(_) => 13,
        }
    }

    /// Case-insensitive comparison by file name.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.file_name().eq_ignore_ascii_case(other.trim())
    }
}

fn folded(name: &str) -> impl Iterator<Item = u8> + '_ {
    name.bytes().map(|b| b.to_ascii_lowercase())
}

impl PartialEq for IniName {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => a.eq_ignore_ascii_case(b),
            _ => self.rank() == other.rank(),
        }
    }
}

impl Eq for IniName {}

impl Ord for IniName {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => folded(a).cmp(folded(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for IniName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for IniName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        if let Self::Custom(name) = self {
            for b in folded(name) {
                b.hash(state);
            }
        }
    }
}

impl fmt::Display for IniName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for IniName {
    type Err = IniNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::known(s).ok_or_else(|| IniNameError::Unknown(s.to_string()))
    }
}

/// Game definitions are data, so they may name files outside the known list;
/// those go through [`IniName::custom`].
impl<'de> Deserialize<'de> for IniName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::custom(&raw).map_err(serde::de::Error::custom)
    }
}
