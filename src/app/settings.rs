//! `settings.json`: the settings a game exposes and their preset values.
use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::ini::IniName;

/// Parsed `settings.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    /// Display name of the game.
    pub game_name: String,
    /// Store identifier of the game.
    #[serde(default)]
    pub game_id: String,
    /// Every setting the game definition knows about.
    #[serde(default)]
    pub ini_values: Vec<SettingInfo>,
}

/// One known setting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingInfo {
    /// Setting name as the game spells it.
    pub name: String,
    /// Section holding the setting.
    pub section: String,
    /// INI holding the setting; the game's default INI when absent.
    #[serde(default)]
    pub ini: Option<IniName>,
    /// Value kind (`boolean`, `number`, `string`, ...), informational.
    #[serde(rename = "type", default)]
    pub value_type: Option<String>,
    /// Value per value type (`default`, `recommended`, preset names).
    #[serde(default)]
    pub value: BTreeMap<String, Value>,
    /// Written even when equal to the default.
    #[serde(default)]
    pub always_print: bool,
}

impl SettingInfo {
    /// The value for `value_type`, rendered the way it is written to an INI.
    #[must_use]
    pub fn value(&self, value_type: &str) -> Option<String> {
        self.value.get(value_type).and_then(ini_text)
    }
}

/// Render a JSON scalar as INI text. `null` has no INI form.
#[must_use]
pub fn ini_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_render_as_ini_text() {
        assert_eq!(ini_text(&json!(1)), Some("1".to_string()));
        assert_eq!(ini_text(&json!(1.0)), Some("1.0".to_string()));
        assert_eq!(ini_text(&json!(0.25)), Some("0.25".to_string()));
        assert_eq!(ini_text(&json!("ENGLISH")), Some("ENGLISH".to_string()));
        assert_eq!(ini_text(&json!("")), Some(String::new()));
        assert_eq!(ini_text(&json!(true)), Some("True".to_string()));
        assert_eq!(ini_text(&json!(null)), None);
    }

    #[test]
    fn deserialize_setting_info() {
        let info: SettingInfo = serde_json::from_str(
            r#"{
                "name": "fShadowDistance",
                "section": "Display",
                "ini": "SkyrimPrefs.ini",
                "type": "number",
                "value": {"default": 3000, "Bethini High": 8000.0},
                "alwaysPrint": true
            }"#,
        )
        .unwrap();
        assert_eq!(info.ini, Some(IniName::SkyrimPrefs));
        assert!(info.always_print);
        assert_eq!(info.value("default").as_deref(), Some("3000"));
        assert_eq!(info.value("Bethini High").as_deref(), Some("8000.0"));
        assert_eq!(info.value("Bethini Low"), None);
    }

    #[test]
    fn optional_fields_default() {
        let settings: GameSettings = serde_json::from_str(
            r#"{"gameName": "Skyrim Special Edition",
                "iniValues": [{"name": "sLanguage", "section": "General"}]}"#,
        )
        .unwrap();
        assert_eq!(settings.game_id, "");
        let info = &settings.ini_values[0];
        assert_eq!(info.ini, None);
        assert!(!info.always_print);
        assert!(info.value.is_empty());
    }
}
