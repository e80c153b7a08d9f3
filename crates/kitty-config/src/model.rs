use std::path::PathBuf;

use kitty_domain::{GroupId, TimeWindow, UserProfile};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Keys accepted by [`Config::set`], in display order.
pub const CONFIG_KEYS: [&str; 7] = [
    "locale",
    "currency",
    "project_id",
    "default_window",
    "ui_color_enabled",
    "currency_precision",
    "data_root",
];

/// User preferences and the signed-in profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Identifier of the document store project. Selects the data directory
    /// under the data root.
    #[serde(default = "Config::default_project_id")]
    pub project_id: String,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub default_window: TimeWindow,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub currency_precision: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root for stored documents. Defaults to `<home>/data`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            project_id: Self::default_project_id(),
            profile: UserProfile::default(),
            default_window: TimeWindow::All,
            ui_color_enabled: Self::default_ui_color_enabled(),
            currency_precision: None,
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_project_id() -> String {
        "kitty-local".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn precision(&self) -> usize {
        usize::from(self.currency_precision.unwrap_or(2))
    }

    pub fn group_id(&self) -> &GroupId {
        &self.profile.group_id
    }

    /// Directory holding this project's collections.
    pub fn resolve_data_dir(&self, home: &std::path::Path) -> PathBuf {
        let root = self
            .data_root
            .clone()
            .unwrap_or_else(|| home.join("data"));
        root.join(&self.project_id)
    }

    /// Current value of a setting as shown by `config show`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "project_id" => self.project_id.clone(),
            "default_window" => self.default_window.token().to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "currency_precision" => self
                .currency_precision
                .map(|value| value.to_string())
                .unwrap_or_else(|| "default".into()),
            "data_root" => self
                .data_root
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "default".into()),
            _ => return None,
        };
        Some(value)
    }

    /// Parses `value` and assigns it to `key`. `default` clears optional settings.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "locale" => self.locale = non_empty(key, value)?,
            "currency" => self.currency = non_empty(key, value)?.to_ascii_uppercase(),
            "project_id" => {
                let id = non_empty(key, value)?;
                if id.contains(['/', '\\']) || id.starts_with('.') {
                    return Err(ConfigError::Invalid(format!(
                        "project_id `{id}` must be a plain name"
                    )));
                }
                self.project_id = id;
            }
            "default_window" => {
                self.default_window = value.parse().map_err(ConfigError::Invalid)?;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    other => {
                        return Err(ConfigError::Invalid(format!(
                            "ui_color_enabled expects on/off, got `{other}`"
                        )))
                    }
                };
            }
            "currency_precision" => {
                self.currency_precision = if value.eq_ignore_ascii_case("default") {
                    None
                } else {
                    let digits: u8 = value.parse().map_err(|_| {
                        ConfigError::Invalid(format!("currency_precision `{value}` is not a number"))
                    })?;
                    if digits > 6 {
                        return Err(ConfigError::Invalid(
                            "currency_precision must be between 0 and 6".into(),
                        ));
                    }
                    Some(digits)
                };
            }
            "data_root" => {
                self.data_root = if value.eq_ignore_ascii_case("default") {
                    None
                } else {
                    Some(PathBuf::from(non_empty(key, value)?))
                };
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{key} cannot be empty")));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_parses_typed_values() {
        let mut config = Config::default();
        config.set("default_window", "month").unwrap();
        config.set("ui_color_enabled", "off").unwrap();
        config.set("currency_precision", "0").unwrap();
        config.set("currency", "eur").unwrap();

        assert_eq!(config.default_window, TimeWindow::ThisMonth);
        assert!(!config.ui_color_enabled);
        assert_eq!(config.precision(), 0);
        assert_eq!(config.currency, "EUR");

        config.set("currency_precision", "default").unwrap();
        assert_eq!(config.precision(), 2);
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut config = Config::default();
        assert!(config.set("theme", "dark").is_err());
        assert!(config.set("currency_precision", "many").is_err());
        assert!(config.set("project_id", "../escape").is_err());
        assert!(config.set("locale", "  ").is_err());
    }

    #[test]
    fn data_dir_is_scoped_by_project() {
        let config = Config::default();
        let dir = config.resolve_data_dir(std::path::Path::new("/tmp/kitty"));
        assert_eq!(dir, PathBuf::from("/tmp/kitty/data/kitty-local"));
    }

    #[test]
    fn legacy_file_without_profile_loads_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"locale":"en-GB","currency":"GBP"}"#).unwrap();
        assert!(config.profile.group_id.is_default());
        assert_eq!(config.project_id, "kitty-local");
        assert!(config.get("data_root").is_some());
    }
}
