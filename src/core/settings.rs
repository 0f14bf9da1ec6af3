use serde::{Deserialize, Serialize};
use std::fs;

use super::paths::get_styledesk_dir;

// ── Settings (~/.styledesk/settings.json) ────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserSettings {
    /// App-wide color scheme: "system", "light" or "dark".  Stored as-is;
    /// the account form writes whatever the control currently holds.
    #[serde(default = "default_color_scheme")]
    pub color_scheme: String,
    /// How many styles to show per page in search and library views.
    #[serde(default = "default_entries_per_page")]
    pub entries_per_page: u32,
    /// Check installed styles for upstream updates on launch.
    #[serde(default = "default_auto_check_updates")]
    pub auto_check_updates: bool,
}

fn default_color_scheme() -> String {
    "system".to_string()
}

fn default_entries_per_page() -> u32 {
    36
}

fn default_auto_check_updates() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            color_scheme: default_color_scheme(),
            entries_per_page: default_entries_per_page(),
            auto_check_updates: default_auto_check_updates(),
        }
    }
}

/// A partial settings update: only populated fields are applied.  This is
/// what the account form hands to [`store_new_settings`] on save.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PartialSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries_per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_check_updates: Option<bool>,
}

impl PartialSettings {
    /// Merge this update over `base`, returning the merged settings.
    /// Fields left `None` are untouched.
    pub fn apply(&self, mut base: UserSettings) -> UserSettings {
        if let Some(v) = &self.color_scheme {
            base.color_scheme = v.clone();
        }
        if let Some(v) = self.entries_per_page {
            base.entries_per_page = v;
        }
        if let Some(v) = self.auto_check_updates {
            base.auto_check_updates = v;
        }
        base
    }
}

pub fn read_settings() -> Result<UserSettings, String> {
    let path = get_styledesk_dir()?.join("settings.json");
    if !path.exists() {
        return Ok(UserSettings::default());
    }
    let raw = fs::read_to_string(&path).map_err(|e| e.to_string())?;
    Ok(serde_json::from_str(&raw).unwrap_or_default())
}

pub fn write_settings(settings: &UserSettings) -> Result<(), String> {
    let path = get_styledesk_dir()?.join("settings.json");
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    let raw = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
    fs::write(&path, raw).map_err(|e| e.to_string())
}

/// Persist a partial settings update: read the current settings, apply the
/// populated fields, write the result back.
pub fn store_new_settings(update: &PartialSettings) -> Result<(), String> {
    let merged = update.apply(read_settings()?);
    write_settings(&merged)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_touches_populated_fields() {
        let update = PartialSettings {
            color_scheme: Some("dark".to_string()),
            ..PartialSettings::default()
        };
        let merged = update.apply(UserSettings::default());
        assert_eq!(merged.color_scheme, "dark");
        assert_eq!(merged.entries_per_page, 36);
        assert!(merged.auto_check_updates);
    }

    #[test]
    fn test_apply_empty_update_is_identity() {
        let base = UserSettings {
            color_scheme: "light".to_string(),
            entries_per_page: 12,
            auto_check_updates: false,
        };
        let merged = PartialSettings::default().apply(base.clone());
        assert_eq!(merged.color_scheme, base.color_scheme);
        assert_eq!(merged.entries_per_page, base.entries_per_page);
        assert_eq!(merged.auto_check_updates, base.auto_check_updates);
    }

    #[test]
    fn test_partial_update_serializes_only_populated_fields() {
        let update = PartialSettings {
            color_scheme: Some("dark".to_string()),
            ..PartialSettings::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({ "color_scheme": "dark" }));
    }

    #[test]
    fn test_settings_reads_tolerate_unknown_scheme() {
        let settings: UserSettings =
            serde_json::from_str("{\"color_scheme\": \"solarized\"}").unwrap();
        assert_eq!(settings.color_scheme, "solarized");
        assert_eq!(settings.entries_per_page, 36);
    }
}
