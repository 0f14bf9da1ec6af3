use serde::Deserialize;
use std::fs;

use super::paths::get_styledesk_dir;

// ── App Config (~/.styledesk/config.toml) ────────────────────────────────────
//
// Optional instance configuration.  Most users never create this file; it
// exists so the app can be pointed at a self-hosted platform instance.

pub const DEFAULT_BASE_URL: &str = "https://styledesk.app";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the userstyles platform.  API endpoints live under
    /// `{base_url}/api/`, style pages under `{base_url}/style/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout for platform calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

pub fn load_config() -> Result<AppConfig, String> {
    let path = get_styledesk_dir()?.join("config.toml");
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(&path).map_err(|e| e.to_string())?;
    parse_config(&raw)
}

/// Parse a config.toml document.  Missing keys fall back to defaults; a
/// document that fails to parse is an error rather than a silent default.
pub fn parse_config(raw: &str) -> Result<AppConfig, String> {
    let mut config: AppConfig =
        toml::from_str(raw).map_err(|e| format!("Failed to parse config.toml: {}", e))?;
    // A trailing slash would produce `//api/...` URLs downstream.
    config.base_url = config.base_url.trim_end_matches('/').to_string();
    Ok(config)
}

// ── Tests ────────────────────────────────────────────────────────────────────
