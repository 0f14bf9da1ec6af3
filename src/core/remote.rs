use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use super::config::load_config;
use super::paths::get_styledesk_dir;
use super::strutils::slugify_url;
use super::{styles, usercss};

// ── Platform API ─────────────────────────────────────────────────────────────
//
// All calls go through the configured platform instance (config.toml).
// Endpoints live under `{base_url}/api/`.

const USER_AGENT: &str = "styledesk-desktop/1.0";

fn api_client() -> Result<(reqwest::Client, String), String> {
    let config = load_config()?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| format!("HTTP client error: {}", e))?;
    Ok((client, config.base_url))
}

/// A style result from the platform's search API.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StyleCard {
    pub id: i64,
    pub name: String,
    /// Author username.
    pub username: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub installs: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl StyleCard {
    /// URL- and SEO-friendly slug for this card's name.
    pub fn slug(&self) -> String {
        slugify_url(&self.name)
    }

    /// Absolute path of the style's page on the platform.
    pub fn style_url(&self) -> String {
        format!("/style/{}/{}", self.id, self.slug())
    }
}

/// Search the platform for styles matching `query`.
/// Calls `{base_url}/api/search?q=<query>&limit=<limit>`.
pub async fn search_styles(query: &str, limit: u32) -> Result<Vec<StyleCard>, String> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let (client, base) = api_client()?;
    let url = format!(
        "{}/api/search?q={}&limit={}",
        base,
        urlencoding::encode(query),
        limit
    );

    let resp = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !resp.status().is_success() {
        return Err(format!("Search returned status {}", resp.status()));
    }

    #[derive(Deserialize)]
    struct ApiResponse {
        data: Vec<StyleCard>,
    }

    let body: ApiResponse = resp
        .json()
        .await
        .map_err(|e| format!("Failed to parse search response: {}", e))?;

    Ok(body.data)
}

/// One row of the platform's compact style index.  Field names are the one-
/// and two-letter JSON keys the index endpoint uses to keep the payload small.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompactStyle {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "an")]
    pub username: String,
    #[serde(rename = "sn", default)]
    pub preview: String,
    #[serde(rename = "c", default)]
    pub category: String,
    #[serde(rename = "i")]
    pub id: i64,
    #[serde(rename = "u", default)]
    pub updated_at: i64,
    #[serde(rename = "t", default)]
    pub total_installs: i64,
    #[serde(rename = "w", default)]
    pub weekly_installs: i64,
    #[serde(rename = "r", default)]
    pub rating: f64,
}

/// Fetch the full compact index.  This is a large payload; callers cache it
/// (see `core::index`) rather than hitting the endpoint per keystroke.
pub async fn fetch_compact_index() -> Result<Vec<CompactStyle>, String> {
    let (client, base) = api_client()?;
    let url = format!("{}/api/index/compact", base);

    let resp = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !resp.status().is_success() {
        return Err(format!("Index fetch returned status {}", resp.status()));
    }

    #[derive(Deserialize)]
    struct ApiResponse {
        data: Vec<CompactStyle>,
    }

    let body: ApiResponse = resp
        .json()
        .await
        .map_err(|e| format!("Failed to parse index response: {}", e))?;

    Ok(body.data)
}

/// Fetch a style's UserCSS source.  `Ok(None)` means the style is gone from
/// the platform (404); other failures are errors.
pub async fn fetch_style_code(id: i64) -> Result<Option<String>, String> {
    let (client, base) = api_client()?;
    let url = format!("{}/api/style/{}.user.css", base, id);

    let resp = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !resp.status().is_success() {
        return Err(format!("Style fetch returned status {}", resp.status()));
    }

    let code = resp
        .text()
        .await
        .map_err(|e| format!("Failed to read style code: {}", e))?;
    Ok(Some(code))
}

/// Fetch a preview image and return it as a `data:` URI so the frontend can
/// embed it directly without a second network hop from the webview.
pub async fn fetch_preview_data_uri(url: &str) -> Result<String, String> {
    let (client, _) = api_client()?;

    let resp = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !resp.status().is_success() {
        return Err(format!("Preview fetch returned status {}", resp.status()));
    }

    let mime = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| mime_from_url(url).to_string());

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| format!("Failed to read preview image: {}", e))?;

    use base64::{engine::general_purpose::STANDARD, Engine as _};
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&bytes)))
}

fn mime_from_url(url: &str) -> &'static str {
    let path = url.split('?').next().unwrap_or(url);
    if path.ends_with(".webp") {
        "image/webp"
    } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        "image/jpeg"
    } else if path.ends_with(".gif") {
        "image/gif"
    } else {
        "image/png"
    }
}

/// Submit a review for a platform style.  The checks mirror the platform's
/// own rules so obviously-invalid reviews never leave the machine: rating in
/// 0..=5, comment at most 500 characters, and not both empty.
pub async fn submit_review(style_id: i64, rating: i64, comment: &str) -> Result<(), String> {
    let comment = comment.trim();
    if !(0..=5).contains(&rating) {
        return Err("Rating is out of range.".to_string());
    }
    if comment.len() > 500 {
        return Err("Comment can't be longer than 500 characters.".to_string());
    }
    if rating == 0 && comment.is_empty() {
        return Err(
            "You can't make empty reviews. Please insert a rating and/or a comment.".to_string(),
        );
    }

    let token = super::auth::session_token()?;
    let (client, base) = api_client()?;
    let url = format!("{}/api/style/{}/review", base, style_id);

    let resp = client
        .post(&url)
        .header("User-Agent", USER_AGENT)
        .bearer_auth(token)
        .json(&serde_json::json!({ "rating": rating, "comment": comment }))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(format!("Review submission failed ({}): {}", status, body));
    }

    Ok(())
}

/// Fetch a style from the platform and add it to the local library, pointing
/// its `@updateURL` back at the platform so installed copies self-update.
/// Returns the machine name it was saved under.
pub async fn install_style(id: i64) -> Result<String, String> {
    let code = fetch_style_code(id)
        .await?
        .ok_or_else(|| format!("Style {} not found on the platform", id))?;

    let meta = usercss::parse(&code)?;
    let errors = usercss::validate(&meta);
    if !errors.is_empty() {
        return Err(errors.join("; "));
    }

    let machine_name = styles::machine_name_for(&meta.name)?;

    let config = load_config()?;
    let update_url = format!("{}/api/style/{}.user.css", config.base_url, id);
    let code = usercss::override_update_url(&code, &update_url)?;

    let style = styles::Style {
        name: meta.name.clone(),
        description: meta.description.clone(),
        homepage: meta.homepage_url.clone(),
        license: meta.license.clone(),
        code,
        ..styles::Style::default()
    };
    styles::save_style(&machine_name, style)?;
    record_style_source(&machine_name, id, &update_url)?;

    Ok(machine_name)
}

/// Open a style's page on the platform in the default browser.
pub fn open_style_page(id: i64, name: &str) -> Result<(), String> {
    let config = load_config()?;
    let url = format!("{}/style/{}/{}", config.base_url, id, slugify_url(name));
    open::that(&url).map_err(|e| format!("Failed to open browser: {}", e))
}

// ── Style sources (~/.styledesk/sources.json) ────────────────────────────────
//
// Tracks the remote origin of styles installed from the platform.  Styles
// authored locally simply have no entry in this file.
//
// Format:
//   {
//     "machine-name": { "id": 42, "url": "https://.../api/style/42.user.css" },
//     ...
//   }

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StyleSource {
    /// Platform style ID.
    pub id: i64,
    /// The `.user.css` endpoint the style updates from.
    pub url: String,
}

fn get_sources_path() -> Result<PathBuf, String> {
    Ok(get_styledesk_dir()?.join("sources.json"))
}

/// Read the full registry.  Returns an empty map if the file doesn't exist.
pub fn read_style_sources() -> Result<HashMap<String, StyleSource>, String> {
    let path = get_sources_path()?;
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let raw = fs::read_to_string(&path).map_err(|e| e.to_string())?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid sources.json: {}", e))
}

fn write_style_sources(registry: &HashMap<String, StyleSource>) -> Result<(), String> {
    let path = get_sources_path()?;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    let json = serde_json::to_string_pretty(registry).map_err(|e| e.to_string())?;
    fs::write(&path, json).map_err(|e| e.to_string())
}

/// Record that a style was installed from the platform.
pub fn record_style_source(machine_name: &str, id: i64, url: &str) -> Result<(), String> {
    let mut registry = read_style_sources()?;
    registry.insert(
        machine_name.to_string(),
        StyleSource {
            id,
            url: url.to_string(),
        },
    );
    write_style_sources(&registry)
}

/// Remove the remote origin record for a style (called on delete).
pub fn remove_style_source(machine_name: &str) -> Result<(), String> {
    let mut registry = read_style_sources()?;
    registry.remove(machine_name);
    write_style_sources(&registry)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_card_urls() {
        let card = StyleCard {
            id: 42,
            name: "GitHub: Dark+ (v2)".to_string(),
            username: "vee".to_string(),
            preview: String::new(),
            views: 0,
            installs: 0,
            rating: 0.0,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(card.slug(), "github-dark-v2");
        assert_eq!(card.style_url(), "/style/42/github-dark-v2");
    }

    #[test]
    fn test_compact_style_uses_short_keys() {
        let raw = r#"{"n":"Dark","an":"vee","sn":"p.webp","c":"github","i":7,"u":1700000000,"t":120,"w":14,"r":4.5}"#;
        let entry: CompactStyle = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.name, "Dark");
        assert_eq!(entry.username, "vee");
        assert_eq!(entry.id, 7);
        assert_eq!(entry.weekly_installs, 14);

        let back = serde_json::to_value(&entry).unwrap();
        assert!(back.get("n").is_some());
        assert!(back.get("name").is_none());
    }

    #[test]
    fn test_mime_from_url() {
        assert_eq!(mime_from_url("https://x/p.webp"), "image/webp");
        assert_eq!(mime_from_url("https://x/p.jpeg?v=2"), "image/jpeg");
        assert_eq!(mime_from_url("https://x/p"), "image/png");
    }
}
