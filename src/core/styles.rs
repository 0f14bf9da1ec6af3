use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::paths::{get_styles_dir, is_valid_name};
use super::strutils::slugify_url;
use super::usercss;

// ── Style Library (~/.styledesk/styles/) ─────────────────────────────────────
//
// Each style is one JSON file named by its machine name — a lowercase slug
// derived from the display name at creation time.  The display `name` can be
// freely renamed afterwards; the file never moves.

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Style {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Release notes shown under the style page.
    #[serde(default)]
    pub notes: String,
    /// UserCSS source, including the metadata header.
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub category: String,
    /// Preview image URL.
    #[serde(default)]
    pub preview: String,
    /// Upstream source to mirror code or metadata from, if any.
    #[serde(default)]
    pub mirror_url: String,
    #[serde(default)]
    pub mirror_code: bool,
    #[serde(default)]
    pub mirror_meta: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Summary row for the library list view.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StyleEntry {
    pub id: String,
    pub name: String,
    pub category: String,
    pub updated_at: String,
}

fn style_path(machine_name: &str) -> Result<PathBuf, String> {
    if !is_valid_name(machine_name) {
        return Err("Invalid style name".to_string());
    }
    Ok(get_styles_dir()?.join(format!("{}.json", machine_name)))
}

/// Derive a fresh machine name from a display name.
pub fn machine_name_for(display_name: &str) -> Result<String, String> {
    let slug = slugify_url(display_name);
    if slug.is_empty() {
        return Err("Style name must contain at least one letter or digit".to_string());
    }
    Ok(slug)
}

pub fn list_styles() -> Result<Vec<StyleEntry>, String> {
    let dir = get_styles_dir()?;

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut styles = Vec::new();
    let entries = fs::read_dir(&dir).map_err(|e| e.to_string())?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_name(stem) {
                    if let Ok(raw) = fs::read_to_string(&path) {
                        if let Ok(style) = serde_json::from_str::<Style>(&raw) {
                            styles.push(StyleEntry {
                                id: stem.to_string(),
                                name: style.name,
                                category: style.category,
                                updated_at: style.updated_at,
                            });
                        }
                    }
                }
            }
        }
    }

    styles.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(styles)
}

pub fn read_style(machine_name: &str) -> Result<Style, String> {
    let path = style_path(machine_name)?;
    if !path.exists() {
        return Err(format!("Style '{}' not found", machine_name));
    }
    let raw = fs::read_to_string(&path).map_err(|e| e.to_string())?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid style data: {}", e))
}

/// Normalise and validate a style before it hits disk: trimmed fields, URL
/// checks, a parsed and valid UserCSS header, and the license/category
/// fallbacks the platform applies on edit.
pub fn validate_style(mut style: Style) -> Result<Style, String> {
    style.name = style.name.trim().to_string();
    if style.name.is_empty() {
        return Err("Name field can't be empty".to_string());
    }

    style.description = style.description.trim().to_string();
    style.notes = style.notes.trim().to_string();
    style.homepage = style.homepage.trim().to_string();
    style.preview = style.preview.trim().to_string();
    style.mirror_url = style.mirror_url.trim().to_string();

    style.license = style.license.trim().to_string();
    if style.license.is_empty() {
        style.license = "No License".to_string();
    }
    style.category = style.category.trim().to_string();
    if style.category.is_empty() {
        style.category = "unset".to_string();
    }

    if !style.homepage.is_empty() {
        url::Url::parse(&style.homepage).map_err(|e| format!("Invalid homepage URL: {}", e))?;
    }
    if !style.mirror_url.is_empty() {
        url::Url::parse(&style.mirror_url).map_err(|e| format!("Invalid mirror URL: {}", e))?;
    }

    let meta = usercss::parse(&style.code)?;
    let errors = usercss::validate(&meta);
    if !errors.is_empty() {
        return Err(errors.join("; "));
    }

    Ok(style)
}

/// Save a style under an existing machine name.  `created_at` is preserved
/// for styles already on disk; every save refreshes `updated_at`.
pub fn save_style(machine_name: &str, style: Style) -> Result<(), String> {
    let path = style_path(machine_name)?;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }

    let mut to_save = validate_style(style)?;
    let now = chrono::Utc::now().to_rfc3339();

    if path.exists() {
        if let Ok(raw) = fs::read_to_string(&path) {
            if let Ok(existing) = serde_json::from_str::<Style>(&raw) {
                if !existing.created_at.is_empty() {
                    to_save.created_at = existing.created_at;
                }
            }
        }
    }
    if to_save.created_at.is_empty() {
        to_save.created_at = now.clone();
    }
    to_save.updated_at = now;

    let pretty = serde_json::to_string_pretty(&to_save).map_err(|e| e.to_string())?;
    fs::write(&path, pretty).map_err(|e| e.to_string())
}

/// Create a new style, deriving its machine name from the display name.
/// Returns the machine name it was saved under.
pub fn create_style(style: Style) -> Result<String, String> {
    let machine_name = machine_name_for(style.name.trim())?;
    let path = style_path(&machine_name)?;
    if path.exists() {
        return Err(format!("A style named '{}' already exists", machine_name));
    }
    save_style(&machine_name, style)?;
    Ok(machine_name)
}

pub fn delete_style(machine_name: &str) -> Result<(), String> {
    let path = style_path(machine_name)?;
    if path.exists() {
        fs::remove_file(&path).map_err(|e| e.to_string())?;
    }
    // Installed styles also have a remote-source record to clean up.
    let _ = super::remote::remove_style_source(machine_name);
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "/* ==UserStyle==\n@name Dark Everything\n@namespace styledesk.app\n@version 1.0.0\n==/UserStyle== */\nbody { background: #111; }\n";

    fn style() -> Style {
        Style {
            name: "  Dark Everything  ".to_string(),
            code: CODE.to_string(),
            ..Style::default()
        }
    }

    #[test]
    fn test_validate_trims_and_applies_fallbacks() {
        let validated = validate_style(style()).unwrap();
        assert_eq!(validated.name, "Dark Everything");
        assert_eq!(validated.license, "No License");
        assert_eq!(validated.category, "unset");
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut s = style();
        s.name = "   ".to_string();
        assert!(validate_style(s).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_homepage() {
        let mut s = style();
        s.homepage = "not a url".to_string();
        assert!(validate_style(s).is_err());
    }

    #[test]
    fn test_validate_rejects_invalid_usercss() {
        let mut s = style();
        s.code = "body { color: red; }".to_string();
        assert!(validate_style(s).is_err());

        let mut s = style();
        s.code = "/* ==UserStyle==\n@name X\n==/UserStyle== */\n".to_string();
        let err = validate_style(s).unwrap_err();
        assert!(err.contains("@namespace"));
        assert!(err.contains("@version"));
    }

    #[test]
    fn test_machine_name_for() {
        assert_eq!(machine_name_for("Dark Everything").unwrap(), "dark-everything");
        assert!(machine_name_for("☆☆☆").is_err());
    }
}
