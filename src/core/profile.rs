use serde::{Deserialize, Serialize};
use std::fs;

use super::paths::get_styledesk_dir;

// ── Account Profile (~/.styledesk/profile.json) ──────────────────────────────
//
// Local copy of the user's platform identity.  Before the first login the
// profile carries a stable machine-local ID so styles created offline are
// consistently attributed; a login replaces it with the platform user ID.

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    /// Stable user ID: `local_<uuid>` until a login stores the platform ID.
    pub user_id: String,
    /// Platform username (empty until first login).
    #[serde(default)]
    pub username: String,
    /// Account email (empty until first login).
    #[serde(default)]
    pub email: String,
    /// Display name shown in the UI; falls back to the username.
    #[serde(default)]
    pub display_name: String,
    /// Free-form profile text.
    #[serde(default)]
    pub biography: String,
    /// RFC 3339 timestamp of the first time this profile was saved locally.
    #[serde(default)]
    pub created_at: String,
    /// RFC 3339 timestamp of the last profile update.
    #[serde(default)]
    pub updated_at: String,
}

fn get_profile_path() -> Result<std::path::PathBuf, String> {
    Ok(get_styledesk_dir()?.join("profile.json"))
}

/// Returns the local profile, bootstrapping a default one on first run so
/// attribution fields are never null in the frontend.
pub fn read_profile() -> Result<Option<UserProfile>, String> {
    let path = get_profile_path()?;
    if path.exists() {
        let raw = fs::read_to_string(&path).map_err(|e| e.to_string())?;
        let profile: UserProfile =
            serde_json::from_str(&raw).map_err(|e| format!("Invalid profile data: {}", e))?;
        return Ok(Some(profile));
    }

    let local_id = format!("local_{}", uuid::Uuid::new_v4().simple());
    let now = chrono::Utc::now().to_rfc3339();
    let default_profile = UserProfile {
        user_id: local_id,
        username: String::new(),
        email: String::new(),
        display_name: String::new(),
        biography: String::new(),
        created_at: now.clone(),
        updated_at: now,
    };
    save_profile(&default_profile)?;
    Ok(Some(default_profile))
}

/// Save or update the local profile.  `created_at` is set once and then
/// preserved; every save refreshes `updated_at`.
pub fn save_profile(profile: &UserProfile) -> Result<(), String> {
    let path = get_profile_path()?;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }

    let mut to_save = profile.clone();
    let now = chrono::Utc::now().to_rfc3339();

    // Read the existing file directly rather than through read_profile(),
    // which would bootstrap-save and recurse on first run.
    if path.exists() {
        if let Ok(raw) = fs::read_to_string(&path) {
            if let Ok(existing) = serde_json::from_str::<UserProfile>(&raw) {
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

    let raw = serde_json::to_string_pretty(&to_save).map_err(|e| e.to_string())?;
    fs::write(&path, raw).map_err(|e| e.to_string())
}
