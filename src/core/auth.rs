use keyring::Entry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::config::load_config;
use super::paths::get_styledesk_dir;

// ── Platform session ─────────────────────────────────────────────────────────
//
// The session token lives in the system keychain.  session.json only holds
// user info and expiry, so the UI can answer "who am I" without triggering a
// keychain prompt.

const KEYCHAIN_SERVICE: &str = "styledesk_desktop";
const KEYCHAIN_SESSION: &str = "session";

const USER_AGENT: &str = "styledesk-desktop/1.0";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    /// Platform role, e.g. "regular" or "moderator".  Informational only;
    /// the platform enforces permissions server-side.
    #[serde(default)]
    pub role: String,
    /// RFC 3339 expiry; empty for a session-scoped login.
    #[serde(default)]
    pub expires_at: String,
}

fn get_session_path() -> Result<PathBuf, String> {
    Ok(get_styledesk_dir()?.join("session.json"))
}

/// Log in to the platform.  Both fields are required; `remember` asks for a
/// roughly three-month session instead of a session-scoped one.  Accounts
/// registered through an OAuth provider are rejected by the platform with a
/// message we pass through unchanged.
pub async fn login(email: &str, password: &str, remember: bool) -> Result<Session, String> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Failed to login. Make sure your input is correct.".to_string());
    }

    let config = load_config()?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| format!("HTTP client error: {}", e))?;

    let resp = client
        .post(format!("{}/api/login", config.base_url))
        .header("User-Agent", USER_AGENT)
        .json(&serde_json::json!({
            "email": email,
            "password": password,
            "remember": remember,
        }))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
        let body = resp.text().await.unwrap_or_default();
        if body.is_empty() {
            return Err("Invalid credentials.".to_string());
        }
        return Err(body);
    }
    if !resp.status().is_success() {
        return Err(format!("Login failed with status {}", resp.status()));
    }

    #[derive(Deserialize)]
    struct LoginResponse {
        token: String,
        user: ApiUser,
    }

    #[derive(Deserialize)]
    struct ApiUser {
        id: i64,
        username: String,
        email: String,
        #[serde(default)]
        role: String,
    }

    let body: LoginResponse = resp
        .json()
        .await
        .map_err(|e| format!("Failed to parse login response: {}", e))?;

    let expires_at = if remember {
        // Matches the platform's remember-me cookie lifetime (~3 months).
        (chrono::Utc::now() + chrono::Duration::days(93)).to_rfc3339()
    } else {
        String::new()
    };

    let session = Session {
        user_id: body.user.id,
        username: body.user.username,
        email: body.user.email,
        role: body.user.role,
        expires_at,
    };

    let entry = Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_SESSION).map_err(|e| e.to_string())?;
    entry.set_password(&body.token).map_err(|e| e.to_string())?;

    let path = get_session_path()?;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    let raw = serde_json::to_string_pretty(&session).map_err(|e| e.to_string())?;
    fs::write(&path, raw).map_err(|e| e.to_string())?;

    Ok(session)
}

/// The current session, or `None` when logged out or expired.  An unreadable
/// session file counts as logged out rather than an error.
pub fn current_session() -> Result<Option<Session>, String> {
    let path = get_session_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path).map_err(|e| e.to_string())?;
    let session: Session = match serde_json::from_str(&raw) {
        Ok(s) => s,
        Err(_) => return Ok(None),
    };
    if session_expired(&session, chrono::Utc::now()) {
        return Ok(None);
    }
    Ok(Some(session))
}

/// True when `expires_at` is set and in the past.  An expiry that can't be
/// parsed counts as expired.
pub fn session_expired(session: &Session, now: chrono::DateTime<chrono::Utc>) -> bool {
    if session.expires_at.is_empty() {
        return false;
    }
    match chrono::DateTime::parse_from_rfc3339(&session.expires_at) {
        Ok(t) => t < now,
        Err(_) => true,
    }
}

/// The stored session token, for authenticated API calls.
pub fn session_token() -> Result<String, String> {
    let entry = Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_SESSION).map_err(|e| e.to_string())?;
    entry
        .get_password()
        .map_err(|_| "Not logged in".to_string())
}

pub fn logout() -> Result<(), String> {
    if let Ok(entry) = Entry::new(KEYCHAIN_SERVICE, KEYCHAIN_SESSION) {
        let _ = entry.delete_credential();
    }
    let path = get_session_path()?;
    if path.exists() {
        fs::remove_file(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: &str) -> Session {
        Session {
            user_id: 1,
            username: "vee".to_string(),
            email: "vee@example.org".to_string(),
            role: "regular".to_string(),
            expires_at: expires_at.to_string(),
        }
    }

    #[test]
    fn test_session_without_expiry_never_expires() {
        assert!(!session_expired(&session(""), chrono::Utc::now()));
    }

    #[test]
    fn test_session_expiry_is_compared_to_now() {
        let now = chrono::Utc::now();
        let past = (now - chrono::Duration::hours(1)).to_rfc3339();
        let future = (now + chrono::Duration::hours(1)).to_rfc3339();
        assert!(session_expired(&session(&past), now));
        assert!(!session_expired(&session(&future), now));
    }

    #[test]
    fn test_unparsable_expiry_counts_as_expired() {
        assert!(session_expired(&session("three months"), chrono::Utc::now()));
    }
}
