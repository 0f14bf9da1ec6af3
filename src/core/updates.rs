use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::task::JoinSet;

use super::remote::{fetch_style_code, read_style_sources};
use super::styles::read_style;

// ── Style update check ───────────────────────────────────────────────────────
//
// Compares every installed style's code against the platform copy it was
// installed from.  Read-only: nothing is written, the user decides what to
// re-install.

/// A single style that is out of date, with a short reason:
/// "outdated", "missing" (gone from the platform) or "unreachable".
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StyleUpdate {
    /// Machine name in the local library.
    pub id: String,
    /// Display name.
    pub name: String,
    pub reason: String,
}

/// Result of a full library check.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateReport {
    /// How many installed styles were compared.
    pub checked: usize,
    pub updates: Vec<StyleUpdate>,
}

/// Hex SHA-256 of style source, newline-normalised so that copies served
/// with different line endings still compare equal.
pub fn content_hash(code: &str) -> String {
    let normalised = code.replace("\r\n", "\n");
    hex::encode(Sha256::digest(normalised.as_bytes()))
}

/// Check every style with a remote source for upstream changes.  Fetches run
/// concurrently; one unreachable style doesn't block the rest.
pub async fn check_style_updates() -> Result<UpdateReport, String> {
    let sources = read_style_sources()?;

    let mut tasks = JoinSet::new();
    for (machine_name, source) in sources {
        tasks.spawn(async move {
            // A dangling source record (style deleted out-of-band) is not a
            // library update; delete_style keeps the registry tidy.
            let style = read_style(&machine_name).ok()?;
            let reason = match fetch_style_code(source.id).await {
                Ok(Some(code)) if content_hash(&code) != content_hash(&style.code) => {
                    Some("outdated")
                }
                Ok(Some(_)) => None,
                Ok(None) => Some("missing"),
                Err(_) => Some("unreachable"),
            };
            Some((machine_name, style.name, reason))
        });
    }

    let mut checked = 0;
    let mut updates = Vec::new();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Some((machine_name, name, reason))) = result {
            checked += 1;
            if let Some(reason) = reason {
                updates.push(StyleUpdate {
                    id: machine_name,
                    name,
                    reason: reason.to_string(),
                });
            }
        }
    }

    updates.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(UpdateReport { checked, updates })
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_normalises_line_endings() {
        assert_eq!(
            content_hash("body {\r\n  color: red;\r\n}\r\n"),
            content_hash("body {\n  color: red;\n}\n")
        );
    }

    #[test]
    fn test_content_hash_detects_changes() {
        assert_ne!(content_hash("body { color: red; }"), content_hash("body { color: blue; }"));
    }
}
