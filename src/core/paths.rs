use std::path::PathBuf;

// ── Path Helpers ─────────────────────────────────────────────────────────────

/// Root data directory for all StyleDesk state.
pub fn get_styledesk_dir() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".styledesk"))
}

/// Where the local style library lives — one JSON file per style.
pub fn get_styles_dir() -> Result<PathBuf, String> {
    Ok(get_styledesk_dir()?.join("styles"))
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && name != "." && name != ".."
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("dark-everything"));
        assert!(is_valid_name("style_2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("."));
        assert!(!is_valid_name(".."));
        assert!(!is_valid_name("a/b"));
        assert!(!is_valid_name("a\\b"));
    }
}
