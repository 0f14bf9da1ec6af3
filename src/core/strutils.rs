// ── String Helpers ───────────────────────────────────────────────────────────

/// Returns a URL- and SEO-friendly slug: runs of ASCII letters and digits
/// joined by hyphens, lowercased.  Everything else is dropped.
pub fn slugify_url(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_sep = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

// ── Tests ────────────────────────────────────────────────────────────────────
