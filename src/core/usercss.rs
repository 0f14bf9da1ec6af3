// ── UserCSS metadata ─────────────────────────────────────────────────────────
//
// Styles carry their metadata in a `/* ==UserStyle== ... ==/UserStyle== */`
// comment block at the top of the source.  Each line is `@key value`; values
// run to the end of the line.  Continuation lines and preprocessor variable
// blocks are left to the style engine — the app only needs the header fields.

pub const HEADER_START: &str = "==UserStyle==";
pub const HEADER_END: &str = "==/UserStyle==";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserCssMeta {
    pub name: String,
    pub namespace: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub homepage_url: String,
    pub update_url: String,
    pub support_url: String,
    pub license: String,
    pub preprocessor: String,
}

/// Parse the metadata header out of UserCSS source.  Unknown `@` keys are
/// ignored so newer styles still load.
pub fn parse(code: &str) -> Result<UserCssMeta, String> {
    let start = code
        .find(HEADER_START)
        .ok_or("Missing ==UserStyle== metadata header")?;
    let rest = &code[start + HEADER_START.len()..];
    let end = rest
        .find(HEADER_END)
        .ok_or("Unterminated ==UserStyle== metadata header")?;

    let mut meta = UserCssMeta::default();
    for line in rest[..end].lines() {
        // Tolerate `*`-prefixed comment continuation lines.
        let line = line.trim().trim_start_matches('*').trim_start();
        if !line.starts_with('@') {
            continue;
        }
        let (key, value) = match line.split_once(char::is_whitespace) {
            Some((k, v)) => (k, v.trim()),
            None => (line, ""),
        };
        match key {
            "@name" => meta.name = value.to_string(),
            "@namespace" => meta.namespace = value.to_string(),
            "@version" => meta.version = value.to_string(),
            "@description" => meta.description = value.to_string(),
            "@author" => meta.author = value.to_string(),
            "@homepageURL" => meta.homepage_url = value.to_string(),
            "@updateURL" => meta.update_url = value.to_string(),
            "@supportURL" => meta.support_url = value.to_string(),
            "@license" => meta.license = value.to_string(),
            "@preprocessor" => meta.preprocessor = value.to_string(),
            _ => {}
        }
    }

    Ok(meta)
}

/// Returns one message per missing required field; empty means valid.
pub fn validate(meta: &UserCssMeta) -> Vec<String> {
    let mut errors = Vec::new();
    if meta.name.is_empty() {
        errors.push("@name is required".to_string());
    }
    if meta.namespace.is_empty() {
        errors.push("@namespace is required".to_string());
    }
    if meta.version.is_empty() {
        errors.push("@version is required".to_string());
    }
    errors
}

/// Rewrite (or insert) the `@updateURL` header line so installed copies
/// self-update from `url`.  Returns the updated source.
pub fn override_update_url(code: &str, url: &str) -> Result<String, String> {
    if !code.contains(HEADER_START) {
        return Err("Missing ==UserStyle== metadata header".to_string());
    }

    let mut out = String::with_capacity(code.len() + url.len() + 16);
    let mut in_header = false;
    let mut replaced = false;
    for line in code.lines() {
        if !in_header && line.contains(HEADER_START) {
            in_header = true;
            out.push_str(line);
            out.push('\n');
            continue;
        }
        if in_header && line.contains(HEADER_END) {
            if !replaced {
                out.push_str("@updateURL ");
                out.push_str(url);
                out.push('\n');
                replaced = true;
            }
            in_header = false;
            out.push_str(line);
            out.push('\n');
            continue;
        }
        if in_header {
            let stripped = line.trim().trim_start_matches('*').trim_start();
            if stripped.starts_with("@updateURL") {
                out.push_str("@updateURL ");
                out.push_str(url);
                out.push('\n');
                replaced = true;
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }

    Ok(out)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "/* ==UserStyle==\n\
        @name           Dark Everything\n\
        @namespace      styledesk.app\n\
        @version        1.2.0\n\
        @description    Dark mode for every site\n\
        @author         vee\n\
        @homepageURL    https://example.org/dark\n\
        @license        MIT\n\
        ==/UserStyle== */\n\
        body { background: #111; }\n";

    #[test]
    fn test_parse_full_header() {
        let meta = parse(SAMPLE).unwrap();
        assert_eq!(meta.name, "Dark Everything");
        assert_eq!(meta.namespace, "styledesk.app");
        assert_eq!(meta.version, "1.2.0");
        assert_eq!(meta.author, "vee");
        assert_eq!(meta.homepage_url, "https://example.org/dark");
        assert_eq!(meta.license, "MIT");
        assert!(meta.update_url.is_empty());
        assert!(validate(&meta).is_empty());
    }

    #[test]
    fn test_parse_without_header_fails() {
        assert!(parse("body { color: red; }").is_err());
        assert!(parse("/* ==UserStyle==\n@name X\n").is_err());
    }

    #[test]
    fn test_validate_reports_missing_required_fields() {
        let meta = parse("/* ==UserStyle==\n@name Only Name\n==/UserStyle== */\n").unwrap();
        let errors = validate(&meta);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("@namespace")));
        assert!(errors.iter().any(|e| e.contains("@version")));
    }

    #[test]
    fn test_override_replaces_existing_update_url() {
        let code = "/* ==UserStyle==\n@name X\n@updateURL https://old.example/x\n==/UserStyle== */\nbody{}\n";
        let out = override_update_url(code, "https://styledesk.app/api/style/7.user.css").unwrap();
        assert!(!out.contains("old.example"));
        assert_eq!(
            parse(&out).unwrap().update_url,
            "https://styledesk.app/api/style/7.user.css"
        );
    }

    #[test]
    fn test_override_inserts_when_absent() {
        let out = override_update_url(SAMPLE, "https://styledesk.app/api/style/7.user.css").unwrap();
        assert_eq!(
            parse(&out).unwrap().update_url,
            "https://styledesk.app/api/style/7.user.css"
        );
        // Body must be untouched.
        assert!(out.contains("body { background: #111; }"));
    }

    #[test]
    fn test_override_without_header_fails() {
        assert!(override_update_url("body{}", "https://x.example").is_err());
    }
}
