use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

use super::crypto;
use super::paths::{get_styledesk_dir, get_styles_dir, is_valid_name};
use super::remote::StyleSource;
use super::styles::Style;

// ── Library export / import ──────────────────────────────────────────────────
//
// Archive layout: `styles/{machine_name}.json` for every library style, plus
// `sources.json` so installed styles keep their update origin across a
// restore.  A sealed archive is the same zip run through crypto::seal with
// the keychain archive key.

pub const SEALED_SUFFIX: &str = ".sealed";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Zip the style library into `dest`.  With `encrypt`, the archive bytes are
/// sealed and `.sealed` is appended to the destination name.  Returns the
/// path written.
pub fn export_library(dest: &str, encrypt: bool) -> Result<String, String> {
    let styles_dir = get_styles_dir()?;
    let sources_path = get_styledesk_dir()?.join("sources.json");
    let bytes = write_archive(&styles_dir, &sources_path)?;

    if encrypt {
        let key = crypto::get_or_create_archive_key()?;
        let sealed = crypto::seal(&key, &bytes)?;
        let path = format!("{}{}", dest, SEALED_SUFFIX);
        fs::write(&path, sealed).map_err(|e| e.to_string())?;
        Ok(path)
    } else {
        fs::write(dest, &bytes).map_err(|e| e.to_string())?;
        Ok(dest.to_string())
    }
}

/// Restore a library archive.  Sealed archives (by `.sealed` suffix) are
/// opened with the keychain archive key first.
pub fn import_library(src: &str, overwrite: bool) -> Result<ImportSummary, String> {
    let raw = fs::read(src).map_err(|e| e.to_string())?;
    let bytes = if src.ends_with(SEALED_SUFFIX) {
        let key = crypto::get_or_create_archive_key()?;
        crypto::open(&key, &String::from_utf8_lossy(&raw))?
    } else {
        raw
    };

    let styles_dir = get_styles_dir()?;
    let sources_path = get_styledesk_dir()?.join("sources.json");
    extract_archive(&bytes, &styles_dir, &sources_path, overwrite)
}

/// Build the archive bytes from explicit paths.
fn write_archive(styles_dir: &Path, sources_path: &Path) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    {
        let mut archive = zip::ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default();

        if styles_dir.exists() {
            let entries = fs::read_dir(styles_dir).map_err(|e| e.to_string())?;
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() || !path.extension().is_some_and(|ext| ext == "json") {
                    continue;
                }
                let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                archive
                    .start_file(format!("styles/{}", file_name), options)
                    .map_err(|e| e.to_string())?;
                let contents = fs::read(&path).map_err(|e| e.to_string())?;
                archive.write_all(&contents).map_err(|e| e.to_string())?;
            }
        }

        if sources_path.exists() {
            archive
                .start_file("sources.json", options)
                .map_err(|e| e.to_string())?;
            let contents = fs::read(sources_path).map_err(|e| e.to_string())?;
            archive.write_all(&contents).map_err(|e| e.to_string())?;
        }

        archive.finish().map_err(|e| e.to_string())?;
    }
    Ok(buf)
}

/// Unpack archive bytes into explicit paths.  Entries that don't parse, or
/// that collide with an existing style when `overwrite` is off, are skipped
/// and counted.  Source records are merged, never overwritten.
fn extract_archive(
    bytes: &[u8],
    styles_dir: &Path,
    sources_path: &Path,
    overwrite: bool,
) -> Result<ImportSummary, String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("Invalid archive: {}", e))?;

    if !styles_dir.exists() {
        fs::create_dir_all(styles_dir).map_err(|e| e.to_string())?;
    }

    let mut imported = 0;
    let mut skipped = 0;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(|e| e.to_string())?;
        let entry_name = file.name().to_string();

        let mut contents = String::new();
        if file.read_to_string(&mut contents).is_err() {
            skipped += 1;
            continue;
        }

        if entry_name == "sources.json" {
            merge_sources(sources_path, &contents)?;
            continue;
        }

        let Some(stem) = entry_name
            .strip_prefix("styles/")
            .and_then(|n| n.strip_suffix(".json"))
        else {
            skipped += 1;
            continue;
        };
        if !is_valid_name(stem) || serde_json::from_str::<Style>(&contents).is_err() {
            skipped += 1;
            continue;
        }

        let dest = styles_dir.join(format!("{}.json", stem));
        if dest.exists() && !overwrite {
            skipped += 1;
            continue;
        }
        fs::write(&dest, contents).map_err(|e| e.to_string())?;
        imported += 1;
    }

    Ok(ImportSummary { imported, skipped })
}

/// Merge archived source records into the registry on disk, keeping existing
/// entries as-is.
fn merge_sources(sources_path: &Path, contents: &str) -> Result<(), String> {
    let incoming: HashMap<String, StyleSource> = match serde_json::from_str(contents) {
        Ok(map) => map,
        Err(_) => return Ok(()), // a corrupt sources file shouldn't sink the import
    };

    let mut registry: HashMap<String, StyleSource> = if sources_path.exists() {
        let raw = fs::read_to_string(sources_path).map_err(|e| e.to_string())?;
        serde_json::from_str(&raw).unwrap_or_default()
    } else {
        HashMap::new()
    };

    for (name, source) in incoming {
        registry.entry(name).or_insert(source);
    }

    if let Some(parent) = sources_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }
    let json = serde_json::to_string_pretty(&registry).map_err(|e| e.to_string())?;
    fs::write(sources_path, json).map_err(|e| e.to_string())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seed_style(dir: &Path, machine_name: &str, display_name: &str) {
        let style = Style {
            name: display_name.to_string(),
            code: "/* ==UserStyle==\n@name X\n@namespace x\n@version 1.0.0\n==/UserStyle== */\n"
                .to_string(),
            ..Style::default()
        };
        fs::write(
            dir.join(format!("{}.json", machine_name)),
            serde_json::to_string_pretty(&style).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_archive_round_trip() {
        let src = tempdir().unwrap();
        seed_style(src.path(), "dark-everything", "Dark Everything");
        seed_style(src.path(), "oled-wiki", "OLED Wiki");
        let src_sources = src.path().join("sources.json");
        fs::write(
            &src_sources,
            r#"{"dark-everything":{"id":7,"url":"https://x/api/style/7.user.css"}}"#,
        )
        .unwrap();

        let bytes = write_archive(src.path(), &src_sources).unwrap();

        let dest = tempdir().unwrap();
        let dest_styles = dest.path().join("styles");
        let dest_sources = dest.path().join("sources.json");
        let summary = extract_archive(&bytes, &dest_styles, &dest_sources, false).unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 0);
        assert!(dest_styles.join("dark-everything.json").exists());
        assert!(dest_styles.join("oled-wiki.json").exists());

        let sources: HashMap<String, StyleSource> =
            serde_json::from_str(&fs::read_to_string(&dest_sources).unwrap()).unwrap();
        assert_eq!(sources["dark-everything"].id, 7);
    }

    #[test]
    fn test_import_skips_existing_without_overwrite() {
        let src = tempdir().unwrap();
        seed_style(src.path(), "dark-everything", "Dark Everything");
        let bytes = write_archive(src.path(), &src.path().join("missing-sources.json")).unwrap();

        let dest = tempdir().unwrap();
        let dest_styles = dest.path().join("styles");
        fs::create_dir_all(&dest_styles).unwrap();
        seed_style(&dest_styles, "dark-everything", "Mine, edited");

        let summary =
            extract_archive(&bytes, &dest_styles, &dest.path().join("sources.json"), false)
                .unwrap();
        assert_eq!(summary.imported, 0);
        assert_eq!(summary.skipped, 1);

        let kept: Style = serde_json::from_str(
            &fs::read_to_string(dest_styles.join("dark-everything.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(kept.name, "Mine, edited");

        let summary =
            extract_archive(&bytes, &dest_styles, &dest.path().join("sources.json"), true)
                .unwrap();
        assert_eq!(summary.imported, 1);
    }

    #[test]
    fn test_import_counts_invalid_entries() {
        let mut buf = Vec::new();
        {
            let mut archive = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();
            archive.start_file("styles/ok.json", options).unwrap();
            archive
                .write_all(br#"{"name":"Fine","code":""}"#)
                .unwrap();
            archive.start_file("styles/broken.json", options).unwrap();
            archive.write_all(b"{ not json").unwrap();
            archive.start_file("README.txt", options).unwrap();
            archive.write_all(b"hello").unwrap();
            archive.finish().unwrap();
        }

        let dest = tempdir().unwrap();
        let summary = extract_archive(
            &buf,
            &dest.path().join("styles"),
            &dest.path().join("sources.json"),
            false,
        )
        .unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, 2);
    }
}
