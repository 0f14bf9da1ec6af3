use crate::core;

// ── Browser ──────────────────────────────────────────────────────────────────

/// Open a style's page on the platform in the default browser.
#[tauri::command]
pub fn open_style_page(id: i64, name: String) -> Result<(), String> {
    core::open_style_page(id, &name)
}

// ── Library archive ──────────────────────────────────────────────────────────

#[tauri::command]
pub fn export_library(dest: String, encrypt: bool) -> Result<String, String> {
    core::export_library(&dest, encrypt)
}

#[tauri::command]
pub fn import_library(src: String, overwrite: bool) -> Result<core::ImportSummary, String> {
    core::import_library(&src, overwrite)
}

// ── App Updates ───────────────────────────────────────────────────────────────

/// Restart the application to apply a freshly-installed update.
#[tauri::command]
pub fn restart_app(app: tauri::AppHandle) {
    app.restart();
}
