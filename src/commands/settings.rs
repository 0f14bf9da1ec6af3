use crate::core;

// ── Settings ─────────────────────────────────────────────────────────────────

#[tauri::command]
pub fn read_settings() -> Result<core::UserSettings, String> {
    core::read_settings()
}

#[tauri::command]
pub fn write_settings(settings: core::UserSettings) -> Result<(), String> {
    core::write_settings(&settings)
}

/// Persist a partial settings update; fields left out are untouched.
#[tauri::command]
pub fn store_new_settings(update: core::PartialSettings) -> Result<(), String> {
    core::store_new_settings(&update)
}
