use std::collections::HashMap;

use crate::core;

// ── Style Library ────────────────────────────────────────────────────────────

#[tauri::command]
pub fn get_styles() -> Result<Vec<core::StyleEntry>, String> {
    core::list_styles()
}

#[tauri::command]
pub fn read_style(machine_name: &str) -> Result<core::Style, String> {
    core::read_style(machine_name)
}

/// Create a new style; the machine name is derived from the display name.
#[tauri::command]
pub fn create_style(style: core::Style) -> Result<String, String> {
    core::create_style(style)
}

#[tauri::command]
pub fn save_style(machine_name: &str, style: core::Style) -> Result<(), String> {
    core::save_style(machine_name, style)
}

#[tauri::command]
pub fn delete_style(machine_name: &str) -> Result<(), String> {
    core::delete_style(machine_name)
}

/// Remote origins of installed styles, keyed by machine name.
#[tauri::command]
pub fn get_style_sources() -> Result<HashMap<String, core::StyleSource>, String> {
    core::read_style_sources()
}
