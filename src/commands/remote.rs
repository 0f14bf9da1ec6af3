use crate::core;

// ── Platform ─────────────────────────────────────────────────────────────────

#[tauri::command]
pub async fn search_remote_styles(query: String) -> Result<Vec<core::StyleCard>, String> {
    let settings = core::read_settings()?;
    core::search_styles(&query, settings.entries_per_page).await
}

/// Re-download the compact style index into the local cache.  Returns the
/// number of cached styles.
#[tauri::command]
pub async fn refresh_style_index() -> Result<usize, String> {
    core::refresh_cached_index().await
}

/// Search the local index cache (works offline).
#[tauri::command]
pub fn search_style_index(query: String) -> Result<Vec<core::CompactStyle>, String> {
    let settings = core::read_settings()?;
    let conn = core::open_index_db()?;
    core::search_index(&conn, &query, settings.entries_per_page)
}

#[tauri::command]
pub fn style_index_len() -> Result<i64, String> {
    let conn = core::open_index_db()?;
    core::index_len(&conn)
}

/// Install a platform style into the local library; returns its machine name.
#[tauri::command]
pub async fn install_remote_style(id: i64) -> Result<String, String> {
    core::install_style(id).await
}

#[tauri::command]
pub async fn fetch_style_preview(url: String) -> Result<String, String> {
    core::fetch_preview_data_uri(&url).await
}

#[tauri::command]
pub async fn submit_review(style_id: i64, rating: i64, comment: String) -> Result<(), String> {
    core::submit_review(style_id, rating, &comment).await
}

#[tauri::command]
pub async fn check_style_updates() -> Result<core::UpdateReport, String> {
    core::check_style_updates().await
}
