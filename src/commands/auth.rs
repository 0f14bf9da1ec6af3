use crate::core;

// ── Session ──────────────────────────────────────────────────────────────────

#[tauri::command]
pub async fn login(email: String, password: String, remember: bool) -> Result<core::Session, String> {
    core::login(&email, &password, remember).await
}

#[tauri::command]
pub fn logout() -> Result<(), String> {
    core::logout()
}

#[tauri::command]
pub fn current_session() -> Result<Option<core::Session>, String> {
    core::current_session()
}
