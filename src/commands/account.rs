use std::sync::Mutex;

use tauri::{Emitter, State};

use crate::account::{self, AccountForm};
use crate::core;

// ── Account form ─────────────────────────────────────────────────────────────
//
// The webview mirrors the account page into the managed AccountForm and asks
// the backend to run the binding (display sync + save wiring) against it.

pub type FormState = Mutex<AccountForm>;

fn lock<'a>(state: &'a State<'_, FormState>) -> Result<std::sync::MutexGuard<'a, AccountForm>, String> {
    state.lock().map_err(|_| "Form state poisoned".to_string())
}

#[tauri::command]
pub fn account_navigate(state: State<'_, FormState>, path: String) -> Result<(), String> {
    lock(&state)?.navigate(&path);
    Ok(())
}

#[tauri::command]
pub fn account_register_control(
    state: State<'_, FormState>,
    id: String,
    value: String,
) -> Result<(), String> {
    lock(&state)?.register_control(&id, &value);
    Ok(())
}

/// Mirror a user edit.  Returns `false` when the control isn't registered.
#[tauri::command]
pub fn account_set_control(
    state: State<'_, FormState>,
    id: String,
    value: String,
) -> Result<bool, String> {
    Ok(lock(&state)?.set_control(&id, &value))
}

#[tauri::command]
pub fn account_control_value(
    state: State<'_, FormState>,
    id: String,
) -> Result<Option<String>, String> {
    Ok(lock(&state)?.control_value(&id))
}

#[tauri::command]
pub fn account_click(state: State<'_, FormState>, id: String) -> Result<(), String> {
    lock(&state)?.click(&id);
    Ok(())
}

/// Push the stored settings into the account page controls.
#[tauri::command]
pub fn account_sync(state: State<'_, FormState>) -> Result<(), String> {
    let settings = core::read_settings()?;
    let mut form = lock(&state)?;
    account::set_values(&mut form, &settings)
}

/// Wire the save button to the settings store.  The completion callback
/// emits `settings-updated` so the webview can re-render.
#[tauri::command]
pub fn account_wire_save(app: tauri::AppHandle, state: State<'_, FormState>) -> Result<(), String> {
    let mut form = lock(&state)?;
    account::wire_save_button(
        &mut form,
        |update| core::store_new_settings(update),
        move || {
            if let Err(e) = app.emit("settings-updated", ()) {
                eprintln!("[styledesk] failed to emit settings-updated: {}", e);
            }
        },
    );
    Ok(())
}
