use std::collections::HashMap;

use crate::core::settings::{PartialSettings, UserSettings};

// ── Account form binding ─────────────────────────────────────────────────────
//
// The webview renders the account page; the backend keeps this headless model
// of it.  Navigation, control registration, edits and clicks are mirrored in
// through the account_* commands, and the binding below reads and writes the
// controls the same way the page script would: fixed ids, a path guard, and a
// save handler that persists a partial settings update.

/// Prefix every account-form control id derives from.
pub const PREFIX: &str = "usr-settings";

/// Path prefix that gates the settings display sync.
const ACCOUNT_PATH: &str = "/account";

/// Build a full control id from its suffix, e.g. `color-scheme` →
/// `usr-settings--color-scheme`.
pub fn control_id(suffix: &str) -> String {
    format!("{}--{}", PREFIX, suffix)
}

type ClickHandler = Box<dyn FnMut(&mut Controls) + Send>;

/// The registered form controls and their current values.
#[derive(Default)]
pub struct Controls {
    values: HashMap<String, String>,
}

impl Controls {
    /// Current value of a control, or `None` if it isn't on the page.
    pub fn value(&self, id: &str) -> Option<String> {
        self.values.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// Overwrite the value of an existing control.  Returns `false` when no
    /// control with this id is registered.
    pub fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.values.get_mut(id) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }

    fn register(&mut self, id: &str, value: &str) {
        self.values.insert(id.to_string(), value.to_string());
    }
}

/// Headless model of the account page form.
#[derive(Default)]
pub struct AccountForm {
    path: String,
    controls: Controls,
    handlers: HashMap<String, Vec<ClickHandler>>,
}

impl AccountForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Record a navigation.  Controls and handlers from the previous page are
    /// dropped; the webview re-registers what the new page contains.
    pub fn navigate(&mut self, path: &str) {
        self.path = path.to_string();
        self.controls = Controls::default();
        self.handlers.clear();
    }

    /// Mirror a control that exists on the current page.
    pub fn register_control(&mut self, id: &str, value: &str) {
        self.controls.register(id, value);
    }

    /// Mirror a user edit coming from the webview.  Returns `false` when the
    /// control was never registered.
    pub fn set_control(&mut self, id: &str, value: &str) -> bool {
        self.controls.set_value(id, value)
    }

    pub fn control_value(&self, id: &str) -> Option<String> {
        self.controls.value(id)
    }

    /// Attach a click handler to a control.
    pub fn on_click(&mut self, id: &str, handler: ClickHandler) {
        self.handlers.entry(id.to_string()).or_default().push(handler);
    }

    /// Dispatch a click: every handler attached to `id` runs to completion in
    /// registration order, with access to the current control values.
    pub fn click(&mut self, id: &str) {
        let Some(mut handlers) = self.handlers.remove(id) else {
            return;
        };
        for handler in handlers.iter_mut() {
            handler(&mut self.controls);
        }
        // Re-attach, keeping any handlers that were added during dispatch.
        let added = self.handlers.remove(id).unwrap_or_default();
        handlers.extend(added);
        self.handlers.insert(id.to_string(), handlers);
    }
}

/// Push the stored settings into the account page controls.
///
/// Off the account page this is a no-op.  On it, the color-scheme control
/// must exist: a missing control is a wiring bug and surfaces as an error
/// rather than being skipped.
pub fn set_values(form: &mut AccountForm, settings: &UserSettings) -> Result<(), String> {
    if !form.path().starts_with(ACCOUNT_PATH) {
        return Ok(());
    }
    let id = control_id("color-scheme");
    if !form.controls.set_value(&id, &settings.color_scheme) {
        return Err(format!("Control '{}' not found on the account page", id));
    }
    Ok(())
}

/// Wire the save button: on every click, read the color-scheme control,
/// package it into a partial update, hand it to `store`, then invoke
/// `on_settings_update`.  When the page has no save button, nothing is wired.
///
/// The read value is not validated and store failures are not retried; the
/// completion callback fires once per click regardless.
pub fn wire_save_button<S, F>(form: &mut AccountForm, mut store: S, mut on_settings_update: F)
where
    S: FnMut(&PartialSettings) -> Result<(), String> + Send + 'static,
    F: FnMut() + Send + 'static,
{
    let save_id = control_id("save");
    if !form.controls.contains(&save_id) {
        return;
    }

    let scheme_id = control_id("color-scheme");
    form.on_click(
        &save_id,
        Box::new(move |controls| {
            let update = PartialSettings {
                color_scheme: controls.value(&scheme_id),
                ..PartialSettings::default()
            };
            if let Err(e) = store(&update) {
                eprintln!("[styledesk] failed to store settings: {}", e);
            }
            on_settings_update();
        }),
    );
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn settings_with_scheme(scheme: &str) -> UserSettings {
        UserSettings {
            color_scheme: scheme.to_string(),
            ..UserSettings::default()
        }
    }

    fn account_form() -> AccountForm {
        let mut form = AccountForm::new();
        form.navigate("/account");
        form.register_control(&control_id("color-scheme"), "system");
        form.register_control(&control_id("save"), "");
        form
    }

    #[test]
    fn test_sync_skips_other_pages() {
        let mut form = AccountForm::new();
        form.navigate("/style/42/dark-everything");
        form.register_control(&control_id("color-scheme"), "system");

        set_values(&mut form, &settings_with_scheme("dark")).unwrap();
        assert_eq!(
            form.control_value(&control_id("color-scheme")).as_deref(),
            Some("system")
        );
    }

    #[test]
    fn test_sync_sets_color_scheme_on_account_page() {
        let mut form = account_form();
        set_values(&mut form, &settings_with_scheme("dark")).unwrap();
        assert_eq!(
            form.control_value(&control_id("color-scheme")).as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn test_sync_covers_account_subpages() {
        let mut form = AccountForm::new();
        form.navigate("/account/settings");
        form.register_control(&control_id("color-scheme"), "system");
        set_values(&mut form, &settings_with_scheme("light")).unwrap();
        assert_eq!(
            form.control_value(&control_id("color-scheme")).as_deref(),
            Some("light")
        );
    }

    #[test]
    fn test_sync_errors_when_control_missing() {
        let mut form = AccountForm::new();
        form.navigate("/account");
        let err = set_values(&mut form, &settings_with_scheme("dark")).unwrap_err();
        assert!(err.contains("usr-settings--color-scheme"));
    }

    #[test]
    fn test_wiring_without_save_button_is_a_noop() {
        let mut form = AccountForm::new();
        form.navigate("/account");
        form.register_control(&control_id("color-scheme"), "system");

        let stored = Arc::new(Mutex::new(0u32));
        let stored2 = Arc::clone(&stored);
        wire_save_button(
            &mut form,
            move |_| {
                *stored2.lock().unwrap() += 1;
                Ok(())
            },
            || {},
        );

        // Nothing wired, so a stray click dispatches nothing.
        form.click(&control_id("save"));
        assert_eq!(*stored.lock().unwrap(), 0);
    }

    #[test]
    fn test_click_stores_partial_update_then_fires_callback() {
        let mut form = account_form();

        let stored: Arc<Mutex<Vec<PartialSettings>>> = Arc::new(Mutex::new(Vec::new()));
        let callback_calls = Arc::new(Mutex::new(0u32));

        let stored2 = Arc::clone(&stored);
        let calls2 = Arc::clone(&callback_calls);
        wire_save_button(
            &mut form,
            move |update| {
                stored2.lock().unwrap().push(update.clone());
                Ok(())
            },
            move || {
                *calls2.lock().unwrap() += 1;
            },
        );

        form.set_control(&control_id("color-scheme"), "dark");
        form.click(&control_id("save"));

        let updates = stored.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].color_scheme.as_deref(), Some("dark"));
        // The partial update carries nothing but the color scheme.
        assert!(updates[0].entries_per_page.is_none());
        assert!(updates[0].auto_check_updates.is_none());
        assert_eq!(*callback_calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_every_click_saves_again() {
        let mut form = account_form();
        let calls = Arc::new(Mutex::new(0u32));
        let calls2 = Arc::clone(&calls);
        wire_save_button(&mut form, |_| Ok(()), move || *calls2.lock().unwrap() += 1);

        form.click(&control_id("save"));
        form.set_control(&control_id("color-scheme"), "light");
        form.click(&control_id("save"));
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_callback_fires_even_when_store_fails() {
        let mut form = account_form();
        let calls = Arc::new(Mutex::new(0u32));
        let calls2 = Arc::clone(&calls);
        wire_save_button(
            &mut form,
            |_| Err("disk full".to_string()),
            move || *calls2.lock().unwrap() += 1,
        );

        form.click(&control_id("save"));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_navigation_drops_wiring() {
        let mut form = account_form();
        let calls = Arc::new(Mutex::new(0u32));
        let calls2 = Arc::clone(&calls);
        wire_save_button(&mut form, |_| Ok(()), move || *calls2.lock().unwrap() += 1);

        form.navigate("/explore");
        form.click(&control_id("save"));
        assert_eq!(*calls.lock().unwrap(), 0);
    }
}
