pub mod account;
pub mod core;

mod commands;

// ── App Entry ────────────────────────────────────────────────────────────────

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::*;

    tauri::Builder::default()
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(FormState::default())
        .setup(|_app| {
            // Warm the compact index cache and check the library for upstream
            // changes.  Runs on the async runtime so it never blocks the UI;
            // both steps are best-effort when the platform is unreachable.
            tauri::async_runtime::spawn(async {
                match core::refresh_cached_index().await {
                    Ok(n) => eprintln!("[styledesk] index refreshed: {} styles", n),
                    Err(e) => eprintln!("[styledesk] index refresh error: {}", e),
                }

                let check = core::read_settings()
                    .map(|s| s.auto_check_updates)
                    .unwrap_or(true);
                if check {
                    match core::check_style_updates().await {
                        Ok(report) if !report.updates.is_empty() => eprintln!(
                            "[styledesk] {} of {} installed style(s) out of date",
                            report.updates.len(),
                            report.checked
                        ),
                        Ok(_) => {}
                        Err(e) => eprintln!("[styledesk] update check error: {}", e),
                    }
                }
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            read_settings,
            write_settings,
            store_new_settings,
            read_profile,
            save_profile,
            login,
            logout,
            current_session,
            get_styles,
            read_style,
            create_style,
            save_style,
            delete_style,
            get_style_sources,
            search_remote_styles,
            refresh_style_index,
            search_style_index,
            style_index_len,
            install_remote_style,
            fetch_style_preview,
            submit_review,
            check_style_updates,
            account_navigate,
            account_register_control,
            account_set_control,
            account_control_value,
            account_click,
            account_sync,
            account_wire_save,
            open_style_page,
            export_library,
            import_library,
            restart_app,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
