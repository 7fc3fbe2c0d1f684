use tauri::{AppHandle, Manager};

use crate::{
    backend_process, logging::append_desktop_log, tray_actions, window_actions, BackendState,
};

pub fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::ToggleWindow) => {
            window_actions::toggle_main_window(app_handle)
        }
        Some(tray_actions::TrayMenuAction::ReloadWindow) => {
            window_actions::reload_main_window(app_handle)
        }
        Some(tray_actions::TrayMenuAction::RestartBackend) => {
            append_desktop_log("tray requested backend restart");
            window_actions::show_main_window(app_handle);

            // Stop/start runs off the event loop; the spawn guard inside
            // start_backend absorbs a second click mid-restart.
            let app_handle_cloned = app_handle.clone();
            tauri::async_runtime::spawn_blocking(move || {
                backend_process::restart_backend(&app_handle_cloned);
            });
        }
        Some(tray_actions::TrayMenuAction::Quit) => {
            let state = app_handle.state::<BackendState>();
            state.mark_quitting();
            append_desktop_log("tray quit requested, exiting desktop process");
            app_handle.exit(0);
        }
        None => {}
    }
}
