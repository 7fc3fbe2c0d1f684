use tauri::{AppHandle, Manager};

use crate::{backend_process, logging::append_desktop_log, BackendState};

pub fn handle_exit_requested(app_handle: &AppHandle) {
    let state = app_handle.state::<BackendState>();
    state.mark_quitting();
    append_desktop_log("desktop process exit requested");
}

/// Runs on the event loop right before the process ends; stopping the
/// backend here bounds the worst case to the graceful-stop timeout.
pub fn handle_exit_event(app_handle: &AppHandle) {
    append_desktop_log("desktop process exiting, stopping backend");
    let state = app_handle.state::<BackendState>();
    backend_process::stop_backend(&state);
}
