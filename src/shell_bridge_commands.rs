use tauri::AppHandle;

use crate::{
    load_failure::{self, LoadFailureReport},
    main_window,
};

/// Lets the loaded UI detect it runs inside the desktop shell rather than a
/// plain browser. Inbound-only; exposes no host capability.
#[tauri::command]
pub(crate) fn shell_bridge_is_desktop_runtime() -> bool {
    true
}

/// Sink for the injected failure probe. The sub-frame filter runs host-side
/// in `main_window::handle_load_failure`, not in content.
#[tauri::command]
pub(crate) fn shell_bridge_report_load_failure(app_handle: AppHandle, report: LoadFailureReport) {
    let attribution = load_failure::attribution_from_report(&report);
    main_window::handle_load_failure(&app_handle, attribution, report.detail, report.url);
}
