use std::fs;

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{
    fallback_view,
    load_failure::{should_render_fallback, FailureReason, FrameAttribution},
    logging::append_desktop_log,
    origin_policy, webui_paths, LoadState, ShellWindowState, MAIN_WINDOW_LABEL, MAIN_WINDOW_TITLE,
};

/// Builds the host window. Content isolation is strict: the webview gets no
/// host capability beyond the inbound bridge commands registered in
/// `app_runtime`, and every outbound navigation passes the origin policy.
pub fn create_main_window(app_handle: &AppHandle) -> Result<WebviewWindow, String> {
    WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::App("index.html".into()),
    )
    .title(MAIN_WINDOW_TITLE)
    .inner_size(1280.0, 900.0)
    .on_navigation(|url| origin_policy::handle_navigation(url))
    .build()
    .map_err(|error| format!("Failed to create main window: {error}"))
}

/// Resolves the UI resource and navigates the main window to it, or renders
/// the fallback view when the resource is missing or unreadable. Re-entrant:
/// the tray reload action runs the same path.
pub fn load_ui_resource(app_handle: &AppHandle) {
    let window_state = app_handle.state::<ShellWindowState>();
    let candidates = webui_paths::ui_resource_candidates(app_handle);
    let Some(location) = webui_paths::resolve_ui_resource(&candidates) else {
        append_desktop_log("no UI resource candidates were produced; nothing to load");
        return;
    };

    for candidate in &candidates {
        append_desktop_log(&format!(
            "UI resource candidate ({:?}): {}",
            candidate.provenance,
            candidate.path.display()
        ));
    }
    append_desktop_log(&format!(
        "resolved UI resource: {} ({:?})",
        location.path.display(),
        location.provenance
    ));
    window_state.begin_session(location.clone());

    // The resolver does not guarantee existence; re-check before loading so
    // a missing resource reports ResourceMissing without a load attempt.
    if !location.path.is_file() {
        render_failure(
            app_handle,
            FailureReason::resource_missing(location.path.to_string_lossy()),
        );
        return;
    }

    // Readability check up front: an unreadable document reports a load
    // error carrying the I/O detail instead of leaving a blank window.
    if let Err(error) = fs::read(&location.path) {
        render_failure(
            app_handle,
            FailureReason::load_error(location.path.to_string_lossy(), error.to_string()),
        );
        return;
    }

    let target = match Url::from_file_path(&location.path) {
        Ok(url) => url,
        Err(()) => {
            render_failure(
                app_handle,
                FailureReason::load_error(
                    location.path.to_string_lossy(),
                    "path cannot be expressed as a file URL",
                ),
            );
            return;
        }
    };

    if let Err(error) = navigate_main_window_to(app_handle, target.as_str()) {
        render_failure(
            app_handle,
            FailureReason::load_error(location.path.to_string_lossy(), error),
        );
    }
}

/// Entry point for load failures observed after the initial navigation,
/// whatever their source (host-side errors or probe reports). Sub-frame
/// attributions are logged and deliberately ignored.
pub fn handle_load_failure(
    app_handle: &AppHandle,
    attribution: FrameAttribution,
    detail: String,
    failed_url: Option<String>,
) {
    if !should_render_fallback(attribution) {
        append_desktop_log(&format!(
            "ignoring sub-frame load failure: {detail} (source: {})",
            failed_url.as_deref().unwrap_or("unknown")
        ));
        return;
    }

    let window_state = app_handle.state::<ShellWindowState>();
    let attempted_path = failed_url
        .or_else(|| {
            window_state
                .current_location()
                .map(|location| location.path.to_string_lossy().to_string())
        })
        .unwrap_or_default();
    render_failure(
        app_handle,
        FailureReason::load_error(attempted_path, detail),
    );
}

/// Flips the session to Loaded once the UI document finishes; the bundled
/// loading page and the in-memory fallback never arrive here as file URLs.
pub fn handle_page_load_finished(app_handle: &AppHandle, url: &Url) {
    if url.scheme() != "file" {
        return;
    }
    let window_state = app_handle.state::<ShellWindowState>();
    if window_state.load_state() == Some(LoadState::Loading) {
        window_state.mark_loaded();
        append_desktop_log(&format!("UI resource loaded: {url}"));
    }
}

pub fn show_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("show_main_window skipped: main window not found");
        return;
    };
    if let Err(error) = window.show() {
        append_desktop_log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        append_desktop_log(&format!("failed to focus main window: {error}"));
    }
}

pub fn hide_main_window(app_handle: &AppHandle) {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("hide_main_window skipped: main window not found");
        return;
    };
    if let Err(error) = window.hide() {
        append_desktop_log(&format!("failed to hide main window: {error}"));
    }
}

/// Reload re-runs resolution and navigation, so a resource that appeared
/// after a fallback render gets picked up.
pub fn reload_main_window(app_handle: &AppHandle) {
    append_desktop_log("reloading main window");
    load_ui_resource(app_handle);
}

fn navigate_main_window_to(app_handle: &AppHandle, url: &str) -> Result<(), String> {
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        return Err("main window is not available".to_string());
    };
    let quoted = serde_json::to_string(url)
        .map_err(|error| format!("failed to encode target URL: {error}"))?;
    window
        .eval(&format!("window.location.replace({quoted});"))
        .map_err(|error| format!("failed to navigate main window: {error}"))
}

fn render_failure(app_handle: &AppHandle, reason: FailureReason) {
    let window_state = app_handle.state::<ShellWindowState>();
    window_state.mark_failed(reason.clone());

    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("cannot render fallback view: main window is not available");
        return;
    };
    fallback_view::render_fallback(&window, &reason);
}
