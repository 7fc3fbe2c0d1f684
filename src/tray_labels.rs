use tauri::{menu::MenuItem, AppHandle, Manager};

use crate::{logging::append_desktop_log, tray_actions, TrayMenuState, MAIN_WINDOW_LABEL};

pub const TRAY_LABEL_HIDE: &str = "Hide Console";
pub const TRAY_LABEL_SHOW: &str = "Show Console";

pub fn toggle_label_for_visibility(visible: bool) -> &'static str {
    if visible {
        TRAY_LABEL_HIDE
    } else {
        TRAY_LABEL_SHOW
    }
}

fn set_menu_text_safe(item: &MenuItem<tauri::Wry>, text: &str, item_name: &str) {
    if let Err(error) = item.set_text(text) {
        append_desktop_log(&format!(
            "failed to update tray menu text for {item_name}: {error}"
        ));
    }
}

pub fn update_tray_menu_labels(app_handle: &AppHandle) {
    update_tray_menu_labels_with_visibility(app_handle, None);
}

/// Refreshes the toggle item so the tray always offers the action the user
/// can actually take. `visible_override` skips the window query when the
/// caller just changed visibility itself.
pub fn update_tray_menu_labels_with_visibility(
    app_handle: &AppHandle,
    visible_override: Option<bool>,
) {
    let Some(tray_state) = app_handle.try_state::<TrayMenuState>() else {
        return;
    };

    let effective_visible = if let Some(visible) = visible_override {
        visible
    } else {
        app_handle
            .get_webview_window(MAIN_WINDOW_LABEL)
            .and_then(|window| window.is_visible().ok())
            .unwrap_or(true)
    };

    set_menu_text_safe(
        &tray_state.toggle_item,
        toggle_label_for_visibility(effective_visible),
        tray_actions::TRAY_MENU_TOGGLE_WINDOW,
    );
}

#[cfg(test)]
mod tests {
    use super::{toggle_label_for_visibility, TRAY_LABEL_HIDE, TRAY_LABEL_SHOW};

    #[test]
    fn toggle_label_follows_window_visibility() {
        assert_eq!(toggle_label_for_visibility(true), TRAY_LABEL_HIDE);
        assert_eq!(toggle_label_for_visibility(false), TRAY_LABEL_SHOW);
    }
}
