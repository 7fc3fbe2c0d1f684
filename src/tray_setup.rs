use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    logging::append_desktop_log, tray_actions, tray_labels, tray_menu_handler, window_actions,
    TrayMenuState, MAIN_WINDOW_LABEL, TRAY_ID, TRAY_TOOLTIP,
};

pub fn setup_tray(app_handle: &AppHandle) -> Result<(), String> {
    let main_window_visible = app_handle
        .get_webview_window(MAIN_WINDOW_LABEL)
        .and_then(|window| window.is_visible().ok())
        .unwrap_or(true);

    let toggle_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_TOGGLE_WINDOW,
        tray_labels::toggle_label_for_visibility(main_window_visible),
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray toggle menu item: {error}"))?;
    let reload_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_RELOAD_WINDOW,
        "Reload",
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray reload menu item: {error}"))?;
    let restart_backend_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_RESTART_BACKEND,
        "Restart Backend",
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray restart menu item: {error}"))?;
    let quit_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_QUIT,
        "Quit",
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray quit menu item: {error}"))?;
    let separator = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;

    let menu = Menu::with_items(
        app_handle,
        &[
            &toggle_item,
            &reload_item,
            &restart_backend_item,
            &separator,
            &quit_item,
        ],
    )
    .map_err(|error| format!("Failed to build tray menu: {error}"))?;

    if !app_handle.manage(TrayMenuState {
        toggle_item: toggle_item.clone(),
    }) {
        append_desktop_log("tray menu state already exists, skipping manage");
    }

    let icon = app_handle
        .default_window_icon()
        .cloned()
        .ok_or_else(|| "Default window icon is unavailable for the tray.".to_string())?;

    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(TRAY_TOOLTIP)
        .icon(icon)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            tray_menu_handler::handle_tray_menu_event(app, event.id().as_ref())
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                tray_labels::update_tray_menu_labels(tray.app_handle());
                if button == MouseButton::Left {
                    window_actions::toggle_main_window(tray.app_handle());
                }
            }
        });

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;

    tray_labels::update_tray_menu_labels(app_handle);
    Ok(())
}
