use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    backend_process, exit_events, launch_plan,
    logging::{append_desktop_log, append_startup_log},
    main_window, shell_bridge, tray_setup, window_actions, BackendState, ShellWindowState,
    DESKTOP_LOG_FILE, MAIN_WINDOW_LABEL,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        crate::logging::resolve_desktop_log_path(
            crate::runtime_paths::default_data_root_dir(),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(
            |app_handle, _argv, _cwd| {
                append_desktop_log("second instance launch detected, focusing main window");
                window_actions::show_main_window(app_handle);
            },
        ))
        .manage(BackendState::default())
        .manage(ShellWindowState::default())
        .invoke_handler(tauri::generate_handler![
            crate::shell_bridge_commands::shell_bridge_is_desktop_runtime,
            crate::shell_bridge_commands::shell_bridge_report_load_failure,
        ])
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            if let WindowEvent::CloseRequested { api, .. } = event {
                let app_handle = window.app_handle();
                let state = app_handle.state::<BackendState>();
                if state.is_quitting() {
                    return;
                }

                api.prevent_close();
                window_actions::hide_main_window(app_handle);
            }
        })
        .on_page_load(|webview, payload| match payload.event() {
            PageLoadEvent::Started => {
                append_desktop_log(&format!("page-load started: {}", payload.url()));
                if shell_bridge::should_inject_failure_probe(payload.url()) {
                    shell_bridge::inject_failure_probe(&webview);
                }
            }
            PageLoadEvent::Finished => {
                append_desktop_log(&format!("page-load finished: {}", payload.url()));
                main_window::handle_page_load_finished(webview.app_handle(), payload.url());
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            if let Err(error) = tray_setup::setup_tray(&app_handle) {
                append_startup_log(&format!("failed to initialize tray: {error}"));
            }

            // The supervisor's start attempt strictly precedes window
            // creation. Readiness is not awaited; the UI copes with a
            // backend that is still coming up.
            match launch_plan::resolve_launch_plan(&app_handle) {
                Ok(plan) => {
                    append_startup_log(&format!(
                        "backend launch command: {:?}",
                        launch_plan::build_debug_command(&plan)
                    ));
                    let state = app_handle.state::<BackendState>();
                    match backend_process::start_backend(&state, &plan) {
                        Ok(()) => backend_process::spawn_exit_monitor(app_handle.clone()),
                        Err(error) => append_startup_log(&format!(
                            "backend start failed, continuing without a backend: {error}"
                        )),
                    }
                }
                Err(error) => append_startup_log(&format!(
                    "backend launch unavailable, continuing without a backend: {error}"
                )),
            }

            main_window::create_main_window(&app_handle)?;
            main_window::load_ui_resource(&app_handle);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { .. } => {
                exit_events::handle_exit_requested(app_handle);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            _ => {}
        });
}
