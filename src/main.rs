#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod backend_process;
mod exit_events;
mod fallback_view;
mod launch_plan;
mod load_failure;
mod logging;
mod main_window;
mod origin_policy;
mod runtime_paths;
mod shell_bridge;
mod shell_bridge_commands;
mod tray_actions;
mod tray_labels;
mod tray_menu_handler;
mod tray_setup;
mod webui_paths;
mod window_actions;

pub(crate) use app_constants::*;
pub(crate) use app_types::{
    AtomicFlagGuard, BackendExitInfo, BackendRunState, BackendState, LoadState, ShellWindowState,
    TrayMenuState,
};

fn main() {
    app_runtime::run();
}
