pub const MAIN_WINDOW_LABEL: &str = "main";
pub const MAIN_WINDOW_TITLE: &str = "Agentic Control Console";
pub const TRAY_ID: &str = "agentic-console-tray";
pub const TRAY_TOOLTIP: &str = "Agentic Control Console";

pub const UI_RESOURCE_FILE: &str = "agentic-control-demo.html";
pub const PACKAGED_UI_DIR: &str = "app";

pub const BACKEND_SCRIPT_FILE: &str = "llm_info_server.py";
pub const PACKAGED_BACKEND_DIR: &str = "backend";
pub const EMBEDDED_RUNTIME_DIR: &str = "runtime";

pub const DEFAULT_BACKEND_PORT: u16 = 8000;

pub const BACKEND_CMD_ENV: &str = "AGENTIC_CONSOLE_BACKEND_CMD";
pub const BACKEND_PORT_ENV: &str = "AGENTIC_CONSOLE_BACKEND_PORT";
pub const PYTHON_OVERRIDE_ENV: &str = "AGENTIC_CONSOLE_PYTHON";
pub const DATA_DIR_ENV: &str = "AGENTIC_CONSOLE_DATA_DIR";

pub const DATA_ROOT_DIR_NAME: &str = ".agentic-console";
pub const DESKTOP_LOG_FILE: &str = "desktop.log";

pub const GRACEFUL_STOP_TIMEOUT_MS: u64 = 10_000;
pub const STOP_POLL_INTERVAL_MS: u64 = 250;
pub const EXIT_MONITOR_POLL_INTERVAL_MS: u64 = 500;
