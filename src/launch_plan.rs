use std::{
    env,
    path::{Path, PathBuf},
};

use tauri::AppHandle;

use crate::{
    runtime_paths, BACKEND_CMD_ENV, BACKEND_PORT_ENV, BACKEND_SCRIPT_FILE, DEFAULT_BACKEND_PORT,
    EMBEDDED_RUNTIME_DIR, PACKAGED_BACKEND_DIR, PYTHON_OVERRIDE_ENV,
};

/// Everything needed to spawn the backend child process.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub cmd: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub data_dir: Option<PathBuf>,
    pub packaged_mode: bool,
}

/// Resolution order: full command override, then the packaged/embedded
/// runtime, then a development interpreter against the source checkout.
pub fn resolve_launch_plan(app_handle: &AppHandle) -> Result<LaunchPlan, String> {
    if let Some(custom_cmd) = env::var(BACKEND_CMD_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        return resolve_custom_launch(&custom_cmd);
    }

    let script = resolve_backend_script(app_handle)?;
    let (cmd, packaged_mode) = resolve_interpreter(app_handle);
    let cwd = script
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(runtime_paths::workspace_root_dir);

    Ok(LaunchPlan {
        cmd,
        args: backend_args(&script, resolve_backend_port()),
        cwd,
        data_dir: runtime_paths::resolve_data_dir(),
        packaged_mode,
    })
}

pub(crate) fn parse_custom_backend_cmd(raw: &str) -> Result<(String, Vec<String>), String> {
    let mut pieces =
        shlex::split(raw).ok_or_else(|| format!("Invalid {BACKEND_CMD_ENV}: {raw}"))?;
    if pieces.is_empty() {
        return Err(format!("{BACKEND_CMD_ENV} is empty."));
    }
    let cmd = pieces.remove(0);
    Ok((cmd, pieces))
}

fn resolve_custom_launch(custom_cmd: &str) -> Result<LaunchPlan, String> {
    let (cmd, args) = parse_custom_backend_cmd(custom_cmd)?;
    Ok(LaunchPlan {
        cmd,
        args,
        cwd: runtime_paths::workspace_root_dir(),
        data_dir: runtime_paths::resolve_data_dir(),
        packaged_mode: false,
    })
}

/// The backend entry script: packaged copy when the bundle carries one,
/// otherwise the development checkout.
fn resolve_backend_script(app_handle: &AppHandle) -> Result<PathBuf, String> {
    let packaged_relative = format!("{PACKAGED_BACKEND_DIR}/{BACKEND_SCRIPT_FILE}");
    if let Some(packaged) = runtime_paths::resolve_resource_path(app_handle, &packaged_relative) {
        if packaged.is_file() {
            return Ok(packaged);
        }
    }

    let dev_script = runtime_paths::workspace_root_dir().join(BACKEND_SCRIPT_FILE);
    if dev_script.is_file() {
        return Ok(dev_script);
    }

    Err(format!(
        "Cannot locate backend script {BACKEND_SCRIPT_FILE} in packaged resources or the development workspace. Set {BACKEND_CMD_ENV} to launch a custom backend."
    ))
}

fn embedded_runtime_python(app_handle: &AppHandle) -> Option<PathBuf> {
    let relative = if cfg!(target_os = "windows") {
        format!("{EMBEDDED_RUNTIME_DIR}/python/python.exe")
    } else {
        format!("{EMBEDDED_RUNTIME_DIR}/python/bin/python3")
    };
    runtime_paths::resolve_resource_path(app_handle, &relative).filter(|path| path.is_file())
}

fn system_python() -> &'static str {
    if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    }
}

/// Interpreter preference: embedded runtime, then the environment override,
/// then whatever the system provides.
fn resolve_interpreter(app_handle: &AppHandle) -> (String, bool) {
    if let Some(embedded) = embedded_runtime_python(app_handle) {
        return (embedded.to_string_lossy().to_string(), true);
    }
    if let Ok(raw) = env::var(PYTHON_OVERRIDE_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return (trimmed.to_string(), false);
        }
    }
    (system_python().to_string(), false)
}

pub(crate) fn backend_args(script: &Path, port: u16) -> Vec<String> {
    vec![
        script.to_string_lossy().to_string(),
        "--port".to_string(),
        port.to_string(),
    ]
}

pub fn resolve_backend_port() -> u16 {
    parse_backend_port(env::var(BACKEND_PORT_ENV).ok().as_deref())
}

pub(crate) fn parse_backend_port(raw: Option<&str>) -> u16 {
    raw.map(str::trim)
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_BACKEND_PORT)
}

/// Command line rendered for error messages and the desktop log.
pub fn build_debug_command(plan: &LaunchPlan) -> Vec<String> {
    let mut parts = vec![plan.cmd.clone()];
    parts.extend(plan.args.clone());
    parts
}
