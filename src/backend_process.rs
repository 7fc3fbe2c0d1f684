use std::{
    fs,
    io::{BufRead, BufReader, Read},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use tauri::{AppHandle, Manager};

use crate::{
    launch_plan::{self, LaunchPlan},
    logging, AtomicFlagGuard, BackendExitInfo, BackendRunState, BackendState, DATA_DIR_ENV,
    EXIT_MONITOR_POLL_INTERVAL_MS, GRACEFUL_STOP_TIMEOUT_MS, STOP_POLL_INTERVAL_MS,
};

/// Starts the backend child process. Idempotent: a live handle or a start
/// already in flight makes this a no-op. Spawn failures are returned to the
/// caller, which logs them and lets the shell continue without a backend.
pub fn start_backend(state: &BackendState, plan: &LaunchPlan) -> Result<(), String> {
    let Some(_spawn_guard) = AtomicFlagGuard::try_set(&state.is_spawning) else {
        return Ok(());
    };

    if state
        .child
        .lock()
        .map_err(|_| "Backend process lock poisoned.")?
        .is_some()
    {
        return Ok(());
    }

    if !plan.cwd.exists() {
        fs::create_dir_all(&plan.cwd).map_err(|error| {
            format!("Failed to create backend cwd {}: {}", plan.cwd.display(), error)
        })?;
    }
    if let Some(data_dir) = &plan.data_dir {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir).map_err(|error| {
                format!(
                    "Failed to create backend data directory {}: {}",
                    data_dir.display(),
                    error
                )
            })?;
        }
    }

    let mut command = Command::new(&plan.cmd);
    command
        .args(&plan.args)
        .current_dir(&plan.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env("PYTHONUNBUFFERED", "1");
    if let Some(data_dir) = &plan.data_dir {
        command.env(DATA_DIR_ENV, data_dir);
    }
    configure_command_no_window(&mut command);

    let mut child = command.spawn().map_err(|error| {
        format!(
            "Failed to spawn backend process with command {:?}: {}",
            launch_plan::build_debug_command(plan),
            error
        )
    })?;

    if let Some(stdout) = child.stdout.take() {
        spawn_output_forwarder("stdout", stdout);
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_output_forwarder("stderr", stderr);
    }

    logging::append_desktop_log(&format!(
        "backend process started (pid {}, packaged={})",
        child.id(),
        plan.packaged_mode
    ));
    state.clear_exit_info();
    *state
        .child
        .lock()
        .map_err(|_| "Backend process lock poisoned.")? = Some(child);
    Ok(())
}

/// Stops the backend if it is running. Idempotent: no handle means no work.
/// Termination is requested gracefully first; after a bounded wait the
/// process is killed outright. Errors from a process that is already gone
/// are swallowed, and the handle is cleared in every path.
pub fn stop_backend(state: &BackendState) {
    let child = match state.child.lock() {
        Ok(mut guard) => guard.take(),
        Err(_) => None,
    };
    let Some(mut child) = child else {
        return;
    };

    logging::append_desktop_log(&format!("stopping backend process (pid {})", child.id()));
    request_graceful_stop(&child);

    if !wait_for_exit(
        &mut child,
        Duration::from_millis(GRACEFUL_STOP_TIMEOUT_MS),
    ) {
        logging::append_desktop_log(
            "backend did not stop after graceful request; killing process",
        );
        let _ = child.kill();
    }

    if let Ok(status) = child.wait() {
        state.record_exit(exit_info_from_status(status));
    }
}

/// Stop, then start again under the same spawn guard. Only reachable from
/// the tray; never triggered automatically by a backend crash.
pub fn restart_backend(app_handle: &AppHandle) {
    let state = app_handle.state::<BackendState>();
    logging::append_desktop_log(&format!(
        "restarting backend (current state: {:?})",
        state.run_state()
    ));
    stop_backend(&state);

    match launch_plan::resolve_launch_plan(app_handle) {
        Ok(plan) => match start_backend(&state, &plan) {
            Ok(()) => spawn_exit_monitor(app_handle.clone()),
            Err(error) => {
                logging::append_desktop_log(&format!("backend restart failed: {error}"))
            }
        },
        Err(error) => {
            logging::append_desktop_log(&format!("backend restart unavailable: {error}"))
        }
    }
}

/// Watches the child for termination from any cause. On exit the handle is
/// cleared and the exit details recorded; no restart is attempted.
pub fn spawn_exit_monitor(app_handle: AppHandle) {
    thread::spawn(move || loop {
        thread::sleep(Duration::from_millis(EXIT_MONITOR_POLL_INTERVAL_MS));

        let state = app_handle.state::<BackendState>();
        let mut guard = match state.child.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        let Some(child) = guard.as_mut() else {
            // Stopped through the supervisor; nothing left to observe.
            return;
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                let info = exit_info_from_status(status);
                *guard = None;
                drop(guard);
                state.record_exit(info);
                logging::append_desktop_log(&format!(
                    "backend process terminated ({})",
                    format_exit_summary(&info)
                ));
                return;
            }
            Ok(None) => {}
            Err(error) => {
                logging::append_desktop_log(&format!(
                    "failed to poll backend process status: {error}"
                ));
                return;
            }
        }
    });
}

fn spawn_output_forwarder<R>(stream_name: &'static str, stream: R)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        logging::append_backend_log(stream_name, &line);
                    }
                }
                Err(_) => break,
            }
        }
    });
}

fn wait_for_exit(child: &mut Child, timeout: Duration) -> bool {
    let start_time = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) => {}
            // A process we can no longer query is treated as gone.
            Err(_) => return true,
        }
        if start_time.elapsed() >= timeout {
            return false;
        }
        thread::sleep(Duration::from_millis(STOP_POLL_INTERVAL_MS));
    }
}

#[cfg(unix)]
fn request_graceful_stop(child: &Child) {
    let _ = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

#[cfg(windows)]
fn request_graceful_stop(child: &Child) {
    let _ = Command::new("taskkill")
        .args(["/pid", &child.id().to_string(), "/t"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

#[cfg(not(any(unix, windows)))]
fn request_graceful_stop(_child: &Child) {}

#[cfg(windows)]
fn configure_command_no_window(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x08000000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn configure_command_no_window(_command: &mut Command) {}

fn exit_info_from_status(status: ExitStatus) -> BackendExitInfo {
    #[cfg(unix)]
    let signal = {
        use std::os::unix::process::ExitStatusExt;
        status.signal()
    };
    #[cfg(not(unix))]
    let signal = None;

    BackendExitInfo {
        code: status.code(),
        signal,
    }
}

fn format_exit_summary(info: &BackendExitInfo) -> String {
    match (info.code, info.signal) {
        (Some(code), _) => format!("exit code {code}"),
        (None, Some(signal)) => format!("signal {signal}"),
        (None, None) => "unknown cause".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BackendState;
    use std::path::Path;

    fn plan_for(cmd: &str, args: &[&str], cwd: &Path) -> LaunchPlan {
        LaunchPlan {
            cmd: cmd.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            cwd: cwd.to_path_buf(),
            data_dir: None,
            packaged_mode: false,
        }
    }

    #[test]
    fn stop_backend_without_child_is_a_noop() {
        let state = BackendState::default();
        stop_backend(&state);
        assert!(state.child.lock().unwrap().is_none());
    }

    #[test]
    fn format_exit_summary_prefers_exit_code() {
        assert_eq!(
            format_exit_summary(&BackendExitInfo {
                code: Some(3),
                signal: None
            }),
            "exit code 3"
        );
        assert_eq!(
            format_exit_summary(&BackendExitInfo {
                code: None,
                signal: Some(15)
            }),
            "signal 15"
        );
        assert_eq!(
            format_exit_summary(&BackendExitInfo {
                code: None,
                signal: None
            }),
            "unknown cause"
        );
    }

    #[cfg(unix)]
    #[test]
    fn start_backend_is_idempotent_while_child_is_live() {
        let dir = tempfile::tempdir().unwrap();
        let state = BackendState::default();
        let plan = plan_for("sleep", &["30"], dir.path());

        start_backend(&state, &plan).unwrap();
        assert_eq!(state.run_state(), BackendRunState::Running);
        let first_pid = state.child.lock().unwrap().as_ref().unwrap().id();

        start_backend(&state, &plan).unwrap();
        let second_pid = state.child.lock().unwrap().as_ref().unwrap().id();
        assert_eq!(first_pid, second_pid);

        stop_backend(&state);
        assert!(state.child.lock().unwrap().is_none());
        assert_eq!(state.run_state(), BackendRunState::Stopped);
    }

    #[cfg(unix)]
    #[test]
    fn start_backend_yields_to_a_start_already_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let state = BackendState::default();
        let plan = plan_for("sleep", &["30"], dir.path());

        let _guard = AtomicFlagGuard::try_set(&state.is_spawning).unwrap();
        start_backend(&state, &plan).unwrap();
        assert!(state.child.lock().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn stop_backend_clears_handle_when_process_already_exited() {
        let dir = tempfile::tempdir().unwrap();
        let state = BackendState::default();
        let plan = plan_for("true", &[], dir.path());

        start_backend(&state, &plan).unwrap();
        thread::sleep(Duration::from_millis(300));

        stop_backend(&state);
        assert!(state.child.lock().unwrap().is_none());
        assert!(state.exit_info.lock().unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn start_backend_reports_a_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let state = BackendState::default();
        let plan = plan_for("definitely-not-a-real-interpreter", &[], dir.path());

        let error = start_backend(&state, &plan).unwrap_err();
        assert!(error.contains("Failed to spawn backend process"));
        assert!(state.child.lock().unwrap().is_none());
    }
}
