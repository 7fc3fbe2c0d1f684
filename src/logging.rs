use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use chrono::Local;

use crate::{runtime_paths, DESKTOP_LOG_FILE};

/// Where the desktop log lives for a given data root; falls back to a
/// relative path when no home directory can be determined.
pub fn resolve_desktop_log_path(data_root: Option<PathBuf>, file_name: &str) -> PathBuf {
    match data_root {
        Some(root) => root.join("logs").join(file_name),
        None => PathBuf::from("logs").join(file_name),
    }
}

fn append_log_line(line: &str) {
    let path = resolve_desktop_log_path(runtime_paths::default_data_root_dir(), DESKTOP_LOG_FILE);
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            eprintln!("{line}");
            return;
        }
    }
    let opened = OpenOptions::new().create(true).append(true).open(&path);
    match opened {
        Ok(mut file) => {
            if writeln!(file, "{line}").is_err() {
                eprintln!("{line}");
            }
        }
        Err(_) => eprintln!("{line}"),
    }
}

pub fn format_log_line(timestamp: &str, message: &str) -> String {
    format!("[{timestamp}] {message}")
}

fn append_with_timestamp(message: &str) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
    append_log_line(&format_log_line(&timestamp, message));
}

/// Host-side diagnostics sink; best-effort, never fails the caller.
pub fn append_desktop_log(message: &str) {
    append_with_timestamp(message);
}

pub fn append_startup_log(message: &str) {
    append_with_timestamp(&format!("[startup] {message}"));
}

/// Sink for backend output lines forwarded by the supervisor's reader
/// threads. `stream` is "stdout" or "stderr".
pub fn append_backend_log(stream: &str, line: &str) {
    append_with_timestamp(&format!("[backend:{stream}] {line}"));
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{format_log_line, resolve_desktop_log_path};

    #[test]
    fn resolve_desktop_log_path_nests_under_data_root() {
        let path = resolve_desktop_log_path(Some(PathBuf::from("/srv/console")), "desktop.log");
        assert_eq!(path, PathBuf::from("/srv/console/logs/desktop.log"));
    }

    #[test]
    fn resolve_desktop_log_path_without_root_stays_relative() {
        let path = resolve_desktop_log_path(None, "desktop.log");
        assert_eq!(path, PathBuf::from("logs/desktop.log"));
    }

    #[test]
    fn format_log_line_prefixes_timestamp() {
        assert_eq!(
            format_log_line("2026-01-01 00:00:00.000", "hello"),
            "[2026-01-01 00:00:00.000] hello"
        );
    }
}
