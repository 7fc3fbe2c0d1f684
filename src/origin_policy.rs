use std::process::{Command, Stdio};

use url::Url;

use crate::logging::append_desktop_log;

/// What to do with a navigation request coming out of the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDisposition {
    AllowInWindow,
    OpenExternal,
}

/// Absolute http/https targets leave the shell and go to the system
/// browser; everything else (the bundled page, file URLs, in-memory
/// documents) stays in-window. The webview's own origin is the one http
/// exception, since Windows serves the bundled page over
/// `http://tauri.localhost`.
pub fn classify_navigation(url: &Url) -> NavigationDisposition {
    match url.scheme() {
        "http" | "https" => {
            if is_shell_origin(url) {
                NavigationDisposition::AllowInWindow
            } else {
                NavigationDisposition::OpenExternal
            }
        }
        _ => NavigationDisposition::AllowInWindow,
    }
}

fn is_shell_origin(url: &Url) -> bool {
    matches!(url.host_str(), Some("tauri.localhost"))
}

/// Navigation handler for the main window builder. Returns whether the
/// in-window navigation may proceed.
pub fn handle_navigation(url: &Url) -> bool {
    match classify_navigation(url) {
        NavigationDisposition::AllowInWindow => true,
        NavigationDisposition::OpenExternal => {
            append_desktop_log(&format!("opening external URL in system browser: {url}"));
            if let Err(error) = open_url_with_system_browser(url.as_str()) {
                append_desktop_log(&format!("failed to open external URL: {error}"));
            }
            false
        }
    }
}

#[cfg(target_os = "macos")]
pub fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'open': {error}"))
}

#[cfg(target_os = "windows")]
pub fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("rundll32")
        .args(["url.dll,FileProtocolHandler", url])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'rundll32': {error}"))
}

#[cfg(all(unix, not(target_os = "macos")))]
pub fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("xdg-open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'xdg-open': {error}"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
pub fn open_url_with_system_browser(_url: &str) -> Result<(), String> {
    Err("Opening external URLs is not supported on this platform.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn absolute_http_and_https_targets_go_external() {
        assert_eq!(
            classify_navigation(&url("https://example.com")),
            NavigationDisposition::OpenExternal
        );
        assert_eq!(
            classify_navigation(&url("http://example.com/docs")),
            NavigationDisposition::OpenExternal
        );
    }

    #[test]
    fn localhost_backend_links_are_still_external() {
        // The UI talks to the backend with fetch, not navigation; a
        // top-level jump to the API is treated like any other web target.
        assert_eq!(
            classify_navigation(&url("http://127.0.0.1:8000/llm-info")),
            NavigationDisposition::OpenExternal
        );
    }

    #[test]
    fn file_and_data_documents_stay_in_window() {
        assert_eq!(
            classify_navigation(&url("file:///opt/console/agentic-control-demo.html")),
            NavigationDisposition::AllowInWindow
        );
        assert_eq!(
            classify_navigation(&url("data:text/html,hello")),
            NavigationDisposition::AllowInWindow
        );
    }

    #[test]
    fn relative_navigation_resolves_inside_the_loaded_document() {
        let base = url("file:///opt/console/agentic-control-demo.html");
        let next = base.join("/next").unwrap();
        assert_eq!(
            classify_navigation(&next),
            NavigationDisposition::AllowInWindow
        );
    }

    #[test]
    fn shell_origin_is_allowed_in_window() {
        assert_eq!(
            classify_navigation(&url("tauri://localhost/index.html")),
            NavigationDisposition::AllowInWindow
        );
        assert_eq!(
            classify_navigation(&url("http://tauri.localhost/index.html")),
            NavigationDisposition::AllowInWindow
        );
    }
}
