use tauri::Webview;
use url::Url;

use crate::logging::append_desktop_log;

/// Script injected into the top-level document so the shell hears about
/// load failures after the initial navigation. Document-level errors are
/// attributed to the top-level frame; error events from embedded
/// sub-content elements are attributed to a sub-frame. Reports go through
/// the bridge command and are filtered host-side.
const FAILURE_PROBE_JS: &str = r#"
(function () {
  if (window.__AGENTIC_CONSOLE_PROBE__) { return; }
  window.__AGENTIC_CONSOLE_PROBE__ = true;

  function report(topLevel, detail, url) {
    var tauri = window.__TAURI_INTERNALS__;
    if (!tauri || !tauri.invoke) { return; }
    tauri.invoke('shell_bridge_report_load_failure', {
      report: { topLevel: topLevel, detail: detail, url: url }
    }).catch(function () {});
  }

  window.addEventListener('error', function (event) {
    var target = event.target;
    if (!target || target === window) {
      report(true, String(event.message || 'top-level document error'),
             String(window.location.href));
      return;
    }
    var tag = (target.tagName || '').toUpperCase();
    if (tag === 'IFRAME' || tag === 'EMBED' || tag === 'OBJECT') {
      report(false, 'embedded content failed to load',
             target.src ? String(target.src) : null);
    }
  }, true);
})();
"#;

/// The probe belongs in the console UI document and the bundled loading
/// page, not in external content that slipped through.
pub fn should_inject_failure_probe(url: &Url) -> bool {
    match url.scheme() {
        "file" | "tauri" => true,
        "http" | "https" => matches!(url.host_str(), Some("tauri.localhost")),
        _ => false,
    }
}

pub fn inject_failure_probe(webview: &Webview) {
    if let Err(error) = webview.eval(FAILURE_PROBE_JS) {
        append_desktop_log(&format!("failed to inject load-failure probe: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::should_inject_failure_probe;
    use url::Url;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn probe_is_injected_into_local_documents() {
        assert!(should_inject_failure_probe(&url(
            "file:///opt/console/agentic-control-demo.html"
        )));
        assert!(should_inject_failure_probe(&url("tauri://localhost/index.html")));
        assert!(should_inject_failure_probe(&url(
            "http://tauri.localhost/index.html"
        )));
    }

    #[test]
    fn probe_is_not_injected_into_external_content() {
        assert!(!should_inject_failure_probe(&url("https://example.com")));
        assert!(!should_inject_failure_probe(&url("http://127.0.0.1:8000/")));
    }
}
