use tauri::WebviewWindow;

use crate::{
    load_failure::{FailureKind, FailureReason},
    logging::append_desktop_log,
};

/// Builds the diagnostic document shown when the UI cannot be rendered.
/// Entirely in-memory so it displays even when the filesystem is in an
/// unexpected state.
pub fn build_fallback_html(reason: &FailureReason) -> String {
    let heading = escape_html(reason.kind.label());
    let attempted_path = escape_html(&reason.attempted_path);
    let detail = escape_html(&reason.detail);
    let hints = remediation_hints(reason.kind)
        .iter()
        .map(|hint| format!("<li>{}</li>", escape_html(hint)))
        .collect::<String>();

    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\"/>\
<title>Agentic Control Console</title>\
<style>body{{font-family:system-ui,sans-serif;margin:3rem auto;max-width:44rem;color:#334;}}\
code{{background:#eef;padding:.1rem .3rem;border-radius:3px;word-break:break-all;}}\
ul{{line-height:1.6;}}</style></head><body>\
<h1>{heading}</h1>\
<p>Attempted path: <code>{attempted_path}</code></p>\
<p>{detail}</p>\
<ul>{hints}</ul>\
</body></html>"
    )
}

fn remediation_hints(kind: FailureKind) -> &'static [&'static str] {
    match kind {
        FailureKind::ResourceMissing => &[
            "Packaged installs place the console UI under the application resources; reinstalling restores it.",
            "Development runs expect the UI file in the workspace root, next to the shell crate.",
            "The detached diagnostics console lists the candidate locations that were checked.",
        ],
        FailureKind::LoadError => &[
            "The resource exists but could not be loaded; the detail above carries the underlying error.",
            "Check file permissions and that the document is readable by the current user.",
        ],
    }
}

/// Replaces the window's document with the diagnostic view and opens the
/// detached diagnostics console. Never reads from disk.
pub fn render_fallback(window: &WebviewWindow, reason: &FailureReason) {
    append_desktop_log(&format!(
        "rendering fallback view: {} (attempted path: {})",
        reason.kind.label(),
        reason.attempted_path
    ));

    let html = build_fallback_html(reason);
    let quoted = match serde_json::to_string(&html) {
        Ok(quoted) => quoted,
        Err(error) => {
            append_desktop_log(&format!("failed to encode fallback document: {error}"));
            return;
        }
    };
    let script = format!("document.open();document.write({quoted});document.close();");
    if let Err(error) = window.eval(&script) {
        append_desktop_log(&format!("failed to render fallback view: {error}"));
    }

    window.open_devtools();
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for character in raw.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_document_names_kind_and_attempted_path() {
        let reason = FailureReason::resource_missing("/opt/console/app/agentic-control-demo.html");
        let html = build_fallback_html(&reason);
        assert!(html.contains("UI resource missing"));
        assert!(html.contains("/opt/console/app/agentic-control-demo.html"));
    }

    #[test]
    fn load_error_detail_is_carried_into_the_document() {
        let reason = FailureReason::load_error("/opt/app.html", "permission denied (os error 13)");
        let html = build_fallback_html(&reason);
        assert!(html.contains("UI resource failed to load"));
        assert!(html.contains("permission denied (os error 13)"));
    }

    #[test]
    fn error_detail_is_html_escaped() {
        let reason = FailureReason::load_error("/opt/<app>.html", "unexpected <script> & \"quotes\"");
        let html = build_fallback_html(&reason);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("/opt/&lt;app&gt;.html"));
        assert!(html.contains("&quot;quotes&quot;"));
    }

    #[test]
    fn fallback_document_is_self_contained() {
        let reason = FailureReason::resource_missing("/missing.html");
        let html = build_fallback_html(&reason);
        // No external stylesheet, script, or image references.
        assert!(!html.contains("src="));
        assert!(!html.contains("href="));
        assert!(html.starts_with("<!doctype html>"));
    }
}
