use serde::Deserialize;

/// Whether a load failure belongs to the window's primary navigable context
/// or to embedded sub-content (a third-party map, an ad frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAttribution {
    TopLevel,
    SubFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ResourceMissing,
    LoadError,
}

impl FailureKind {
    pub fn label(self) -> &'static str {
        match self {
            FailureKind::ResourceMissing => "UI resource missing",
            FailureKind::LoadError => "UI resource failed to load",
        }
    }
}

/// Constructed at the failure site, consumed once by the fallback view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason {
    pub kind: FailureKind,
    pub detail: String,
    pub attempted_path: String,
}

impl FailureReason {
    pub fn resource_missing(attempted_path: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::ResourceMissing,
            detail: "No UI resource candidate exists on disk.".to_string(),
            attempted_path: attempted_path.into(),
        }
    }

    pub fn load_error(attempted_path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::LoadError,
            detail: detail.into(),
            attempted_path: attempted_path.into(),
        }
    }
}

/// Sub-frame failures are expected and benign; only the top-level frame may
/// replace a working UI with the fallback document.
pub fn should_render_fallback(attribution: FrameAttribution) -> bool {
    matches!(attribution, FrameAttribution::TopLevel)
}

/// Payload the injected failure probe sends through the bridge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadFailureReport {
    pub top_level: bool,
    pub detail: String,
    #[serde(default)]
    pub url: Option<String>,
}

pub fn attribution_from_report(report: &LoadFailureReport) -> FrameAttribution {
    if report.top_level {
        FrameAttribution::TopLevel
    } else {
        FrameAttribution::SubFrame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_failures_render_the_fallback() {
        assert!(should_render_fallback(FrameAttribution::TopLevel));
    }

    #[test]
    fn sub_frame_failures_are_filtered_out() {
        assert!(!should_render_fallback(FrameAttribution::SubFrame));
    }

    #[test]
    fn report_attribution_follows_the_top_level_flag() {
        let top = LoadFailureReport {
            top_level: true,
            detail: "document error".to_string(),
            url: None,
        };
        let sub = LoadFailureReport {
            top_level: false,
            detail: "embedded map failed".to_string(),
            url: Some("https://maps.example/widget".to_string()),
        };
        assert_eq!(attribution_from_report(&top), FrameAttribution::TopLevel);
        assert_eq!(attribution_from_report(&sub), FrameAttribution::SubFrame);
    }

    #[test]
    fn report_payload_deserializes_from_camel_case() {
        let report: LoadFailureReport = serde_json::from_str(
            r#"{"topLevel":false,"detail":"iframe failed","url":"https://maps.example/w"}"#,
        )
        .unwrap();
        assert!(!report.top_level);
        assert_eq!(report.detail, "iframe failed");
        assert_eq!(report.url.as_deref(), Some("https://maps.example/w"));
    }

    #[test]
    fn failure_reason_constructors_tag_the_kind() {
        let missing = FailureReason::resource_missing("/tmp/app.html");
        assert_eq!(missing.kind, FailureKind::ResourceMissing);
        assert_eq!(missing.attempted_path, "/tmp/app.html");

        let load = FailureReason::load_error("/tmp/app.html", "permission denied");
        assert_eq!(load.kind, FailureKind::LoadError);
        assert_eq!(load.detail, "permission denied");
    }
}
