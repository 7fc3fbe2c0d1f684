use std::path::PathBuf;

use tauri::AppHandle;

use crate::{runtime_paths, PACKAGED_UI_DIR, UI_RESOURCE_FILE};

/// Which deployment layout a candidate path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Packaged,
    PackagedAlt,
    Development,
}

/// One possible filesystem location for the UI entry resource.
#[derive(Debug, Clone)]
pub struct ResourceCandidate {
    pub path: PathBuf,
    pub provenance: Provenance,
}

/// The resolver's answer. The path is not guaranteed to exist when every
/// candidate was missing; the caller re-checks before loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    pub path: PathBuf,
    pub provenance: Provenance,
}

/// Fixed candidate order: packaged layouts first, development checkout last.
/// New deployment layouts are added here, not in the resolver.
pub fn ui_resource_candidates(app_handle: &AppHandle) -> Vec<ResourceCandidate> {
    let resource_relative = format!("{PACKAGED_UI_DIR}/{UI_RESOURCE_FILE}");
    let mut candidates = Vec::new();

    if let Some(packaged) = runtime_paths::resolve_resource_path(app_handle, &resource_relative) {
        candidates.push(ResourceCandidate {
            path: packaged,
            provenance: Provenance::Packaged,
        });
    }

    if let Some(exe_dir) = runtime_paths::exe_dir() {
        candidates.push(ResourceCandidate {
            path: exe_dir.join(PACKAGED_UI_DIR).join(UI_RESOURCE_FILE),
            provenance: Provenance::PackagedAlt,
        });
    }

    candidates.push(ResourceCandidate {
        path: runtime_paths::workspace_root_dir().join(UI_RESOURCE_FILE),
        provenance: Provenance::Development,
    });

    candidates
}

/// Scans candidates in order and returns the first whose path exists. When
/// none exist, the last candidate is returned as the ambient default with no
/// existence guarantee. Returns `None` only for an empty candidate list,
/// which `ui_resource_candidates` never produces.
pub fn resolve_ui_resource(candidates: &[ResourceCandidate]) -> Option<ResourceLocation> {
    for candidate in candidates {
        if candidate.path.is_file() {
            return Some(ResourceLocation {
                path: candidate.path.clone(),
                provenance: candidate.provenance,
            });
        }
    }

    candidates.last().map(|candidate| ResourceLocation {
        path: candidate.path.clone(),
        provenance: candidate.provenance,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn candidate(path: PathBuf, provenance: Provenance) -> ResourceCandidate {
        ResourceCandidate { path, provenance }
    }

    #[test]
    fn resolve_returns_first_existing_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("agentic-control-demo.html");
        fs::write(&existing, "<html></html>").unwrap();

        let candidates = vec![
            candidate(dir.path().join("missing-primary.html"), Provenance::Packaged),
            candidate(existing.clone(), Provenance::PackagedAlt),
            candidate(dir.path().join("missing-dev.html"), Provenance::Development),
        ];

        let location = resolve_ui_resource(&candidates).unwrap();
        assert_eq!(location.path, existing);
        assert_eq!(location.provenance, Provenance::PackagedAlt);
    }

    #[test]
    fn earlier_existing_candidate_shadows_later_ones() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.html");
        let second = dir.path().join("second.html");
        fs::write(&first, "a").unwrap();
        fs::write(&second, "b").unwrap();

        let candidates = vec![
            candidate(first.clone(), Provenance::Packaged),
            candidate(second, Provenance::Development),
        ];

        let location = resolve_ui_resource(&candidates).unwrap();
        assert_eq!(location.path, first);
        assert_eq!(location.provenance, Provenance::Packaged);
    }

    #[test]
    fn all_missing_falls_back_to_last_candidate_without_existence() {
        let dir = tempfile::tempdir().unwrap();
        let dev_path = dir.path().join("dev/agentic-control-demo.html");

        let candidates = vec![
            candidate(dir.path().join("a.html"), Provenance::Packaged),
            candidate(dir.path().join("b.html"), Provenance::PackagedAlt),
            candidate(dev_path.clone(), Provenance::Development),
        ];

        let location = resolve_ui_resource(&candidates).unwrap();
        assert_eq!(location.path, dev_path);
        assert_eq!(location.provenance, Provenance::Development);
        assert!(!location.path.exists());
    }

    #[test]
    fn empty_candidate_list_yields_none() {
        assert!(resolve_ui_resource(&[]).is_none());
    }

    #[test]
    fn directories_do_not_count_as_existing_resources() {
        let dir = tempfile::tempdir().unwrap();
        let as_dir = dir.path().join("app");
        fs::create_dir(&as_dir).unwrap();
        let dev_path = dir.path().join("dev.html");

        let candidates = vec![
            candidate(as_dir, Provenance::Packaged),
            candidate(dev_path.clone(), Provenance::Development),
        ];

        let location = resolve_ui_resource(&candidates).unwrap();
        assert_eq!(location.path, dev_path);
    }
}
