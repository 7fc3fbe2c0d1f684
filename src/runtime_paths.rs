use std::{
    env,
    path::{Path, PathBuf},
};

use tauri::{path::BaseDirectory, AppHandle, Manager};

use crate::{DATA_DIR_ENV, DATA_ROOT_DIR_NAME};

/// Per-user root for everything the shell persists (data handed to the
/// backend, desktop logs).
pub fn default_data_root_dir() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(DATA_ROOT_DIR_NAME))
}

/// Data directory handed to the backend child: the environment override when
/// set and non-empty, otherwise `<data root>/data`.
pub fn resolve_data_dir() -> Option<PathBuf> {
    if let Ok(raw) = env::var(DATA_DIR_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    default_data_root_dir().map(|root| root.join("data"))
}

/// Development checkout root: the parent of the shell crate directory. The
/// UI resource and the backend script live there in a source tree.
pub fn workspace_root_dir() -> PathBuf {
    let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..");
    candidate
        .canonicalize()
        .unwrap_or_else(|_| candidate.to_path_buf())
}

pub fn resolve_resource_path(app_handle: &AppHandle, relative_path: &str) -> Option<PathBuf> {
    app_handle
        .path()
        .resolve(relative_path, BaseDirectory::Resource)
        .ok()
}

/// Directory containing the running executable, for layouts that place
/// resources next to the binary instead of in the bundle resource dir.
pub fn exe_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_dir_is_parent_of_crate_dir() {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .canonicalize()
            .expect("manifest dir exists");
        let root = workspace_root_dir();
        assert_eq!(manifest_dir.parent(), Some(root.as_path()));
    }

    #[test]
    fn default_data_root_dir_ends_with_app_dir_name() {
        if let Some(root) = default_data_root_dir() {
            assert!(root.ends_with(DATA_ROOT_DIR_NAME));
        }
    }
}
