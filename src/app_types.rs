use std::{
    process::Child,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};
use tauri::menu::MenuItem;

use crate::{load_failure::FailureReason, webui_paths::ResourceLocation};

/// The toggle item is the only menu entry whose label changes at runtime;
/// the menu keeps the remaining items alive.
#[derive(Clone)]
pub(crate) struct TrayMenuState {
    pub(crate) toggle_item: MenuItem<tauri::Wry>,
}

/// Exit details recorded when the backend terminates, whatever the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BackendExitInfo {
    pub(crate) code: Option<i32>,
    pub(crate) signal: Option<i32>,
}

/// Supervisor state as observed from outside; `Starting` is the span in
/// which the spawn guard is held but no handle is stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BackendRunState {
    Stopped,
    Starting,
    Running,
}

/// Supervisor-owned state for the single backend child process.
///
/// The handle lives behind a mutex and is only ever set by `start_backend`
/// and cleared by `stop_backend` or the exit monitor. `is_spawning` is the
/// guard that keeps two start triggers (app setup, tray restart) from racing
/// into a duplicate spawn.
#[derive(Debug, Default)]
pub(crate) struct BackendState {
    pub(crate) child: Mutex<Option<Child>>,
    pub(crate) exit_info: Mutex<Option<BackendExitInfo>>,
    pub(crate) is_spawning: AtomicBool,
    pub(crate) is_quitting: AtomicBool,
}

impl BackendState {
    /// The only externally visible view of the handle; callers never touch
    /// the `Option<Child>` directly.
    pub(crate) fn run_state(&self) -> BackendRunState {
        if self.is_spawning.load(Ordering::Acquire) {
            return BackendRunState::Starting;
        }
        match self.child.lock() {
            Ok(guard) if guard.is_some() => BackendRunState::Running,
            _ => BackendRunState::Stopped,
        }
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.is_quitting.load(Ordering::Relaxed)
    }

    /// Marks the shell as quitting so window-close handling stops hiding to
    /// the tray and lets the process exit.
    pub(crate) fn mark_quitting(&self) {
        self.is_quitting.store(true, Ordering::Relaxed);
    }

    pub(crate) fn record_exit(&self, info: BackendExitInfo) {
        if let Ok(mut guard) = self.exit_info.lock() {
            *guard = Some(info);
        }
    }

    pub(crate) fn clear_exit_info(&self) {
        if let Ok(mut guard) = self.exit_info.lock() {
            *guard = None;
        }
    }
}

/// Load progress of the UI resource in the main window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoadState {
    Loading,
    Loaded,
    Failed(FailureReason),
}

/// One session per window instance: which location was resolved and how far
/// the load got.
#[derive(Debug, Clone)]
pub(crate) struct WindowSession {
    pub(crate) location: ResourceLocation,
    pub(crate) load_state: LoadState,
}

#[derive(Debug, Default)]
pub(crate) struct ShellWindowState {
    session: Mutex<Option<WindowSession>>,
}

impl ShellWindowState {
    pub(crate) fn begin_session(&self, location: ResourceLocation) {
        if let Ok(mut guard) = self.session.lock() {
            *guard = Some(WindowSession {
                location,
                load_state: LoadState::Loading,
            });
        }
    }

    /// Marks the current session loaded; a session that already failed stays
    /// failed (a late page-load event must not mask a rendered fallback).
    pub(crate) fn mark_loaded(&self) {
        if let Ok(mut guard) = self.session.lock() {
            if let Some(session) = guard.as_mut() {
                if session.load_state == LoadState::Loading {
                    session.load_state = LoadState::Loaded;
                }
            }
        }
    }

    pub(crate) fn mark_failed(&self, reason: FailureReason) {
        if let Ok(mut guard) = self.session.lock() {
            if let Some(session) = guard.as_mut() {
                session.load_state = LoadState::Failed(reason);
            }
        }
    }

    pub(crate) fn current_location(&self) -> Option<ResourceLocation> {
        self.session
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|session| session.location.clone()))
    }

    pub(crate) fn load_state(&self) -> Option<LoadState> {
        self.session
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|session| session.load_state.clone()))
    }
}

/// RAII guard around an atomic flag; the flag is reset when the guard drops.
pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    /// Sets the flag only if it was clear; `None` means another holder is
    /// already inside the guarded section.
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}
