use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use url::Url;

use crate::{
    exit_state::ExitStateMachine,
    keybinds::KeybindRegistry,
    mutex_ext::MutexExt,
    settings_binder::SubscriptionSet,
    settings_schema::DesktopSettings,
    settings_store::SettingsStore,
    tray_icon_state::{TrayIconController, VoiceTracker},
    window_lifecycle::{WindowLifecycle, WindowLifecycleTracker},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RevealPlan {
    pub(crate) maximized: bool,
    pub(crate) minimized: bool,
    pub(crate) start_minimized: bool,
}

#[derive(Debug)]
pub(crate) struct ShellState {
    pub(crate) settings: Arc<SettingsStore>,
    pub(crate) state: Arc<SettingsStore>,
    pub(crate) data_dir: PathBuf,
    pub(crate) app_url: Url,
    pub(crate) start_minimized: bool,
    pub(crate) lifecycle: Mutex<WindowLifecycleTracker>,
    pub(crate) exit_state: Mutex<ExitStateMachine>,
    pub(crate) bindings: Mutex<SubscriptionSet>,
    pub(crate) tray: Mutex<TrayIconController>,
    pub(crate) voice: Mutex<VoiceTracker>,
    pub(crate) keybinds: KeybindRegistry,
    pub(crate) pending_reveal: Mutex<Option<RevealPlan>>,
    pub(crate) is_repairing: AtomicBool,
}

impl ShellState {
    pub(crate) fn new(
        settings: Arc<SettingsStore>,
        state: Arc<SettingsStore>,
        data_dir: PathBuf,
        app_url: Url,
        start_minimized: bool,
    ) -> Self {
        Self {
            settings,
            state,
            data_dir,
            app_url,
            start_minimized,
            lifecycle: Mutex::new(WindowLifecycleTracker::default()),
            exit_state: Mutex::new(ExitStateMachine::default()),
            bindings: Mutex::new(SubscriptionSet::default()),
            tray: Mutex::new(TrayIconController::default()),
            voice: Mutex::new(VoiceTracker::default()),
            keybinds: KeybindRegistry::default(),
            pending_reveal: Mutex::new(None),
            is_repairing: AtomicBool::new(false),
        }
    }

    pub(crate) fn desktop_settings(&self) -> DesktopSettings {
        DesktopSettings::from_store(&self.settings)
    }

    pub(crate) fn mark_quitting(&self) {
        self.exit_state.lock_or_recover().mark_quitting();
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.exit_state.lock_or_recover().is_quitting()
    }

    pub(crate) fn try_begin_exit_cleanup(&self) -> bool {
        self.exit_state.lock_or_recover().try_begin_cleanup()
    }

    pub(crate) fn main_window_lifecycle(&self) -> WindowLifecycle {
        self.lifecycle.lock_or_recover().current()
    }

    pub(crate) fn transition_main_window(&self, next: WindowLifecycle) -> bool {
        match self.lifecycle.lock_or_recover().transition(next) {
            Ok(previous) => {
                if previous != next {
                    tracing::debug!("main window {previous} -> {next}");
                }
                true
            }
            Err(error) => {
                tracing::warn!("{error}");
                false
            }
        }
    }

    pub(crate) fn unbind_all(&self) {
        self.bindings.lock_or_recover().unbind_all();
    }

    pub(crate) fn arm_reveal(&self, plan: RevealPlan) {
        *self.pending_reveal.lock_or_recover() = Some(plan);
    }

    // Hands out the reveal plan once per window instance.
    pub(crate) fn take_reveal(&self) -> Option<RevealPlan> {
        self.pending_reveal.lock_or_recover().take()
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct BridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl BridgeResult {
    pub(crate) fn success() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn failure(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

impl From<Result<(), String>> for BridgeResult {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(reason) => Self::failure(reason),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DesktopAppUpdateCheckResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
    pub(crate) current_version: String,
    pub(crate) latest_version: Option<String>,
    pub(crate) has_update: bool,
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
