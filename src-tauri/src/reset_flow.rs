use std::{fs, io, path::Path};

use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind, MessageDialogResult};

use crate::{
    append_restart_log, window_actions, window_lifecycle::WindowLifecycle, ShellState, PRODUCT_NAME,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResetDecision {
    Cancel,
    Proceed,
}

const RESET_BUTTON_LABEL: &str = "Reset";
const CANCEL_BUTTON_LABEL: &str = "Cancel";

// Only an explicit click on the reset button proceeds.
pub(crate) fn decide_reset(result: &MessageDialogResult) -> ResetDecision {
    match result {
        MessageDialogResult::Custom(label) if label == RESET_BUTTON_LABEL => ResetDecision::Proceed,
        _ => ResetDecision::Cancel,
    }
}

// Side effects of a reset, in execution order.
pub(crate) trait ResetHost {
    fn mark_quitting(&self);
    fn unbind_all(&self);
    fn clear_browsing_data(&self) -> Result<(), String>;
    fn close_main_window(&self) -> Result<(), String>;
    fn data_dir(&self) -> &Path;
    fn relaunch(&self);
}

pub(crate) fn remove_data_dir(path: &Path) -> Result<(), String> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(format!(
            "Failed to delete data directory {}: {error}",
            path.display()
        )),
    }
}

pub(crate) fn run_reset<H: ResetHost>(host: &H, result: &MessageDialogResult) -> ResetDecision {
    let decision = decide_reset(result);
    if decision == ResetDecision::Cancel {
        return decision;
    }

    host.mark_quitting();
    host.unbind_all();
    if let Err(error) = host.close_main_window() {
        append_restart_log(&format!("reset: {error}"));
    }
    if let Err(error) = host.clear_browsing_data() {
        append_restart_log(&format!("reset: {error}"));
    }
    if let Err(error) = remove_data_dir(host.data_dir()) {
        append_restart_log(&format!("reset: {error}"));
    }
    host.relaunch();
    decision
}

struct TauriResetHost<'a> {
    app_handle: &'a AppHandle,
    shell: &'a ShellState,
}

impl ResetHost for TauriResetHost<'_> {
    fn mark_quitting(&self) {
        self.shell.mark_quitting();
        self.shell.settings.detach();
        self.shell.state.detach();
    }

    fn unbind_all(&self) {
        self.shell.unbind_all();
    }

    fn clear_browsing_data(&self) -> Result<(), String> {
        let Some(window) = window_actions::main_window(self.app_handle) else {
            return Ok(());
        };
        window
            .clear_all_browsing_data()
            .map_err(|error| format!("Failed to clear browsing data: {error}"))
    }

    fn close_main_window(&self) -> Result<(), String> {
        let Some(window) = window_actions::main_window(self.app_handle) else {
            return Ok(());
        };
        // Hidden rather than destroyed: the webview still has to clear its data,
        // and destroying the last window would exit before the relaunch.
        window
            .hide()
            .map_err(|error| format!("Failed to close main window: {error}"))?;
        self.shell.transition_main_window(WindowLifecycle::Closing);
        Ok(())
    }

    fn data_dir(&self) -> &Path {
        &self.shell.data_dir
    }

    fn relaunch(&self) {
        append_restart_log("reset complete, relaunching");
        self.app_handle.request_restart();
    }
}

pub(crate) fn confirm_and_reset(app_handle: &AppHandle) {
    let callback_handle = app_handle.clone();
    app_handle
        .dialog()
        .message(format!(
            "This deletes all {PRODUCT_NAME} settings, the mod bundle and your login session, then restarts {PRODUCT_NAME}."
        ))
        .title(format!("Reset {PRODUCT_NAME}?"))
        .kind(MessageDialogKind::Warning)
        // The first button is the default one.
        .buttons(MessageDialogButtons::OkCancelCustom(
            CANCEL_BUTTON_LABEL.to_string(),
            RESET_BUTTON_LABEL.to_string(),
        ))
        .show_with_result(move |result| {
            let Some(shell) = callback_handle.try_state::<ShellState>() else {
                return;
            };
            let host = TauriResetHost {
                app_handle: &callback_handle,
                shell: &shell,
            };
            if run_reset(&host, &result) == ResetDecision::Cancel {
                append_restart_log(&format!("reset cancelled: {result:?}"));
            }
        });
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::PathBuf};

    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        calls: RefCell<Vec<&'static str>>,
        data_dir: PathBuf,
    }

    impl ResetHost for RecordingHost {
        fn mark_quitting(&self) {
            self.calls.borrow_mut().push("mark_quitting");
        }

        fn unbind_all(&self) {
            self.calls.borrow_mut().push("unbind_all");
        }

        fn clear_browsing_data(&self) -> Result<(), String> {
            self.calls.borrow_mut().push("clear_browsing_data");
            Ok(())
        }

        fn close_main_window(&self) -> Result<(), String> {
            self.calls.borrow_mut().push("close_main_window");
            Err("already closed".to_string())
        }

        fn data_dir(&self) -> &Path {
            &self.data_dir
        }

        fn relaunch(&self) {
            self.calls.borrow_mut().push("relaunch");
        }
    }

    #[test]
    fn cancel_touches_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("settings.json"), "{}").expect("write");
        let host = RecordingHost {
            data_dir: dir.path().to_path_buf(),
            ..RecordingHost::default()
        };

        for result in [
            MessageDialogResult::Cancel,
            MessageDialogResult::Ok,
            MessageDialogResult::Yes,
            MessageDialogResult::No,
            MessageDialogResult::Custom(CANCEL_BUTTON_LABEL.to_string()),
            MessageDialogResult::Custom("reset".to_string()),
        ] {
            assert_eq!(run_reset(&host, &result), ResetDecision::Cancel, "{result:?}");
        }
        assert!(host.calls.borrow().is_empty());
        assert!(dir.path().join("settings.json").exists());
    }

    #[test]
    fn confirm_runs_every_step_and_deletes_data() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_dir = dir.path().join("data");
        fs::create_dir_all(data_dir.join("mod")).expect("mkdir");
        fs::write(data_dir.join("mod").join("renderer.js"), "x").expect("write");
        let host = RecordingHost {
            data_dir: data_dir.clone(),
            ..RecordingHost::default()
        };

        let result = MessageDialogResult::Custom(RESET_BUTTON_LABEL.to_string());
        assert_eq!(run_reset(&host, &result), ResetDecision::Proceed);
        assert_eq!(
            *host.calls.borrow(),
            vec![
                "mark_quitting",
                "unbind_all",
                "close_main_window",
                "clear_browsing_data",
                "relaunch"
            ]
        );
        assert!(!data_dir.exists());
    }

    #[test]
    fn removing_missing_dir_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(remove_data_dir(&dir.path().join("missing")), Ok(()));
    }
}
