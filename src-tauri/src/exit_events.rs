use tauri::{AppHandle, Manager};

use crate::{append_shutdown_log, settings_persist, ShellState};

pub(crate) fn handle_exit_requested(app_handle: &AppHandle, code: Option<i32>) {
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return;
    };
    shell.mark_quitting();
    append_shutdown_log(&format!(
        "exit requested (code: {}), persisting state",
        code.map(|code| code.to_string())
            .unwrap_or_else(|| "none".to_string())
    ));
    settings_persist::flush_now(&shell);
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return;
    };
    if !shell.try_begin_exit_cleanup() {
        return;
    }

    shell.unbind_all();
    shell.keybinds.clear();
    settings_persist::flush_now(&shell);
    append_shutdown_log("desktop process exiting");
}
