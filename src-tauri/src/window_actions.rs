use tauri::{AppHandle, Manager, WebviewWindow};

use crate::{
    append_desktop_log, window_lifecycle::WindowLifecycle, ShellState, MAIN_WINDOW_LABEL,
};

pub(crate) fn main_window(app_handle: &AppHandle) -> Option<WebviewWindow> {
    app_handle.get_webview_window(MAIN_WINDOW_LABEL)
}

fn transition(app_handle: &AppHandle, next: WindowLifecycle) {
    if let Some(shell) = app_handle.try_state::<ShellState>() {
        shell.transition_main_window(next);
    }
}

pub(crate) fn show_main_window(app_handle: &AppHandle) {
    let Some(window) = main_window(app_handle) else {
        append_desktop_log("show_main_window skipped: main window not found");
        return;
    };
    if let Some(shell) = app_handle.try_state::<ShellState>() {
        let lifecycle = shell.main_window_lifecycle();
        if !lifecycle.is_alive() {
            append_desktop_log(&format!("show_main_window skipped: main window is {lifecycle}"));
            return;
        }
    }

    if let Err(error) = window.unminimize() {
        append_desktop_log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        append_desktop_log(&format!("failed to show main window: {error}"));
        return;
    }
    if let Err(error) = window.set_focus() {
        append_desktop_log(&format!("failed to focus main window: {error}"));
    }
    transition(app_handle, WindowLifecycle::Visible);
}

pub(crate) fn hide_main_window(app_handle: &AppHandle) {
    let Some(window) = main_window(app_handle) else {
        append_desktop_log("hide_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.hide() {
        append_desktop_log(&format!("failed to hide main window: {error}"));
        return;
    }
    let parked = app_handle
        .try_state::<ShellState>()
        .map(|shell| shell.desktop_settings().tray)
        .unwrap_or(false);
    transition(
        app_handle,
        if parked {
            WindowLifecycle::MinimizedToTray
        } else {
            WindowLifecycle::Hidden
        },
    );
}

pub(crate) fn toggle_main_window(app_handle: &AppHandle) {
    let Some(window) = main_window(app_handle) else {
        append_desktop_log("toggle_main_window skipped: main window not found");
        return;
    };

    match (window.is_visible(), window.is_minimized()) {
        (Ok(true), Ok(false)) => hide_main_window(app_handle),
        (Ok(_), Ok(_)) => show_main_window(app_handle),
        (Err(error), _) | (_, Err(error)) => append_desktop_log(&format!(
            "failed to read main window visibility in toggle_main_window: {error}"
        )),
    }
}

pub(crate) fn reload_main_window(app_handle: &AppHandle) {
    let Some(window) = main_window(app_handle) else {
        append_desktop_log("reload_main_window skipped: main window not found");
        return;
    };
    if let Err(error) = window.eval("window.location.reload()") {
        append_desktop_log(&format!("failed to reload main window: {error}"));
    }
}

// Dock-style close: the whole application hides, the window stays alive.
pub(crate) fn hide_application(app_handle: &AppHandle) {
    #[cfg(target_os = "macos")]
    {
        match app_handle.hide() {
            Ok(()) => transition(app_handle, WindowLifecycle::Hidden),
            Err(error) => append_desktop_log(&format!("failed to hide application: {error}")),
        }
    }
    #[cfg(not(target_os = "macos"))]
    {
        hide_main_window(app_handle);
    }
}

pub(crate) fn eval_in_main_window(app_handle: &AppHandle, script: &str) {
    let Some(window) = main_window(app_handle) else {
        return;
    };
    if let Err(error) = window.eval(script) {
        append_desktop_log(&format!("failed to evaluate script in main window: {error}"));
    }
}
