use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    append_desktop_log, append_restart_log, append_shutdown_log, menu_spec, repair_flow,
    reset_flow, tray_actions, window_actions, ShellState, PRODUCT_NAME,
};

fn show_about_dialog(app_handle: &AppHandle) {
    let version = app_handle.package_info().version.to_string();
    app_handle
        .dialog()
        .message(format!(
            "{PRODUCT_NAME} {version}\n\nA desktop shell for the Discord web client."
        ))
        .title(format!("About {PRODUCT_NAME}"))
        .kind(MessageDialogKind::Info)
        .show(|_| {});
}

fn restart_app(app_handle: &AppHandle) {
    if let Some(shell) = app_handle.try_state::<ShellState>() {
        shell.mark_quitting();
    }
    append_restart_log("restart requested from menu");
    app_handle.request_restart();
}

fn quit_app(app_handle: &AppHandle) {
    if let Some(shell) = app_handle.try_state::<ShellState>() {
        shell.mark_quitting();
    }
    append_shutdown_log("quit requested from menu, exiting desktop process");
    app_handle.exit(0);
}

fn handle_app_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match menu_id {
        menu_spec::APP_MENU_RELOAD => window_actions::reload_main_window(app_handle),
        menu_spec::APP_MENU_SETTINGS => {
            window_actions::show_main_window(app_handle);
            window_actions::eval_in_main_window(
                app_handle,
                "window.__CORDSHELL__ && window.__CORDSHELL__.openSettings();",
            );
        }
        menu_spec::APP_MENU_TOGGLE_DEVTOOLS => {
            #[cfg(debug_assertions)]
            {
                if let Some(window) = window_actions::main_window(app_handle) {
                    if window.is_devtools_open() {
                        window.close_devtools();
                    } else {
                        window.open_devtools();
                    }
                }
            }
        }
        _ => {}
    }
}

// Tray and application menu share one id space.
pub fn handle_menu_event(app_handle: &AppHandle, menu_id: &str) {
    let Some(action) = tray_actions::action_from_menu_id(menu_id) else {
        handle_app_menu_event(app_handle, menu_id);
        return;
    };
    append_desktop_log(&format!("menu action: {action:?}"));

    match action {
        tray_actions::TrayMenuAction::Open => window_actions::show_main_window(app_handle),
        tray_actions::TrayMenuAction::About => show_about_dialog(app_handle),
        tray_actions::TrayMenuAction::Repair => repair_flow::run_repair(app_handle),
        tray_actions::TrayMenuAction::Reset => reset_flow::confirm_and_reset(app_handle),
        tray_actions::TrayMenuAction::Restart => restart_app(app_handle),
        tray_actions::TrayMenuAction::Quit => quit_app(app_handle),
    }
}
