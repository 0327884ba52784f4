use tauri::Webview;

use crate::{
    desktop_bridge,
    logging::{self, DesktopLogCategory},
};

pub(crate) fn append_desktop_log(message: &str) {
    logging::append_desktop_log(DesktopLogCategory::Runtime, message);
}

pub(crate) fn append_startup_log(message: &str) {
    logging::append_desktop_log(DesktopLogCategory::Startup, message);
}

pub(crate) fn append_restart_log(message: &str) {
    logging::append_desktop_log(DesktopLogCategory::Restart, message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    logging::append_desktop_log(DesktopLogCategory::Shutdown, message);
}

// A no-op when the bridge is already installed on the page.
pub(crate) fn inject_desktop_bridge(webview: &Webview) {
    if let Err(error) = webview.eval(desktop_bridge::DESKTOP_BRIDGE_SCRIPT) {
        append_desktop_log(&format!("failed to inject desktop bridge: {error}"));
    }
}
