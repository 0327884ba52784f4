use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use crate::{
    append_startup_log, PRODUCT_NAME, SPLASH_WINDOW_HEIGHT, SPLASH_WINDOW_LABEL,
    SPLASH_WINDOW_WIDTH,
};

pub(crate) fn create_splash_window(app_handle: &AppHandle) -> Result<(), String> {
    if app_handle.get_webview_window(SPLASH_WINDOW_LABEL).is_some() {
        return Ok(());
    }
    WebviewWindowBuilder::new(
        app_handle,
        SPLASH_WINDOW_LABEL,
        WebviewUrl::App("splash.html".into()),
    )
    .title(PRODUCT_NAME)
    .inner_size(SPLASH_WINDOW_WIDTH, SPLASH_WINDOW_HEIGHT)
    .resizable(false)
    .maximizable(false)
    .decorations(false)
    .skip_taskbar(true)
    .center()
    .build()
    .map(|_| ())
    .map_err(|error| format!("Failed to create splash window: {error}"))
}

pub(crate) fn close_splash_window(app_handle: &AppHandle) {
    let Some(splash) = app_handle.get_webview_window(SPLASH_WINDOW_LABEL) else {
        return;
    };
    if let Err(error) = splash.destroy() {
        append_startup_log(&format!("failed to close splash window: {error}"));
    }
}
