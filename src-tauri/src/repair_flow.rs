use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    append_restart_log, mod_bundle, runtime_paths, AtomicFlagGuard, ShellState, PRODUCT_NAME,
};

// Failures surface as a dialog.
pub(crate) fn run_repair(app_handle: &AppHandle) {
    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        let Some(shell) = app_handle.try_state::<ShellState>() else {
            return;
        };
        let Some(_repairing) = AtomicFlagGuard::try_set(&shell.is_repairing) else {
            append_restart_log("repair ignored: another repair is in progress");
            return;
        };

        let settings = shell.desktop_settings();
        let destination = runtime_paths::mod_bundle_path(&shell.data_dir);
        append_restart_log(&format!(
            "repairing mod bundle from {}",
            settings.mod_bundle_url
        ));

        let result = match mod_bundle::parse_bundle_url(&settings.mod_bundle_url) {
            Ok(url) => mod_bundle::download_bundle(&url, &destination).await,
            Err(error) => Err(error),
        };
        match result {
            Ok(size) => {
                append_restart_log(&format!("mod bundle repaired ({size} bytes), relaunching"));
                shell.mark_quitting();
                app_handle.request_restart();
            }
            Err(error) => {
                append_restart_log(&format!("mod bundle repair failed: {error}"));
                app_handle
                    .dialog()
                    .message(format!("Failed to repair the mod bundle.\n\n{error}"))
                    .title(format!("{PRODUCT_NAME} repair failed"))
                    .kind(MessageDialogKind::Error)
                    .show(|_| {});
            }
        }
    });
}
