use tauri::AppHandle;

pub(crate) fn run_on_main_thread_dispatch<F>(
    app_handle: &AppHandle,
    action: &str,
    task: F,
) -> Result<(), String>
where
    F: FnOnce(&AppHandle) + Send + 'static,
{
    let main_app = app_handle.clone();
    app_handle
        .run_on_main_thread(move || task(&main_app))
        .map_err(|error| format!("Failed to dispatch '{action}' to main thread: {error}"))
}
