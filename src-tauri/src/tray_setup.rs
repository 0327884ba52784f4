use tauri::{
    image::Image,
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    append_desktop_log,
    menu_spec::{self, PlatformCapabilities},
    mutex_ext::MutexExt,
    tray_icon_state::{TrayIconAppearance, TrayIconController},
    window_actions, ShellState, PRODUCT_NAME, TRAY_ID,
};

fn tray_image(asset_name: &str) -> Image<'static> {
    match asset_name {
        "icon-unread" => tauri::include_image!("./icons/tray/icon-unread.png"),
        "idle" => tauri::include_image!("./icons/tray/idle.png"),
        "muted" => tauri::include_image!("./icons/tray/muted.png"),
        "deafened" => tauri::include_image!("./icons/tray/deafened.png"),
        "speaking" => tauri::include_image!("./icons/tray/speaking.png"),
        _ => tauri::include_image!("./icons/tray/icon.png"),
    }
}

fn handle_tray_click(app_handle: &AppHandle) {
    let toggles = app_handle
        .try_state::<ShellState>()
        .map(|shell| shell.desktop_settings().click_tray_to_show_hide)
        .unwrap_or(false);
    if toggles {
        window_actions::toggle_main_window(app_handle);
    } else {
        window_actions::show_main_window(app_handle);
    }
}

pub fn setup_tray(app_handle: &AppHandle) -> Result<(), String> {
    if app_handle.tray_by_id(TRAY_ID).is_some() {
        return Ok(());
    }

    let menu = menu_spec::render_menu(
        app_handle,
        menu_spec::TRAY_MENU,
        &PlatformCapabilities::current(),
    )?;
    let appearance = app_handle
        .try_state::<ShellState>()
        .map(|shell| {
            let mut tray = shell.tray.lock_or_recover();
            tray.invalidate();
            tray.appearance()
        })
        .unwrap_or_else(|| TrayIconController::default().appearance());

    TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(PRODUCT_NAME)
        .icon(tray_image(appearance.asset_name()))
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                handle_tray_click(tray.app_handle());
            }
        })
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;

    if let Some(shell) = app_handle.try_state::<ShellState>() {
        shell.tray.lock_or_recover().set_icon(appearance.state);
    }
    append_desktop_log("tray icon created");
    Ok(())
}

pub fn destroy_tray(app_handle: &AppHandle) {
    if app_handle.remove_tray_by_id(TRAY_ID).is_some() {
        append_desktop_log("tray icon removed");
    }
}

fn apply_tray_appearance(app_handle: &AppHandle, appearance: TrayIconAppearance) {
    let Some(tray) = app_handle.tray_by_id(TRAY_ID) else {
        return;
    };
    if let Err(error) = tray.set_icon(Some(tray_image(appearance.asset_name()))) {
        append_desktop_log(&format!(
            "failed to set tray icon '{}': {error}",
            appearance.asset_name()
        ));
    }
}

pub(crate) fn update_tray_icon<F>(app_handle: &AppHandle, update: F)
where
    F: FnOnce(&mut TrayIconController) -> Option<TrayIconAppearance>,
{
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return;
    };
    let pending = update(&mut shell.tray.lock_or_recover());
    if let Some(appearance) = pending {
        apply_tray_appearance(app_handle, appearance);
    }
}
