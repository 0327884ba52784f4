use std::{
    process::{Command, Stdio},
    sync::Arc,
};

use serde_json::{Map, Value};
use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_updater::UpdaterExt;
use url::Url;

use crate::{
    accent_color, app_updater, append_desktop_log, keybinds, main_window,
    mutex_ext::MutexExt,
    settings_schema::{self, DiscordBranch, TransparencyOption},
    spellcheck,
    tray_icon_state::VoiceEvent,
    tray_setup, ui_dispatch, window_actions, BridgeResult, DesktopAppUpdateCheckResult,
    ShellState,
};

fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" | "mailto" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https/mailto are allowed."
        )),
    }
}

#[cfg(target_os = "macos")]
pub(crate) fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'open': {error}"))
}

#[cfg(target_os = "windows")]
pub(crate) fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("rundll32")
        .args(["url.dll,FileProtocolHandler", url])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'rundll32': {error}"))
}

#[cfg(all(unix, not(target_os = "macos")))]
pub(crate) fn open_url_with_system_browser(url: &str) -> Result<(), String> {
    Command::new("xdg-open")
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run 'xdg-open': {error}"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
pub(crate) fn open_url_with_system_browser(_url: &str) -> Result<(), String> {
    Err("Opening external URLs is not supported on this platform.".to_string())
}

pub(crate) fn validate_setting_value(key: &str, value: &Value) -> Result<(), String> {
    if !settings_schema::BRIDGE_WRITABLE_KEYS.contains(&key) {
        return Err(format!("Setting '{key}' is not writable."));
    }

    let valid = match key {
        settings_schema::KEY_DISCORD_BRANCH => value
            .as_str()
            .and_then(DiscordBranch::parse)
            .is_some(),
        settings_schema::KEY_TRANSPARENCY_OPTION => {
            serde_json::from_value::<TransparencyOption>(value.clone()).is_ok()
        }
        settings_schema::KEY_SPELLCHECK_LANGUAGES => value
            .as_array()
            .is_some_and(|languages| languages.iter().all(Value::is_string)),
        _ => value.is_boolean(),
    };
    if valid {
        Ok(())
    } else {
        Err(format!("Invalid value for setting '{key}': {value}"))
    }
}

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_ready(app_handle: AppHandle) -> BridgeResult {
    ui_dispatch::run_on_main_thread_dispatch(
        &app_handle,
        "reveal main window",
        main_window::handle_main_window_ready,
    )
    .into()
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_settings(app_handle: AppHandle) -> Map<String, Value> {
    app_handle
        .try_state::<ShellState>()
        .map(|shell| shell.settings.snapshot())
        .unwrap_or_default()
}

#[tauri::command]
pub(crate) fn desktop_bridge_set_setting(
    app_handle: AppHandle,
    key: String,
    value: Value,
) -> BridgeResult {
    if let Err(reason) = validate_setting_value(&key, &value) {
        append_desktop_log(&format!("rejected bridge setting write: {reason}"));
        return BridgeResult::failure(reason);
    }
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return BridgeResult::failure("Shell state is not initialized.");
    };
    shell.settings.set_value(&key, value);
    BridgeResult::success()
}

#[tauri::command]
pub(crate) fn desktop_bridge_voice_event(app_handle: AppHandle, event: VoiceEvent) -> BridgeResult {
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return BridgeResult::failure("Shell state is not initialized.");
    };
    let state = shell.voice.lock_or_recover().apply(&event);
    tray_setup::update_tray_icon(&app_handle, |tray| tray.set_icon(state));
    BridgeResult::success()
}

#[tauri::command]
pub(crate) fn desktop_bridge_set_badge(app_handle: AppHandle, count: u32) -> BridgeResult {
    tray_setup::update_tray_icon(&app_handle, |tray| tray.set_badge(count > 0));
    BridgeResult::success()
}

#[tauri::command]
pub(crate) fn desktop_bridge_set_title(app_handle: AppHandle, title: String) -> BridgeResult {
    main_window::apply_renderer_title(&app_handle, &title).into()
}

#[tauri::command]
pub(crate) fn desktop_bridge_register_keybind(app_handle: AppHandle, id: u32) -> BridgeResult {
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return BridgeResult::failure("Shell state is not initialized.");
    };
    let target = app_handle.clone();
    shell.keybinds.register(
        id,
        Arc::new(move |pressed| {
            window_actions::eval_in_main_window(
                &target,
                &keybinds::build_keybind_script(id, pressed),
            );
        }),
    );
    BridgeResult::success()
}

#[tauri::command]
pub(crate) fn desktop_bridge_unregister_keybind(app_handle: AppHandle, id: u32) -> BridgeResult {
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return BridgeResult::failure("Shell state is not initialized.");
    };
    if shell.keybinds.unregister(id) {
        BridgeResult::success()
    } else {
        BridgeResult::failure(format!("Keybind {id} is not registered."))
    }
}

#[tauri::command]
pub(crate) async fn desktop_bridge_get_accent_color() -> String {
    tauri::async_runtime::spawn_blocking(accent_color::system_accent_color)
        .await
        .unwrap_or_else(|error| {
            append_desktop_log(&format!("accent color lookup failed: {error}"));
            String::new()
        })
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_spellcheck_languages(app_handle: AppHandle) -> Vec<String> {
    let requested = app_handle
        .try_state::<ShellState>()
        .map(|shell| shell.desktop_settings().spellcheck_languages)
        .unwrap_or_default();
    spellcheck::effective_spellcheck_languages(&requested)
}

#[tauri::command]
pub(crate) fn desktop_bridge_open_external_url(url: String) -> BridgeResult {
    parse_openable_url(&url)
        .and_then(|parsed| open_url_with_system_browser(parsed.as_str()))
        .into()
}

#[tauri::command]
pub(crate) async fn desktop_bridge_check_desktop_app_update(
    app_handle: AppHandle,
) -> DesktopAppUpdateCheckResult {
    let current_version = app_handle.package_info().version.to_string();

    let updater = match app_handle.updater() {
        Ok(updater) => updater,
        Err(error) => {
            let reason = format!("Failed to initialize updater: {error}");
            append_desktop_log(&reason);
            return DesktopAppUpdateCheckResult {
                ok: false,
                reason: Some(reason),
                current_version,
                latest_version: None,
                has_update: false,
            };
        }
    };

    match updater.check().await {
        Ok(Some(update)) => DesktopAppUpdateCheckResult {
            ok: true,
            reason: None,
            current_version,
            latest_version: Some(update.version.to_string()),
            has_update: true,
        },
        Ok(None) => DesktopAppUpdateCheckResult {
            ok: true,
            reason: None,
            current_version: current_version.clone(),
            latest_version: Some(current_version),
            has_update: false,
        },
        Err(error) => {
            // A missing release feed is normal before the first release.
            append_desktop_log(&format!("desktop app update check (silent): {error}"));
            DesktopAppUpdateCheckResult {
                ok: true,
                reason: None,
                current_version,
                latest_version: None,
                has_update: false,
            }
        }
    }
}

#[tauri::command]
pub(crate) async fn desktop_bridge_install_desktop_app_update(
    app_handle: AppHandle,
) -> BridgeResult {
    let updater = match app_handle.updater() {
        Ok(updater) => updater,
        Err(error) => {
            let reason = format!("Failed to initialize updater: {error}");
            append_desktop_log(&reason);
            return BridgeResult::failure(reason);
        }
    };

    let update = match updater.check().await {
        Ok(Some(update)) => update,
        Ok(None) => return BridgeResult::failure("Already on latest desktop version."),
        Err(error) => {
            let reason = format!("Failed to check desktop app update: {error}");
            append_desktop_log(&reason);
            return BridgeResult::failure(reason);
        }
    };

    let target_version = update.version.to_string();
    let should_install = app_handle
        .dialog()
        .message(format!(
            "Version {target_version} is ready to install. Install it and restart now?"
        ))
        .title("Update ready")
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::OkCancelCustom(
            "Install and restart".to_string(),
            "Later".to_string(),
        ))
        .blocking_show();
    if !should_install {
        append_desktop_log("user declined to install update");
        return BridgeResult {
            ok: true,
            reason: Some("user declined".to_string()),
        };
    }

    match app_updater::install_update(&app_handle, update).await {
        Ok(()) => BridgeResult::success(),
        Err(reason) => {
            append_desktop_log(&reason);
            BridgeResult::failure(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn openable_url_accepts_web_and_mail_schemes() {
        assert!(parse_openable_url(" https://example.com ").is_ok());
        assert!(parse_openable_url("mailto:someone@example.com").is_ok());
        assert!(parse_openable_url("").is_err());
        assert!(parse_openable_url("file:///etc/passwd").is_err());
        assert!(parse_openable_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn setting_values_are_checked_against_key_shape() {
        assert_eq!(validate_setting_value("tray", &json!(false)), Ok(()));
        assert!(validate_setting_value("tray", &json!("no")).is_err());
        assert_eq!(
            validate_setting_value("discordBranch", &json!("canary")),
            Ok(())
        );
        assert!(validate_setting_value("discordBranch", &json!("beta")).is_err());
        assert_eq!(
            validate_setting_value("transparencyOption", &json!("acrylic")),
            Ok(())
        );
        assert_eq!(
            validate_setting_value("spellCheckLanguages", &json!(["en-US", "de"])),
            Ok(())
        );
        assert!(validate_setting_value("spellCheckLanguages", &json!(["en-US", 1])).is_err());
    }

    #[test]
    fn state_keys_are_not_writable_from_the_renderer() {
        assert!(validate_setting_value("windowBounds", &json!({})).is_err());
        assert!(validate_setting_value("skippedUpdate", &json!("1.0.0")).is_err());
    }

    #[test]
    fn mod_bundle_url_is_not_writable_from_bridge() {
        assert!(!settings_schema::BRIDGE_WRITABLE_KEYS
            .contains(&settings_schema::KEY_MOD_BUNDLE_URL));
        assert_eq!(
            validate_setting_value("modBundleUrl", &json!("https://attacker.example/evil.js")),
            Err("Setting 'modBundleUrl' is not writable.".to_string())
        );
        assert!(validate_setting_value("modBundleUrl", &json!("")).is_err());
    }
}
