use std::time::Instant;

use semver::Version;
use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_updater::{Update, UpdaterExt};

use crate::{append_startup_log, settings_schema::STATE_SKIPPED_UPDATE, ShellState, PRODUCT_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpdatePrompt {
    Prompt,
    AlreadySkipped,
}

fn parse_version(raw: &str) -> Option<Version> {
    Version::parse(raw.trim().trim_start_matches('v')).ok()
}

// A version at or below the one the user skipped is not offered again.
pub(crate) fn decide_update_prompt(latest: &str, skipped: Option<&str>) -> UpdatePrompt {
    let (Some(latest), Some(skipped)) = (parse_version(latest), skipped.and_then(parse_version))
    else {
        return UpdatePrompt::Prompt;
    };
    if latest <= skipped {
        UpdatePrompt::AlreadySkipped
    } else {
        UpdatePrompt::Prompt
    }
}

pub(crate) async fn install_update(app_handle: &AppHandle, update: Update) -> Result<(), String> {
    let target_version = update.version.to_string();
    let downloaded_bytes = update
        .download(|_, _| {}, || {})
        .await
        .map_err(|error| format!("Failed to download desktop app update: {error}"))?;
    update
        .install(&downloaded_bytes)
        .map_err(|error| format!("Failed to install desktop app update: {error}"))?;

    append_startup_log(&format!(
        "desktop app update {target_version} installed, restarting app"
    ));
    if let Some(shell) = app_handle.try_state::<ShellState>() {
        shell.mark_quitting();
    }
    app_handle.request_restart();
    Ok(())
}

async fn run_startup_update_check(app_handle: AppHandle) {
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return;
    };
    if !shell.desktop_settings().check_updates {
        append_startup_log("[update] automatic update check disabled, skipping");
        return;
    }

    let current_version = app_handle.package_info().version.to_string();
    let updater = match app_handle.updater() {
        Ok(updater) => updater,
        Err(error) => {
            append_startup_log(&format!("[update] failed to initialize updater: {error}"));
            return;
        }
    };

    let check_started = Instant::now();
    let update = match updater.check().await {
        Ok(Some(update)) => update,
        Ok(None) => {
            append_startup_log(&format!(
                "[update] has_update=false current_version={current_version} elapsed_ms={}",
                check_started.elapsed().as_millis()
            ));
            return;
        }
        Err(error) => {
            // An unpublished release feed is expected; log only.
            append_startup_log(&format!(
                "[update] check failed (silent): current_version={current_version} elapsed_ms={} error={error}",
                check_started.elapsed().as_millis()
            ));
            return;
        }
    };

    let latest_version = update.version.to_string();
    append_startup_log(&format!(
        "[update] has_update=true current_version={current_version} latest_version={latest_version} elapsed_ms={}",
        check_started.elapsed().as_millis()
    ));
    let skipped = shell.state.get::<String>(STATE_SKIPPED_UPDATE);
    if decide_update_prompt(&latest_version, skipped.as_deref()) == UpdatePrompt::AlreadySkipped {
        append_startup_log(&format!("[update] {latest_version} was skipped by the user"));
        return;
    }

    let install_now = app_handle
        .dialog()
        .message(format!(
            "{PRODUCT_NAME} {latest_version} is available (you have {current_version}). Install it and restart now?"
        ))
        .title("Update available")
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::OkCancelCustom(
            "Install and restart".to_string(),
            "Skip this version".to_string(),
        ))
        .blocking_show();

    if !install_now {
        append_startup_log(&format!("[update] user skipped {latest_version}"));
        shell
            .state
            .set_value(STATE_SKIPPED_UPDATE, latest_version.into());
        return;
    }

    append_startup_log("[update] user accepted update, downloading");
    if let Err(error) = install_update(&app_handle, update).await {
        append_startup_log(&format!("[update] {error}"));
    }
}

pub(crate) fn spawn_startup_update_check(app_handle: &AppHandle) {
    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(run_startup_update_check(app_handle));
}
