use std::{env, sync::Arc};

use tauri::{webview::PageLoadEvent, AppHandle, Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_startup_log, app_updater, exit_events, logging, main_window,
    menu_spec::{self, PlatformCapabilities},
    mod_bundle, origin_policy, runtime_paths, second_instance, settings_persist,
    settings_schema::{DesktopSettings, DiscordBranch, KEY_DISCORD_BRANCH, STATE_FIRST_LAUNCH},
    settings_store::SettingsStore,
    splash, tray_menu_handler, tray_setup, ui_dispatch, ShellState, BRANCH_OVERRIDE_ENV,
    DESKTOP_LOG_DIR, DESKTOP_LOG_FILE, MAIN_WINDOW_LABEL,
};

// An override naming an unknown branch falls back to the configured one.
fn resolve_branch(override_value: Option<&str>, configured: DiscordBranch) -> DiscordBranch {
    override_value
        .and_then(DiscordBranch::parse)
        .unwrap_or(configured)
}

fn spawn_main_window_startup(app_handle: &AppHandle) {
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return;
    };
    let data_dir = shell.data_dir.clone();
    let bundle_url = shell.desktop_settings().mod_bundle_url;
    let app_handle = app_handle.clone();

    tauri::async_runtime::spawn(async move {
        match mod_bundle::ensure_bundle(&data_dir, &bundle_url).await {
            Ok(true) => append_startup_log("mod bundle downloaded"),
            Ok(false) => {}
            // The client still loads without the bundle.
            Err(error) => append_startup_log(&format!("mod bundle unavailable: {error}")),
        }

        let dispatched =
            ui_dispatch::run_on_main_thread_dispatch(&app_handle, "create main window", |app| {
                if let Err(error) = main_window::create_main_window(app) {
                    append_startup_log(&error);
                    splash::close_splash_window(app);
                    if let Some(shell) = app.try_state::<ShellState>() {
                        shell.mark_quitting();
                    }
                    app.exit(1);
                }
            });
        if let Err(error) = dispatched {
            append_startup_log(&error);
        }
    });
}

fn setup_shell(app_handle: &AppHandle) -> Result<(), String> {
    let data_dir = runtime_paths::resolve_data_dir(app_handle)?;
    logging::init(&data_dir.join(DESKTOP_LOG_DIR), DESKTOP_LOG_FILE);
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(Some(data_dir.clone()), DESKTOP_LOG_FILE).display()
    ));

    let settings = Arc::new(SettingsStore::load(
        "settings",
        runtime_paths::settings_path(&data_dir),
    ));
    let state = Arc::new(SettingsStore::load(
        "state",
        runtime_paths::state_path(&data_dir),
    ));
    settings_persist::install_debounced_flush(&settings);
    settings_persist::install_debounced_flush(&state);

    let branch_override = env::var(BRANCH_OVERRIDE_ENV).ok();
    let configured_branch = settings
        .get::<DiscordBranch>(KEY_DISCORD_BRANCH)
        .unwrap_or_default();
    let branch = resolve_branch(branch_override.as_deref(), configured_branch);
    let app_url = origin_policy::discord_app_url(branch)?;
    let start_minimized = second_instance::has_start_minimized_flag(env::args());
    append_startup_log(&format!(
        "discord branch: {branch:?} url: {app_url} start_minimized={start_minimized}"
    ));

    if state.get::<bool>(STATE_FIRST_LAUNCH).unwrap_or(true) {
        append_startup_log("first launch");
        state.set_value(STATE_FIRST_LAUNCH, false.into());
    }

    let tray_enabled = DesktopSettings::from_store(&settings).tray;
    app_handle.manage(ShellState::new(
        settings,
        state,
        data_dir,
        app_url,
        start_minimized,
    ));

    if let Err(error) = splash::create_splash_window(app_handle) {
        append_startup_log(&error);
    }

    let capabilities = PlatformCapabilities::current();
    if capabilities.dock_style {
        let menu = menu_spec::render_menu(app_handle, menu_spec::APP_MENU, &capabilities)?;
        app_handle
            .set_menu(menu)
            .map_err(|error| format!("Failed to set application menu: {error}"))?;
    }

    if tray_enabled {
        if let Err(error) = tray_setup::setup_tray(app_handle) {
            append_startup_log(&format!("failed to initialize tray: {error}"));
        }
    }

    spawn_main_window_startup(app_handle);
    app_updater::spawn_startup_update_check(app_handle);
    Ok(())
}

pub(crate) fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, argv, _cwd| {
            second_instance::handle_second_instance(app, argv);
        }))
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_process::init())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
            crate::desktop_bridge_commands::desktop_bridge_ready,
            crate::desktop_bridge_commands::desktop_bridge_get_settings,
            crate::desktop_bridge_commands::desktop_bridge_set_setting,
            crate::desktop_bridge_commands::desktop_bridge_voice_event,
            crate::desktop_bridge_commands::desktop_bridge_set_badge,
            crate::desktop_bridge_commands::desktop_bridge_set_title,
            crate::desktop_bridge_commands::desktop_bridge_register_keybind,
            crate::desktop_bridge_commands::desktop_bridge_unregister_keybind,
            crate::desktop_bridge_commands::desktop_bridge_get_accent_color,
            crate::desktop_bridge_commands::desktop_bridge_get_spellcheck_languages,
            crate::desktop_bridge_commands::desktop_bridge_open_external_url,
            crate::desktop_bridge_commands::desktop_bridge_check_desktop_app_update,
            crate::desktop_bridge_commands::desktop_bridge_install_desktop_app_update,
        ])
        .on_menu_event(|app_handle, event| {
            tray_menu_handler::handle_menu_event(app_handle, event.id().as_ref());
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            match event {
                WindowEvent::CloseRequested { api, .. } => {
                    if main_window::handle_close_requested(window) {
                        api.prevent_close();
                    }
                }
                WindowEvent::Moved(_) | WindowEvent::Resized(_) => {
                    main_window::record_geometry(window);
                }
                WindowEvent::Destroyed => {
                    main_window::handle_destroyed(window.app_handle());
                }
                _ => {}
            }
        })
        .on_page_load(|webview, payload| {
            if webview.label() != MAIN_WINDOW_LABEL {
                return;
            }
            let Some(shell) = webview.app_handle().try_state::<ShellState>() else {
                return;
            };
            match payload.event() {
                PageLoadEvent::Started => {
                    append_desktop_log(&format!("page-load started: {}", payload.url()));
                }
                PageLoadEvent::Finished => {
                    append_desktop_log(&format!("page-load finished: {}", payload.url()));
                    if origin_policy::should_inject_desktop_bridge(&shell.app_url, payload.url()) {
                        crate::inject_desktop_bridge(webview);
                        main_window::handle_main_window_ready(webview.app_handle());
                    }
                }
            }
        })
        .setup(|app| {
            setup_shell(app.handle())?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, .. } => {
                exit_events::handle_exit_requested(app_handle, code);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                crate::window_actions::show_main_window(app_handle);
            }
            _ => {}
        });
}
