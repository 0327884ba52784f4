use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder, Window};

use crate::{
    append_desktop_log, append_startup_log, desktop_bridge, desktop_bridge_commands,
    menu_spec::{self, PlatformCapabilities},
    mutex_ext::MutexExt,
    origin_policy::{self, NavigationDecision},
    runtime_paths, settings_effects, splash,
    window_bounds::{self, WindowBoundsRecord},
    window_lifecycle::{decide_close_request, CloseDecision, WindowLifecycle},
    window_actions, RevealPlan, ShellState, MAIN_WINDOW_LABEL, MIN_WINDOW_HEIGHT,
    MIN_WINDOW_WIDTH, PRODUCT_NAME,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RevealSteps {
    pub(crate) show: bool,
    pub(crate) maximize: bool,
    pub(crate) minimize: bool,
}

// Start-minimized parks the window in the tray; without a tray it starts
// minimized on the taskbar instead.
pub(crate) fn decide_reveal(plan: RevealPlan, tray_enabled: bool) -> RevealSteps {
    if plan.start_minimized && tray_enabled {
        return RevealSteps {
            show: false,
            maximize: false,
            minimize: false,
        };
    }
    RevealSteps {
        show: true,
        maximize: plan.maximized,
        minimize: plan.minimized || plan.start_minimized,
    }
}

fn navigation_handler(url: &url::Url) -> bool {
    match origin_policy::decide_navigation(url) {
        NavigationDecision::Allow => true,
        NavigationDecision::OpenExternally => {
            if let Err(error) = desktop_bridge_commands::open_url_with_system_browser(url.as_str())
            {
                append_desktop_log(&format!("failed to open external url: {error}"));
            }
            false
        }
        NavigationDecision::Block => {
            append_desktop_log(&format!("blocked navigation to {url}"));
            false
        }
    }
}

pub(crate) fn create_main_window(app_handle: &AppHandle) -> Result<WebviewWindow, String> {
    let shell = app_handle
        .try_state::<ShellState>()
        .ok_or_else(|| "Shell state is not initialized".to_string())?;
    if let Some(existing) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        return Ok(existing);
    }

    // Bindings of a previous window instance must not outlive it.
    shell.unbind_all();
    shell.transition_main_window(WindowLifecycle::Constructing);

    let settings = shell.desktop_settings();
    let capabilities = PlatformCapabilities::current();
    let record = WindowBoundsRecord::read(&shell.state);
    let displays: Vec<_> = app_handle
        .available_monitors()
        .map(|monitors| {
            monitors
                .iter()
                .map(window_bounds::display_info_from_monitor)
                .collect()
        })
        .unwrap_or_default();
    let placement = window_bounds::initial_placement(&record, &displays);

    let mod_bundle = desktop_bridge::read_mod_bundle(&runtime_paths::mod_bundle_path(
        &shell.data_dir,
    ))
    .unwrap_or_else(|error| {
        append_startup_log(&error);
        None
    });
    if mod_bundle.is_none() {
        append_startup_log("mod bundle not available, loading unmodified client");
    }
    let initialization_script =
        desktop_bridge::build_initialization_script(mod_bundle.as_deref());

    let mut builder = WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::External(shell.app_url.clone()),
    )
    .title(PRODUCT_NAME)
    .inner_size(placement.width, placement.height)
    .visible(false)
    .transparent(true)
    .initialization_script(&initialization_script)
    .on_navigation(navigation_handler);

    builder = match placement.position {
        Some((x, y)) => builder.position(x, y),
        None => builder.center(),
    };
    if !settings.disable_min_size {
        builder = builder.min_inner_size(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
    }
    if capabilities.window_menu_bar {
        builder = builder.menu(menu_spec::render_menu(
            app_handle,
            menu_spec::APP_MENU,
            &capabilities,
        )?);
    }

    let window = match builder.build() {
        Ok(window) => window,
        Err(error) => {
            shell.transition_main_window(WindowLifecycle::Destroyed);
            return Err(format!("Failed to create main window: {error}"));
        }
    };
    shell.transition_main_window(WindowLifecycle::Hidden);

    if let Err(error) = settings_effects::apply_menu_visibility(&window, settings.enable_menu) {
        append_startup_log(&error);
    }
    if let Err(error) =
        settings_effects::apply_transparency(&window, settings.transparency_option)
    {
        append_startup_log(&error);
    }
    if let Err(error) =
        settings_effects::apply_spellcheck(&window, &settings.spellcheck_languages)
    {
        append_startup_log(&error);
    }

    shell.arm_reveal(RevealPlan {
        maximized: record.maximized,
        minimized: record.minimized,
        start_minimized: shell.start_minimized || settings.start_minimized,
    });
    let bindings = settings_effects::bind_main_window_effects(app_handle, &shell.settings);
    append_startup_log(&format!("bound {} settings effects", bindings.len()));
    *shell.bindings.lock_or_recover() = bindings;

    append_startup_log(&format!("main window created for {}", shell.app_url));
    Ok(window)
}

// Only the first call per window instance has an effect.
pub(crate) fn handle_main_window_ready(app_handle: &AppHandle) {
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return;
    };
    let Some(plan) = shell.take_reveal() else {
        return;
    };
    splash::close_splash_window(app_handle);

    let Some(window) = window_actions::main_window(app_handle) else {
        return;
    };
    let tray_enabled = shell.desktop_settings().tray;
    let steps = decide_reveal(plan, tray_enabled);
    append_startup_log(&format!("main window ready, reveal: {steps:?}"));

    if !steps.show {
        shell.transition_main_window(WindowLifecycle::MinimizedToTray);
        return;
    }
    window_actions::show_main_window(app_handle);
    if steps.maximize {
        if let Err(error) = window.maximize() {
            append_desktop_log(&format!("failed to maximize main window: {error}"));
        }
    }
    if steps.minimize {
        if let Err(error) = window.minimize() {
            append_desktop_log(&format!("failed to minimize main window: {error}"));
        }
    }
}

// Returns `true` when the close must be prevented.
pub(crate) fn handle_close_requested(window: &Window) -> bool {
    let app_handle = window.app_handle();
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return false;
    };
    let decision = decide_close_request(
        shell.is_quitting(),
        PlatformCapabilities::current().dock_style,
        shell.desktop_settings().uses_tray_on_close(),
    );

    match decision {
        CloseDecision::AllowClose => {
            shell.transition_main_window(WindowLifecycle::Closing);
            false
        }
        CloseDecision::HideWindow => {
            window_actions::hide_main_window(app_handle);
            true
        }
        CloseDecision::HideApplication => {
            window_actions::hide_application(app_handle);
            true
        }
    }
}

pub(crate) fn handle_destroyed(app_handle: &AppHandle) {
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return;
    };
    shell.unbind_all();
    if !shell.transition_main_window(WindowLifecycle::Destroyed) {
        // Destroyed without a close request, e.g. during reset.
        shell.transition_main_window(WindowLifecycle::Closing);
        shell.transition_main_window(WindowLifecycle::Destroyed);
    }
}

// Geometry events of a hidden window are not user intent.
pub(crate) fn record_geometry(window: &Window) {
    let Some(shell) = window.app_handle().try_state::<ShellState>() else {
        return;
    };
    if !window.is_visible().unwrap_or(false) {
        return;
    }
    window_bounds::record_window_geometry(window, &shell.state);
}

pub(crate) fn apply_renderer_title(app_handle: &AppHandle, title: &str) -> Result<(), String> {
    let Some(shell) = app_handle.try_state::<ShellState>() else {
        return Ok(());
    };
    if shell.desktop_settings().static_title {
        return Ok(());
    }
    let Some(window) = window_actions::main_window(app_handle) else {
        return Ok(());
    };
    let title = title.trim();
    window
        .set_title(if title.is_empty() { PRODUCT_NAME } else { title })
        .map_err(|error| format!("Failed to set window title: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(maximized: bool, minimized: bool, start_minimized: bool) -> RevealPlan {
        RevealPlan {
            maximized,
            minimized,
            start_minimized,
        }
    }

    #[test]
    fn normal_start_shows_window() {
        assert_eq!(
            decide_reveal(plan(false, false, false), true),
            RevealSteps {
                show: true,
                maximize: false,
                minimize: false
            }
        );
    }

    #[test]
    fn persisted_flags_are_restored() {
        let steps = decide_reveal(plan(true, true, false), false);
        assert!(steps.show && steps.maximize && steps.minimize);
    }

    #[test]
    fn start_minimized_with_tray_stays_hidden() {
        let steps = decide_reveal(plan(true, false, true), true);
        assert!(!steps.show && !steps.maximize && !steps.minimize);
    }

    #[test]
    fn start_minimized_without_tray_minimizes() {
        let steps = decide_reveal(plan(false, false, true), false);
        assert!(steps.show && steps.minimize);
    }
}
