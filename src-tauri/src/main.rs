#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod accent_color;
mod app_constants;
mod app_helpers;
mod app_runtime;
mod app_types;
mod app_updater;
mod desktop_bridge;
mod desktop_bridge_commands;
mod exit_events;
mod exit_state;
mod keybinds;
mod logging;
mod main_window;
mod menu_spec;
mod mod_bundle;
mod mutex_ext;
mod origin_policy;
mod repair_flow;
mod reset_flow;
mod runtime_paths;
mod second_instance;
mod settings_binder;
mod settings_effects;
mod settings_persist;
mod settings_schema;
mod settings_store;
mod spellcheck;
mod splash;
mod tray_actions;
mod tray_icon_state;
mod tray_menu_handler;
mod tray_setup;
mod ui_dispatch;
mod window_actions;
mod window_bounds;
mod window_lifecycle;

pub(crate) use app_constants::*;
pub(crate) use app_helpers::{
    append_desktop_log, append_restart_log, append_shutdown_log, append_startup_log,
    inject_desktop_bridge,
};
pub(crate) use app_types::{
    AtomicFlagGuard, BridgeResult, DesktopAppUpdateCheckResult, RevealPlan, ShellState,
};

fn main() {
    app_runtime::run();
}
