use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tauri::{
    utils::config::WindowEffectsConfig,
    window::{Color, Effect, EffectsBuilder},
    AppHandle, LogicalSize, WebviewWindow,
};

use crate::{
    append_desktop_log,
    menu_spec::PlatformCapabilities,
    settings_binder::{bind, Subscription, SubscriptionSet},
    settings_schema::{
        TransparencyOption, KEY_DISABLE_MIN_SIZE, KEY_ENABLE_MENU, KEY_SPELLCHECK_LANGUAGES,
        KEY_STATIC_TITLE, KEY_TRANSPARENCY_OPTION, KEY_TRAY,
    },
    settings_store::SettingsStore,
    spellcheck, tray_setup, ui_dispatch, window_actions, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
    OPAQUE_BACKGROUND_RGB, PRODUCT_NAME,
};

fn value_or<T: DeserializeOwned>(value: &Value, default: T) -> T {
    serde_json::from_value(value.clone()).unwrap_or(default)
}

pub(crate) fn effect_for(option: TransparencyOption) -> Option<Effect> {
    match option {
        TransparencyOption::None => None,
        TransparencyOption::Mica => Some(Effect::Mica),
        TransparencyOption::Tabbed => Some(Effect::Tabbed),
        TransparencyOption::Acrylic => Some(Effect::Acrylic),
        TransparencyOption::Vibrancy => Some(Effect::UnderWindowBackground),
    }
}

pub(crate) fn background_for(option: TransparencyOption) -> Color {
    if option.is_transparent() {
        Color(0, 0, 0, 0)
    } else {
        let (red, green, blue) = OPAQUE_BACKGROUND_RGB;
        Color(red, green, blue, 255)
    }
}

pub(crate) fn apply_transparency(
    window: &WebviewWindow,
    option: TransparencyOption,
) -> Result<(), String> {
    let effects: Option<WindowEffectsConfig> =
        effect_for(option).map(|effect| EffectsBuilder::new().effect(effect).build());
    window
        .set_effects(effects)
        .map_err(|error| format!("Failed to apply window effects: {error}"))?;
    window
        .set_background_color(Some(background_for(option)))
        .map_err(|error| format!("Failed to set window background: {error}"))
}

pub(crate) fn grow_to_min_size(width: f64, height: f64) -> Option<(f64, f64)> {
    if width >= MIN_WINDOW_WIDTH && height >= MIN_WINDOW_HEIGHT {
        return None;
    }
    Some((width.max(MIN_WINDOW_WIDTH), height.max(MIN_WINDOW_HEIGHT)))
}

pub(crate) fn apply_min_size(window: &WebviewWindow, disabled: bool) -> Result<(), String> {
    if disabled {
        return window
            .set_min_size(None::<LogicalSize<f64>>)
            .map_err(|error| format!("Failed to clear minimum size: {error}"));
    }

    window
        .set_min_size(Some(LogicalSize::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)))
        .map_err(|error| format!("Failed to set minimum size: {error}"))?;
    let scale = window
        .scale_factor()
        .map_err(|error| format!("Failed to read scale factor: {error}"))?;
    let size = window
        .inner_size()
        .map_err(|error| format!("Failed to read window size: {error}"))?
        .to_logical::<f64>(scale);
    if let Some((width, height)) = grow_to_min_size(size.width, size.height) {
        window
            .set_size(LogicalSize::new(width, height))
            .map_err(|error| format!("Failed to grow window to minimum size: {error}"))?;
    }
    Ok(())
}

pub(crate) fn apply_menu_visibility(window: &WebviewWindow, enabled: bool) -> Result<(), String> {
    if !PlatformCapabilities::current().window_menu_bar {
        return Ok(());
    }
    let result = if enabled {
        window.show_menu()
    } else {
        window.hide_menu()
    };
    result.map_err(|error| format!("Failed to toggle window menu: {error}"))
}

#[cfg(target_os = "linux")]
fn apply_engine_spellcheck(window: &WebviewWindow, languages: &[String]) -> Result<(), String> {
    use webkit2gtk::{WebContextExt, WebViewExt};

    let languages = languages.to_vec();
    window
        .with_webview(move |webview| {
            let Some(context) = webview.inner().context() else {
                return;
            };
            let tags: Vec<&str> = languages.iter().map(String::as_str).collect();
            context.set_spell_checking_enabled(!tags.is_empty());
            context.set_spell_checking_languages(&tags);
        })
        .map_err(|error| format!("Failed to reach webview for spellcheck: {error}"))
}

#[cfg(not(target_os = "linux"))]
fn apply_engine_spellcheck(_window: &WebviewWindow, _languages: &[String]) -> Result<(), String> {
    Ok(())
}

pub(crate) fn apply_spellcheck(window: &WebviewWindow, requested: &[String]) -> Result<(), String> {
    let languages = spellcheck::effective_spellcheck_languages(requested);
    let delivery =
        spellcheck::plan_spellcheck_delivery(&languages, spellcheck::ENGINE_ACCEPTS_LANGUAGE_LIST);
    if !delivery.unsupported.is_empty() {
        tracing::warn!(
            applied = ?delivery.engine,
            ignored = ?delivery.unsupported,
            "webview spellchecker only uses the first language"
        );
    }
    apply_engine_spellcheck(window, delivery.engine)?;

    let script = spellcheck::build_apply_script(&languages)?;
    window
        .eval(&script)
        .map_err(|error| format!("Failed to apply spellcheck languages: {error}"))
}

fn apply_tray_enabled(app_handle: &AppHandle, enabled: bool) {
    if enabled {
        if let Err(error) = tray_setup::setup_tray(app_handle) {
            append_desktop_log(&format!("failed to create tray: {error}"));
        }
        return;
    }

    tray_setup::destroy_tray(app_handle);
    // Without a tray a parked window would be unreachable.
    let hidden = window_actions::main_window(app_handle)
        .and_then(|window| window.is_visible().ok())
        .is_some_and(|visible| !visible);
    if hidden {
        window_actions::show_main_window(app_handle);
    }
}

fn log_failure(result: Result<(), String>) {
    if let Err(error) = result {
        append_desktop_log(&error);
    }
}

fn bind_on_main_thread<F>(
    app_handle: &AppHandle,
    store: &Arc<SettingsStore>,
    key: &'static str,
    effect: F,
) -> Subscription
where
    F: Fn(&AppHandle, &Value) + Send + Sync + 'static,
{
    let app_handle = app_handle.clone();
    let effect = Arc::new(effect);
    bind(store, key, move |value| {
        let value = value.clone();
        let effect = effect.clone();
        if let Err(error) =
            ui_dispatch::run_on_main_thread_dispatch(&app_handle, key, move |main_app| {
                effect(main_app, &value)
            })
        {
            append_desktop_log(&error);
        }
    })
}

fn with_main_window<F>(app_handle: &AppHandle, apply: F)
where
    F: FnOnce(&WebviewWindow) -> Result<(), String>,
{
    if let Some(window) = window_actions::main_window(app_handle) {
        log_failure(apply(&window));
    }
}

pub(crate) fn bind_main_window_effects(
    app_handle: &AppHandle,
    settings: &Arc<SettingsStore>,
) -> SubscriptionSet {
    let mut subscriptions = SubscriptionSet::default();
    subscriptions.extend([
        bind_on_main_thread(app_handle, settings, KEY_TRAY, |app, value| {
            apply_tray_enabled(app, value_or(value, true));
        }),
        bind_on_main_thread(app_handle, settings, KEY_DISABLE_MIN_SIZE, |app, value| {
            with_main_window(app, |window| apply_min_size(window, value_or(value, false)));
        }),
        bind_on_main_thread(app_handle, settings, KEY_TRANSPARENCY_OPTION, |app, value| {
            with_main_window(app, |window| {
                apply_transparency(window, value_or(value, TransparencyOption::None))
            });
        }),
        bind_on_main_thread(app_handle, settings, KEY_ENABLE_MENU, |app, value| {
            with_main_window(app, |window| {
                apply_menu_visibility(window, value_or(value, false))
            });
        }),
        bind_on_main_thread(app_handle, settings, KEY_SPELLCHECK_LANGUAGES, |app, value| {
            let requested: Vec<String> = value_or(value, Vec::new());
            with_main_window(app, |window| apply_spellcheck(window, &requested));
        }),
        bind_on_main_thread(app_handle, settings, KEY_STATIC_TITLE, |app, value| {
            if value_or(value, false) {
                with_main_window(app, |window| {
                    window
                        .set_title(PRODUCT_NAME)
                        .map_err(|error| format!("Failed to reset window title: {error}"))
                });
            }
        }),
    ]);
    subscriptions
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn value_or_falls_back_on_wrong_shape() {
        assert!(!value_or(&json!(false), true));
        assert!(value_or(&json!("yes"), true));
        assert_eq!(
            value_or(&json!("mica"), TransparencyOption::None),
            TransparencyOption::Mica
        );
        assert_eq!(
            value_or(&json!("glass"), TransparencyOption::None),
            TransparencyOption::None
        );
    }

    #[test]
    fn only_undersized_windows_grow() {
        assert_eq!(grow_to_min_size(1280.0, 720.0), None);
        assert_eq!(grow_to_min_size(940.0, 500.0), None);
        assert_eq!(grow_to_min_size(800.0, 720.0), Some((940.0, 720.0)));
        assert_eq!(grow_to_min_size(300.0, 200.0), Some((940.0, 500.0)));
    }

    #[test]
    fn transparency_maps_to_effect_and_background() {
        assert!(effect_for(TransparencyOption::None).is_none());
        assert!(matches!(
            effect_for(TransparencyOption::Mica),
            Some(Effect::Mica)
        ));
        assert!(matches!(
            effect_for(TransparencyOption::Vibrancy),
            Some(Effect::UnderWindowBackground)
        ));

        let opaque = background_for(TransparencyOption::None);
        assert_eq!((opaque.0, opaque.1, opaque.2, opaque.3), (0x31, 0x33, 0x38, 255));
        assert_eq!(background_for(TransparencyOption::Acrylic).3, 0);
    }
}
