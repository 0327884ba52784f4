use std::time::Duration;

pub(crate) const PRODUCT_NAME: &str = "Cordshell";
pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const SPLASH_WINDOW_LABEL: &str = "splash";
pub(crate) const TRAY_ID: &str = "cordshell-tray";

pub(crate) const DATA_DIR_ENV: &str = "CORDSHELL_DATA_DIR";
pub(crate) const BRANCH_OVERRIDE_ENV: &str = "CORDSHELL_DISCORD_BRANCH";
pub(crate) const START_MINIMIZED_FLAG: &str = "--start-minimized";

pub(crate) const SETTINGS_FILE: &str = "settings.json";
pub(crate) const STATE_FILE: &str = "state.json";
pub(crate) const DESKTOP_LOG_DIR: &str = "logs";
pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const MOD_BUNDLE_DIR: &str = "mod";
pub(crate) const MOD_BUNDLE_FILE: &str = "renderer.js";

pub(crate) const DEFAULT_WINDOW_WIDTH: f64 = 1280.0;
pub(crate) const DEFAULT_WINDOW_HEIGHT: f64 = 720.0;
pub(crate) const MIN_WINDOW_WIDTH: f64 = 940.0;
pub(crate) const MIN_WINDOW_HEIGHT: f64 = 500.0;
pub(crate) const SPLASH_WINDOW_WIDTH: f64 = 300.0;
pub(crate) const SPLASH_WINDOW_HEIGHT: f64 = 350.0;

pub(crate) const OPAQUE_BACKGROUND_RGB: (u8, u8, u8) = (0x31, 0x33, 0x38);

pub(crate) const SETTINGS_FLUSH_DEBOUNCE: Duration = Duration::from_millis(500);
pub(crate) const MOD_BUNDLE_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);
pub(crate) const MAX_SPELLCHECK_LANGUAGES: usize = 5;
pub(crate) const DEFAULT_VOICE_CONTEXT: &str = "default";
pub(crate) const DEFAULT_MOD_BUNDLE_URL: &str =
    "https://github.com/Vendicated/Vencord/releases/download/devbuild/browser.js";
