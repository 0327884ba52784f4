use serde::{Deserialize, Serialize};

use crate::{settings_store::SettingsStore, DEFAULT_MOD_BUNDLE_URL};

pub(crate) const KEY_DISCORD_BRANCH: &str = "discordBranch";
pub(crate) const KEY_TRAY: &str = "tray";
pub(crate) const KEY_MINIMIZE_TO_TRAY: &str = "minimizeToTray";
pub(crate) const KEY_CLICK_TRAY_TO_SHOW_HIDE: &str = "clickTrayToShowHide";
pub(crate) const KEY_DISABLE_MIN_SIZE: &str = "disableMinSize";
pub(crate) const KEY_TRANSPARENCY_OPTION: &str = "transparencyOption";
pub(crate) const KEY_ENABLE_MENU: &str = "enableMenu";
pub(crate) const KEY_STATIC_TITLE: &str = "staticTitle";
pub(crate) const KEY_SPELLCHECK_LANGUAGES: &str = "spellCheckLanguages";
pub(crate) const KEY_CHECK_UPDATES: &str = "checkUpdates";
pub(crate) const KEY_START_MINIMIZED: &str = "startMinimized";
pub(crate) const KEY_MOD_BUNDLE_URL: &str = "modBundleUrl";

pub(crate) const STATE_WINDOW_BOUNDS: &str = "windowBounds";
pub(crate) const STATE_MAXIMIZED: &str = "maximized";
pub(crate) const STATE_MINIMIZED: &str = "minimized";
pub(crate) const STATE_SKIPPED_UPDATE: &str = "skippedUpdate";
pub(crate) const STATE_FIRST_LAUNCH: &str = "firstLaunch";

// `modBundleUrl` names code injected into the page, so it is only editable on disk.
pub(crate) const BRIDGE_WRITABLE_KEYS: &[&str] = &[
    KEY_DISCORD_BRANCH,
    KEY_TRAY,
    KEY_MINIMIZE_TO_TRAY,
    KEY_CLICK_TRAY_TO_SHOW_HIDE,
    KEY_DISABLE_MIN_SIZE,
    KEY_TRANSPARENCY_OPTION,
    KEY_ENABLE_MENU,
    KEY_STATIC_TITLE,
    KEY_SPELLCHECK_LANGUAGES,
    KEY_CHECK_UPDATES,
    KEY_START_MINIMIZED,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DiscordBranch {
    #[default]
    Stable,
    Canary,
    Ptb,
}

impl DiscordBranch {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stable" => Some(Self::Stable),
            "canary" => Some(Self::Canary),
            "ptb" => Some(Self::Ptb),
            _ => None,
        }
    }

    pub(crate) fn host_prefix(self) -> &'static str {
        match self {
            Self::Stable => "",
            Self::Canary => "canary.",
            Self::Ptb => "ptb.",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TransparencyOption {
    #[default]
    None,
    Mica,
    Tabbed,
    Acrylic,
    Vibrancy,
}

impl TransparencyOption {
    pub(crate) fn is_transparent(self) -> bool {
        self != Self::None
    }
}

// Defaults are applied key by key, so one mistyped entry never resets the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DesktopSettings {
    pub(crate) discord_branch: DiscordBranch,
    pub(crate) tray: bool,
    pub(crate) minimize_to_tray: bool,
    pub(crate) click_tray_to_show_hide: bool,
    pub(crate) disable_min_size: bool,
    pub(crate) transparency_option: TransparencyOption,
    pub(crate) enable_menu: bool,
    pub(crate) static_title: bool,
    pub(crate) spellcheck_languages: Vec<String>,
    pub(crate) check_updates: bool,
    pub(crate) start_minimized: bool,
    pub(crate) mod_bundle_url: String,
}

impl Default for DesktopSettings {
    fn default() -> Self {
        Self {
            discord_branch: DiscordBranch::Stable,
            tray: true,
            minimize_to_tray: true,
            click_tray_to_show_hide: false,
            disable_min_size: false,
            transparency_option: TransparencyOption::None,
            enable_menu: false,
            static_title: false,
            spellcheck_languages: Vec::new(),
            check_updates: true,
            start_minimized: false,
            mod_bundle_url: DEFAULT_MOD_BUNDLE_URL.to_string(),
        }
    }
}

impl DesktopSettings {
    pub(crate) fn from_store(store: &SettingsStore) -> Self {
        let defaults = Self::default();
        Self {
            discord_branch: store.get_or(KEY_DISCORD_BRANCH, defaults.discord_branch),
            tray: store.get_or(KEY_TRAY, defaults.tray),
            minimize_to_tray: store.get_or(KEY_MINIMIZE_TO_TRAY, defaults.minimize_to_tray),
            click_tray_to_show_hide: store
                .get_or(KEY_CLICK_TRAY_TO_SHOW_HIDE, defaults.click_tray_to_show_hide),
            disable_min_size: store.get_or(KEY_DISABLE_MIN_SIZE, defaults.disable_min_size),
            transparency_option: store
                .get_or(KEY_TRANSPARENCY_OPTION, defaults.transparency_option),
            enable_menu: store.get_or(KEY_ENABLE_MENU, defaults.enable_menu),
            static_title: store.get_or(KEY_STATIC_TITLE, defaults.static_title),
            spellcheck_languages: store
                .get_or(KEY_SPELLCHECK_LANGUAGES, defaults.spellcheck_languages),
            check_updates: store.get_or(KEY_CHECK_UPDATES, defaults.check_updates),
            start_minimized: store.get_or(KEY_START_MINIMIZED, defaults.start_minimized),
            mod_bundle_url: store
                .get::<String>(KEY_MOD_BUNDLE_URL)
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.mod_bundle_url),
        }
    }

    pub(crate) fn uses_tray_on_close(&self) -> bool {
        self.tray && self.minimize_to_tray
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_store_uses_defaults_for_empty_store() {
        let store = SettingsStore::in_memory("settings");
        assert_eq!(DesktopSettings::from_store(&store), DesktopSettings::default());
    }

    #[test]
    fn from_store_keeps_valid_keys_when_one_is_mistyped() {
        let store = SettingsStore::in_memory("settings");
        store.set_value(KEY_DISCORD_BRANCH, json!("ptb"));
        store.set_value(KEY_TRAY, json!("yes"));
        store.set_value(KEY_TRANSPARENCY_OPTION, json!("mica"));

        let settings = DesktopSettings::from_store(&store);
        assert_eq!(settings.discord_branch, DiscordBranch::Ptb);
        assert!(settings.tray);
        assert_eq!(settings.transparency_option, TransparencyOption::Mica);
    }

    #[test]
    fn blank_mod_bundle_url_falls_back_to_default() {
        let store = SettingsStore::in_memory("settings");
        store.set_value(KEY_MOD_BUNDLE_URL, json!("   "));
        assert_eq!(
            DesktopSettings::from_store(&store).mod_bundle_url,
            DEFAULT_MOD_BUNDLE_URL
        );
    }

    #[test]
    fn tray_on_close_requires_both_flags() {
        let mut settings = DesktopSettings::default();
        assert!(settings.uses_tray_on_close());
        settings.tray = false;
        assert!(!settings.uses_tray_on_close());
        settings.tray = true;
        settings.minimize_to_tray = false;
        assert!(!settings.uses_tray_on_close());
    }

    #[test]
    fn branch_parse_is_case_insensitive() {
        assert_eq!(DiscordBranch::parse(" Canary "), Some(DiscordBranch::Canary));
        assert_eq!(DiscordBranch::parse("nightly"), None);
        assert_eq!(DiscordBranch::Ptb.host_prefix(), "ptb.");
    }
}
