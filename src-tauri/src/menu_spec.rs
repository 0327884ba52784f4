use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle, Wry,
};

use crate::{tray_actions, PRODUCT_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Capability {
    DockStyle,
    WindowMenuBar,
    DevTools,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlatformCapabilities {
    pub(crate) dock_style: bool,
    pub(crate) window_menu_bar: bool,
    pub(crate) dev_tools: bool,
}

impl PlatformCapabilities {
    pub(crate) fn current() -> Self {
        Self {
            dock_style: cfg!(target_os = "macos"),
            window_menu_bar: !cfg!(target_os = "macos"),
            dev_tools: cfg!(debug_assertions),
        }
    }

    pub(crate) fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::DockStyle => self.dock_style,
            Capability::WindowMenuBar => self.window_menu_bar,
            Capability::DevTools => self.dev_tools,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PredefinedKind {
    About,
    Hide,
    HideOthers,
    ShowAll,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    Minimize,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuEntryKind {
    Item {
        id: &'static str,
        label: &'static str,
        accelerator: Option<&'static str>,
    },
    Predefined(PredefinedKind),
    Separator,
    Submenu {
        id: &'static str,
        label: &'static str,
        entries: &'static [MenuEntry],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MenuEntry {
    pub(crate) kind: MenuEntryKind,
    pub(crate) requires: Option<Capability>,
    pub(crate) excludes: Option<Capability>,
}

impl MenuEntry {
    const fn always(kind: MenuEntryKind) -> Self {
        Self {
            kind,
            requires: None,
            excludes: None,
        }
    }

    const fn requiring(capability: Capability, kind: MenuEntryKind) -> Self {
        Self {
            kind,
            requires: Some(capability),
            excludes: None,
        }
    }

    const fn excluding(capability: Capability, kind: MenuEntryKind) -> Self {
        Self {
            kind,
            requires: None,
            excludes: Some(capability),
        }
    }

    pub(crate) fn is_visible(&self, capabilities: &PlatformCapabilities) -> bool {
        let required = self
            .requires
            .is_none_or(|capability| capabilities.has(capability));
        let excluded = self
            .excludes
            .is_some_and(|capability| capabilities.has(capability));
        required && !excluded
    }
}

const fn item(id: &'static str, label: &'static str) -> MenuEntryKind {
    MenuEntryKind::Item {
        id,
        label,
        accelerator: None,
    }
}

pub(crate) const APP_MENU_RELOAD: &str = "app_reload";
pub(crate) const APP_MENU_TOGGLE_DEVTOOLS: &str = "app_toggle_devtools";
pub(crate) const APP_MENU_SETTINGS: &str = "app_open_settings";

pub(crate) const TRAY_MENU: &[MenuEntry] = &[
    MenuEntry::always(item(tray_actions::TRAY_MENU_OPEN, "Open")),
    MenuEntry::always(MenuEntryKind::Separator),
    MenuEntry::always(item(tray_actions::TRAY_MENU_ABOUT, "About")),
    MenuEntry::always(item(tray_actions::TRAY_MENU_REPAIR, "Repair Mod Bundle")),
    MenuEntry::always(item(tray_actions::TRAY_MENU_RESET, "Reset Cordshell")),
    MenuEntry::always(item(tray_actions::TRAY_MENU_RESTART, "Restart")),
    MenuEntry::always(MenuEntryKind::Separator),
    MenuEntry::always(item(tray_actions::TRAY_MENU_QUIT, "Quit")),
];

const APP_SUBMENU: &[MenuEntry] = &[
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::About)),
    MenuEntry::always(MenuEntryKind::Separator),
    MenuEntry::always(MenuEntryKind::Item {
        id: APP_MENU_SETTINGS,
        label: "Settings",
        accelerator: Some("CmdOrCtrl+,"),
    }),
    MenuEntry::always(MenuEntryKind::Separator),
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::Hide)),
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::HideOthers)),
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::ShowAll)),
    MenuEntry::always(MenuEntryKind::Separator),
    MenuEntry::always(item(tray_actions::TRAY_MENU_QUIT, "Quit Cordshell")),
];

const EDIT_SUBMENU: &[MenuEntry] = &[
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::Undo)),
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::Redo)),
    MenuEntry::always(MenuEntryKind::Separator),
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::Cut)),
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::Copy)),
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::Paste)),
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::SelectAll)),
];

const VIEW_SUBMENU: &[MenuEntry] = &[
    MenuEntry::always(MenuEntryKind::Item {
        id: APP_MENU_RELOAD,
        label: "Reload",
        accelerator: Some("CmdOrCtrl+R"),
    }),
    MenuEntry::requiring(
        Capability::DevTools,
        MenuEntryKind::Item {
            id: APP_MENU_TOGGLE_DEVTOOLS,
            label: "Toggle Developer Tools",
            accelerator: Some("CmdOrCtrl+Shift+I"),
        },
    ),
    MenuEntry::requiring(
        Capability::DockStyle,
        MenuEntryKind::Predefined(PredefinedKind::Fullscreen),
    ),
];

const WINDOW_SUBMENU: &[MenuEntry] = &[
    MenuEntry::always(MenuEntryKind::Predefined(PredefinedKind::Minimize)),
    MenuEntry::excluding(Capability::DockStyle, MenuEntryKind::Separator),
    MenuEntry::excluding(
        Capability::DockStyle,
        item(tray_actions::TRAY_MENU_QUIT, "Quit"),
    ),
];

pub(crate) const APP_MENU: &[MenuEntry] = &[
    MenuEntry::requiring(
        Capability::DockStyle,
        MenuEntryKind::Submenu {
            id: "app_menu_app",
            label: PRODUCT_NAME,
            entries: APP_SUBMENU,
        },
    ),
    MenuEntry::always(MenuEntryKind::Submenu {
        id: "app_menu_edit",
        label: "Edit",
        entries: EDIT_SUBMENU,
    }),
    MenuEntry::always(MenuEntryKind::Submenu {
        id: "app_menu_view",
        label: "View",
        entries: VIEW_SUBMENU,
    }),
    MenuEntry::always(MenuEntryKind::Submenu {
        id: "app_menu_window",
        label: "Window",
        entries: WINDOW_SUBMENU,
    }),
];

pub(crate) fn visible_entries<'a>(
    entries: &'a [MenuEntry],
    capabilities: &PlatformCapabilities,
) -> Vec<&'a MenuEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_visible(capabilities))
        .collect()
}

fn build_predefined(
    app_handle: &AppHandle,
    kind: PredefinedKind,
) -> tauri::Result<PredefinedMenuItem<Wry>> {
    match kind {
        PredefinedKind::About => PredefinedMenuItem::about(app_handle, None, None),
        PredefinedKind::Hide => PredefinedMenuItem::hide(app_handle, None),
        PredefinedKind::HideOthers => PredefinedMenuItem::hide_others(app_handle, None),
        PredefinedKind::ShowAll => PredefinedMenuItem::show_all(app_handle, None),
        PredefinedKind::Undo => PredefinedMenuItem::undo(app_handle, None),
        PredefinedKind::Redo => PredefinedMenuItem::redo(app_handle, None),
        PredefinedKind::Cut => PredefinedMenuItem::cut(app_handle, None),
        PredefinedKind::Copy => PredefinedMenuItem::copy(app_handle, None),
        PredefinedKind::Paste => PredefinedMenuItem::paste(app_handle, None),
        PredefinedKind::SelectAll => PredefinedMenuItem::select_all(app_handle, None),
        PredefinedKind::Minimize => PredefinedMenuItem::minimize(app_handle, None),
        PredefinedKind::Fullscreen => PredefinedMenuItem::fullscreen(app_handle, None),
    }
}

fn build_submenu(
    app_handle: &AppHandle,
    id: &str,
    label: &str,
    entries: &[MenuEntry],
    capabilities: &PlatformCapabilities,
) -> Result<Submenu<Wry>, String> {
    let submenu = Submenu::with_id(app_handle, id, label, true)
        .map_err(|error| format!("Failed to create submenu {id}: {error}"))?;
    for entry in visible_entries(entries, capabilities) {
        append_entry(app_handle, entry, capabilities, |item| submenu.append(item))?;
    }
    Ok(submenu)
}

fn append_entry<F>(
    app_handle: &AppHandle,
    entry: &MenuEntry,
    capabilities: &PlatformCapabilities,
    append: F,
) -> Result<(), String>
where
    F: Fn(&dyn tauri::menu::IsMenuItem<Wry>) -> tauri::Result<()>,
{
    match entry.kind {
        MenuEntryKind::Item {
            id,
            label,
            accelerator,
        } => {
            let menu_item = MenuItem::with_id(app_handle, id, label, true, accelerator)
                .map_err(|error| format!("Failed to create menu item {id}: {error}"))?;
            append(&menu_item).map_err(|error| format!("Failed to append menu item {id}: {error}"))
        }
        MenuEntryKind::Predefined(kind) => {
            let menu_item = build_predefined(app_handle, kind)
                .map_err(|error| format!("Failed to create {kind:?} menu item: {error}"))?;
            append(&menu_item)
                .map_err(|error| format!("Failed to append {kind:?} menu item: {error}"))
        }
        MenuEntryKind::Separator => {
            let separator = PredefinedMenuItem::separator(app_handle)
                .map_err(|error| format!("Failed to create menu separator: {error}"))?;
            append(&separator).map_err(|error| format!("Failed to append menu separator: {error}"))
        }
        MenuEntryKind::Submenu { id, label, entries } => {
            let submenu = build_submenu(app_handle, id, label, entries, capabilities)?;
            append(&submenu).map_err(|error| format!("Failed to append submenu {id}: {error}"))
        }
    }
}

pub(crate) fn render_menu(
    app_handle: &AppHandle,
    entries: &[MenuEntry],
    capabilities: &PlatformCapabilities,
) -> Result<Menu<Wry>, String> {
    let menu = Menu::new(app_handle).map_err(|error| format!("Failed to create menu: {error}"))?;
    for entry in visible_entries(entries, capabilities) {
        append_entry(app_handle, entry, capabilities, |item| menu.append(item))?;
    }
    Ok(menu)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAC: PlatformCapabilities = PlatformCapabilities {
        dock_style: true,
        window_menu_bar: false,
        dev_tools: false,
    };
    const LINUX_DEBUG: PlatformCapabilities = PlatformCapabilities {
        dock_style: false,
        window_menu_bar: true,
        dev_tools: true,
    };

    fn ids(entries: &[&MenuEntry]) -> Vec<&'static str> {
        entries
            .iter()
            .filter_map(|entry| match entry.kind {
                MenuEntryKind::Item { id, .. } | MenuEntryKind::Submenu { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    fn submenu_entries(id: &str) -> &'static [MenuEntry] {
        APP_MENU
            .iter()
            .find_map(|entry| match entry.kind {
                MenuEntryKind::Submenu {
                    id: entry_id,
                    entries,
                    ..
                } if entry_id == id => Some(entries),
                _ => None,
            })
            .expect("submenu exists")
    }

    #[test]
    fn tray_menu_lists_every_action_on_all_platforms() {
        let expected = vec![
            tray_actions::TRAY_MENU_OPEN,
            tray_actions::TRAY_MENU_ABOUT,
            tray_actions::TRAY_MENU_REPAIR,
            tray_actions::TRAY_MENU_RESET,
            tray_actions::TRAY_MENU_RESTART,
            tray_actions::TRAY_MENU_QUIT,
        ];
        assert_eq!(ids(&visible_entries(TRAY_MENU, &MAC)), expected);
        assert_eq!(ids(&visible_entries(TRAY_MENU, &LINUX_DEBUG)), expected);
    }

    #[test]
    fn app_submenu_only_exists_on_dock_style_platforms() {
        assert_eq!(
            ids(&visible_entries(APP_MENU, &MAC)),
            vec!["app_menu_app", "app_menu_edit", "app_menu_view", "app_menu_window"]
        );
        assert_eq!(
            ids(&visible_entries(APP_MENU, &LINUX_DEBUG)),
            vec!["app_menu_edit", "app_menu_view", "app_menu_window"]
        );
    }

    #[test]
    fn devtools_item_requires_devtools_capability() {
        let view = submenu_entries("app_menu_view");
        assert_eq!(ids(&visible_entries(view, &MAC)), vec![APP_MENU_RELOAD]);
        assert_eq!(
            ids(&visible_entries(view, &LINUX_DEBUG)),
            vec![APP_MENU_RELOAD, APP_MENU_TOGGLE_DEVTOOLS]
        );
    }

    #[test]
    fn window_submenu_quit_is_excluded_on_dock_style() {
        let window = submenu_entries("app_menu_window");
        assert!(ids(&visible_entries(window, &MAC)).is_empty());
        assert_eq!(
            ids(&visible_entries(window, &LINUX_DEBUG)),
            vec![tray_actions::TRAY_MENU_QUIT]
        );
    }
}
