pub const TRAY_MENU_OPEN: &str = "tray_open";
pub const TRAY_MENU_ABOUT: &str = "tray_about";
pub const TRAY_MENU_REPAIR: &str = "tray_repair";
pub const TRAY_MENU_RESET: &str = "tray_reset";
pub const TRAY_MENU_RESTART: &str = "tray_restart";
pub const TRAY_MENU_QUIT: &str = "tray_quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    Open,
    About,
    Repair,
    Reset,
    Restart,
    Quit,
}

pub fn action_from_menu_id(menu_id: &str) -> Option<TrayMenuAction> {
    match menu_id {
        TRAY_MENU_OPEN => Some(TrayMenuAction::Open),
        TRAY_MENU_ABOUT => Some(TrayMenuAction::About),
        TRAY_MENU_REPAIR => Some(TrayMenuAction::Repair),
        TRAY_MENU_RESET => Some(TrayMenuAction::Reset),
        TRAY_MENU_RESTART => Some(TrayMenuAction::Restart),
        TRAY_MENU_QUIT => Some(TrayMenuAction::Quit),
        _ => None,
    }
}
