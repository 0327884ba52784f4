use tauri::{AppHandle, Manager};

use crate::{append_desktop_log, window_actions, ShellState, START_MINIMIZED_FLAG};

const KEYBIND_FLAG: &str = "--keybind";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SecondInstanceRequest {
    Keybind { id: u32, pressed: bool },
    Focus,
    Invalid(String),
}

// `argv[0]` is the executable.
pub(crate) fn parse_second_instance_args(argv: &[String]) -> SecondInstanceRequest {
    let Some(flag_index) = argv.iter().skip(1).position(|arg| arg == KEYBIND_FLAG) else {
        return SecondInstanceRequest::Focus;
    };
    let rest = &argv[flag_index + 2..];

    let (Some(raw_id), Some(raw_action)) = (rest.first(), rest.get(1)) else {
        return SecondInstanceRequest::Invalid(format!(
            "{KEYBIND_FLAG} expects <id> <keydown|keyup>"
        ));
    };
    let Ok(id) = raw_id.trim().parse::<u32>() else {
        return SecondInstanceRequest::Invalid(format!("invalid keybind id '{raw_id}'"));
    };
    let pressed = match raw_action.trim() {
        "keydown" => true,
        "keyup" => false,
        other => {
            return SecondInstanceRequest::Invalid(format!("invalid keybind action '{other}'"))
        }
    };

    SecondInstanceRequest::Keybind { id, pressed }
}

pub(crate) fn has_start_minimized_flag<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .any(|arg| arg.as_ref() == START_MINIMIZED_FLAG)
}

pub(crate) fn handle_second_instance(app_handle: &AppHandle, argv: Vec<String>) {
    match parse_second_instance_args(&argv) {
        SecondInstanceRequest::Keybind { id, pressed } => {
            let Some(state) = app_handle.try_state::<ShellState>() else {
                return;
            };
            if !state.keybinds.dispatch(id, pressed) {
                append_desktop_log(&format!("second instance keybind {id} is not registered"));
            }
        }
        SecondInstanceRequest::Focus => {
            append_desktop_log("second instance launched, focusing main window");
            window_actions::show_main_window(app_handle);
        }
        SecondInstanceRequest::Invalid(reason) => {
            tracing::warn!("ignoring second instance arguments: {reason}");
        }
    }
}
