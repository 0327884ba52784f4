fn channel_to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

pub(crate) fn rgb_to_hex(red: u8, green: u8, blue: u8) -> String {
    format!("#{red:02x}{green:02x}{blue:02x}")
}

// Channels outside 0..1 mean the portal has no accent configured.
pub(crate) fn portal_channels_to_hex(channels: &[f64]) -> Option<String> {
    let [red, green, blue] = channels else {
        return None;
    };
    if [red, green, blue]
        .iter()
        .any(|channel| !(0.0..=1.0).contains(*channel))
    {
        return None;
    }
    Some(rgb_to_hex(
        channel_to_byte(*red),
        channel_to_byte(*green),
        channel_to_byte(*blue),
    ))
}

// DWM stores `AccentColor` as ABGR.
pub(crate) fn abgr_to_hex(value: u32) -> String {
    let red = (value & 0xff) as u8;
    let green = ((value >> 8) & 0xff) as u8;
    let blue = ((value >> 16) & 0xff) as u8;
    rgb_to_hex(red, green, blue)
}

pub(crate) fn macos_accent_from_index(index: Option<i32>) -> Option<&'static str> {
    match index {
        Some(-1) => Some("#8e8e93"),
        Some(0) => Some("#ff3b30"),
        Some(1) => Some("#ff9500"),
        Some(2) => Some("#ffcc00"),
        Some(3) => Some("#28cd41"),
        // A missing key means the default blue.
        None | Some(4) => Some("#007aff"),
        Some(5) => Some("#af52de"),
        Some(6) => Some("#ff2d55"),
        Some(_) => None,
    }
}

#[cfg(target_os = "linux")]
fn collect_portal_channels(arg: &dyn dbus::arg::RefArg, channels: &mut Vec<f64>) {
    if let Some(channel) = arg.as_f64() {
        channels.push(channel);
        return;
    }
    // The reply nests the `(ddd)` struct inside one or two variants.
    if let Some(items) = arg.as_iter() {
        for item in items {
            collect_portal_channels(item, channels);
        }
    }
}

#[cfg(target_os = "linux")]
fn query_accent_color() -> Option<String> {
    use std::time::Duration;

    use dbus::{
        arg::{RefArg, Variant},
        blocking::Connection,
    };

    let connection = Connection::new_session()
        .map_err(|error| tracing::debug!("failed to open session bus: {error}"))
        .ok()?;
    let proxy = connection.with_proxy(
        "org.freedesktop.portal.Desktop",
        "/org/freedesktop/portal/desktop",
        Duration::from_millis(500),
    );
    let (reply,): (Variant<Box<dyn RefArg>>,) = proxy
        .method_call(
            "org.freedesktop.portal.Settings",
            "Read",
            ("org.freedesktop.appearance", "accent-color"),
        )
        .map_err(|error| tracing::debug!("portal accent-color read failed: {error}"))
        .ok()?;

    let mut channels = Vec::with_capacity(3);
    collect_portal_channels(&reply, &mut channels);
    portal_channels_to_hex(&channels)
}

#[cfg(target_os = "windows")]
fn query_accent_color() -> Option<String> {
    use winreg::{enums::HKEY_CURRENT_USER, RegKey};

    let value: u32 = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey(r"Software\Microsoft\Windows\DWM")
        .and_then(|dwm| dwm.get_value("AccentColor"))
        .map_err(|error| tracing::debug!("failed to read DWM AccentColor: {error}"))
        .ok()?;
    Some(abgr_to_hex(value))
}

#[cfg(target_os = "macos")]
fn query_accent_color() -> Option<String> {
    use std::process::{Command, Stdio};

    let index = Command::new("defaults")
        .args(["read", "-g", "AppleAccentColor"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|error| tracing::debug!("failed to run 'defaults': {error}"))
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .and_then(|raw| raw.trim().parse::<i32>().ok());
    macos_accent_from_index(index).map(str::to_string)
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
fn query_accent_color() -> Option<String> {
    None
}

pub(crate) fn system_accent_color() -> String {
    query_accent_color().unwrap_or_default()
}
