use serde::{Deserialize, Serialize};
use tauri::{Monitor, Window};

use crate::{
    settings_schema::{STATE_MAXIMIZED, STATE_MINIMIZED, STATE_WINDOW_BOUNDS},
    settings_store::SettingsStore,
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WindowBounds {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
    #[serde(default)]
    pub(crate) display_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct WindowBoundsRecord {
    pub(crate) bounds: Option<WindowBounds>,
    pub(crate) maximized: bool,
    pub(crate) minimized: bool,
}

impl WindowBoundsRecord {
    pub(crate) fn read(state: &SettingsStore) -> Self {
        Self {
            bounds: state.get(STATE_WINDOW_BOUNDS),
            maximized: state.get_or(STATE_MAXIMIZED, false),
            minimized: state.get_or(STATE_MINIMIZED, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DisplayInfo {
    pub(crate) id: String,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl DisplayInfo {
    fn contains_point(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    fn overlap_area(&self, x: f64, y: f64, width: f64, height: f64) -> f64 {
        let overlap_w = (self.x + self.width).min(x + width) - self.x.max(x);
        let overlap_h = (self.y + self.height).min(y + height) - self.y.max(y);
        if overlap_w <= 0.0 || overlap_h <= 0.0 {
            return 0.0;
        }
        overlap_w * overlap_h
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowPlacement {
    pub(crate) width: f64,
    pub(crate) height: f64,
    // `None` means "let the window manager center it".
    pub(crate) position: Option<(f64, f64)>,
}

impl Default for WindowPlacement {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            position: None,
        }
    }
}

// Picks the display holding the window centre, falling back to the display
// with the largest overlap.
pub(crate) fn resolve_display_id(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    displays: &[DisplayInfo],
) -> Option<String> {
    let (center_x, center_y) = (x + width / 2.0, y + height / 2.0);
    if let Some(display) = displays
        .iter()
        .find(|display| display.contains_point(center_x, center_y))
    {
        return Some(display.id.clone());
    }

    displays
        .iter()
        .map(|display| (display, display.overlap_area(x, y, width, height)))
        .filter(|(_, area)| *area > 0.0)
        .max_by(|(_, left), (_, right)| left.total_cmp(right))
        .map(|(display, _)| display.id.clone())
}

// Stored coordinates are trusted only while their display is still attached
// and the window would be visible on it.
pub(crate) fn initial_placement(
    record: &WindowBoundsRecord,
    displays: &[DisplayInfo],
) -> WindowPlacement {
    let Some(bounds) = record.bounds.as_ref() else {
        return WindowPlacement::default();
    };
    if !(bounds.width > 0.0 && bounds.height > 0.0) {
        return WindowPlacement::default();
    }

    let Some(display) = bounds
        .display_id
        .as_deref()
        .and_then(|id| displays.iter().find(|display| display.id == id))
    else {
        return WindowPlacement::default();
    };

    let visible = display.overlap_area(bounds.x, bounds.y, bounds.width, bounds.height) > 0.0;
    WindowPlacement {
        width: bounds.width,
        height: bounds.height,
        position: visible.then_some((bounds.x, bounds.y)),
    }
}

pub(crate) fn display_info_from_monitor(monitor: &Monitor) -> DisplayInfo {
    let scale = monitor.scale_factor();
    let position = monitor.position().to_logical::<f64>(scale);
    let size = monitor.size().to_logical::<f64>(scale);
    let id = monitor.name().cloned().unwrap_or_else(|| {
        format!(
            "{}x{}@{},{}",
            size.width, size.height, position.x, position.y
        )
    });

    DisplayInfo {
        id,
        x: position.x,
        y: position.y,
        width: size.width,
        height: size.height,
    }
}

pub(crate) fn attached_displays(window: &Window) -> Vec<DisplayInfo> {
    match window.available_monitors() {
        Ok(monitors) => monitors.iter().map(display_info_from_monitor).collect(),
        Err(error) => {
            tracing::warn!("failed to enumerate monitors: {error}");
            Vec::new()
        }
    }
}

pub(crate) fn record_window_geometry(window: &Window, state: &SettingsStore) {
    let maximized = window.is_maximized().unwrap_or(false);
    let minimized = window.is_minimized().unwrap_or(false);
    state.set_value(STATE_MAXIMIZED, maximized.into());
    state.set_value(STATE_MINIMIZED, minimized.into());

    // A maximized or minimized geometry is not what the user wants restored.
    if maximized || minimized {
        return;
    }

    let scale = match window.scale_factor() {
        Ok(scale) => scale,
        Err(error) => {
            tracing::warn!("failed to read window scale factor: {error}");
            return;
        }
    };
    let (position, size) = match (window.outer_position(), window.inner_size()) {
        (Ok(position), Ok(size)) => (
            position.to_logical::<f64>(scale),
            size.to_logical::<f64>(scale),
        ),
        (Err(error), _) | (_, Err(error)) => {
            tracing::warn!("failed to read window geometry: {error}");
            return;
        }
    };

    let displays = attached_displays(window);
    let bounds = WindowBounds {
        x: position.x,
        y: position.y,
        width: size.width,
        height: size.height,
        display_id: resolve_display_id(position.x, position.y, size.width, size.height, &displays),
    };
    if let Err(error) = state.set(STATE_WINDOW_BOUNDS, &bounds) {
        tracing::warn!("failed to store window bounds: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(id: &str, x: f64, y: f64, width: f64, height: f64) -> DisplayInfo {
        DisplayInfo {
            id: id.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    fn two_displays() -> Vec<DisplayInfo> {
        vec![
            display("primary", 0.0, 0.0, 1920.0, 1080.0),
            display("side", 1920.0, 0.0, 1280.0, 1024.0),
        ]
    }

    fn record_on(display_id: Option<&str>, x: f64, y: f64) -> WindowBoundsRecord {
        WindowBoundsRecord {
            bounds: Some(WindowBounds {
                x,
                y,
                width: 1000.0,
                height: 700.0,
                display_id: display_id.map(str::to_string),
            }),
            maximized: false,
            minimized: false,
        }
    }

    #[test]
    fn resolve_display_id_uses_window_center() {
        let displays = two_displays();
        assert_eq!(
            resolve_display_id(1700.0, 100.0, 800.0, 600.0, &displays).as_deref(),
            Some("side")
        );
        assert_eq!(
            resolve_display_id(100.0, 100.0, 800.0, 600.0, &displays).as_deref(),
            Some("primary")
        );
    }

    #[test]
    fn resolve_display_id_falls_back_to_largest_overlap() {
        let displays = two_displays();
        // Centre lands below the shorter side display, most of the window is on primary.
        assert_eq!(
            resolve_display_id(1500.0, 900.0, 900.0, 400.0, &displays).as_deref(),
            Some("primary")
        );
        assert_eq!(resolve_display_id(-5000.0, -5000.0, 100.0, 100.0, &displays), None);
    }

    #[test]
    fn initial_placement_restores_bounds_on_attached_display() {
        let placement = initial_placement(&record_on(Some("side"), 2000.0, 50.0), &two_displays());
        assert_eq!(
            placement,
            WindowPlacement {
                width: 1000.0,
                height: 700.0,
                position: Some((2000.0, 50.0)),
            }
        );
    }

    #[test]
    fn initial_placement_with_unknown_display_uses_defaults_without_position() {
        let placement =
            initial_placement(&record_on(Some("unplugged"), 2000.0, 50.0), &two_displays());
        assert_eq!(placement, WindowPlacement::default());
        assert_eq!(placement.width, DEFAULT_WINDOW_WIDTH);
        assert_eq!(placement.height, DEFAULT_WINDOW_HEIGHT);
        assert!(placement.position.is_none());
    }

    #[test]
    fn initial_placement_without_display_id_uses_defaults() {
        let placement = initial_placement(&record_on(None, 10.0, 10.0), &two_displays());
        assert_eq!(placement, WindowPlacement::default());
    }

    #[test]
    fn initial_placement_without_record_uses_defaults() {
        assert_eq!(
            initial_placement(&WindowBoundsRecord::default(), &two_displays()),
            WindowPlacement::default()
        );
    }

    #[test]
    fn initial_placement_drops_position_when_window_is_off_display() {
        let placement =
            initial_placement(&record_on(Some("primary"), 5000.0, 5000.0), &two_displays());
        assert_eq!(placement.width, 1000.0);
        assert_eq!(placement.position, None);
    }

    #[test]
    fn record_read_round_trips_through_store() {
        let state = SettingsStore::in_memory("state");
        let bounds = WindowBounds {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
            display_id: Some("primary".to_string()),
        };
        state.set(STATE_WINDOW_BOUNDS, &bounds).expect("set");
        state.set_value(STATE_MAXIMIZED, true.into());

        let record = WindowBoundsRecord::read(&state);
        assert_eq!(record.bounds, Some(bounds));
        assert!(record.maximized);
        assert!(!record.minimized);
    }
}
