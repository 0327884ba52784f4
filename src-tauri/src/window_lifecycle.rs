use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum WindowLifecycle {
    #[default]
    Uninitialized,
    Constructing,
    Hidden,
    Visible,
    MinimizedToTray,
    Closing,
    Destroyed,
}

impl fmt::Display for WindowLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Constructing => "constructing",
            Self::Hidden => "hidden",
            Self::Visible => "visible",
            Self::MinimizedToTray => "minimized-to-tray",
            Self::Closing => "closing",
            Self::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

impl WindowLifecycle {
    pub(crate) fn can_transition_to(self, next: Self) -> bool {
        use WindowLifecycle::*;

        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Uninitialized, Constructing)
                | (Constructing, Hidden)
                | (Constructing, Destroyed)
                | (Hidden, Visible)
                | (Hidden, MinimizedToTray)
                | (Hidden, Closing)
                | (Visible, Hidden)
                | (Visible, MinimizedToTray)
                | (Visible, Closing)
                | (MinimizedToTray, Visible)
                | (MinimizedToTray, Closing)
                | (Closing, Destroyed)
                // A destructive reset rebuilds the window.
                | (Destroyed, Constructing)
        )
    }

    pub(crate) fn is_alive(self) -> bool {
        matches!(self, Self::Hidden | Self::Visible | Self::MinimizedToTray)
    }
}

#[derive(Debug, Default)]
pub(crate) struct WindowLifecycleTracker {
    current: WindowLifecycle,
}

impl WindowLifecycleTracker {
    pub(crate) fn current(&self) -> WindowLifecycle {
        self.current
    }

    pub(crate) fn transition(&mut self, next: WindowLifecycle) -> Result<WindowLifecycle, String> {
        if !self.current.can_transition_to(next) {
            return Err(format!(
                "invalid main window transition {} -> {}",
                self.current, next
            ));
        }
        let previous = self.current;
        self.current = next;
        Ok(previous)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseDecision {
    AllowClose,
    HideWindow,
    HideApplication,
}

pub(crate) fn decide_close_request(
    really_quitting: bool,
    dock_style: bool,
    uses_tray_on_close: bool,
) -> CloseDecision {
    if really_quitting {
        CloseDecision::AllowClose
    } else if dock_style {
        CloseDecision::HideApplication
    } else if uses_tray_on_close {
        CloseDecision::HideWindow
    } else {
        CloseDecision::AllowClose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_lifecycle_is_accepted() {
        let mut tracker = WindowLifecycleTracker::default();
        for next in [
            WindowLifecycle::Constructing,
            WindowLifecycle::Hidden,
            WindowLifecycle::Visible,
            WindowLifecycle::MinimizedToTray,
            WindowLifecycle::Visible,
            WindowLifecycle::Closing,
            WindowLifecycle::Destroyed,
            WindowLifecycle::Constructing,
        ] {
            tracker.transition(next).expect("valid transition");
        }
        assert_eq!(tracker.current(), WindowLifecycle::Constructing);
    }

    #[test]
    fn invalid_transition_is_rejected_and_state_kept() {
        let mut tracker = WindowLifecycleTracker::default();
        let error = tracker
            .transition(WindowLifecycle::Visible)
            .expect_err("cannot show before construction");
        assert!(error.contains("uninitialized -> visible"));
        assert_eq!(tracker.current(), WindowLifecycle::Uninitialized);
    }

    #[test]
    fn repeating_current_state_is_a_noop() {
        let mut tracker = WindowLifecycleTracker::default();
        tracker.transition(WindowLifecycle::Constructing).expect("ok");
        tracker.transition(WindowLifecycle::Hidden).expect("ok");
        assert_eq!(
            tracker.transition(WindowLifecycle::Hidden),
            Ok(WindowLifecycle::Hidden)
        );
    }

    #[test]
    fn destroyed_window_cannot_be_shown() {
        assert!(!WindowLifecycle::Destroyed.can_transition_to(WindowLifecycle::Visible));
        assert!(!WindowLifecycle::Closing.can_transition_to(WindowLifecycle::Visible));
        assert!(!WindowLifecycle::Destroyed.is_alive());
        assert!(WindowLifecycle::MinimizedToTray.is_alive());
    }

    #[test]
    fn close_is_allowed_once_really_quitting() {
        assert_eq!(decide_close_request(true, true, true), CloseDecision::AllowClose);
        assert_eq!(decide_close_request(true, false, true), CloseDecision::AllowClose);
    }

    #[test]
    fn close_hides_to_tray_when_enabled() {
        assert_eq!(decide_close_request(false, false, true), CloseDecision::HideWindow);
        assert_eq!(decide_close_request(false, false, false), CloseDecision::AllowClose);
    }

    #[test]
    fn dock_style_platform_hides_application() {
        assert_eq!(
            decide_close_request(false, true, false),
            CloseDecision::HideApplication
        );
    }
}
