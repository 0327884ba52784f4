use serde::Deserialize;

use crate::DEFAULT_VOICE_CONTEXT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TrayIconState {
    Icon,
    Idle,
    Muted,
    Deafened,
    Speaking,
}

impl TrayIconState {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Icon => "icon",
            Self::Idle => "idle",
            Self::Muted => "muted",
            Self::Deafened => "deafened",
            Self::Speaking => "speaking",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct VoiceStatus {
    pub(crate) in_call: bool,
    pub(crate) self_mute: bool,
    pub(crate) self_deaf: bool,
    pub(crate) speaking: bool,
}

// First match wins: no call, deafened, muted, speaking, idle.
pub(crate) fn resolve_tray_icon_state(status: &VoiceStatus) -> TrayIconState {
    if !status.in_call {
        TrayIconState::Icon
    } else if status.self_deaf {
        TrayIconState::Deafened
    } else if status.self_mute {
        TrayIconState::Muted
    } else if status.speaking {
        TrayIconState::Speaking
    } else {
        TrayIconState::Idle
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub(crate) enum VoiceEvent {
    CallConnected,
    CallDisconnected,
    #[serde(rename_all = "camelCase")]
    MuteToggled { muted: bool },
    #[serde(rename_all = "camelCase")]
    DeafenToggled { deafened: bool },
    #[serde(rename_all = "camelCase")]
    Speaking {
        user_id: String,
        #[serde(default)]
        context: Option<String>,
        speaking: bool,
    },
    #[serde(rename_all = "camelCase")]
    CurrentUser { user_id: String },
}

#[derive(Debug, Default)]
pub(crate) struct VoiceTracker {
    current_user_id: Option<String>,
    status: VoiceStatus,
}

impl VoiceTracker {
    #[cfg(test)]
    pub(crate) fn status(&self) -> &VoiceStatus {
        &self.status
    }

    pub(crate) fn set_current_user(&mut self, user_id: impl Into<String>) {
        self.current_user_id = Some(user_id.into());
    }

    pub(crate) fn apply(&mut self, event: &VoiceEvent) -> TrayIconState {
        match event {
            VoiceEvent::CallConnected => self.status.in_call = true,
            VoiceEvent::CallDisconnected => {
                self.status = VoiceStatus::default();
            }
            VoiceEvent::MuteToggled { muted } => self.status.self_mute = *muted,
            VoiceEvent::DeafenToggled { deafened } => self.status.self_deaf = *deafened,
            VoiceEvent::Speaking {
                user_id,
                context,
                speaking,
            } => {
                let is_self = self.current_user_id.as_deref() == Some(user_id.as_str());
                let is_default_context =
                    context.as_deref().unwrap_or(DEFAULT_VOICE_CONTEXT) == DEFAULT_VOICE_CONTEXT;
                if is_self && is_default_context {
                    self.status.speaking = *speaking;
                }
            }
            VoiceEvent::CurrentUser { user_id } => self.set_current_user(user_id.clone()),
        }
        resolve_tray_icon_state(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrayIconAppearance {
    pub(crate) state: TrayIconState,
    // Unread badge, only drawn over the plain icon.
    pub(crate) badge: bool,
}

impl TrayIconAppearance {
    pub(crate) fn asset_name(self) -> &'static str {
        match (self.state, self.badge) {
            (TrayIconState::Icon, true) => "icon-unread",
            (state, _) => state.as_str(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct TrayIconController {
    applied: Option<TrayIconAppearance>,
    state: Option<TrayIconState>,
    badge: bool,
}

impl TrayIconController {
    pub(crate) fn appearance(&self) -> TrayIconAppearance {
        TrayIconAppearance {
            state: self.state.unwrap_or(TrayIconState::Icon),
            badge: self.badge,
        }
    }

    pub(crate) fn set_icon(&mut self, state: TrayIconState) -> Option<TrayIconAppearance> {
        self.state = Some(state);
        self.take_pending()
    }

    pub(crate) fn set_badge(&mut self, badge: bool) -> Option<TrayIconAppearance> {
        self.badge = badge;
        self.take_pending()
    }

    pub(crate) fn invalidate(&mut self) {
        self.applied = None;
    }

    fn take_pending(&mut self) -> Option<TrayIconAppearance> {
        let next = self.appearance();
        if self.applied == Some(next) {
            return None;
        }
        self.applied = Some(next);
        Some(next)
    }
}
