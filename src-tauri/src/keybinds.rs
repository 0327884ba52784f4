use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::mutex_ext::MutexExt;

pub(crate) type KeybindCallback = Arc<dyn Fn(bool) + Send + Sync>;

// Triggered from a second process launched with `--keybind <id> <keydown|keyup>`.
#[derive(Default)]
pub(crate) struct KeybindRegistry {
    entries: Mutex<HashMap<u32, KeybindCallback>>,
}

impl std::fmt::Debug for KeybindRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<u32> = self.entries.lock_or_recover().keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("KeybindRegistry").field("ids", &ids).finish()
    }
}

impl KeybindRegistry {
    pub(crate) fn register(&self, id: u32, callback: KeybindCallback) {
        self.entries.lock_or_recover().insert(id, callback);
    }

    pub(crate) fn unregister(&self, id: u32) -> bool {
        self.entries.lock_or_recover().remove(&id).is_some()
    }

    pub(crate) fn clear(&self) {
        self.entries.lock_or_recover().clear();
    }

    pub(crate) fn dispatch(&self, id: u32, pressed: bool) -> bool {
        let callback = self.entries.lock_or_recover().get(&id).cloned();
        match callback {
            Some(callback) => {
                callback(pressed);
                true
            }
            None => false,
        }
    }
}

pub(crate) fn build_keybind_script(id: u32, pressed: bool) -> String {
    format!("window.__CORDSHELL__ && window.__CORDSHELL__.keybinds.trigger({id}, {pressed});")
}
