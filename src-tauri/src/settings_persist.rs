use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{settings_store::SettingsStore, ShellState, SETTINGS_FLUSH_DEBOUNCE};

#[derive(Debug, Default)]
pub(crate) struct FlushGate {
    pending: AtomicBool,
}

impl FlushGate {
    // Returns `true` when the caller should schedule a flush.
    pub(crate) fn try_schedule(&self) -> bool {
        !self.pending.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn release(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

pub(crate) fn flush_store(store: &SettingsStore) {
    if let Err(error) = store.flush() {
        tracing::warn!(
            store = store.name(),
            path = ?store.path(),
            "failed to persist store: {error}"
        );
    }
}

pub(crate) fn install_debounced_flush(store: &Arc<SettingsStore>) {
    let gate = Arc::new(FlushGate::default());
    let weak_store = Arc::downgrade(store);
    store.set_flush_hook(Arc::new(move || {
        if !gate.try_schedule() {
            return;
        }
        let gate = gate.clone();
        let weak_store = weak_store.clone();
        tauri::async_runtime::spawn(async move {
            tokio::time::sleep(SETTINGS_FLUSH_DEBOUNCE).await;
            // Released before flushing so writes racing the flush schedule another.
            gate.release();
            if let Some(store) = weak_store.upgrade() {
                flush_store(&store);
            }
        });
    }));
}

pub(crate) fn flush_now(shell: &ShellState) {
    flush_store(&shell.settings);
    flush_store(&shell.state);
}
