use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::mutex_ext::MutexExt;

pub(crate) type ChangeListener = Arc<dyn Fn(&Value) + Send + Sync>;
pub(crate) type FlushHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ListenerId(u64);

#[derive(Debug, thiserror::Error)]
pub(crate) enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} does not contain a JSON object")]
    NotAnObject { path: PathBuf },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub(crate) struct SettingsStore {
    name: &'static str,
    path: Option<PathBuf>,
    values: Mutex<Map<String, Value>>,
    listeners: Mutex<HashMap<String, Vec<(ListenerId, ChangeListener)>>>,
    next_listener_id: AtomicU64,
    dirty: AtomicBool,
    detached: AtomicBool,
    flush_hook: Mutex<Option<FlushHook>>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("dirty", &self.dirty.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl SettingsStore {
    pub(crate) fn load(name: &'static str, path: PathBuf) -> Self {
        let values = match read_document(&path) {
            Ok(Some(values)) => values,
            Ok(None) => Map::new(),
            Err(error) => {
                tracing::warn!(store = name, "{error}; falling back to defaults");
                Map::new()
            }
        };

        Self::with_values(name, Some(path), values)
    }

    #[cfg(test)]
    pub(crate) fn in_memory(name: &'static str) -> Self {
        Self::with_values(name, None, Map::new())
    }

    fn with_values(name: &'static str, path: Option<PathBuf>, values: Map<String, Value>) -> Self {
        Self {
            name,
            path,
            values: Mutex::new(values),
            listeners: Mutex::new(HashMap::new()),
            next_listener_id: AtomicU64::new(1),
            dirty: AtomicBool::new(false),
            detached: AtomicBool::new(false),
            flush_hook: Mutex::new(None),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn get_value(&self, key: &str) -> Option<Value> {
        self.values.lock_or_recover().get(key).cloned()
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key)?;
        serde_json::from_value(value).ok()
    }

    pub(crate) fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub(crate) fn snapshot(&self) -> Map<String, Value> {
        self.values.lock_or_recover().clone()
    }

    pub(crate) fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<bool, SettingsError> {
        let value = serde_json::to_value(value)?;
        Ok(self.set_value(key, value))
    }

    // Returns `false` without notifying when the stored value is already equal.
    pub(crate) fn set_value(&self, key: &str, value: Value) -> bool {
        {
            let mut values = self.values.lock_or_recover();
            if values.get(key) == Some(&value) {
                return false;
            }
            values.insert(key.to_string(), value.clone());
        }

        // Listeners run without any store lock held so they may read or write the store.
        let listeners: Vec<ChangeListener> = self
            .listeners
            .lock_or_recover()
            .get(key)
            .map(|entries| entries.iter().map(|(_, listener)| listener.clone()).collect())
            .unwrap_or_default();
        for listener in listeners {
            listener(&value);
        }

        self.mark_dirty();
        true
    }

    pub(crate) fn add_change_listener(&self, key: &str, listener: ChangeListener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock_or_recover()
            .entry(key.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    pub(crate) fn remove_change_listener(&self, key: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock_or_recover();
        let Some(entries) = listeners.get_mut(key) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            listeners.remove(key);
        }
        removed
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self, key: &str) -> usize {
        self.listeners
            .lock_or_recover()
            .get(key)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub(crate) fn set_flush_hook(&self, hook: FlushHook) {
        *self.flush_hook.lock_or_recover() = Some(hook);
    }

    #[cfg(test)]
    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
        let hook = self.flush_hook.lock_or_recover().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    pub(crate) fn detach(&self) {
        self.detached.store(true, Ordering::Release);
    }

    // In-memory and detached stores only clear the dirty flag.
    pub(crate) fn flush(&self) -> Result<(), SettingsError> {
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        if self.detached.load(Ordering::Acquire) {
            return Ok(());
        }
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let result = serde_json::to_vec_pretty(&Value::Object(self.snapshot()))
            .map_err(SettingsError::from)
            .and_then(|bytes| write_file_atomic(path, &bytes));
        if result.is_err() {
            self.dirty.store(true, Ordering::Release);
        }
        result
    }
}

fn read_document(path: &Path) -> Result<Option<Map<String, Value>>, SettingsError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(_) => Err(SettingsError::NotAnObject {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_file_atomic(path: &Path, bytes: &[u8]) -> Result<(), SettingsError> {
    let write_error = |source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("settings");
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));
    fs::write(&tmp_path, bytes).map_err(write_error)?;

    // Windows rename refuses to replace an existing target.
    if cfg!(target_os = "windows") && path.exists() {
        let _ = fs::remove_file(path);
    }
    fs::rename(&tmp_path, path).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use serde_json::json;

    use super::*;

    fn counting_listener(counter: &Arc<AtomicUsize>) -> ChangeListener {
        let counter = counter.clone();
        Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn get_or_returns_default_for_missing_and_mistyped_keys() {
        let store = SettingsStore::in_memory("settings");
        assert!(store.get_or("tray", true));

        store.set_value("tray", json!("not a bool"));
        assert!(store.get_or("tray", true));
    }

    #[test]
    fn set_notifies_listeners_with_new_value() {
        let store = SettingsStore::in_memory("settings");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        store.add_change_listener(
            "tray",
            Arc::new(move |value| sink.lock().expect("lock").push(value.clone())),
        );

        assert!(store.set("tray", &false).expect("set"));
        assert_eq!(*seen.lock().expect("lock"), vec![json!(false)]);
    }

    #[test]
    fn setting_an_equal_value_is_a_noop() {
        let store = SettingsStore::in_memory("settings");
        let counter = Arc::new(AtomicUsize::new(0));
        store.add_change_listener("tray", counting_listener(&counter));

        assert!(store.set_value("tray", json!(true)));
        assert!(!store.set_value("tray", json!(true)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listeners_only_fire_for_their_key() {
        let store = SettingsStore::in_memory("settings");
        let counter = Arc::new(AtomicUsize::new(0));
        store.add_change_listener("tray", counting_listener(&counter));

        store.set_value("minimizeToTray", json!(false));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn removed_listener_is_not_called() {
        let store = SettingsStore::in_memory("settings");
        let counter = Arc::new(AtomicUsize::new(0));
        let id = store.add_change_listener("tray", counting_listener(&counter));

        assert!(store.remove_change_listener("tray", id));
        assert!(!store.remove_change_listener("tray", id));
        store.set_value("tray", json!(false));

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(store.listener_count("tray"), 0);
    }

    #[test]
    fn listener_may_reenter_the_store() {
        let store = Arc::new(SettingsStore::in_memory("settings"));
        let inner = store.clone();
        store.add_change_listener(
            "tray",
            Arc::new(move |value| {
                inner.set_value("trayMirror", value.clone());
            }),
        );

        store.set_value("tray", json!(false));
        assert_eq!(store.get_value("trayMirror"), Some(json!(false)));
    }

    #[test]
    fn flush_hook_runs_on_every_effective_write() {
        let store = SettingsStore::in_memory("state");
        let counter = Arc::new(AtomicUsize::new(0));
        let hook_counter = counter.clone();
        store.set_flush_hook(Arc::new(move || {
            hook_counter.fetch_add(1, Ordering::SeqCst);
        }));

        store.set_value("maximized", json!(true));
        store.set_value("maximized", json!(true));
        store.set_value("minimized", json!(false));

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(store.is_dirty());
    }

    #[test]
    fn flush_persists_and_reload_restores_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.json");

        let store = SettingsStore::load("settings", path.clone());
        store.set_value("discordBranch", json!("canary"));
        store.flush().expect("flush");
        assert!(!store.is_dirty());

        let reloaded = SettingsStore::load("settings", path);
        assert_eq!(
            reloaded.get::<String>("discordBranch").as_deref(),
            Some("canary")
        );
    }

    #[test]
    fn flush_without_changes_does_not_create_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");

        SettingsStore::load("settings", path.clone())
            .flush()
            .expect("flush");
        assert!(!path.exists());
    }

    #[test]
    fn malformed_file_loads_as_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write");

        let store = SettingsStore::load("settings", path);
        assert!(store.snapshot().is_empty());
        assert!(store.get_or("tray", true));
    }

    #[test]
    fn non_object_root_loads_as_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        fs::write(&path, "[1, 2, 3]").expect("write");

        assert!(matches!(
            read_document(&path),
            Err(SettingsError::NotAnObject { .. })
        ));
        assert!(SettingsStore::load("state", path).snapshot().is_empty());
    }

    #[test]
    fn detached_store_stops_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");

        let store = SettingsStore::load("settings", path.clone());
        store.detach();
        store.set_value("tray", json!(false));
        store.flush().expect("flush");

        assert!(!path.exists());
        assert_eq!(store.get_value("tray"), Some(json!(false)));
    }
}
