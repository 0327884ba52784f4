use std::{
    env,
    path::{Path, PathBuf},
};

use tauri::{AppHandle, Manager};

use crate::{DATA_DIR_ENV, MOD_BUNDLE_DIR, MOD_BUNDLE_FILE, SETTINGS_FILE, STATE_FILE};

fn non_empty_env_path(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|value| !value.to_string_lossy().trim().is_empty())
        .map(PathBuf::from)
}

pub(crate) fn data_dir_override() -> Option<PathBuf> {
    non_empty_env_path(DATA_DIR_ENV)
}

pub(crate) fn resolve_data_dir(app_handle: &AppHandle) -> Result<PathBuf, String> {
    if let Some(path) = data_dir_override() {
        return Ok(path);
    }
    app_handle
        .path()
        .app_data_dir()
        .map_err(|error| format!("Failed to resolve app data directory: {error}"))
}

pub(crate) fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILE)
}

pub(crate) fn state_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STATE_FILE)
}

pub(crate) fn mod_bundle_path(data_dir: &Path) -> PathBuf {
    data_dir.join(MOD_BUNDLE_DIR).join(MOD_BUNDLE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_files_live_directly_under_data_dir() {
        let data_dir = PathBuf::from("/data/cordshell");
        assert_eq!(
            settings_path(&data_dir),
            PathBuf::from("/data/cordshell/settings.json")
        );
        assert_eq!(
            state_path(&data_dir),
            PathBuf::from("/data/cordshell/state.json")
        );
    }

    #[test]
    fn mod_bundle_lives_in_mod_dir() {
        assert_eq!(
            mod_bundle_path(Path::new("/data/cordshell")),
            PathBuf::from("/data/cordshell/mod/renderer.js")
        );
    }
}
