use std::{fs, io, path::Path};

pub(crate) const DESKTOP_BRIDGE_SCRIPT: &str = include_str!("desktop_bridge.js");

const MOD_BUNDLE_GUARD: &str = "__CORDSHELL_MOD_LOADED__";

pub(crate) fn read_mod_bundle(path: &Path) -> Result<Option<String>, String> {
    match fs::read_to_string(path) {
        Ok(source) if source.trim().is_empty() => Ok(None),
        Ok(source) => Ok(Some(source)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(format!(
            "Failed to read mod bundle {}: {error}",
            path.display()
        )),
    }
}

// The mod bundle is guarded so a repeated evaluation is a no-op.
pub(crate) fn build_initialization_script(mod_bundle: Option<&str>) -> String {
    let mut script = String::from(DESKTOP_BRIDGE_SCRIPT);
    if let Some(bundle) = mod_bundle {
        script.push_str(&format!(
            "\n;(() => {{\nif (!window.__CORDSHELL__ || window.{MOD_BUNDLE_GUARD}) return;\nwindow.{MOD_BUNDLE_GUARD} = true;\n{bundle}\n}})();\n"
        ));
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_script_exposes_namespace_once() {
        assert!(DESKTOP_BRIDGE_SCRIPT.contains("if (window.__CORDSHELL__)"));
        assert!(DESKTOP_BRIDGE_SCRIPT.contains("desktop_bridge_ready"));
    }

    #[test]
    fn initialization_script_without_bundle_is_bridge_only() {
        assert_eq!(build_initialization_script(None), DESKTOP_BRIDGE_SCRIPT);
    }

    #[test]
    fn initialization_script_guards_bundle() {
        let script = build_initialization_script(Some("console.log('mod');"));
        assert!(script.starts_with(DESKTOP_BRIDGE_SCRIPT));
        assert!(script.contains("window.__CORDSHELL_MOD_LOADED__ = true;"));
        assert!(script.contains("console.log('mod');"));
    }

    #[test]
    fn missing_or_blank_bundle_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("renderer.js");
        assert_eq!(read_mod_bundle(&path), Ok(None));

        fs::write(&path, "  \n").expect("write");
        assert_eq!(read_mod_bundle(&path), Ok(None));

        fs::write(&path, "void 0;").expect("write");
        assert_eq!(read_mod_bundle(&path), Ok(Some("void 0;".to_string())));
    }
}
