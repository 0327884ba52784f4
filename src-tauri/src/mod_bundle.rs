use std::{
    fs, io,
    path::{Path, PathBuf},
};

use url::Url;

use crate::{runtime_paths, MOD_BUNDLE_DOWNLOAD_TIMEOUT, PRODUCT_NAME};

#[derive(Debug, thiserror::Error)]
pub(crate) enum ModBundleError {
    #[error("invalid mod bundle url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to download mod bundle: {0}")]
    Http(#[from] reqwest::Error),
    #[error("mod bundle download returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("mod bundle download was empty")]
    Empty,
    #[error("failed to store mod bundle at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub(crate) fn parse_bundle_url(raw: &str) -> Result<Url, ModBundleError> {
    let invalid = |reason: String| ModBundleError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|error| invalid(error.to_string()))?;
    match url.scheme() {
        "https" => Ok(url),
        scheme => Err(invalid(format!("scheme '{scheme}' is not allowed"))),
    }
}

pub(crate) fn write_bundle(path: &Path, bytes: &[u8]) -> Result<(), ModBundleError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ModBundleError::Empty);
    }
    let io_error = |source| ModBundleError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let tmp_path = path.with_extension("js.download");
    fs::write(&tmp_path, bytes).map_err(io_error)?;
    if cfg!(target_os = "windows") && path.exists() {
        let _ = fs::remove_file(path);
    }
    fs::rename(&tmp_path, path).map_err(io_error)
}

pub(crate) async fn download_bundle(url: &Url, destination: &Path) -> Result<u64, ModBundleError> {
    let client = reqwest::Client::builder()
        .timeout(MOD_BUNDLE_DOWNLOAD_TIMEOUT)
        .user_agent(format!("{PRODUCT_NAME}/{}", env!("CARGO_PKG_VERSION")))
        .build()?;
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ModBundleError::Status(status));
    }
    let bytes = response.bytes().await?;
    write_bundle(destination, &bytes)?;
    Ok(bytes.len() as u64)
}

pub(crate) async fn ensure_bundle(data_dir: &Path, raw_url: &str) -> Result<bool, ModBundleError> {
    let destination = runtime_paths::mod_bundle_path(data_dir);
    if destination.is_file() {
        return Ok(false);
    }
    let url = parse_bundle_url(raw_url)?;
    let size = download_bundle(&url, &destination).await?;
    tracing::info!("downloaded mod bundle ({size} bytes) to {}", destination.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_https_bundle_urls_are_accepted() {
        assert!(parse_bundle_url(" https://example.com/browser.js ").is_ok());
        assert!(matches!(
            parse_bundle_url("http://example.com/browser.js"),
            Err(ModBundleError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_bundle_url("not a url"),
            Err(ModBundleError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn write_bundle_creates_parent_and_replaces_existing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mod").join("renderer.js");

        write_bundle(&path, b"first").expect("write");
        write_bundle(&path, b"second").expect("overwrite");

        assert_eq!(fs::read_to_string(&path).expect("read"), "second");
        assert!(!path.with_extension("js.download").exists());
    }

    #[test]
    fn blank_download_is_rejected_and_keeps_old_copy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("renderer.js");
        write_bundle(&path, b"old").expect("write");

        assert!(matches!(
            write_bundle(&path, b" \n\t"),
            Err(ModBundleError::Empty)
        ));
        assert_eq!(fs::read_to_string(&path).expect("read"), "old");
    }
}
