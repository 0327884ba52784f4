use std::path::{Path, PathBuf};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DesktopLogCategory {
    Runtime,
    Startup,
    Restart,
    Shutdown,
}

impl DesktopLogCategory {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Startup => "startup",
            Self::Restart => "restart",
            Self::Shutdown => "shutdown",
        }
    }
}

pub(crate) fn resolve_desktop_log_path(data_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    data_dir
        .unwrap_or_else(std::env::temp_dir)
        .join(crate::DESKTOP_LOG_DIR)
        .join(file_name)
}

// A second call is a no-op; the first subscriber stays installed.
pub(crate) fn init(log_dir: &Path, file_name: &str) {
    if let Err(error) = std::fs::create_dir_all(log_dir) {
        eprintln!(
            "failed to create desktop log directory {}: {error}",
            log_dir.display()
        );
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, file_name);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false),
        )
        .with(filter)
        .try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

pub(crate) fn append_desktop_log(category: DesktopLogCategory, message: &str) {
    tracing::info!(category = category.as_str(), "{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_desktop_log_path_nests_under_logs_dir() {
        let path = resolve_desktop_log_path(Some(PathBuf::from("/data")), "desktop.log");
        assert_eq!(path, PathBuf::from("/data/logs/desktop.log"));
    }

    #[test]
    fn category_names_are_stable() {
        assert_eq!(DesktopLogCategory::Startup.as_str(), "startup");
        assert_eq!(DesktopLogCategory::Shutdown.as_str(), "shutdown");
    }
}
