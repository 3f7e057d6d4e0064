//! Runtime configuration: model location and logging.

use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// File name of the model artifact.
pub(crate) const MODEL_FILE_NAME: &str = "xgb_final_model.json";

/// Get the default data directory path.
///
/// Uses platform-specific data directories:
/// - Linux: `~/.local/share/safebalance/`
/// - macOS: `~/Library/Application Support/safebalance/`
/// - Windows: `%APPDATA%\safebalance\`
pub(crate) fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("safebalance")
}

/// Resolve the model path.
///
/// An explicit path (flag or `SAFEBALANCE_MODEL`) is used as given. Otherwise
/// the artifact is looked up in the working directory, then in the data
/// directory. When neither exists the working-directory path is returned so
/// the load error names it.
pub(crate) fn resolve_model_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = PathBuf::from(MODEL_FILE_NAME);
    if local.exists() {
        return local;
    }
    let shared = default_data_dir().join(MODEL_FILE_NAME);
    if shared.exists() { shared } else { local }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `level` when set.
pub(crate) fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("/models/custom.json");
        assert_eq!(resolve_model_path(Some(path)), path);
    }

    #[test]
    fn test_default_data_dir() {
        assert!(default_data_dir().ends_with("safebalance"));
    }

    #[test]
    fn test_fallback_names_model_file() {
        assert!(resolve_model_path(None).ends_with(MODEL_FILE_NAME));
    }
}
