//! Configuration — every field has a serde default, so a missing or
//! partial config file degrades to the built-in behavior.
//!
//! The file lives in the platform config directory:
//!   macOS:   ~/Library/Application Support/snapclip/config.json
//!   Linux:   ~/.config/snapclip/config.json
//!   Windows: %APPDATA%/snapclip/config.json

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where captured images are written.
    #[serde(default = "default_screenshots_dir")]
    pub screenshots_dir: PathBuf,

    /// The CLI's flat key=value log file.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Single-instance lock file for the CLI.
    #[serde(default = "default_lock_file")]
    pub lock_file: PathBuf,

    /// Captures older than this are pruned after each run.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,

    /// Budget for the external capture tool.
    #[serde(default = "default_capture_timeout_secs")]
    pub capture_timeout_secs: u64,

    /// Budget for the clipboard helper (xclip).
    #[serde(default = "default_clipboard_timeout_secs")]
    pub clipboard_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screenshots_dir: default_screenshots_dir(),
            log_file: default_log_file(),
            lock_file: default_lock_file(),
            retention_hours: default_retention_hours(),
            capture_timeout_secs: default_capture_timeout_secs(),
            clipboard_timeout_secs: default_clipboard_timeout_secs(),
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_screenshots_dir() -> PathBuf {
    // The original layout, not the XDG pictures dir: tooling that watches
    // this folder expects the fixed path.
    home_dir().join("Pictures").join("Screenshots")
}

fn default_log_file() -> PathBuf {
    home_dir().join(".snapclip.log")
}

fn default_lock_file() -> PathBuf {
    home_dir().join(".snapclip.lock")
}

fn default_retention_hours() -> u64 {
    24
}

fn default_capture_timeout_secs() -> u64 {
    5
}

fn default_clipboard_timeout_secs() -> u64 {
    3
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapclip")
        .join("config.json")
}

/// Load the config file, falling back to defaults when it is absent or
/// unreadable. A malformed file is logged and ignored rather than fatal —
/// these are convenience utilities, not servers.
pub fn load_config() -> Config {
    let path = config_path();
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return Config::default(),
    };

    match serde_json::from_str(&contents) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("config_invalid path={} error={e}", path.display());
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.retention_hours, 24);
        assert_eq!(cfg.capture_timeout_secs, 5);
        assert_eq!(cfg.clipboard_timeout_secs, 3);
        assert!(cfg.screenshots_dir.ends_with("Pictures/Screenshots"));
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let cfg: Config = serde_json::from_str(r#"{"retention_hours": 48}"#).unwrap();
        assert_eq!(cfg.retention_hours, 48);
        assert_eq!(cfg.capture_timeout_secs, 5);
        assert!(cfg.log_file.ends_with(".snapclip.log"));
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.retention_hours, Config::default().retention_hours);
    }
}
