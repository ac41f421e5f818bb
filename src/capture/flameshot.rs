//! External-tool capture: flameshot.
//!
//! `flameshot full -c -p <dir>` captures the whole screen, copies to the
//! clipboard itself (`-c`) and writes a file it names on its own into
//! `<dir>`. Since flameshot never tells us the filename, the produced
//! file is resolved afterwards by "newest image since the run started".

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::process::Command;

use crate::storage;

#[derive(Debug, thiserror::Error)]
pub enum FlameshotError {
    #[error("failed to prepare {}: {detail}", dir.display())]
    DirUnavailable { dir: PathBuf, detail: String },

    #[error("failed to run flameshot: {0}")]
    Spawn(String),

    #[error("flameshot timed out after {0}s")]
    Timeout(u64),

    #[error("flameshot exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    #[error("no screenshot file detected in {}", dir.display())]
    NoFileDetected { dir: PathBuf },
}

/// Locate flameshot on the PATH.
pub fn flameshot_path() -> Option<PathBuf> {
    which::which("flameshot").ok()
}

/// The fixed flameshot invocation: fullscreen, self-copy to clipboard,
/// save into `dir`.
pub fn flameshot_args(dir: &Path) -> Vec<OsString> {
    vec![
        OsString::from("full"),
        OsString::from("-c"),
        OsString::from("-p"),
        dir.as_os_str().to_os_string(),
    ]
}

/// Run flameshot under `timeout_secs` and return the file it produced.
///
/// The child is killed when the budget is exceeded. A run that exits
/// cleanly but leaves no new image behind (user dismissed the capture,
/// compositor denied it) is reported as `NoFileDetected`.
pub async fn capture_to_dir(
    flameshot: &Path,
    dir: &Path,
    timeout_secs: u64,
) -> Result<PathBuf, FlameshotError> {
    // flameshot does not create the `-p` directory itself; a fresh machine
    // has no ~/Pictures/Screenshots yet.
    storage::ensure_dir(dir).map_err(|e| FlameshotError::DirUnavailable {
        dir: dir.to_path_buf(),
        detail: e.to_string(),
    })?;

    let started = SystemTime::now();

    let run = Command::new(flameshot)
        .args(flameshot_args(dir))
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), run)
        .await
        .map_err(|_| FlameshotError::Timeout(timeout_secs))?
        .map_err(|e| FlameshotError::Spawn(e.to_string()))?;

    if !output.status.success() {
        return Err(FlameshotError::Failed {
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    storage::latest_screenshot_since(dir, started).ok_or_else(|| FlameshotError::NoFileDetected {
        dir: dir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_are_fullscreen_clipboard_and_save_path() {
        let args = flameshot_args(Path::new("/tmp/shots"));
        let rendered: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(rendered, ["full", "-c", "-p", "/tmp/shots"]);
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = capture_to_dir(Path::new("/nonexistent/flameshot"), dir.path(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FlameshotError::Spawn(_)));
    }

    #[tokio::test]
    async fn save_directory_is_created_before_flameshot_runs() {
        let dir = tempfile::tempdir().unwrap();
        let shots = dir.path().join("Pictures").join("Screenshots");

        // The run itself fails (no such binary), but the `-p` directory
        // must already exist by the time flameshot would be handed it.
        let err = capture_to_dir(Path::new("/nonexistent/flameshot"), &shots, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FlameshotError::Spawn(_)));
        assert!(shots.is_dir());
    }
}
