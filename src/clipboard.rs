//! Copying captured images to the system clipboard.
//!
//! Two providers: `arboard` for in-process RGBA data (the hotkey listener
//! and the widget hold the pixels already), and `xclip` for the CLI path
//! where flameshot wrote a file and we never decoded it. Callers treat
//! every error here as a warning — a capture that landed on disk is a
//! success even if the clipboard step fails.

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to place image on the clipboard: {0}")]
    CopyFailed(String),

    #[error("xclip not found on PATH")]
    XclipMissing,

    #[error("xclip timed out after {0}s")]
    Timeout(u64),

    #[error("xclip exited with code {code}: {stderr}")]
    XclipFailed { code: i32, stderr: String },
}

/// Copy raw RGBA pixels to the clipboard via arboard.
pub fn copy_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<(), ClipboardError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;

    clipboard
        .set_image(arboard::ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Borrowed(bytes),
        })
        .map_err(|e| ClipboardError::CopyFailed(e.to_string()))?;

    Ok(())
}

/// The fixed xclip argument list: PNG bytes onto the CLIPBOARD selection.
pub fn xclip_args(path: &Path) -> Vec<OsString> {
    vec![
        OsString::from("-selection"),
        OsString::from("clipboard"),
        OsString::from("-t"),
        OsString::from("image/png"),
        OsString::from("-i"),
        path.as_os_str().to_os_string(),
    ]
}

/// Copy an image file to the clipboard with `xclip`, bounded by
/// `timeout_secs`. The child is killed if the budget is exceeded.
pub async fn copy_file_via_xclip(
    xclip: &Path,
    path: &Path,
    timeout_secs: u64,
) -> Result<(), ClipboardError> {
    let run = Command::new(xclip)
        .args(xclip_args(path))
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), run)
        .await
        .map_err(|_| ClipboardError::Timeout(timeout_secs))?
        .map_err(|e| ClipboardError::CopyFailed(e.to_string()))?;

    if !output.status.success() {
        return Err(ClipboardError::XclipFailed {
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xclip_args_target_the_clipboard_selection_as_png() {
        let args = xclip_args(Path::new("/tmp/shot.png"));
        let rendered: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            rendered,
            ["-selection", "clipboard", "-t", "image/png", "-i", "/tmp/shot.png"]
        );
    }

    #[tokio::test]
    async fn missing_binary_surfaces_as_copy_failure() {
        let err = copy_file_via_xclip(
            Path::new("/nonexistent/xclip"),
            Path::new("/tmp/shot.png"),
            1,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ClipboardError::CopyFailed(_)));
    }
}
