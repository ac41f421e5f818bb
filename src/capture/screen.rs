//! In-process full-screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS. The external
//! flameshot path lives in `flameshot.rs`; this one is used wherever we
//! want the pixels in memory (clipboard copy without re-decoding a file).

use std::path::{Path, PathBuf};

use image::RgbaImage;
use xcap::Monitor;

use crate::storage;

/// Captures the primary monitor as raw RGBA pixels.
pub fn capture_primary_monitor() -> Result<RgbaImage, ScreenError> {
    let monitors = Monitor::all().map_err(|e| ScreenError::MonitorEnumeration(e.to_string()))?;

    let primary = monitors
        .into_iter()
        .find(|m| m.is_primary().unwrap_or(false))
        .or_else(|| {
            // Fallback: if no monitor reports as primary, use the first one
            let all = Monitor::all().ok()?;
            all.into_iter().next()
        })
        .ok_or(ScreenError::NoPrimaryMonitor)?;

    primary
        .capture_image()
        .map_err(|e| ScreenError::CaptureFailed(e.to_string()))
}

/// Write the capture into `dir` under the shared timestamped name.
pub fn save_png(image: &RgbaImage, dir: &Path) -> Result<PathBuf, ScreenError> {
    storage::ensure_dir(dir).map_err(|e| ScreenError::Save {
        path: dir.to_path_buf(),
        detail: e.to_string(),
    })?;

    let path = dir.join(storage::timestamped_filename());
    image.save(&path).map_err(|e| ScreenError::Save {
        path: path.clone(),
        detail: e.to_string(),
    })?;

    Ok(path)
}

#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("no primary monitor found")]
    NoPrimaryMonitor,

    #[error("screen capture failed: {0}")]
    CaptureFailed(String),

    #[error("failed to save screenshot to {path}: {detail}")]
    Save { path: PathBuf, detail: String },
}
