//! Screen capture domain — public API.
//!
//! Two capture backends (in-process xcap, external flameshot) plus the
//! advisory guard that keeps overlapping captures from piling up when a
//! hotkey is mashed or a button double-clicked.

pub mod flameshot;
pub mod screen;

pub use flameshot::{capture_to_dir, flameshot_path, FlameshotError};
pub use screen::{capture_primary_monitor, save_png, ScreenError};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Capture the primary monitor, save it under the timestamped name, and
/// copy the pixels to the clipboard. Clipboard failure is logged as a
/// warning — the saved file is the source of truth.
pub fn grab_to_clipboard(dir: &Path) -> Result<PathBuf, ScreenError> {
    let image = screen::capture_primary_monitor()?;
    let path = screen::save_png(&image, dir)?;

    match crate::clipboard::copy_rgba(image.width(), image.height(), image.as_raw()) {
        Ok(()) => log::info!("clipboard_success provider=arboard"),
        Err(e) => log::warn!("clipboard_warning reason={e}"),
    }

    Ok(path)
}

/// Non-reentrant capture guard.
///
/// `try_begin` either hands out the single permit or reports that a
/// capture is already in flight; it never blocks, so it is safe to call
/// from a UI thread or a hotkey event handler.
#[derive(Debug, Default)]
pub struct CaptureGuard {
    busy: AtomicBool,
}

impl CaptureGuard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Take the permit if no capture is in flight.
    pub fn try_begin(self: &Arc<Self>) -> Option<CapturePermit> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()?;
        Some(CapturePermit {
            guard: Arc::clone(self),
        })
    }
}

/// Held for the duration of one capture; releasing is drop-based so the
/// guard is freed even when the worker thread errors out early.
#[derive(Debug)]
pub struct CapturePermit {
    guard: Arc<CaptureGuard>,
}

impl Drop for CapturePermit {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_permit_at_a_time() {
        let guard = CaptureGuard::new();
        let permit = guard.try_begin().expect("first permit");
        assert!(guard.try_begin().is_none());
        drop(permit);
        assert!(guard.try_begin().is_some());
    }

    #[test]
    fn permit_releases_on_drop_across_threads() {
        let guard = CaptureGuard::new();
        let permit = guard.try_begin().unwrap();

        let worker = {
            let guard = Arc::clone(&guard);
            std::thread::spawn(move || {
                drop(permit);
                guard.try_begin().is_some()
            })
        };

        assert!(worker.join().unwrap());
    }
}
