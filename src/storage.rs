//! Screenshot directory management.
//!
//! Owns the three filesystem concerns the tools share: timestamped file
//! names, "newest image since the capture started" resolution (flameshot
//! names its own output, so the produced file has to be found by mtime),
//! and age-based pruning.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::Local;

/// Extensions considered screenshot images, lowercase.
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Create the screenshot directory if it is missing.
pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// `screenshot_YYYYMMDD_HHMMSS.png`, the shared naming scheme.
pub fn timestamped_filename() -> String {
    format!("screenshot_{}.png", Local::now().format("%Y%m%d_%H%M%S"))
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Newest image file in `dir` with mtime at or after `floor`.
///
/// Linear scan, last-write-wins. Returns `None` when the directory is
/// missing or nothing qualifies — both are expected states, not errors.
pub fn latest_screenshot_since(dir: &Path, floor: SystemTime) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_image_file(&path) {
            continue;
        }
        let Ok(mtime) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if mtime < floor {
            continue;
        }
        match &latest {
            Some((best, _)) if mtime <= *best => {}
            _ => latest = Some((mtime, path)),
        }
    }

    latest.map(|(_, path)| path)
}

/// The prune cutoff for a retention window ending now.
///
/// A window too large to represent (config files are user input) clamps
/// to the epoch, which prunes nothing.
pub fn retention_cutoff(now: SystemTime, retention_hours: u64) -> SystemTime {
    retention_hours
        .checked_mul(3600)
        .map(Duration::from_secs)
        .and_then(|window| now.checked_sub(window))
        .unwrap_or(UNIX_EPOCH)
}

/// Delete files in `dir` strictly older than `cutoff`. Subdirectories are
/// skipped. Per-file failures are logged and counted but never abort the
/// sweep. Returns the number of files removed.
pub fn prune_older_than(dir: &Path, cutoff: SystemTime) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(mtime) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if mtime >= cutoff {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("cleanup_warning path={} error={e}", path.display()),
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn latest_ignores_non_image_extensions() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "capture.PNG");

        let found = latest_screenshot_since(dir.path(), UNIX_EPOCH).unwrap();
        assert!(found.ends_with("capture.PNG"));
    }

    #[test]
    fn latest_respects_the_mtime_floor() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "old.png");

        let future = SystemTime::now() + Duration::from_secs(3600);
        assert_eq!(latest_screenshot_since(dir.path(), future), None);
    }

    #[test]
    fn latest_picks_the_newest_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "first.png");
        std::thread::sleep(Duration::from_millis(20));
        touch(dir.path(), "second.jpg");

        let found = latest_screenshot_since(dir.path(), UNIX_EPOCH).unwrap();
        assert!(found.ends_with("second.jpg"));
    }

    #[test]
    fn latest_tolerates_a_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        assert_eq!(latest_screenshot_since(&gone, UNIX_EPOCH), None);
    }

    #[test]
    fn prune_removes_only_files_older_than_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let stale = touch(dir.path(), "stale.png");

        // Everything in the directory is older than a cutoff in the future,
        // and newer than one in the past.
        assert_eq!(prune_older_than(dir.path(), UNIX_EPOCH), 0);
        assert!(stale.exists());

        let future = SystemTime::now() + Duration::from_secs(3600);
        assert_eq!(prune_older_than(dir.path(), future), 1);
        assert!(!stale.exists());
    }

    #[test]
    fn prune_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("keep");
        std::fs::create_dir(&sub).unwrap();

        let future = SystemTime::now() + Duration::from_secs(3600);
        assert_eq!(prune_older_than(dir.path(), future), 0);
        assert!(sub.exists());
    }

    #[test]
    fn filename_has_the_shared_shape() {
        let name = timestamped_filename();
        assert!(name.starts_with("screenshot_"));
        assert!(name.ends_with(".png"));
        // screenshot_ + YYYYMMDD_HHMMSS + .png
        assert_eq!(name.len(), "screenshot_".len() + 15 + ".png".len());
    }

    #[test]
    fn retention_cutoff_is_window_hours_back() {
        let now = SystemTime::now();
        let cutoff = retention_cutoff(now, 24);
        assert_eq!(now.duration_since(cutoff).unwrap(), Duration::from_secs(24 * 3600));
    }

    #[test]
    fn absurd_retention_clamps_to_epoch_instead_of_panicking() {
        let now = SystemTime::now();
        // Overflows the seconds multiply.
        assert_eq!(retention_cutoff(now, u64::MAX), UNIX_EPOCH);
        // Multiply fits but predates the epoch.
        assert_eq!(retention_cutoff(now, u64::MAX / 7200), UNIX_EPOCH);
    }
}
