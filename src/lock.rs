//! Single-instance enforcement via a PID-holding advisory file lock.
//!
//! The lock is "fail if held" — there is deliberately no waiting and no
//! recovery logic. On Unix this is `flock(LOCK_EX | LOCK_NB)`, which the
//! kernel releases when the owning process dies, so a crashed holder can
//! never wedge the lock there. The non-Unix fallback is exclusive-create
//! on a sidecar marker removed on drop; a holder that crashes before drop
//! leaves the marker behind and the next run reports the lock as held
//! until the `.held` file is deleted by hand.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("another instance holds the lock at {path}")]
    Held { path: PathBuf },

    #[error("failed to open lock file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Holds the advisory lock for the lifetime of the value.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// Acquire the lock non-blockingly and record our PID in the file.
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| LockError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|source| LockError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        try_lock_exclusive(&file, path)?;

        // Best-effort PID record for humans inspecting the file; the flock
        // itself is the source of truth.
        let _ = file.set_len(0);
        let _ = write!(file, "{}", std::process::id());
        let _ = file.flush();

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File, path: &Path) -> Result<(), LockError> {
    use std::os::unix::io::AsRawFd;

    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc != 0 {
        let source = io::Error::last_os_error();
        return if source.kind() == io::ErrorKind::WouldBlock {
            Err(LockError::Held {
                path: path.to_path_buf(),
            })
        } else {
            Err(LockError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
    }
    Ok(())
}

#[cfg(not(unix))]
fn try_lock_exclusive(file: &File, path: &Path) -> Result<(), LockError> {
    // No flock on Windows; exclusive-create on a sidecar file gives the
    // same "fail if held" semantics. The sidecar (not the PID file) is
    // removed on drop so stale PIDs remain inspectable.
    let _ = file;
    let sidecar = path.with_extension("held");
    match OpenOptions::new().create_new(true).write(true).open(&sidecar) {
        Ok(_) => Ok(()),
        Err(source) if source.kind() == io::ErrorKind::AlreadyExists => Err(LockError::Held {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(LockError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        #[cfg(unix)]
        unsafe {
            use std::os::unix::io::AsRawFd;
            libc::flock(self.file.as_raw_fd(), libc::LOCK_UN);
        }
        #[cfg(not(unix))]
        {
            let _ = std::fs::remove_file(self.path.with_extension("held"));
        }
        log::info!("lock_released path={}", self.path.display());
    }
}
