//! Fixed process exit codes shared by the snapclip binaries.
//!
//! Scripts and desktop launchers key off these values, so they are part
//! of the external surface and must stay stable.

/// Successful run.
pub const OK: u8 = 0;

/// A required external tool or capability is missing (e.g. flameshot).
pub const MISSING_DEPENDENCY: u8 = 1;

/// The binary does not support the current platform.
pub const UNSUPPORTED_PLATFORM: u8 = 10;

/// Another instance already holds the single-instance lock.
pub const LOCK_HELD: u8 = 11;

/// The capture step failed (tool error, timeout, or no file produced).
pub const CAPTURE_FAILED: u8 = 20;

/// Any error not covered by a more specific code.
pub const UNHANDLED: u8 = 99;
