//! snapclip — screenshot-to-clipboard utilities.
//!
//! One domain library behind three entry points:
//! - `snapclip` — CLI automation (flameshot/xclip orchestration on Linux)
//! - `snapclip-hotkey` — resident global-hotkey listener
//! - `snapclip-widget` — always-on-top "+1" capture button
//!
//! The library owns capture (capture/), clipboard providers (clipboard),
//! the screenshot directory (storage), single-instance locking (lock),
//! configuration (config), and logging setup (logging). The binaries are
//! thin orchestration over these modules.

pub mod capture;
pub mod clipboard;
pub mod config;
pub mod desktop;
pub mod exit;
pub mod lock;
pub mod logging;
pub mod storage;
