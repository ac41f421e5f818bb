//! Logger setup.
//!
//! The CLI appends timestamped key=value records to a flat log file so
//! that runs triggered from a keybinding (no terminal attached) still
//! leave a trace. The resident binaries log to stderr like any daemon.

use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Route log records to `log_file`, creating its parent directory if
/// needed. Falls back to stderr when the file cannot be opened — a broken
/// log path must never stop a capture run.
pub fn init_file(log_file: &Path) {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_secs();

    match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("snapclip: cannot open log file {}: {e}", log_file.display());
        }
    }

    // try_init so tests that pull in the library can set up their own logger
    let _ = builder.try_init();
}

/// Plain stderr logging for the hotkey listener and the widget.
pub fn init_stderr() {
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();
}
