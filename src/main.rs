//! snapclip CLI — capture the full screen with flameshot, copy the result
//! to the clipboard with xclip, prune old captures.
//!
//! Built to be wired to a desktop keybinding: no arguments, no terminal
//! needed, every step logged as key=value records to the flat log file,
//! outcome reported through a fixed set of exit codes (`exit` module).

use std::process::ExitCode;
use std::time::{Instant, SystemTime};

use anyhow::Context;

use snapclip::capture::{self, flameshot};
use snapclip::{clipboard, config, desktop, exit, lock, logging, storage};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cfg = config::load_config();
    logging::init_file(&cfg.log_file);

    match run(&cfg).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            log::error!("unhandled_error error={e:#}");
            ExitCode::from(exit::UNHANDLED)
        }
    }
}

async fn run(cfg: &config::Config) -> anyhow::Result<u8> {
    let started = Instant::now();
    log::info!("run_start platform={}", std::env::consts::OS);

    if !cfg!(target_os = "linux") {
        log::error!("unsupported_platform platform={}", std::env::consts::OS);
        return Ok(exit::UNSUPPORTED_PLATFORM);
    }

    match desktop::detect() {
        Some(de) => log::info!("desktop_environment={de}"),
        None => log::info!("desktop_environment=unknown"),
    }

    let _lock = match lock::InstanceLock::acquire(&cfg.lock_file) {
        Ok(lock) => {
            log::info!("lock_acquired path={}", lock.path().display());
            lock
        }
        Err(e) => {
            log::error!("lock_failed error={e}");
            return Ok(exit::LOCK_HELD);
        }
    };

    let Some(flameshot_bin) = flameshot::flameshot_path() else {
        log::error!("missing_dependency name=flameshot");
        return Ok(exit::MISSING_DEPENDENCY);
    };
    log::info!("dependency_ok name=flameshot path={}", flameshot_bin.display());

    let xclip_bin = which::which("xclip").ok();
    match &xclip_bin {
        Some(path) => log::info!("dependency_ok name=xclip path={}", path.display()),
        None => log::warn!("missing_dependency name=xclip using_flameshot_clipboard_only=true"),
    }

    storage::ensure_dir(&cfg.screenshots_dir)
        .with_context(|| format!("create {}", cfg.screenshots_dir.display()))?;
    log::info!("screenshots_dir_ready path={}", cfg.screenshots_dir.display());

    let path = match capture::capture_to_dir(
        &flameshot_bin,
        &cfg.screenshots_dir,
        cfg.capture_timeout_secs,
    )
    .await
    {
        Ok(path) => path,
        Err(e) => {
            log::error!("capture_error reason={e}");
            return Ok(exit::CAPTURE_FAILED);
        }
    };
    log::info!("screenshot_saved path={}", path.display());

    // flameshot's -c already put the image on the clipboard; xclip re-copies
    // from the saved file, which survives flameshot exiting on X11 setups
    // without a clipboard manager. Never fatal either way.
    if let Some(xclip) = &xclip_bin {
        match clipboard::copy_file_via_xclip(xclip, &path, cfg.clipboard_timeout_secs).await {
            Ok(()) => log::info!("clipboard_success provider=xclip"),
            Err(e) => log::warn!("clipboard_warning reason={e}"),
        }
    } else {
        log::info!("clipboard_info xclip_present=false using_flameshot_clipboard_only=true");
    }

    let cutoff = storage::retention_cutoff(SystemTime::now(), cfg.retention_hours);
    let removed = storage::prune_older_than(&cfg.screenshots_dir, cutoff);
    if removed > 0 {
        log::info!("cleanup_complete removed={removed}");
    }

    log::info!("run_complete seconds={:.3}", started.elapsed().as_secs_f64());
    Ok(exit::OK)
}
