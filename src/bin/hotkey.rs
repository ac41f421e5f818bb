//! snapclip-hotkey — resident global-hotkey listener.
//!
//! Ctrl+` captures the primary monitor, saves a timestamped PNG, and
//! copies the image to the clipboard. Ctrl+Shift+Q exits. Captures run on
//! a background thread behind the non-reentrant guard so mashing the
//! hotkey never stacks workers.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};

use snapclip::capture::{self, CaptureGuard};
use snapclip::{config, exit, logging};

/// How often the event loop wakes to drain the hotkey channel.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct App {
    // Dropping the manager unregisters the hotkeys, so it is held even
    // though nothing reads it after setup.
    #[allow(dead_code)]
    manager: GlobalHotKeyManager,
    capture_id: u32,
    quit_id: u32,
    guard: Arc<CaptureGuard>,
    cfg: config::Config,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        _event: WindowEvent,
    ) {
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        while let Ok(event) = GlobalHotKeyEvent::receiver().try_recv() {
            if event.state != HotKeyState::Pressed {
                continue;
            }
            if event.id == self.quit_id {
                log::info!("quit_hotkey_pressed");
                event_loop.exit();
            } else if event.id == self.capture_id {
                self.start_capture();
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }
}

impl App {
    fn start_capture(&self) {
        let Some(permit) = self.guard.try_begin() else {
            log::debug!("capture_in_progress, ignoring hotkey");
            return;
        };

        let dir = self.cfg.screenshots_dir.clone();
        std::thread::Builder::new()
            .name("capture".into())
            .spawn(move || {
                match capture::grab_to_clipboard(&dir) {
                    Ok(path) => log::info!("screenshot_saved path={}", path.display()),
                    Err(e) => log::error!("capture_error reason={e}"),
                }
                drop(permit);
            })
            .expect("spawn capture thread");
    }
}

fn main() -> ExitCode {
    logging::init_stderr();

    match run() {
        Ok(()) => ExitCode::from(exit::OK),
        Err(e) => {
            log::error!("hotkey_listener_failed error={e:#}");
            ExitCode::from(exit::UNHANDLED)
        }
    }
}

fn run() -> Result<()> {
    let cfg = config::load_config();

    let manager = GlobalHotKeyManager::new().context("create hotkey manager")?;

    let capture_hotkey = HotKey::new(Some(Modifiers::CONTROL), Code::Backquote);
    let capture_id = capture_hotkey.id();
    manager
        .register(capture_hotkey)
        .context("register Ctrl+` capture hotkey")?;

    let quit_hotkey = HotKey::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::KeyQ);
    let quit_id = quit_hotkey.id();
    manager
        .register(quit_hotkey)
        .context("register Ctrl+Shift+Q quit hotkey")?;

    log::info!("hotkeys_registered capture=ctrl+backquote quit=ctrl+shift+q");
    log::info!("screenshots_dir path={}", cfg.screenshots_dir.display());

    let event_loop = EventLoop::new().context("create event loop")?;
    let mut app = App {
        manager,
        capture_id,
        quit_id,
        guard: CaptureGuard::new(),
        cfg,
    };

    event_loop.run_app(&mut app).context("event loop")?;
    log::info!("hotkey_listener_stopped");
    Ok(())
}
