//! snapclip-widget — always-on-top "+1" capture button.
//!
//! Click the button (or press Ctrl+` while it has focus) to capture: the
//! window hides itself so it never appears in the shot, a worker thread
//! captures and copies to the clipboard, then the window comes back with
//! brief feedback ("✓" on success, "!" with hover text on failure).
//! Escape closes the widget.

use std::process::ExitCode;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use snapclip::capture::CaptureGuard;
use snapclip::{capture, config, exit, logging};

/// Delay between hiding the window and grabbing the frame, so the
/// compositor has actually removed us from the screen.
const HIDE_SETTLE: Duration = Duration::from_millis(150);

/// How long the success check-mark stays up.
const FLASH_DURATION: Duration = Duration::from_millis(500);

/// Budget for delegating to the installed CLI on Linux.
const CLI_TIMEOUT_SECS: u64 = 10;

const BUTTON_GREEN: egui::Color32 = egui::Color32::from_rgb(0x4C, 0xAF, 0x50);
const BUTTON_BLUE: egui::Color32 = egui::Color32::from_rgb(0x21, 0x96, 0xF3);
const BUTTON_RED: egui::Color32 = egui::Color32::from_rgb(0xC6, 0x28, 0x28);

enum Outcome {
    Done,
    Failed(String),
}

enum ButtonState {
    Ready,
    Capturing,
    Flash(Instant),
    Error(String),
}

struct WidgetApp {
    cfg: config::Config,
    guard: Arc<CaptureGuard>,
    state: ButtonState,
    tx: mpsc::Sender<Outcome>,
    rx: mpsc::Receiver<Outcome>,
}

impl WidgetApp {
    fn new(cfg: config::Config) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            cfg,
            guard: CaptureGuard::new(),
            state: ButtonState::Ready,
            tx,
            rx,
        }
    }

    fn start_capture(&mut self, ctx: &egui::Context) {
        let Some(permit) = self.guard.try_begin() else {
            return;
        };

        self.state = ButtonState::Capturing;
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));

        let cfg = self.cfg.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        std::thread::Builder::new()
            .name("widget-capture".into())
            .spawn(move || {
                std::thread::sleep(HIDE_SETTLE);
                let outcome = match capture_once(&cfg) {
                    Ok(()) => Outcome::Done,
                    Err(e) => {
                        log::error!("capture_error reason={e}");
                        Outcome::Failed(e)
                    }
                };
                drop(permit);
                let _ = tx.send(outcome);
                ctx.request_repaint();
            })
            .expect("spawn widget-capture thread");
    }

    fn restore_window(&self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
    }
}

impl eframe::App for WidgetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        while let Ok(outcome) = self.rx.try_recv() {
            self.restore_window(ctx);
            self.state = match outcome {
                Outcome::Done => ButtonState::Flash(Instant::now() + FLASH_DURATION),
                Outcome::Failed(e) => ButtonState::Error(e),
            };
        }

        if let ButtonState::Flash(until) = &self.state {
            let until = *until;
            let now = Instant::now();
            if now >= until {
                self.state = ButtonState::Ready;
            } else {
                ctx.request_repaint_after(until - now);
            }
        }

        let (label, fill) = match &self.state {
            ButtonState::Ready => ("+1", BUTTON_GREEN),
            ButtonState::Capturing => ("...", BUTTON_GREEN),
            ButtonState::Flash(_) => ("✓", BUTTON_BLUE),
            ButtonState::Error(_) => ("!", BUTTON_RED),
        };

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let text = egui::RichText::new(label).size(18.0).strong().color(egui::Color32::WHITE);
                let button = egui::Button::new(text).fill(fill);
                let response = ui.add_sized(ui.available_size(), button);

                if let ButtonState::Error(e) = &self.state {
                    response.clone().on_hover_text(e.as_str());
                }

                let hotkey = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::Backtick));
                let clickable = matches!(self.state, ButtonState::Ready | ButtonState::Error(_));
                if clickable && (response.clicked() || hotkey) {
                    self.start_capture(ctx);
                }
            });
    }
}

/// One capture. On Linux the installed CLI is preferred (it owns locking,
/// logging, and cleanup), then direct flameshot, then in-process capture;
/// elsewhere the in-process path is the only one.
fn capture_once(cfg: &config::Config) -> Result<(), String> {
    #[cfg(target_os = "linux")]
    {
        capture_via_system_tools(cfg)
    }
    #[cfg(not(target_os = "linux"))]
    {
        capture::grab_to_clipboard(&cfg.screenshots_dir)
            .map(|path| log::info!("screenshot_saved path={}", path.display()))
            .map_err(|e| e.to_string())
    }
}

#[cfg(target_os = "linux")]
fn capture_via_system_tools(cfg: &config::Config) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("tokio runtime: {e}"))?;

    if let Ok(cli) = which::which("snapclip") {
        log::info!("delegating_to_cli path={}", cli.display());
        let run = tokio::process::Command::new(&cli).kill_on_drop(true).output();
        let output = runtime
            .block_on(tokio::time::timeout(
                Duration::from_secs(CLI_TIMEOUT_SECS),
                run,
            ))
            .map_err(|_| format!("snapclip CLI timed out after {CLI_TIMEOUT_SECS}s"))?
            .map_err(|e| format!("failed to run snapclip CLI: {e}"))?;

        return if output.status.success() {
            Ok(())
        } else {
            Err(format!(
                "snapclip CLI exited with code {}",
                output.status.code().unwrap_or(-1)
            ))
        };
    }

    if let Some(flameshot) = capture::flameshot_path() {
        let path = runtime
            .block_on(capture::capture_to_dir(
                &flameshot,
                &cfg.screenshots_dir,
                CLI_TIMEOUT_SECS,
            ))
            .map_err(|e| e.to_string())?;
        log::info!("screenshot_saved path={}", path.display());
        return Ok(());
    }

    capture::grab_to_clipboard(&cfg.screenshots_dir)
        .map(|path| log::info!("screenshot_saved path={}", path.display()))
        .map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    logging::init_stderr();
    let cfg = config::load_config();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([72.0, 48.0])
            .with_resizable(false)
            .with_always_on_top()
            .with_title("+1"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "snapclip-widget",
        options,
        Box::new(move |_cc| Ok(Box::new(WidgetApp::new(cfg)))),
    );

    match result {
        Ok(()) => ExitCode::from(exit::OK),
        Err(e) => {
            log::error!("widget_failed error={e}");
            ExitCode::from(exit::UNHANDLED)
        }
    }
}
