//! Camera Check CLI
//!
//! Opens one camera by device index, requests a capture format and shows
//! the live feed with a port label until ESC is pressed.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use camera_check::{
    capture::{Camera, CaptureOverrides, FileConfig, MockCamera},
    display::Display,
    session::{run_session, SessionConfig, SessionError},
};
use clap::Parser;
use tracing::{info, warn};

const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;

/// camera-check: check that a USB camera opens and streams
#[derive(Parser, Debug)]
#[command(name = "camera-check")]
#[command(version, about = "Open a camera by index and show its live feed")]
#[command(after_help = "EXAMPLES:
    # Check device 1 at 1280x720@30
    camera-check

    # Try another index
    camera-check --port 0

    # Exercise the pipeline without hardware or a window
    camera-check --mock --mock-frames 90 --headless")]
struct Cli {
    /// Camera device index
    #[arg(short, long)]
    port: Option<u32>,

    /// Requested frame width
    #[arg(long)]
    width: Option<u32>,

    /// Requested frame height
    #[arg(long)]
    height: Option<u32>,

    /// Requested frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// TOML file with [capture] and [display] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use a synthetic camera instead of real hardware
    #[arg(long)]
    mock: bool,

    /// Number of frames the synthetic camera delivers before its stream ends
    #[arg(long, requires = "mock")]
    mock_frames: Option<u64>,

    /// Do not open a window
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn session_config(&self) -> Result<SessionConfig, String> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path).map_err(|e| e.to_string())?,
            None => FileConfig::default(),
        };

        let overrides = CaptureOverrides {
            port: self.port,
            width: self.width,
            height: self.height,
            fps: self.fps,
        };
        SessionConfig::from(file)
            .with_overrides(&overrides)
            .map_err(|e| e.to_string())
    }

    fn camera(&self) -> Option<Box<dyn Camera>> {
        if self.mock {
            let mut camera = MockCamera::new();
            if let Some(frames) = self.mock_frames {
                camera = camera.fail_on_read(frames + 1);
            }
            return Some(Box::new(camera));
        }
        native_camera()
    }

    fn display(&self, config: &SessionConfig) -> Box<dyn Display> {
        if self.headless {
            return Box::new(camera_check::HeadlessDisplay::new());
        }
        native_display(config.capture.fps)
    }
}

#[cfg(feature = "camera")]
fn native_camera() -> Option<Box<dyn Camera>> {
    Some(Box::new(camera_check::capture::NokhwaCamera::new()))
}

#[cfg(not(feature = "camera"))]
fn native_camera() -> Option<Box<dyn Camera>> {
    None
}

#[cfg(feature = "display")]
fn native_display(fps: u32) -> Box<dyn Display> {
    Box::new(camera_check::display::WindowDisplay::new(fps))
}

#[cfg(not(feature = "display"))]
fn native_display(_fps: u32) -> Box<dyn Display> {
    warn!("built without the `display` feature, frames will not be shown");
    Box::new(camera_check::HeadlessDisplay::new())
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    info!("Camera Check v{}", camera_check::VERSION);

    let config = match cli.session_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(EXIT_USAGE);
        }
    };

    let Some(camera) = cli.camera() else {
        eprintln!("❌ This build has no camera backend. Rebuild with `--features camera` or pass --mock.");
        std::process::exit(EXIT_FAILURE);
    };
    let display = cli.display(&config);

    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupt);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!("Could not set up Ctrl+C handler: {}", e);
    }

    match run_session(config, camera, display, std::io::stdout(), Some(interrupt)) {
        Ok(report) => {
            info!(
                "Port {}: {} frames shown, {} (negotiated {:?})",
                report.port, report.frames_shown, report.end, report.negotiated
            );
        }
        Err(SessionError::Open { .. }) => {
            std::process::exit(EXIT_FAILURE);
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}
