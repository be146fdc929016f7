//! The open → configure → read/show loop → shutdown sequence.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use super::state::{SessionEnd, SessionState};
use crate::capture::{
    Camera, CameraError, CaptureConfig, CaptureOverrides, CaptureProperty, ConfigError,
    DisplayConfig, FileConfig,
};
use crate::display::{Display, DisplayError};
use crate::overlay::Label;

/// Errors that end a session abnormally.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The camera could not be opened; nothing was acquired.
    #[error("cannot open camera on port {port}: {source}")]
    Open {
        /// Device index that was tried.
        port: u32,
        /// Backend error.
        #[source]
        source: CameraError,
    },
    /// Showing a frame failed mid-stream.
    #[error("display failed: {0}")]
    Display(#[from] DisplayError),
    /// `run` was called after shutdown.
    #[error("session already closed")]
    Closed,
}

/// Everything a capture session needs to know up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Device index and requested capture format.
    pub capture: CaptureConfig,
    /// Window title and key handling.
    pub display: DisplayConfig,
}

impl SessionConfig {
    /// Default configuration for the given device index.
    pub fn for_port(port: u32) -> Self {
        Self {
            capture: CaptureConfig::for_port(port),
            display: DisplayConfig::default(),
        }
    }

    /// Applies command-line overrides on top of this configuration and
    /// validates the merged result.
    pub fn with_overrides(mut self, overrides: &CaptureOverrides) -> Result<Self, ConfigError> {
        self.capture = self.capture.with_overrides(overrides);
        self.capture.validate()?;
        Ok(self)
    }
}

impl From<FileConfig> for SessionConfig {
    fn from(file: FileConfig) -> Self {
        Self {
            capture: file.capture,
            display: file.display,
        }
    }
}

/// Capture parameters as reported back by the device after configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NegotiatedFormat {
    /// Reported frame width.
    pub width: Option<u32>,
    /// Reported frame height.
    pub height: Option<u32>,
    /// Reported frame rate.
    pub fps: Option<u32>,
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Device index the session ran against.
    pub port: u32,
    /// Frames read, labelled and shown.
    pub frames_shown: u64,
    /// Why the loop stopped.
    pub end: SessionEnd,
    /// Format the device settled on after configuration.
    pub negotiated: NegotiatedFormat,
}

/// Drives one camera and one window through a single streaming session.
///
/// Status lines go to `console`. Once the camera is open, the handle is
/// released and windows destroyed exactly once, whichever way the session
/// ends, including when the loop is dropped early.
pub struct CaptureLoop<C: Camera, D: Display, W: Write> {
    config: SessionConfig,
    camera: C,
    display: D,
    console: W,
    state: SessionState,
    label: Label,
    title: String,
    frames_shown: u64,
    negotiated: NegotiatedFormat,
    interrupt: Option<Arc<AtomicBool>>,
}

impl<C: Camera, D: Display, W: Write> CaptureLoop<C, D, W> {
    /// Opens the camera at `config.capture.port`.
    ///
    /// On failure nothing is left to clean up: the camera was never
    /// acquired and the display was never touched.
    pub fn open(
        config: SessionConfig,
        mut camera: C,
        display: D,
        mut console: W,
    ) -> Result<Self, SessionError> {
        let port = config.capture.port;
        let _ = writeln!(console, "📹 port {} connecting camera...", port);

        if let Err(source) = camera.open(&config.capture) {
            warn!(port, error = %source, "camera open failed");
            let _ = writeln!(console, "❌ Cannot open camera on port {}!", port);
            let _ = writeln!(console, "Try a different port number (0, 1, 2...)");
            return Err(SessionError::Open { port, source });
        }
        info!(port, "camera open");

        let title = config.display.window_title(port);
        Ok(Self {
            label: Label::for_port(port),
            title,
            config,
            camera,
            display,
            console,
            state: SessionState::Open,
            frames_shown: 0,
            negotiated: NegotiatedFormat::default(),
            interrupt: None,
        })
    }

    /// Ends the loop at the next iteration once `flag` is set.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Label drawn onto every frame.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Title of the window frames are shown in.
    pub fn window_title(&self) -> &str {
        &self.title
    }

    /// Frames shown so far.
    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    /// Requests width, height and frame rate, once each and in that order.
    ///
    /// The device may settle on other values. Those are read back and a
    /// mismatch is only logged.
    pub fn configure(&mut self) {
        if self.state != SessionState::Open {
            return;
        }

        let capture = &self.config.capture;
        let requests = [
            (CaptureProperty::FrameWidth, capture.width),
            (CaptureProperty::FrameHeight, capture.height),
            (CaptureProperty::Fps, capture.fps),
        ];

        for (property, value) in requests {
            debug!("requesting {} = {}", property, value);
            self.camera.request(property, value);
        }

        for (property, requested) in requests {
            let actual = self.camera.negotiated(property);
            match property {
                CaptureProperty::FrameWidth => self.negotiated.width = actual,
                CaptureProperty::FrameHeight => self.negotiated.height = actual,
                CaptureProperty::Fps => self.negotiated.fps = actual,
            }
            if let Some(actual) = actual.filter(|&a| a != requested) {
                warn!("device negotiated {} = {} (requested {})", property, actual, requested);
            }
        }

        self.state = SessionState::Streaming;
        let port = self.config.capture.port;
        let _ = writeln!(self.console, "✅ Port {} camera connection success!", port);
        let _ = writeln!(self.console, "Press ESC to exit");
    }

    /// Streams until the device stops, the user cancels or the process is
    /// interrupted, then shuts down.
    pub fn run(&mut self) -> Result<SessionReport, SessionError> {
        self.configure();
        if self.state != SessionState::Streaming {
            return Err(SessionError::Closed);
        }

        let result = self.stream();
        self.shutdown();
        let end = result?;

        info!(frames = self.frames_shown, %end, "session finished");
        Ok(SessionReport {
            port: self.config.capture.port,
            frames_shown: self.frames_shown,
            end,
            negotiated: self.negotiated,
        })
    }

    fn stream(&mut self) -> Result<SessionEnd, SessionError> {
        let poll = Duration::from_millis(self.config.display.key_poll_ms);
        let cancel_key = u32::from(self.config.display.cancel_key);

        loop {
            if self.interrupted() {
                let _ = writeln!(self.console, "⚠️ Interrupted");
                return Ok(SessionEnd::Interrupted);
            }

            let mut frame = match self.camera.read() {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, "frame read failed");
                    let _ = writeln!(self.console, "❌ Cannot read frame!");
                    return Ok(SessionEnd::StreamEnded);
                }
            };

            self.label.draw(&mut frame);
            self.display.show(&self.title, &frame)?;
            self.frames_shown += 1;
            trace!(sequence = frame.sequence(), "frame shown");

            if let Some(key) = self.display.wait_key(poll) {
                if key & 0xFF == cancel_key {
                    return Ok(SessionEnd::Cancelled);
                }
            }
            if !self.display.is_open() {
                return Ok(SessionEnd::WindowClosed);
            }
        }
    }

    fn interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Releases the camera and destroys all windows. Runs at most once.
    pub fn shutdown(&mut self) {
        if !self.state.holds_device() {
            return;
        }
        self.state = SessionState::Closed;
        self.camera.release();
        self.display.destroy_all();
        info!(port = self.config.capture.port, "camera closed");
        let _ = writeln!(self.console, "✅ Camera closed");
    }
}

impl<C: Camera, D: Display, W: Write> Drop for CaptureLoop<C, D, W> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs a whole session: open, configure, stream, shut down.
pub fn run_session<C: Camera, D: Display, W: Write>(
    config: SessionConfig,
    camera: C,
    display: D,
    console: W,
    interrupt: Option<Arc<AtomicBool>>,
) -> Result<SessionReport, SessionError> {
    let mut session = CaptureLoop::open(config, camera, display, console)?;
    if let Some(flag) = interrupt {
        session = session.with_interrupt(flag);
    }
    session.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CameraCall, MockCamera};
    use crate::display::{RecordingDisplay, KEY_ESCAPE};

    fn small_config(port: u32) -> SessionConfig {
        let mut config = SessionConfig::for_port(port);
        config.capture.width = 160;
        config.capture.height = 48;
        config
    }

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_flags_override_file_before_validation() {
        let file = FileConfig::from_toml("[capture]\nport = 3\nfps = 500\nwidth = 640\n").unwrap();
        let overrides = CaptureOverrides {
            fps: Some(30),
            ..Default::default()
        };

        let config = SessionConfig::from(file).with_overrides(&overrides).unwrap();
        assert_eq!(config.capture.port, 3);
        assert_eq!(config.capture.width, 640);
        assert_eq!(config.capture.height, 720);
        assert_eq!(config.capture.fps, 30);
    }

    #[test]
    fn test_merged_config_is_validated() {
        let file = FileConfig::from_toml("[capture]\nfps = 500\n").unwrap();
        let result = SessionConfig::from(file).with_overrides(&CaptureOverrides::default());
        assert!(matches!(result, Err(ConfigError::InvalidFrameRate)));

        let overrides = CaptureOverrides {
            width: Some(70000),
            height: Some(70000),
            ..Default::default()
        };
        let result = SessionConfig::default().with_overrides(&overrides);
        assert!(matches!(result, Err(ConfigError::InvalidDimensions)));
    }

    #[test]
    fn test_open_failure_never_reads() {
        let mut camera = MockCamera::unavailable();
        let mut display = RecordingDisplay::new();
        let mut out = Vec::new();

        let result = run_session(small_config(3), &mut camera, &mut display, &mut out, None);

        assert!(matches!(result, Err(SessionError::Open { port: 3, .. })));
        assert_eq!(camera.calls(), [CameraCall::Open(3)]);
        assert!(display.shown().is_empty());
        assert_eq!(display.destroy_calls(), 0);

        let out = text(out);
        assert!(out.contains("Cannot open camera on port 3"));
        assert!(out.contains("Try a different port number"));
        assert!(!out.contains("Camera closed"));
    }

    #[test]
    fn test_configuration_requested_once_before_first_read() {
        let mut camera = MockCamera::new().fail_on_read(2);
        let mut display = RecordingDisplay::new();

        let report = run_session(
            SessionConfig::default(),
            &mut camera,
            &mut display,
            std::io::sink(),
            None,
        )
        .unwrap();

        assert_eq!(
            camera.calls(),
            [
                CameraCall::Open(1),
                CameraCall::Request(CaptureProperty::FrameWidth, 1280),
                CameraCall::Request(CaptureProperty::FrameHeight, 720),
                CameraCall::Request(CaptureProperty::Fps, 30),
                CameraCall::Read,
                CameraCall::Read,
                CameraCall::Release,
            ]
        );
        assert_eq!(report.frames_shown, 1);
    }

    #[test]
    fn test_read_failure_ends_session_cleanly() {
        let mut camera = MockCamera::new().fail_on_read(4);
        let mut display = RecordingDisplay::new();
        let mut out = Vec::new();

        let report =
            run_session(small_config(1), &mut camera, &mut display, &mut out, None).unwrap();

        assert_eq!(report.end, SessionEnd::StreamEnded);
        assert_eq!(report.frames_shown, 3);
        assert_eq!(display.shown().len(), 3);
        assert_eq!(camera.read_count(), 4);
        assert_eq!(camera.release_count(), 1);
        assert_eq!(display.destroy_calls(), 1);
        assert_eq!(camera.calls().last(), Some(&CameraCall::Release));

        let out = text(out);
        let failed = out.find("Cannot read frame!").unwrap();
        let closed = out.find("Camera closed").unwrap();
        assert!(failed < closed);
    }

    #[test]
    fn test_cancel_key_stops_after_frame() {
        let mut camera = MockCamera::new();
        let mut display = RecordingDisplay::new().press_after(2, KEY_ESCAPE);

        let report = run_session(
            small_config(1),
            &mut camera,
            &mut display,
            std::io::sink(),
            None,
        )
        .unwrap();

        assert_eq!(report.end, SessionEnd::Cancelled);
        assert_eq!(report.frames_shown, 2);
        assert_eq!(camera.read_count(), 2);
        assert_eq!(display.key_polls(), 2);
        assert_eq!(camera.release_count(), 1);
        assert_eq!(display.destroy_calls(), 1);
    }

    #[test]
    fn test_cancel_key_compares_low_byte_only() {
        let mut camera = MockCamera::new();
        let mut display = RecordingDisplay::new()
            .press_after(1, u32::from(b'q'))
            .press_after(3, 0x0010_0000 | KEY_ESCAPE);

        let report = run_session(
            small_config(1),
            &mut camera,
            &mut display,
            std::io::sink(),
            None,
        )
        .unwrap();

        assert_eq!(report.end, SessionEnd::Cancelled);
        assert_eq!(report.frames_shown, 3);
    }

    #[test]
    fn test_custom_cancel_key() {
        let mut config = small_config(1);
        config.display.cancel_key = b'q';
        let mut camera = MockCamera::new();
        let mut display = RecordingDisplay::new()
            .press_after(1, KEY_ESCAPE)
            .press_after(2, u32::from(b'q'));

        let report =
            run_session(config, &mut camera, &mut display, std::io::sink(), None).unwrap();
        assert_eq!(report.frames_shown, 2);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut camera = MockCamera::new();
        let mut display = RecordingDisplay::new();

        {
            let mut session =
                CaptureLoop::open(small_config(1), &mut camera, &mut display, std::io::sink())
                    .unwrap();
            session.configure();
            assert_eq!(session.state(), SessionState::Streaming);

            session.shutdown();
            session.shutdown();
            assert_eq!(session.state(), SessionState::Closed);
            assert!(matches!(session.run(), Err(SessionError::Closed)));
        }

        assert_eq!(camera.release_count(), 1);
        assert_eq!(display.destroy_calls(), 1);
        assert_eq!(camera.read_count(), 0);
    }

    #[test]
    fn test_drop_releases_open_camera() {
        let mut camera = MockCamera::new();
        let mut display = RecordingDisplay::new();

        let session =
            CaptureLoop::open(small_config(2), &mut camera, &mut display, std::io::sink())
                .unwrap();
        assert_eq!(session.state(), SessionState::Open);
        drop(session);

        assert_eq!(camera.release_count(), 1);
        assert_eq!(display.destroy_calls(), 1);
        assert!(!camera
            .calls()
            .iter()
            .any(|c| matches!(c, CameraCall::Request(..))));
    }

    #[test]
    fn test_label_and_title_on_every_frame() {
        let mut camera = MockCamera::new().fail_on_read(6);
        let mut display = RecordingDisplay::new();

        let report = run_session(
            small_config(5),
            &mut camera,
            &mut display,
            std::io::sink(),
            None,
        )
        .unwrap();

        assert_eq!(report.frames_shown, 5);
        for (i, shown) in display.shown().iter().enumerate() {
            assert_eq!(shown.title, "ELP Camera - Port 5");
            assert_eq!(shown.annotations, ["Port: 5"]);
            assert_eq!(shown.sequence, i as u64 + 1);
        }
    }

    #[test]
    fn test_window_closed_ends_session() {
        let mut camera = MockCamera::new();
        let mut display = RecordingDisplay::new().close_after(3);

        let report = run_session(
            small_config(1),
            &mut camera,
            &mut display,
            std::io::sink(),
            None,
        )
        .unwrap();

        assert_eq!(report.end, SessionEnd::WindowClosed);
        assert_eq!(report.frames_shown, 3);
        assert_eq!(camera.release_count(), 1);
    }

    #[test]
    fn test_interrupt_flag_stops_before_next_read() {
        let mut camera = MockCamera::new();
        let mut display = RecordingDisplay::new();
        let flag = Arc::new(AtomicBool::new(true));
        let mut out = Vec::new();

        let report = run_session(
            small_config(1),
            &mut camera,
            &mut display,
            &mut out,
            Some(flag),
        )
        .unwrap();

        assert_eq!(report.end, SessionEnd::Interrupted);
        assert_eq!(report.frames_shown, 0);
        assert_eq!(camera.read_count(), 0);
        assert_eq!(camera.release_count(), 1);
        assert!(text(out).contains("Interrupted"));
    }

    #[test]
    fn test_negotiated_mismatch_is_reported_not_fatal() {
        let mut camera = MockCamera::new()
            .with_negotiated(CaptureProperty::Fps, 15)
            .fail_on_read(3);
        let mut display = RecordingDisplay::new();

        let report = run_session(
            small_config(1),
            &mut camera,
            &mut display,
            std::io::sink(),
            None,
        )
        .unwrap();

        assert_eq!(
            report.negotiated,
            NegotiatedFormat {
                width: Some(160),
                height: Some(48),
                fps: Some(15),
            }
        );
        assert_eq!(report.frames_shown, 2);
    }

    #[test]
    fn test_console_status_lines() {
        let mut camera = MockCamera::new().fail_on_read(1);
        let mut display = RecordingDisplay::new();
        let mut out = Vec::new();

        run_session(small_config(0), &mut camera, &mut display, &mut out, None).unwrap();

        let out = text(out);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                "📹 port 0 connecting camera...",
                "✅ Port 0 camera connection success!",
                "Press ESC to exit",
                "❌ Cannot read frame!",
                "✅ Camera closed",
            ]
        );
    }
}
