//! Camera Check Library
//!
//! A diagnostic for checking that a USB camera at a given device index
//! opens, accepts a capture format and streams frames.
//!
//! # Architecture
//!
//! ```text
//! capture → overlay → display
//!     ↑                  ↓
//!     └──── session (open, configure, loop, shutdown)
//! ```
//!
//! The camera and the window sit behind the [`Camera`] and [`Display`]
//! traits, so the whole session runs unchanged against [`MockCamera`] and
//! [`RecordingDisplay`] in tests.
//!
//! # Example
//!
//! ```no_run
//! use camera_check::{
//!     capture::MockCamera,
//!     display::HeadlessDisplay,
//!     session::{run_session, SessionConfig},
//! };
//!
//! let camera = MockCamera::new().fail_on_read(10);
//! let report = run_session(
//!     SessionConfig::for_port(0),
//!     camera,
//!     HeadlessDisplay::new(),
//!     std::io::stdout(),
//!     None,
//! )
//! .unwrap();
//!
//! println!("{} frames, {}", report.frames_shown, report.end);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod display;
pub mod overlay;
pub mod session;

// Re-export commonly used types at crate root
pub use capture::{Camera, CameraError, CaptureConfig, DisplayConfig, FileConfig, Frame, MockCamera};
pub use display::{Display, DisplayError, HeadlessDisplay, RecordingDisplay};
pub use overlay::Label;
pub use session::{run_session, CaptureLoop, SessionConfig, SessionEnd, SessionError, SessionReport};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
