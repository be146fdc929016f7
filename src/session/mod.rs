//! Capture session lifecycle.
//!
//! A session owns one camera and one display for its whole life and moves
//! through `Closed → Open → Streaming → Closed` exactly once.

mod capture_loop;
mod state;

pub use capture_loop::{
    run_session, CaptureLoop, NegotiatedFormat, SessionConfig, SessionError, SessionReport,
};
pub use state::{SessionEnd, SessionState};
