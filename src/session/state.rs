//! Session lifecycle states.

/// Where a capture session is in its lifecycle.
///
/// `Closed → Open → Streaming → Closed`. A closed session never streams
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No device handle is held.
    #[default]
    Closed,
    /// The device is open but the loop has not started.
    Open,
    /// The read/show loop is running.
    Streaming,
}

impl SessionState {
    /// Whether the camera handle is held and must be released.
    pub fn holds_device(self) -> bool {
        !matches!(self, SessionState::Closed)
    }
}

/// How a streaming session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// A frame read failed; the device stopped delivering frames.
    StreamEnded,
    /// The cancel key was pressed.
    Cancelled,
    /// The user closed the window.
    WindowClosed,
    /// The process received an interrupt signal.
    Interrupted,
}

impl std::fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            SessionEnd::StreamEnded => "stream ended",
            SessionEnd::Cancelled => "cancelled by user",
            SessionEnd::WindowClosed => "window closed",
            SessionEnd::Interrupted => "interrupted",
        };
        f.write_str(reason)
    }
}
