//! On-screen window backed by minifb.

use std::time::Duration;

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use super::{Display, DisplayError, KEY_ESCAPE};
use crate::capture::Frame;

/// A single native window that shows frames as they arrive.
pub struct WindowDisplay {
    window: Option<Window>,
    title: String,
    target_fps: usize,
}

impl WindowDisplay {
    /// Creates the display; the window opens with the first frame.
    pub fn new(target_fps: u32) -> Self {
        Self {
            window: None,
            title: String::new(),
            target_fps: target_fps as usize,
        }
    }

    fn ensure_window(&mut self, title: &str, frame: &Frame) -> Result<&mut Window, DisplayError> {
        if self.window.is_none() || self.title != title {
            let mut window = Window::new(
                title,
                frame.width() as usize,
                frame.height() as usize,
                WindowOptions {
                    resize: true,
                    ..WindowOptions::default()
                },
            )
            .map_err(|e| DisplayError::WindowCreation(e.to_string()))?;
            window.set_target_fps(self.target_fps);

            tracing::info!(title, width = frame.width(), height = frame.height(), "window created");
            self.title = title.to_owned();
            self.window = Some(window);
        }
        self.window
            .as_mut()
            .ok_or_else(|| DisplayError::WindowCreation("window missing".to_string()))
    }
}

impl std::fmt::Debug for WindowDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowDisplay")
            .field("title", &self.title)
            .field("is_open", &self.window.is_some())
            .finish_non_exhaustive()
    }
}

const DIGIT_KEYS: [Key; 10] = [
    Key::Key0,
    Key::Key1,
    Key::Key2,
    Key::Key3,
    Key::Key4,
    Key::Key5,
    Key::Key6,
    Key::Key7,
    Key::Key8,
    Key::Key9,
];

const LETTER_KEYS: [Key; 26] = [
    Key::A,
    Key::B,
    Key::C,
    Key::D,
    Key::E,
    Key::F,
    Key::G,
    Key::H,
    Key::I,
    Key::J,
    Key::K,
    Key::L,
    Key::M,
    Key::N,
    Key::O,
    Key::P,
    Key::Q,
    Key::R,
    Key::S,
    Key::T,
    Key::U,
    Key::V,
    Key::W,
    Key::X,
    Key::Y,
    Key::Z,
];

/// Maps a minifb key to the code a terminal or highgui would report.
///
/// Letters map to their lowercase ASCII code, digits to `'0'..='9'`.
fn key_code(key: Key) -> Option<u32> {
    let code = match key {
        Key::Escape => KEY_ESCAPE,
        Key::Enter => 13,
        Key::Space => 32,
        Key::Tab => 9,
        Key::Backspace => 8,
        _ => {
            if let Some(i) = LETTER_KEYS.iter().position(|k| *k == key) {
                u32::from(b'a') + i as u32
            } else if let Some(i) = DIGIT_KEYS.iter().position(|k| *k == key) {
                u32::from(b'0') + i as u32
            } else {
                return None;
            }
        }
    };
    Some(code)
}

impl Display for WindowDisplay {
    fn show(&mut self, title: &str, frame: &Frame) -> Result<(), DisplayError> {
        if !frame.is_valid() {
            return Err(DisplayError::InvalidFrame {
                sequence: frame.sequence(),
            });
        }
        let buffer = frame.to_argb();
        let (width, height) = (frame.width() as usize, frame.height() as usize);
        self.ensure_window(title, frame)?
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| DisplayError::Present(e.to_string()))
    }

    fn wait_key(&mut self, delay: Duration) -> Option<u32> {
        let window = self.window.as_mut()?;
        // Keys seen while presenting the last frame come first
        let mut pressed = window.get_keys_pressed(KeyRepeat::No);
        std::thread::sleep(delay);
        window.update();
        pressed.extend(window.get_keys_pressed(KeyRepeat::No));
        pressed.into_iter().find_map(key_code)
    }

    fn is_open(&self) -> bool {
        self.window.as_ref().map_or(true, Window::is_open)
    }

    fn destroy_all(&mut self) {
        if self.window.take().is_some() {
            tracing::info!(title = %self.title, "window destroyed");
        }
    }
}
