//! Input collection and pointer-to-cell mapping

use crate::rendering::{BOARD_PIXELS, CELL_PIXELS};
use macroquad::prelude::*;
use shared::BOARD_SIZE;

/// Discrete events the game loop consumes each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerClick { x: f32, y: f32 },
    QuitRequested,
}

/// Maps a pointer position to a board cell. Clicks on the status bar or
/// outside the window map to nothing.
pub fn cell_at(x: f32, y: f32) -> Option<(u8, u8)> {
    if !(0.0..BOARD_PIXELS).contains(&x) || !(0.0..BOARD_PIXELS).contains(&y) {
        return None;
    }

    let row = (y as u32 / CELL_PIXELS as u32) as usize;
    let col = (x as u32 / CELL_PIXELS as u32) as usize;
    if row < BOARD_SIZE && col < BOARD_SIZE {
        Some((row as u8, col as u8))
    } else {
        None
    }
}

/// Polls macroquad once per frame and turns raw input into [`InputEvent`]s.
pub struct InputManager {
    // Previous frame state for edge detection
    prev_escape: bool,
}

impl InputManager {
    /// Takes over the window close button so quitting goes through the game loop.
    pub fn new() -> Self {
        prevent_quit();
        Self { prev_escape: false }
    }

    pub fn poll(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            events.push(InputEvent::PointerClick { x, y });
        }

        let escape = is_key_down(KeyCode::Escape);
        if is_quit_requested() || (escape && !self.prev_escape) {
            events.push(InputEvent::QuitRequested);
        }
        self.prev_escape = escape;

        events
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
