use crate::game::Phase;
use macroquad::prelude::*;
use shared::{Board, Mark, Outcome, BOARD_SIZE};

pub const BOARD_PIXELS: f32 = 600.0;
pub const CELL_PIXELS: f32 = BOARD_PIXELS / BOARD_SIZE as f32;
pub const STATUS_BAR_PIXELS: f32 = 50.0;

const LINE_WIDTH: f32 = 15.0;
const CIRCLE_RADIUS: f32 = 60.0;
const CIRCLE_WIDTH: f32 = 15.0;
const CROSS_WIDTH: f32 = 25.0;
const CROSS_INSET: f32 = 55.0;
const FONT_SIZE: f32 = 36.0;

const BG_COLOR: Color = Color::new(28.0 / 255.0, 170.0 / 255.0, 156.0 / 255.0, 1.0);
const LINE_COLOR: Color = Color::new(23.0 / 255.0, 145.0 / 255.0, 135.0 / 255.0, 1.0);
const CROSS_COLOR: Color = Color::new(66.0 / 255.0, 66.0 / 255.0, 66.0 / 255.0, 1.0);
const CIRCLE_COLOR: Color = Color::new(239.0 / 255.0, 231.0 / 255.0, 200.0 / 255.0, 1.0);

/// Snapshot of everything a presenter needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderState<'a> {
    pub board: &'a Board,
    pub turn_owner: Mark,
    pub outcome: Outcome,
    pub local_mark: Mark,
    pub phase: Phase,
}

/// Draw target for the game loop, called once per tick.
pub trait Presenter {
    fn render(&mut self, state: &RenderState<'_>);
}

pub fn status_text(state: &RenderState<'_>) -> String {
    match state.outcome {
        Outcome::Draw => "Game ended in a Draw!".to_string(),
        Outcome::Won(mark) if mark == state.local_mark => "You Won!".to_string(),
        Outcome::Won(_) => "You Lost!".to_string(),
        Outcome::InProgress => match state.phase {
            Phase::AwaitingConnection => "Waiting for opponent to connect...".to_string(),
            _ if state.turn_owner == state.local_mark => {
                format!("Your turn (You are {})", state.local_mark)
            }
            _ => "Waiting for opponent...".to_string(),
        },
    }
}

/// Pixel centre of a cell.
pub fn cell_center(row: usize, col: usize) -> (f32, f32) {
    (
        col as f32 * CELL_PIXELS + CELL_PIXELS / 2.0,
        row as f32 * CELL_PIXELS + CELL_PIXELS / 2.0,
    )
}

pub struct Renderer {
    width: f32,
    height: f32,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            width: BOARD_PIXELS,
            height: BOARD_PIXELS + STATUS_BAR_PIXELS,
        }
    }

    fn draw_grid(&mut self) {
        for i in 1..BOARD_SIZE {
            let offset = i as f32 * CELL_PIXELS;
            draw_line(0.0, offset, self.width, offset, LINE_WIDTH, LINE_COLOR);
            draw_line(offset, 0.0, offset, BOARD_PIXELS, LINE_WIDTH, LINE_COLOR);
        }
    }

    fn draw_marks(&mut self, board: &Board) {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                match board.cell(row, col) {
                    Some(Mark::X) => self.draw_cross(row, col),
                    Some(Mark::O) => self.draw_circle(row, col),
                    None => {}
                }
            }
        }
    }

    fn draw_cross(&mut self, row: usize, col: usize) {
        let left = col as f32 * CELL_PIXELS + CROSS_INSET;
        let right = (col + 1) as f32 * CELL_PIXELS - CROSS_INSET;
        let top = row as f32 * CELL_PIXELS + CROSS_INSET;
        let bottom = (row + 1) as f32 * CELL_PIXELS - CROSS_INSET;

        draw_line(left, top, right, bottom, CROSS_WIDTH, CROSS_COLOR);
        draw_line(left, bottom, right, top, CROSS_WIDTH, CROSS_COLOR);
    }

    fn draw_circle(&mut self, row: usize, col: usize) {
        let (x, y) = cell_center(row, col);
        draw_circle_lines(x, y, CIRCLE_RADIUS, CIRCLE_WIDTH, CIRCLE_COLOR);
    }

    fn draw_status(&mut self, text: &str) {
        draw_rectangle(0.0, BOARD_PIXELS, self.width, self.height - BOARD_PIXELS, BG_COLOR);

        let dims = measure_text(text, None, FONT_SIZE as u16, 1.0);
        let x = self.width / 2.0 - dims.width / 2.0;
        let y = BOARD_PIXELS + STATUS_BAR_PIXELS / 2.0 + dims.offset_y / 2.0;
        draw_text(text, x, y, FONT_SIZE, WHITE);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for Renderer {
    fn render(&mut self, state: &RenderState<'_>) {
        clear_background(BG_COLOR);

        self.draw_grid();
        self.draw_marks(state.board);
        self.draw_status(&status_text(state));
    }
}
