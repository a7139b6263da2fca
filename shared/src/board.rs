//! Board state machine: the 3x3 grid, turn ownership, move legality and outcome detection

use crate::{Mark, BOARD_SIZE};
use std::fmt;
use thiserror::Error;

pub type Grid = [[Option<Mark>; BOARD_SIZE]; BOARD_SIZE];

/// Every line that wins the game, in the order it is examined.
/// Rows first, then columns, then the main and anti diagonal.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won(Mark),
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "in progress"),
            Outcome::Won(mark) => write!(f, "{} wins", mark),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// Reasons a move is refused. The board is left untouched in every case.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfRange { row: usize, col: usize },
    #[error("cell ({row}, {col}) is already taken")]
    Occupied { row: usize, col: usize },
    #[error("the game is already over")]
    GameOver,
    #[error("it is not {mark}'s turn")]
    NotYourTurn { mark: Mark },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Grid,
    turn: Mark,
    outcome: Outcome,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            turn: Mark::X,
            outcome: Outcome::InProgress,
        }
    }

    /// Builds a board from an arbitrary grid. The outcome is recomputed, so
    /// the grid does not have to be reachable through legal play.
    pub fn from_cells(cells: Grid, turn: Mark) -> Self {
        Self {
            cells,
            turn,
            outcome: check_outcome(&cells),
        }
    }

    /// Places `mark` at (`row`, `col`) if the move is legal, flips the turn
    /// and returns the recomputed outcome.
    pub fn apply_move(&mut self, row: usize, col: usize, mark: Mark) -> Result<Outcome, IllegalMove> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(IllegalMove::OutOfRange { row, col });
        }
        if self.outcome.is_terminal() {
            return Err(IllegalMove::GameOver);
        }
        if mark != self.turn {
            return Err(IllegalMove::NotYourTurn { mark });
        }
        if self.cells[row][col].is_some() {
            return Err(IllegalMove::Occupied { row, col });
        }

        self.cells[row][col] = Some(mark);
        self.turn = self.turn.opponent();
        self.outcome = check_outcome(&self.cells);
        Ok(self.outcome)
    }

    pub fn cells(&self) -> &Grid {
        &self.cells
    }

    /// Returns `None` for empty cells and for coordinates off the board.
    pub fn cell(&self, row: usize, col: usize) -> Option<Mark> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_full(&self) -> bool {
        is_full(&self.cells)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn is_full(cells: &Grid) -> bool {
    cells.iter().flatten().all(Option::is_some)
}

/// Pure function of the grid. If a corrupted grid holds more than one
/// complete line, the first line in `LINES` order decides the winner.
pub fn check_outcome(cells: &Grid) -> Outcome {
    for line in LINES {
        let [a, b, c] = line.map(|(row, col)| cells[row][col]);
        if let Some(mark) = a {
            if b == Some(mark) && c == Some(mark) {
                return Outcome::Won(mark);
            }
        }
    }

    if is_full(cells) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Option<Mark> = Some(Mark::X);
    const O: Option<Mark> = Some(Mark::O);
    const E: Option<Mark> = None;

    fn play(board: &mut Board, moves: &[(usize, usize)]) -> Outcome {
        let mut outcome = board.outcome();
        for &(row, col) in moves {
            let mark = board.turn();
            outcome = board.apply_move(row, col, mark).unwrap();
        }
        outcome
    }

    #[test]
    fn test_board_creation() {
        let board = Board::new();
        assert_eq!(board.turn(), Mark::X);
        assert_eq!(board.outcome(), Outcome::InProgress);
        assert!(board.cells().iter().flatten().all(Option::is_none));
        assert!(!board.is_full());
    }

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(check_outcome(&[[E; 3]; 3]), Outcome::InProgress);
    }

    #[test]
    fn test_top_row_win() {
        let grid = [[X, X, X], [E, E, E], [E, E, E]];
        assert_eq!(check_outcome(&grid), Outcome::Won(Mark::X));
    }

    #[test]
    fn test_column_and_diagonal_wins() {
        let column = [[E, O, E], [X, O, E], [X, O, X]];
        assert_eq!(check_outcome(&column), Outcome::Won(Mark::O));

        let diagonal = [[X, O, E], [O, X, E], [E, E, X]];
        assert_eq!(check_outcome(&diagonal), Outcome::Won(Mark::X));

        let anti_diagonal = [[X, X, O], [E, O, E], [O, E, X]];
        assert_eq!(check_outcome(&anti_diagonal), Outcome::Won(Mark::O));
    }

    #[test]
    fn test_full_board_draw() {
        let grid = [[X, O, X], [X, O, O], [O, X, X]];
        assert_eq!(check_outcome(&grid), Outcome::Draw);
    }

    #[test]
    fn test_win_on_last_cell_beats_draw() {
        let grid = [[X, O, X], [O, X, O], [O, X, X]];
        assert_eq!(check_outcome(&grid), Outcome::Won(Mark::X));
    }

    #[test]
    fn test_double_win_first_line_takes_precedence() {
        // Unreachable through legal play: row 0 is X, row 2 is O.
        let grid = [[X, X, X], [E, E, E], [O, O, O]];
        assert_eq!(check_outcome(&grid), Outcome::Won(Mark::X));

        // Column 0 (O) is examined before column 2 (X).
        let grid = [[O, E, X], [O, E, X], [O, E, X]];
        assert_eq!(check_outcome(&grid), Outcome::Won(Mark::O));
    }

    #[test]
    fn test_check_outcome_is_idempotent() {
        let grids = [
            [[E; 3]; 3],
            [[X, X, X], [O, O, E], [E, E, E]],
            [[X, O, X], [X, O, O], [O, X, X]],
        ];
        for grid in grids.iter() {
            let before = *grid;
            assert_eq!(check_outcome(grid), check_outcome(grid));
            assert_eq!(*grid, before);
        }
    }

    #[test]
    fn test_apply_move_sets_cell_and_flips_turn() {
        let mut board = Board::new();
        let outcome = board.apply_move(0, 0, Mark::X).unwrap();

        assert_eq!(outcome, Outcome::InProgress);
        assert_eq!(board.cell(0, 0), Some(Mark::X));
        assert_eq!(board.turn(), Mark::O);
    }

    #[test]
    fn test_not_your_turn_leaves_board_unchanged() {
        let mut board = Board::new();
        let before = board.clone();

        let result = board.apply_move(1, 1, Mark::O);

        assert_eq!(result, Err(IllegalMove::NotYourTurn { mark: Mark::O }));
        assert_eq!(board, before);
    }

    #[test]
    fn test_occupied_cell_is_never_overwritten() {
        let mut board = Board::new();
        board.apply_move(1, 1, Mark::X).unwrap();
        let before = board.clone();

        let result = board.apply_move(1, 1, Mark::O);

        assert_eq!(result, Err(IllegalMove::Occupied { row: 1, col: 1 }));
        assert_eq!(board, before);
        assert_eq!(board.cell(1, 1), Some(Mark::X));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut board = Board::new();
        assert_eq!(
            board.apply_move(3, 0, Mark::X),
            Err(IllegalMove::OutOfRange { row: 3, col: 0 })
        );
        assert_eq!(
            board.apply_move(0, 7, Mark::X),
            Err(IllegalMove::OutOfRange { row: 0, col: 7 })
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_no_moves_after_win() {
        let mut board = Board::new();
        // X: (0,0) (0,1) (0,2), O: (1,0) (1,1)
        let outcome = play(&mut board, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(outcome, Outcome::Won(Mark::X));
        let before = board.clone();

        assert_eq!(board.apply_move(2, 2, Mark::O), Err(IllegalMove::GameOver));
        assert_eq!(board, before);
    }

    #[test]
    fn test_full_game_to_draw() {
        let mut board = Board::new();
        let outcome = play(
            &mut board,
            &[(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)],
        );
        assert_eq!(outcome, Outcome::Draw);
        assert!(board.is_full());
        assert_eq!(board.apply_move(0, 0, Mark::O), Err(IllegalMove::GameOver));
    }

    #[test]
    fn test_turn_strictly_alternates_from_x() {
        let mut board = Board::new();
        let order = [(1, 1), (0, 0), (2, 2), (0, 2), (0, 1), (2, 1), (1, 0), (1, 2), (2, 0)];
        let mut expected = Mark::X;

        for &(row, col) in order.iter() {
            if board.outcome().is_terminal() {
                break;
            }
            assert_eq!(board.turn(), expected);
            assert_eq!(
                board.apply_move(row, col, expected.opponent()),
                Err(IllegalMove::NotYourTurn { mark: expected.opponent() })
            );
            board.apply_move(row, col, expected).unwrap();
            assert_eq!(board.cell(row, col), Some(expected));
            expected = expected.opponent();
        }
    }

    #[test]
    fn test_rejected_moves_never_change_filled_cells() {
        let mut board = Board::new();
        play(&mut board, &[(0, 0), (1, 1), (2, 2)]);

        for row in 0..3 {
            for col in 0..3 {
                let before = board.cell(row, col);
                if before.is_none() {
                    continue;
                }
                for mark in [Mark::X, Mark::O] {
                    assert!(board.apply_move(row, col, mark).is_err());
                    assert_eq!(board.cell(row, col), before);
                }
            }
        }
    }

    #[test]
    fn test_from_cells_recomputes_outcome() {
        let board = Board::from_cells([[O, O, O], [X, X, E], [X, E, E]], Mark::X);
        assert_eq!(board.outcome(), Outcome::Won(Mark::O));
        assert_eq!(board.turn(), Mark::X);
    }

    #[test]
    fn test_cell_off_board_is_none() {
        let board = Board::new();
        assert_eq!(board.cell(3, 3), None);
    }
}
