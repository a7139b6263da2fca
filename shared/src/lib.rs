use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod board;
pub mod codec;

pub use board::{check_outcome, Board, Grid, IllegalMove, Outcome};
pub use codec::{decode_move, encode_move, payload_len, CodecError};

pub const BOARD_SIZE: usize = 3;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5555;
pub const TICK_RATE_HZ: u32 = 30;
pub const POLL_TIMEOUT_MS: u64 = 10;
pub const CONNECT_TIMEOUT_SECS: u64 = 10;
pub const FRAME_HEADER_LEN: usize = 4;
pub const MAX_FRAME_LEN: usize = 64;

/// The symbol a player writes into a cell. `X` always belongs to the host.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Which side of the connection this process plays. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Joiner,
}

impl Role {
    pub fn from_server_flag(server: bool) -> Self {
        if server {
            Role::Host
        } else {
            Role::Joiner
        }
    }

    pub fn mark(self) -> Mark {
        match self {
            Role::Host => Mark::X,
            Role::Joiner => Mark::O,
        }
    }

    pub fn moves_first(self) -> bool {
        self == Role::Host
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => write!(f, "host"),
            Role::Joiner => write!(f, "joiner"),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cell ({row}, {col}) is outside the 3x3 board")]
pub struct CoordinateError {
    pub row: u8,
    pub col: u8,
}

/// A single move: the only payload exchanged once the connection is up.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    row: u8,
    col: u8,
}

impl Move {
    pub fn new(row: u8, col: u8) -> Result<Self, CoordinateError> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Ok(Self { row, col })
        } else {
            Err(CoordinateError { row, col })
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
