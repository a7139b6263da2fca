//! Turn-synchronised game loop

use crate::error::PeerError;
use crate::input::{cell_at, InputEvent};
use crate::network::Connection;
use crate::rendering::{Presenter, RenderState};
use log::{debug, info};
use shared::{Board, IllegalMove, Mark, Move, Outcome, Role, POLL_TIMEOUT_MS};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingConnection,
    MyTurn,
    OpponentTurn,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    Quit,
}

/// Local view of the match: the board plus whose turn it is from this
/// process's point of view. Touched only by the game loop.
#[derive(Debug, Clone)]
pub struct Session {
    role: Role,
    board: Board,
    phase: Phase,
}

impl Session {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            board: Board::new(),
            phase: Phase::AwaitingConnection,
        }
    }

    /// Called once the connection is up. The host always moves first.
    pub fn begin(&mut self) {
        if self.phase != Phase::AwaitingConnection {
            return;
        }

        self.phase = if self.role.moves_first() {
            Phase::MyTurn
        } else {
            Phase::OpponentTurn
        };
        info!("Game started as {} playing {}", self.role, self.local_mark());
    }

    /// Applies a local click on (`row`, `col`) and returns the move to send.
    pub fn play_local(&mut self, row: u8, col: u8) -> Result<Move, IllegalMove> {
        match self.phase {
            Phase::MyTurn => {}
            Phase::GameOver => return Err(IllegalMove::GameOver),
            Phase::AwaitingConnection | Phase::OpponentTurn => {
                return Err(IllegalMove::NotYourTurn {
                    mark: self.local_mark(),
                })
            }
        }

        let mv = Move::new(row, col).map_err(|e| IllegalMove::OutOfRange {
            row: e.row as usize,
            col: e.col as usize,
        })?;
        let outcome = self
            .board
            .apply_move(row as usize, col as usize, self.local_mark())?;
        self.advance(outcome, Phase::OpponentTurn);
        Ok(mv)
    }

    /// Applies a move received from the opponent. Moves arriving after the
    /// game has ended are dropped.
    pub fn play_remote(&mut self, mv: Move) -> Result<(), IllegalMove> {
        let opponent = self.local_mark().opponent();
        match self.phase {
            Phase::GameOver => {
                debug!("Ignoring move {} after game over", mv);
                return Ok(());
            }
            Phase::AwaitingConnection => return Err(IllegalMove::NotYourTurn { mark: opponent }),
            Phase::MyTurn | Phase::OpponentTurn => {}
        }

        let outcome = self
            .board
            .apply_move(mv.row() as usize, mv.col() as usize, opponent)?;
        self.advance(outcome, Phase::MyTurn);
        Ok(())
    }

    fn advance(&mut self, outcome: Outcome, next: Phase) {
        if outcome.is_terminal() {
            info!("Game over: {}", outcome);
            self.phase = Phase::GameOver;
        } else {
            self.phase = next;
        }
    }

    pub fn view(&self) -> RenderState<'_> {
        RenderState {
            board: &self.board,
            turn_owner: self.board.turn(),
            outcome: self.board.outcome(),
            local_mark: self.local_mark(),
            phase: self.phase,
        }
    }

    pub fn local_mark(&self) -> Mark {
        self.role.mark()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// Drives one game over an established connection. Owns the connection;
/// the receive task's queue is the only state shared with another task.
pub struct GameLoop {
    session: Session,
    connection: Connection,
    poll_timeout: Duration,
    peer_gone: bool,
}

impl GameLoop {
    pub fn new(mut session: Session, connection: Connection) -> Self {
        session.begin();
        Self {
            session,
            connection,
            poll_timeout: Duration::from_millis(POLL_TIMEOUT_MS),
            peer_gone: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// One iteration: local input, then the network, then a render pass.
    /// Errors are fatal for this game; the caller decides how to exit.
    pub async fn tick<P: Presenter>(
        &mut self,
        events: &[InputEvent],
        presenter: &mut P,
    ) -> Result<TickStatus, PeerError> {
        let mut status = TickStatus::Continue;

        for event in events {
            match *event {
                InputEvent::QuitRequested => {
                    info!("Quit requested");
                    status = TickStatus::Quit;
                }
                InputEvent::PointerClick { x, y } => self.handle_click(x, y).await?,
            }
        }

        self.poll_network().await?;

        presenter.render(&self.session.view());
        Ok(status)
    }

    async fn handle_click(&mut self, x: f32, y: f32) -> Result<(), PeerError> {
        if self.session.phase() != Phase::MyTurn {
            return Ok(());
        }
        let Some((row, col)) = cell_at(x, y) else {
            return Ok(());
        };

        match self.session.play_local(row, col) {
            Ok(mv) => self.connection.send(mv).await?,
            Err(e) => debug!("Ignoring click on ({}, {}): {}", row, col, e),
        }
        Ok(())
    }

    async fn poll_network(&mut self) -> Result<(), PeerError> {
        if self.peer_gone {
            return Ok(());
        }

        match self.connection.try_receive(self.poll_timeout).await {
            Ok(Some(mv)) => self
                .session
                .play_remote(mv)
                .map_err(|source| PeerError::Desync { mv, source }),
            Ok(None) => Ok(()),
            Err(e) if self.session.phase() == Phase::GameOver => {
                info!("Peer left after the game ended: {}", e);
                self.peer_gone = true;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn shutdown(self) {
        self.connection.shutdown().await;
    }
}
