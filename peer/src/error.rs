//! Error types for the transport and the game loop

use shared::{CodecError, IllegalMove, Move};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Transport failures. Every variant is fatal for the running game.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to accept a peer on {addr}: {source}")]
    Accept {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("timed out connecting to {addr} after {timeout:?}")]
    ConnectTimeout { addr: SocketAddr, timeout: Duration },

    #[error("failed to send move: {0}")]
    Send(#[source] io::Error),

    #[error("failed to receive move: {0}")]
    Receive(#[source] io::Error),

    #[error("malformed frame: {0}")]
    Frame(#[from] CodecError),

    #[error("connection closed by peer")]
    Closed,
}

impl TransportError {
    /// True for failures while setting the connection up.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            TransportError::Bind { .. }
                | TransportError::Accept { .. }
                | TransportError::Connect { .. }
                | TransportError::ConnectTimeout { .. }
        )
    }
}

/// Errors that end a game loop.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("peer sent move {mv} that does not fit the board: {source}")]
    Desync {
        mv: Move,
        #[source]
        source: IllegalMove,
    },
}
