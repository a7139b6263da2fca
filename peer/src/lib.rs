//! # Tic-Tac-Toe Peer Library
//!
//! This library provides everything one side of a networked tic-tac-toe match
//! needs: the TCP transport, the turn-synchronised game loop, input mapping and
//! rendering. Two processes run the same binary; one hosts and one joins.
//!
//! ## Architecture Overview
//!
//! ### Roles
//! The host listens on a fixed port and plays `X`; the joiner connects and
//! plays `O`. The host always moves first. Roles are fixed at startup and a
//! connection is never re-established.
//!
//! ### Turn Synchronisation
//! Each side applies its own move locally, then sends it as a single frame.
//! The receiving side applies it as the opponent's move. There are no
//! sequence numbers or acknowledgements: ordering comes from TCP. A move the
//! local board refuses means the peers disagree about the game, which ends it.
//!
//! ### Concurrency
//! The game loop runs on the render thread at a fixed tick rate. A single
//! background task per connection reads frames and pushes moves into an
//! unbounded queue. The loop polls that queue with a short timeout each tick,
//! so a stalled peer never stalls rendering. The board is only touched by the
//! game loop.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! - Host/joiner connection setup (`establish`, `Listener`, `Connection`)
//! - Frame reads and writes on top of the `shared` codec
//! - The background receive task and its inbound queue
//!
//! ### Game Module (`game`)
//! - `Session`: phases, local and remote move application
//! - `GameLoop`: one tick of input, network and render
//!
//! ### Input Module (`input`)
//! - Pointer and quit events from the window
//! - Pixel to cell mapping
//!
//! ### Rendering Module (`rendering`)
//! - The `Presenter` seam and the macroquad `Renderer`
//! - Status banner text
//!
//! ### Error Module (`error`)
//! - `TransportError` and `PeerError`
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use peer::game::{GameLoop, Session, TickStatus};
//! use peer::network::establish;
//! use peer::rendering::{Presenter, RenderState};
//! use shared::Role;
//!
//! struct Headless;
//!
//! impl Presenter for Headless {
//!     fn render(&mut self, _state: &RenderState<'_>) {}
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connection = establish(Role::Joiner, "127.0.0.1:5555".parse()?).await?;
//!     let mut game = GameLoop::new(Session::new(Role::Joiner), connection);
//!
//!     while game.tick(&[], &mut Headless).await? == TickStatus::Continue {}
//!
//!     game.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
