//! Game engine logic and state management.
//!
//! This module drives the core data structures through a game:
//!
//! - [`GameEngine`] - Tick-driven game state machine with an optional AI
//! - [`GameStats`] - Score, cleared lines and piece count
//! - [`PieceSource`] - Where new piece kinds come from
//! - [`MovePlanner`] - Seam for the AI that picks a placement per piece
//! - [`GameSnapshot`] - Serializable copy of everything a UI reads
//!
//! # Game Flow
//!
//! 1. Create a [`GameEngine`] with a planner and a piece source
//! 2. Call [`GameEngine::start_game`]
//! 3. Call [`GameEngine::tick`] periodically; between ticks a player may
//!    call [`GameEngine::move_piece`] and [`GameEngine::rotate_piece`]
//! 4. Pieces that cannot fall any further lock, full lines clear and the
//!    preview piece takes over
//! 5. The game ends when a freshly spawned piece collides
//!
//! With the AI enabled, each tick also either plans a placement for the
//! current piece or takes one step toward it.

pub use self::{game_engine::*, game_stats::*, piece_source::*, planner::*, snapshot::*};

mod game_engine;
mod game_stats;
mod piece_source;
mod planner;
mod snapshot;
