use serde::Serialize;

use crate::{
    core::{BOARD_HEIGHT, BOARD_WIDTH, piece::Piece},
    engine::{game_engine::EngineState, game_stats::GameStats},
};

/// Point-in-time copy of a game, as read by a presentation layer.
///
/// `grid` uses the numeric cell encoding: `0` for empty, `kind + 1` for a
/// locked block. Row 0 is the top of the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub grid: [[u8; BOARD_WIDTH]; BOARD_HEIGHT],
    pub current_piece: Piece,
    pub next_piece: Piece,
    pub state: EngineState,
    pub ai_enabled: bool,
    pub stats: GameStats,
}
