pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Width of the playable board in cells.
pub const BOARD_WIDTH: usize = 10;
/// Height of the playable board in cells.
pub const BOARD_HEIGHT: usize = 20;

/// Column where newly spawned pieces are anchored.
pub const SPAWN_X: i32 = 4;
/// Row where newly spawned pieces are anchored.
pub const SPAWN_Y: i32 = 0;
