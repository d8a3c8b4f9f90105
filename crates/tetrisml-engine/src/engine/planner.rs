use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Board, Piece};

/// A placement chosen by a move search.
///
/// `rotation_count` is the number of forward rotations applied to the piece
/// the search started from; `translation_x` is the target anchor column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PossibleMove {
    rotation_count: usize,
    translation_x: i32,
    score: f64,
}

impl PossibleMove {
    /// Starting point of a maximum search: scores below everything.
    pub const UNSCORED: Self = Self::new(0, 0, f64::NEG_INFINITY);

    #[must_use]
    pub const fn new(rotation_count: usize, translation_x: i32, score: f64) -> Self {
        Self {
            rotation_count,
            translation_x,
            score,
        }
    }

    #[must_use]
    pub const fn rotation_count(&self) -> usize {
        self.rotation_count
    }

    #[must_use]
    pub const fn translation_x(&self) -> i32 {
        self.translation_x
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }
}

/// Chooses where the current piece should go.
///
/// The engine asks its planner once per spawned piece and then walks the
/// piece toward the answer one action per tick.
pub trait MovePlanner: fmt::Debug {
    /// Tunable parameters accepted by [`MovePlanner::update_parameters`].
    type Parameters;

    /// Searches placements for `piece` on `board` and returns the best one.
    ///
    /// Must not depend on anything but its inputs and the current parameters.
    fn find_best_move(&self, board: &Board, piece: Piece) -> PossibleMove;

    /// Replaces the parameters; takes effect on the next search.
    fn update_parameters(&mut self, parameters: Self::Parameters);
}
