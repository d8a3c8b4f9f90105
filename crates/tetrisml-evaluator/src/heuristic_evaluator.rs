//! Greedy placement search scored by a linear board heuristic.
//!
//! For every rotation (always four forward-rotation counts, even for pieces
//! with fewer distinct states) and every anchor column from `-2` to the
//! right edge, the piece is hard-dropped onto a copy of the board and the
//! resulting board is scored with [`HeuristicEvaluator::evaluate`]. Full
//! lines are scored but not cleared.
//!
//! Ties keep the first candidate found, so on an empty board the horizontal
//! I piece goes to column 0 rather than column 6.
//!
//! ```
//! use tetrisml_engine::{Board, Piece, PieceKind};
//! use tetrisml_evaluator::heuristic_evaluator::HeuristicEvaluator;
//!
//! let evaluator = HeuristicEvaluator::default();
//! let best = evaluator.find_best_move(&Board::EMPTY, Piece::new(PieceKind::I));
//! assert_eq!((best.rotation_count(), best.translation_x()), (1, 0));
//! ```

use tetrisml_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, MovePlanner, Piece, PossibleMove};
use tracing::trace;

use crate::{board_analysis::BoardAnalysis, weights::AiParameters};

/// Number of forward-rotation counts tried per piece.
pub const SEARCH_ROTATIONS: usize = 4;
/// Leftmost anchor column tried.
pub const SEARCH_MIN_X: i32 = -2;

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const WIDTH_I32: i32 = BOARD_WIDTH as i32;
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const HEIGHT_I32: i32 = BOARD_HEIGHT as i32;

#[derive(Debug, Clone, Default)]
pub struct HeuristicEvaluator {
    parameters: AiParameters,
}

impl HeuristicEvaluator {
    #[must_use]
    pub fn new(parameters: AiParameters) -> Self {
        Self { parameters }
    }

    #[must_use]
    pub fn parameters(&self) -> &AiParameters {
        &self.parameters
    }

    /// Returns the highest-scoring placement of `piece`.
    ///
    /// If no placement is possible the result is [`PossibleMove::UNSCORED`].
    #[must_use]
    pub fn find_best_move(&self, board: &Board, piece: Piece) -> PossibleMove {
        let mut best = PossibleMove::UNSCORED;
        for rotation in 0..SEARCH_ROTATIONS {
            let rotated = piece.rotated_forward_times(rotation);
            for x in SEARCH_MIN_X..WIDTH_I32 {
                let Some(dropped) = Self::simulate_hard_drop(board, rotated, x) else {
                    continue;
                };
                let score = self.evaluate(&dropped);
                if score > best.score() {
                    best = PossibleMove::new(rotation, x, score);
                }
            }
        }
        trace!(
            kind = ?piece.kind(),
            rotation = best.rotation_count(),
            x = best.translation_x(),
            score = best.score(),
            "best move"
        );
        best
    }

    /// Drops `piece` straight down in column `x` and returns the board with
    /// the piece locked.
    ///
    /// The piece descends from row 0 and settles one row above the first
    /// invalid row. If even the settled position is invalid there is no
    /// placement and `None` is returned. When row 0 is already invalid the
    /// piece settles at row -1, where blocks above the board are dropped on
    /// lock.
    #[must_use]
    pub fn simulate_hard_drop(board: &Board, piece: Piece, x: i32) -> Option<Board> {
        let column = piece.with_x(x);
        let mut settled = column.with_y(0);
        for y in 0..HEIGHT_I32 {
            let candidate = column.with_y(y);
            if !board.is_valid_position(candidate) {
                settled = column.with_y(y - 1);
                break;
            }
            settled = candidate;
        }

        if !board.is_valid_position(settled) {
            return None;
        }
        let mut dropped = board.clone();
        dropped.lock(settled);
        Some(dropped)
    }

    /// Weighted sum of the board's surface metrics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn evaluate(&self, board: &Board) -> f64 {
        let analysis = BoardAnalysis::from_board(board);
        let AiParameters {
            height,
            holes,
            complete_lines,
            bumpiness,
        } = self.parameters;
        height * analysis.aggregate_height() as f64
            + holes * analysis.num_holes() as f64
            + complete_lines * analysis.complete_lines() as f64
            + bumpiness * analysis.bumpiness() as f64
    }
}

impl MovePlanner for HeuristicEvaluator {
    type Parameters = AiParameters;

    fn find_best_move(&self, board: &Board, piece: Piece) -> PossibleMove {
        HeuristicEvaluator::find_best_move(self, board, piece)
    }

    fn update_parameters(&mut self, parameters: AiParameters) {
        self.parameters = parameters;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tetrisml_engine::{PieceKind, PiecePosition};

    use super::*;

    fn full_rows(n: usize, row: &str) -> Board {
        let mut art = String::new();
        for _ in 0..n {
            art.push_str(row);
            art.push('\n');
        }
        Board::from_ascii(&art)
    }

    #[test]
    fn test_i_piece_on_empty_board_lies_flat_at_left_edge() {
        let evaluator = HeuristicEvaluator::default();
        let best = evaluator.find_best_move(&Board::EMPTY, Piece::new(PieceKind::I));

        assert_eq!(best.rotation_count(), 1);
        assert_eq!(best.translation_x(), 0);
        let expected = -0.510_066 * 4.0 + -0.184_483 * 1.0;
        assert!((best.score() - expected).abs() < 1e-9, "{}", best.score());
    }

    #[test]
    fn test_i_piece_fills_well() {
        let board = full_rows(4, "#########.");
        let evaluator = HeuristicEvaluator::default();
        let best = evaluator.find_best_move(&board, Piece::new(PieceKind::I));
        assert_eq!(best.rotation_count(), 0);
        assert_eq!(best.translation_x(), 9);
    }

    #[test]
    fn test_updated_parameters_change_choice() {
        // 3-deep well at the right edge.
        let board = full_rows(3, "#########.");
        let mut evaluator = HeuristicEvaluator::default();
        let best = evaluator.find_best_move(&board, Piece::new(PieceKind::I));
        assert_eq!((best.rotation_count(), best.translation_x()), (0, 9));

        // Rewarding bumpiness favors a vertical I sticking out of the stack.
        MovePlanner::update_parameters(
            &mut evaluator,
            AiParameters {
                height: 0.0,
                holes: 0.0,
                complete_lines: 0.0,
                bumpiness: 1.0,
            },
        );
        let best = MovePlanner::find_best_move(&evaluator, &board, Piece::new(PieceKind::I));
        // Heights 3,7,3,3,3,3,3,3,3,0
        assert_eq!((best.rotation_count(), best.translation_x()), (0, 1));
        assert_eq!(best.score(), 11.0);
    }

    #[test]
    fn test_hard_drop_lands_on_stack() {
        let board = full_rows(1, "##########");
        let dropped =
            HeuristicEvaluator::simulate_hard_drop(&board, Piece::new(PieceKind::O), 0).unwrap();
        assert_eq!(
            dropped,
            Board::from_ascii(
                "
                OO........
                OO........
                ##########
                "
            )
        );
        // The source board is untouched.
        assert_eq!(board, full_rows(1, "##########"));
    }

    #[test]
    fn test_hard_drop_ignores_starting_row() {
        let piece = Piece::from_parts(PieceKind::T, PiecePosition::new(7, 12), 2);
        let dropped = HeuristicEvaluator::simulate_hard_drop(&Board::EMPTY, piece, 3).unwrap();
        assert_eq!(
            dropped,
            Board::from_ascii(
                "
                ...TTT....
                ....T.....
                "
            )
        );
    }

    #[test]
    fn test_hard_drop_out_of_columns_is_none() {
        let board = Board::EMPTY;
        let horizontal = Piece::from_parts(PieceKind::I, PiecePosition::SPAWN_POSITION, 1);
        assert!(HeuristicEvaluator::simulate_hard_drop(&board, horizontal, -1).is_none());
        assert!(HeuristicEvaluator::simulate_hard_drop(&board, horizontal, 7).is_none());
        assert!(HeuristicEvaluator::simulate_hard_drop(&board, horizontal, 6).is_some());
    }

    #[test]
    fn test_hard_drop_on_full_board() {
        let board = full_rows(BOARD_HEIGHT, "##########");
        let o = Piece::new(PieceKind::O);
        assert!(HeuristicEvaluator::simulate_hard_drop(&board, o, 4).is_none());

        // A flat piece blocked at row 0 settles at row -1 entirely above the
        // board: it is a valid placement that locks nothing.
        let horizontal = Piece::from_parts(PieceKind::I, PiecePosition::SPAWN_POSITION, 1);
        let dropped = HeuristicEvaluator::simulate_hard_drop(&board, horizontal, 0).unwrap();
        assert_eq!(dropped, board);
    }

    #[test]
    fn test_no_placement_returns_unscored() {
        let board = full_rows(BOARD_HEIGHT, "##########");
        let evaluator = HeuristicEvaluator::default();
        let best = evaluator.find_best_move(&board, Piece::new(PieceKind::O));
        assert_eq!(best, PossibleMove::UNSCORED);
    }

    #[test]
    fn test_evaluate_counts_full_lines_without_clearing() {
        let board = full_rows(1, "##########");
        let evaluator = HeuristicEvaluator::default();
        let expected = -0.510_066 * 10.0 + 0.760_666;
        assert!((evaluator.evaluate(&board) - expected).abs() < 1e-9);
    }

    fn any_stack() -> impl Strategy<Value = Board> {
        prop::collection::vec(prop::collection::vec(any::<bool>(), BOARD_WIDTH), 0..8).prop_map(
            |rows| {
                let art: String = rows
                    .iter()
                    .map(|row| {
                        let mut line: String =
                            row.iter().map(|&b| if b { '#' } else { '.' }).collect();
                        line.push('\n');
                        line
                    })
                    .collect();
                Board::from_ascii(&art)
            },
        )
    }

    proptest! {
        #[test]
        fn best_move_score_reproduces(board in any_stack(), kind in 0..PieceKind::LEN) {
            let evaluator = HeuristicEvaluator::default();
            let piece = Piece::new(PieceKind::ALL[kind]);
            let best = evaluator.find_best_move(&board, piece);
            prop_assume!(best.score().is_finite());

            let rotated = piece.rotated_forward_times(best.rotation_count());
            let dropped = HeuristicEvaluator::simulate_hard_drop(&board, rotated, best.translation_x());
            prop_assert!(dropped.is_some());
            prop_assert_eq!(evaluator.evaluate(&dropped.unwrap()), best.score());
        }

        #[test]
        fn best_move_is_not_beaten(board in any_stack(), kind in 0..PieceKind::LEN) {
            let evaluator = HeuristicEvaluator::default();
            let piece = Piece::new(PieceKind::ALL[kind]);
            let best = evaluator.find_best_move(&board, piece);
            for rotation in 0..SEARCH_ROTATIONS {
                for x in SEARCH_MIN_X..WIDTH_I32 {
                    let rotated = piece.rotated_forward_times(rotation);
                    if let Some(dropped) = HeuristicEvaluator::simulate_hard_drop(&board, rotated, x) {
                        prop_assert!(evaluator.evaluate(&dropped) <= best.score());
                    }
                }
            }
        }
    }
}
