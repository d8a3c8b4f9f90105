use std::{
    mem,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::{
    PieceCollisionError,
    core::{
        BOARD_HEIGHT,
        board::{Board, BoardRow},
        piece::Piece,
    },
};

use super::{
    game_stats::GameStats,
    piece_source::PieceSource,
    planner::{MovePlanner, PossibleMove},
    snapshot::GameSnapshot,
};

/// Minimum wall-clock time between two AI actions.
pub const AI_MOVE_DELAY: Duration = Duration::from_millis(100);

/// Nominal cadence at which the external scheduler calls [`GameEngine::tick`].
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Lifecycle of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum EngineState {
    #[display("idle")]
    Idle,
    #[display("running")]
    Running,
    #[display("paused")]
    Paused,
    #[display("game over")]
    GameOver,
}

/// Outcome of a single [`GameEngine::apply_ai_move`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiStep {
    /// The piece was rotated once (the rotation may have been reverted).
    Rotated,
    /// A one-cell horizontal move toward the target was attempted.
    Shifted { dx: i32, moved: bool },
    /// Rotation and column already match the target.
    AtTarget,
}

/// Single-player game driven by an external periodic tick.
///
/// The engine owns the board, the falling piece, the preview piece, the
/// score and the AI planner. It never starts a timer: the caller invokes
/// [`GameEngine::tick`] on its own cadence (nominally
/// [`DEFAULT_TICK_INTERVAL`]) and reads state between ticks.
///
/// Each running tick:
///
/// 1. lets the AI (if enabled) either plan a move for the current piece or
///    take one step toward the planned move, at most once per
///    [`AI_MOVE_DELAY`],
/// 2. applies gravity, and when the piece cannot descend locks it, clears
///    full lines, promotes the preview piece and draws a new one,
/// 3. ends the game if the current piece is in an invalid position.
///
/// Commands never fail loudly: invalid moves are reported as `false` and
/// leave the state untouched.
///
/// # Example
///
/// ```
/// # use tetrisml_engine::{Board, GameEngine, FixedPieceSource, MovePlanner, Piece, PieceKind, PossibleMove};
/// # #[derive(Debug)]
/// # struct Noop;
/// # impl MovePlanner for Noop {
/// #     type Parameters = ();
/// #     fn find_best_move(&self, _: &Board, _: Piece) -> PossibleMove { PossibleMove::UNSCORED }
/// #     fn update_parameters(&mut self, (): ()) {}
/// # }
/// let mut engine = GameEngine::new(Noop, FixedPieceSource::new([PieceKind::O]));
/// engine.start_game();
/// engine.tick();
/// assert_eq!(engine.current_piece().position().y(), 1);
/// ```
#[derive(Debug)]
pub struct GameEngine<P> {
    board: Board,
    current_piece: Piece,
    next_piece: Piece,
    piece_source: Box<dyn PieceSource>,
    planner: P,
    state: EngineState,
    stats: GameStats,
    ai_enabled: bool,
    ai_move_decision: Option<PossibleMove>,
    last_ai_action: Instant,
}

impl<P> GameEngine<P> {
    /// Creates an idle game with an empty board.
    ///
    /// The current and preview pieces are drawn from `piece_source` right
    /// away, so a game always has both.
    pub fn new<S>(planner: P, piece_source: S) -> Self
    where
        S: PieceSource + 'static,
    {
        let mut piece_source: Box<dyn PieceSource> = Box::new(piece_source);
        let current_piece = Piece::new(piece_source.next_kind());
        let next_piece = Piece::new(piece_source.next_kind());
        Self {
            board: Board::EMPTY,
            current_piece,
            next_piece,
            piece_source,
            planner,
            state: EngineState::Idle,
            stats: GameStats::new(),
            ai_enabled: false,
            ai_move_decision: None,
            last_ai_action: Instant::now(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Read-only view of the locked cells, row 0 at the top.
    #[must_use]
    pub fn grid(&self) -> &[BoardRow; BOARD_HEIGHT] {
        self.board.rows()
    }

    #[must_use]
    pub fn current_piece(&self) -> &Piece {
        &self.current_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn is_ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    /// The move the AI is currently walking the piece toward, if planned.
    #[must_use]
    pub fn ai_move_decision(&self) -> Option<&PossibleMove> {
        self.ai_move_decision.as_ref()
    }

    #[must_use]
    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// Owned copy of everything a presentation layer reads.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.board.cell_values(),
            current_piece: self.current_piece,
            next_piece: self.next_piece,
            state: self.state,
            ai_enabled: self.ai_enabled,
            stats: self.stats.clone(),
        }
    }

    /// `Idle | Paused -> Running`. No effect in any other state.
    pub fn start_game(&mut self) {
        match self.state {
            EngineState::Idle | EngineState::Paused => self.set_state(EngineState::Running),
            EngineState::Running | EngineState::GameOver => {}
        }
    }

    /// `Running -> Paused`. No effect in any other state.
    pub fn pause_game(&mut self) {
        if self.state.is_running() {
            self.set_state(EngineState::Paused);
        }
    }

    /// Turns the AI on or off and drops any planned move.
    pub fn toggle_ai(&mut self) {
        self.ai_enabled = !self.ai_enabled;
        self.ai_move_decision = None;
        self.last_ai_action = Instant::now();
        info!(enabled = self.ai_enabled, "AI toggled");
    }

    /// Empties the board, zeroes the statistics, draws fresh pieces and
    /// returns to `Idle`. The AI switch and planner parameters are kept.
    pub fn reset(&mut self) {
        self.board = Board::EMPTY;
        self.current_piece = Piece::new(self.piece_source.next_kind());
        self.next_piece = Piece::new(self.piece_source.next_kind());
        self.stats = GameStats::new();
        self.ai_move_decision = None;
        self.last_ai_action = Instant::now();
        self.set_state(EngineState::Idle);
    }

    /// Moves the current piece by `(dx, dy)` if the target is valid.
    ///
    /// Returns `false` and leaves the piece untouched otherwise.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        self.try_move(dx, dy).is_ok()
    }

    /// Rotates the current piece forward, reverting if the result is invalid.
    ///
    /// There are no wall kicks, and the reverted state is not re-checked: a
    /// piece that was already in an invalid position stays there.
    pub fn rotate_piece(&mut self) {
        let rotated = self.current_piece.rotated_forward();
        self.current_piece = if self.board.is_valid_position(rotated) {
            rotated
        } else {
            rotated.rotated_backward()
        };
    }

    /// Takes one step toward `planned`.
    ///
    /// Rotation comes first: while the rotation index differs, each call
    /// rotates once. After that each call moves one column toward
    /// `planned.translation_x()`.
    pub fn apply_ai_move(&mut self, planned: PossibleMove) -> AiStep {
        if self.current_piece.rotation() != planned.rotation_count() {
            self.rotate_piece();
            return AiStep::Rotated;
        }

        let x = self.current_piece.position().x();
        if x != planned.translation_x() {
            let dx = (planned.translation_x() - x).signum();
            let moved = self.move_piece(dx, 0);
            return AiStep::Shifted { dx, moved };
        }

        AiStep::AtTarget
    }

    fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), PieceCollisionError> {
        let moved = self
            .current_piece
            .checked_moved(dx, dy)
            .ok_or(PieceCollisionError)?;
        if !self.board.is_valid_position(moved) {
            return Err(PieceCollisionError);
        }
        self.current_piece = moved;
        Ok(())
    }

    fn lock_and_spawn(&mut self) {
        self.board.lock(self.current_piece);
        let cleared_lines = self.board.clear_full_lines();
        self.stats.complete_piece_drop(cleared_lines);
        debug!(
            piece = ?self.current_piece,
            cleared_lines,
            score = self.stats.score(),
            "piece locked"
        );

        let next = Piece::new(self.piece_source.next_kind());
        self.current_piece = mem::replace(&mut self.next_piece, next);
        self.ai_move_decision = None;
    }

    fn set_state(&mut self, state: EngineState) {
        info!(from = %self.state, to = %state, "game state changed");
        self.state = state;
    }
}

impl<P> GameEngine<P>
where
    P: MovePlanner,
{
    /// Replaces the planner's parameters; used from the next plan on.
    pub fn update_ai_parameters(&mut self, parameters: P::Parameters) {
        self.planner.update_parameters(parameters);
    }

    /// Advances the game by one step, timed with the wall clock.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Advances the game by one step as if called at `now`.
    ///
    /// Only has an effect while `Running`. `now` drives the AI pacing, so
    /// callers running on simulated time should pass increasing instants.
    pub fn tick_at(&mut self, now: Instant) {
        if !self.state.is_running() {
            return;
        }
        self.stats.record_tick();
        trace!(tick = self.stats.ticks(), piece = ?self.current_piece, "tick");

        if self.ai_enabled {
            self.step_ai(now);
        }

        if !self.move_piece(0, 1) {
            self.lock_and_spawn();
        }

        if !self.board.is_valid_position(self.current_piece) {
            info!(
                score = self.stats.score(),
                pieces = self.stats.completed_pieces(),
                "spawned piece collides, game over"
            );
            self.set_state(EngineState::GameOver);
        }
    }

    fn step_ai(&mut self, now: Instant) {
        match self.ai_move_decision {
            None => {
                let planned = self
                    .planner
                    .find_best_move(&self.board, self.current_piece);
                debug!(
                    kind = ?self.current_piece.kind(),
                    rotation = planned.rotation_count(),
                    x = planned.translation_x(),
                    score = planned.score(),
                    "AI planned move"
                );
                self.ai_move_decision = Some(planned);
                self.last_ai_action = now;
            }
            Some(planned) => {
                if now.saturating_duration_since(self.last_ai_action) >= AI_MOVE_DELAY {
                    let step = self.apply_ai_move(planned);
                    trace!(?step, "AI step");
                    self.last_ai_action = now;
                }
            }
        }
    }
}
