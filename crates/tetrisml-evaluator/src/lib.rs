//! Heuristic AI for the tetrisml engine.
//!
//! The evaluator plugs into [`tetrisml_engine::GameEngine`] through the
//! [`tetrisml_engine::MovePlanner`] trait:
//!
//! - [`heuristic_evaluator`] - Tries every rotation and column, hard-drops the
//!   piece onto a copy of the board and keeps the best-scoring placement
//! - [`board_analysis`] - Lazily computed board metrics (column heights,
//!   holes, complete lines, bumpiness)
//! - [`weights`] - The four weights of the linear score, with JSON and
//!   comma-separated string forms
//!
//! # Example
//!
//! ```
//! use tetrisml_engine::{GameEngine, RandomPieceSource};
//! use tetrisml_evaluator::{AiParameters, HeuristicEvaluator};
//!
//! let mut engine = GameEngine::new(
//!     HeuristicEvaluator::new(AiParameters::default()),
//!     RandomPieceSource::seeded(7),
//! );
//! engine.toggle_ai();
//! engine.start_game();
//! for _ in 0..100 {
//!     engine.tick();
//! }
//! assert!(engine.stats().completed_pieces() > 0);
//! ```

pub use self::{board_analysis::BoardAnalysis, heuristic_evaluator::HeuristicEvaluator, weights::*};

pub mod board_analysis;
pub mod heuristic_evaluator;
pub mod weights;
