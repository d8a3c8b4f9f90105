//! Falling-block puzzle engine.
//!
//! [`core`] holds the board and piece geometry, [`engine`] the tick-driven
//! game built on top of them. Move search lives behind the
//! [`MovePlanner`] trait so that evaluators can be plugged in from other
//! crates.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board or walls")]
pub struct PieceCollisionError;
