use std::fmt;

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::PieceKind;

/// Supplies the kind of every newly generated piece.
///
/// The engine draws one kind per spawn through this trait, so tests and
/// replays can inject a deterministic sequence instead of a random one.
pub trait PieceSource: fmt::Debug + Send {
    /// Returns the kind of the next piece to generate.
    fn next_kind(&mut self) -> PieceKind;
}

/// Draws piece kinds uniformly at random from `[0, 6]`.
#[derive(Debug, Clone)]
pub struct RandomPieceSource<R = Pcg32> {
    rng: R,
}

impl RandomPieceSource<Pcg32> {
    /// Creates a reproducible source: the same seed yields the same sequence.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }
}

impl<R> RandomPieceSource<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> PieceSource for RandomPieceSource<R>
where
    R: Rng + fmt::Debug + Send,
{
    fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// Cycles through a fixed list of kinds, starting over at the end.
#[derive(Debug, Clone)]
pub struct FixedPieceSource {
    kinds: Vec<PieceKind>,
    next: usize,
}

impl FixedPieceSource {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn new<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "FixedPieceSource needs at least one kind");
        Self { kinds, next: 0 }
    }
}

impl PieceSource for FixedPieceSource {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.kinds[self.next];
        self.next = (self.next + 1) % self.kinds.len();
        kind
    }
}
