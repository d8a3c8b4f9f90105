use serde::Serialize;

/// Points awarded for each cleared line.
pub const LINE_CLEAR_POINTS: usize = 100;

/// Game statistics tracking score, lines cleared, and piece count.
///
/// Scoring is flat: every cleared line is worth [`LINE_CLEAR_POINTS`],
/// regardless of how many lines a single lock clears. There are no drop
/// bonuses, combos or levels.
///
/// # Example
///
/// ```
/// use tetrisml_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.score(), 200);
/// assert_eq!(stats.total_cleared_lines(), 2);
/// assert_eq!(stats.completed_pieces(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    ticks: u64,
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            ticks: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Number of ticks processed while the game was running.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Updates statistics after a piece is locked.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.score += cleared_lines * LINE_CLEAR_POINTS;
    }

    pub(crate) const fn record_tick(&mut self) {
        self.ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accumulates_per_line() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(1);
        stats.complete_piece_drop(3);
        assert_eq!(stats.score(), 400);
        assert_eq!(stats.total_cleared_lines(), 4);
        assert_eq!(stats.completed_pieces(), 3);
    }

    #[test]
    fn test_ticks() {
        let mut stats = GameStats::new();
        stats.record_tick();
        stats.record_tick();
        assert_eq!(stats.ticks(), 2);
        assert_eq!(stats.score(), 0);
    }
}
