use std::{cell::OnceCell, iter};

use tetrisml_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board};

/// Surface metrics of a board, each computed on first use.
///
/// Rows are read as-is: full rows are counted by [`complete_lines`] but not
/// removed, so the other metrics still see them.
///
/// [`complete_lines`]: BoardAnalysis::complete_lines
#[derive(Debug)]
pub struct BoardAnalysis<'a> {
    board: &'a Board,
    column_heights: OnceCell<[usize; BOARD_WIDTH]>,
    column_occupied_cells: OnceCell<[usize; BOARD_WIDTH]>,
    aggregate_height: OnceCell<usize>,
    num_holes: OnceCell<usize>,
    complete_lines: OnceCell<usize>,
    bumpiness: OnceCell<usize>,
}

impl<'a> BoardAnalysis<'a> {
    #[must_use]
    pub fn from_board(board: &'a Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            num_holes: OnceCell::new(),
            complete_lines: OnceCell::new(),
            bumpiness: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// `HEIGHT - y` of the topmost occupied cell per column, `0` if empty.
    #[must_use]
    pub fn column_heights(&self) -> &[usize; BOARD_WIDTH] {
        self.column_heights.get_or_init(|| {
            let mut column_heights = [0; BOARD_WIDTH];
            for (x, h) in column_heights.iter_mut().enumerate() {
                let top = self
                    .board
                    .rows()
                    .iter()
                    .position(|row| !row[x].is_empty());
                if let Some(top) = top {
                    *h = BOARD_HEIGHT - top;
                }
            }
            column_heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[usize; BOARD_WIDTH] {
        self.column_occupied_cells.get_or_init(|| {
            let mut column_occupied_cells = [0; BOARD_WIDTH];
            for row in self.board.rows() {
                for (o, block) in iter::zip(&mut column_occupied_cells, row) {
                    if !block.is_empty() {
                        *o += 1;
                    }
                }
            }
            column_occupied_cells
        })
    }

    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        *self
            .aggregate_height
            .get_or_init(|| self.column_heights().iter().sum())
    }

    /// Empty cells with an occupied cell somewhere above them in the same
    /// column.
    #[must_use]
    pub fn num_holes(&self) -> usize {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| h - occ)
                .sum()
        })
    }

    #[must_use]
    pub fn complete_lines(&self) -> usize {
        *self.complete_lines.get_or_init(|| {
            (0..BOARD_HEIGHT)
                .filter(|&y| self.board.is_row_full(y))
                .count()
        })
    }

    /// Sum of absolute height differences between neighboring columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum()
        })
    }
}
