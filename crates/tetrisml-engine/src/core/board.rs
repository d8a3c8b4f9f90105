use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Piece, PieceKind},
};

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const WIDTH_I32: i32 = BOARD_WIDTH as i32;
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const HEIGHT_I32: i32 = BOARD_HEIGHT as i32;

/// A single cell of the board.
///
/// Cells are either empty or hold the kind of the piece that was locked there.
/// [`Block::value`] gives the numeric encoding used by the read surface:
/// `0` for empty, `kind + 1` for a locked block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Block {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Locked piece of a specific type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Numeric cell value in `[0, 7]`.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Piece(kind) => kind.cell_value(),
        }
    }

    /// Decodes a numeric cell value; values above 7 yield `None`.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Block::Empty),
            v => match PieceKind::from_cell_value(v) {
                Some(kind) => Some(Block::Piece(kind)),
                None => None,
            },
        }
    }
}

/// One row of cells, left to right.
pub type BoardRow = [Block; BOARD_WIDTH];

/// The 10×20 playfield holding locked blocks.
///
/// Only locked geometry is ever written here; the falling piece lives
/// outside the board until it is locked with [`Board::lock`].
///
/// Row 0 is the top of the board. Pieces may extend above it (`y < 0`):
/// such blocks are never checked for occupancy and are dropped on lock.
///
/// # Example
///
/// ```
/// use tetrisml_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::O).with_y(18);
/// assert!(board.is_valid_position(piece));
///
/// board.lock(piece);
/// assert_eq!(board.cell_value(4, 19), PieceKind::O.cell_value());
/// assert!(!board.is_valid_position(piece));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [[Block::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
    };

    /// Read-only view of the whole grid, `HEIGHT` rows of `WIDTH` cells.
    #[must_use]
    pub fn rows(&self) -> &[BoardRow; BOARD_HEIGHT] {
        &self.rows
    }

    /// Grid as numeric cell values (`0` empty, `kind + 1` locked).
    #[must_use]
    pub fn cell_values(&self) -> [[u8; BOARD_WIDTH]; BOARD_HEIGHT] {
        self.rows.map(|row| row.map(Block::value))
    }

    /// Returns the cell at `(x, y)`, or `None` when outside the board.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Block> {
        let (x, y) = cell_index(x, y)?;
        Some(self.rows[y][x])
    }

    /// Numeric value of the cell at `(x, y)`; `0` outside the board.
    #[must_use]
    pub fn cell_value(&self, x: i32, y: i32) -> u8 {
        self.cell(x, y).map_or(0, Block::value)
    }

    /// Checks whether every block of `piece` lies on a legal cell.
    ///
    /// A block is illegal when its column is outside the board, when it is
    /// below the bottom row, or when it overlaps a locked cell. Blocks above
    /// the top row only have their column checked.
    #[must_use]
    pub fn is_valid_position(&self, piece: Piece) -> bool {
        piece.occupied_positions().all(|(x, y)| {
            if !(0..WIDTH_I32).contains(&x) || y >= HEIGHT_I32 {
                return false;
            }
            y < 0 || self.cell(x, y).is_some_and(Block::is_empty)
        })
    }

    /// Writes the piece's blocks into the board.
    ///
    /// Blocks outside the board are skipped.
    pub fn lock(&mut self, piece: Piece) {
        let block = Block::Piece(piece.kind());
        for (x, y) in piece.occupied_positions() {
            if let Some((x, y)) = cell_index(x, y) {
                self.rows[y][x] = block;
            }
        }
    }

    /// Checks if every cell of row `y` is occupied.
    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(|b| !b.is_empty()))
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// Rows are scanned bottom to top. Each full row is removed as soon as it
    /// is found: every row above it moves down by one and the scan continues
    /// with the next row up. The row that just moved into the cleared slot is
    /// not examined again in this pass, and row 0 keeps its contents.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut cleared = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(y) {
                self.rows.copy_within(0..y, 1);
                cleared += 1;
            }
        }
        cleared
    }

    /// Creates a `Board` from ASCII art, for tests and fixtures.
    ///
    /// `.` is an empty cell, a piece letter (`IOTLJSZ`) is a block of that
    /// kind, and `#` is an occupied cell stored as an I block. Rows are given
    /// top to bottom and are aligned to the bottom of the board, so a fixture
    /// only needs to spell out its non-empty rows.
    ///
    /// # Panics
    ///
    /// Panics if a row is not exactly 10 cells wide or more than 20 rows are
    /// given.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= BOARD_HEIGHT,
            "Board must have at most {BOARD_HEIGHT} rows, got {}",
            lines.len()
        );

        let top = BOARD_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<Block> = line
                .chars()
                .filter_map(|c| match c {
                    '.' => Some(Block::Empty),
                    '#' => Some(Block::Piece(PieceKind::I)),
                    c => PieceKind::from_char(c).map(Block::Piece),
                })
                .collect();
            assert_eq!(
                cells.len(),
                BOARD_WIDTH,
                "Each row must have exactly {BOARD_WIDTH} cells, got {} at row {i}",
                cells.len(),
            );
            board.rows[top + i].copy_from_slice(&cells);
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for block in row {
                let c = match block {
                    Block::Empty => '.',
                    Block::Piece(kind) => kind.as_char(),
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn cell_index(x: i32, y: i32) -> Option<(usize, usize)> {
    let x = usize::try_from(x).ok().filter(|&x| x < BOARD_WIDTH)?;
    let y = usize::try_from(y).ok().filter(|&y| y < BOARD_HEIGHT)?;
    Some((x, y))
}
