use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{SPAWN_X, SPAWN_Y};

/// `(dx, dy)` offset of a single block, relative to the piece anchor.
pub type BlockOffset = (i32, i32);

/// One orientation of a piece: exactly four block offsets.
pub type RotationState = [BlockOffset; 4];

/// A Tetris piece (tetromino) with position, rotation, and type.
///
/// Pieces are small `Copy` values. Movement and rotation return new `Piece`
/// instances; the engine decides whether to commit them after checking the
/// board.
///
/// # Coordinate System
///
/// - `(0, 0)` is the top-left cell of the board
/// - X increases rightward, Y increases downward
/// - Coordinates are signed: a piece may hang above the board (`y < 0`) or be
///   probed left of it (`x < 0`) during move search
///
/// # Example
///
/// ```
/// use tetrisml_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.checked_moved(1, 0).unwrap();
/// let rotated = moved.rotated_forward();
/// assert_eq!(rotated.rotation(), 1);
/// assert_eq!(rotated.position().x(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: usize,
    kind: PieceKind,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "S#1@4,-1")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation,
            self.position.x,
            self.position.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (kind_str, rest) = s.split_once('#').ok_or_else(|| {
            serde::de::Error::custom(format!("expected format 'kind#rotation@x,y', got '{s}'"))
        })?;
        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing '@' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;
        let (x_str, y_str) = position_str.split_once(',').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing ',' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;

        let mut kind_chars = kind_str.chars();
        let (Some(kind_char), None) = (kind_chars.next(), kind_chars.next()) else {
            return Err(serde::de::Error::custom(format!(
                "piece kind must be single character, got '{kind_str}'"
            )));
        };
        let kind = PieceKind::from_char(kind_char)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid piece kind: {kind_char}")))?;

        let rotation = rotation_str.parse::<usize>().map_err(|e| {
            serde::de::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        if rotation >= kind.rotation_count() {
            return Err(serde::de::Error::custom(format!(
                "rotation of {kind_char} must be below {}, got {rotation}",
                kind.rotation_count()
            )));
        }

        let x = x_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        Ok(Piece {
            position: PiecePosition::new(x, y),
            rotation,
            kind,
        })
    }
}

impl Piece {
    /// Creates a piece at the spawn position (column 4, row 0) in rotation 0.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            position: PiecePosition::SPAWN_POSITION,
            rotation: 0,
            kind,
        }
    }

    /// Creates a piece from explicit parts.
    ///
    /// `rotation` is normalized modulo the kind's rotation-state count.
    #[must_use]
    pub fn from_parts(kind: PieceKind, position: PiecePosition, rotation: usize) -> Self {
        Self {
            position,
            rotation: rotation % kind.rotation_count(),
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    /// Current rotation index, always below [`PieceKind::rotation_count`].
    #[must_use]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Block offsets of the current rotation state.
    #[must_use]
    pub fn blocks(&self) -> &'static RotationState {
        self.kind.blocks(self.rotation)
    }

    /// Absolute `(x, y)` board coordinates of the four blocks.
    ///
    /// Coordinates saturate at the `i32` limits, which are always off the
    /// board.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let PiecePosition { x, y } = self.position;
        self.blocks()
            .iter()
            .map(move |&(dx, dy)| (x.saturating_add(dx), y.saturating_add(dy)))
    }

    /// Moves the anchor by `(dx, dy)`, or `None` if that overflows.
    #[must_use]
    pub fn checked_moved(&self, dx: i32, dy: i32) -> Option<Self> {
        let position = self.position.checked_translated(dx, dy)?;
        Some(self.with_position(position))
    }

    #[must_use]
    pub fn with_position(&self, position: PiecePosition) -> Self {
        Self { position, ..*self }
    }

    #[must_use]
    pub fn with_x(&self, x: i32) -> Self {
        self.with_position(PiecePosition::new(x, self.position.y))
    }

    #[must_use]
    pub fn with_y(&self, y: i32) -> Self {
        self.with_position(PiecePosition::new(self.position.x, y))
    }

    /// Advances to the next rotation state, wrapping around.
    #[must_use]
    pub fn rotated_forward(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % self.kind.rotation_count(),
            ..*self
        }
    }

    /// Steps back to the previous rotation state, wrapping around.
    #[must_use]
    pub fn rotated_backward(&self) -> Self {
        let count = self.kind.rotation_count();
        Self {
            rotation: (self.rotation + count - 1) % count,
            ..*self
        }
    }

    /// Applies `times` forward rotations.
    #[must_use]
    pub fn rotated_forward_times(&self, times: usize) -> Self {
        (0..times).fold(*self, |piece, _| piece.rotated_forward())
    }
}

/// Anchor position of a piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    pub const SPAWN_POSITION: Self = Self::new(SPAWN_X, SPAWN_Y);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn checked_translated(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }
}

/// Display color associated with each piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PieceColor {
    Cyan,
    Yellow,
    Purple,
    Orange,
    Blue,
    Green,
    Red,
}

/// Enum representing the type of piece.
///
/// The discriminant is the kind index used by board cells: a locked cell of
/// kind `k` stores `k + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// L-piece.
    L = 3,
    /// J-piece.
    J = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::T,
            3 => PieceKind::L,
            4 => PieceKind::J,
            5 => PieceKind::S,
            _ => PieceKind::Z,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Value written into a board cell when a piece of this kind locks.
    #[must_use]
    pub const fn cell_value(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`PieceKind::cell_value`]; `0` (empty) yields `None`.
    #[must_use]
    pub const fn from_cell_value(value: u8) -> Option<Self> {
        match value {
            0 => None,
            v => Self::from_index(v as usize - 1),
        }
    }

    /// All rotation states of this kind, in rotation order.
    #[must_use]
    pub const fn rotation_states(self) -> &'static [RotationState] {
        ROTATION_STATES[self as usize]
    }

    /// Number of distinct rotation states (1, 2 or 4).
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        self.rotation_states().len()
    }

    /// Block offsets for a rotation index, taken modulo the rotation count.
    #[must_use]
    pub fn blocks(self, rotation: usize) -> &'static RotationState {
        let states = self.rotation_states();
        &states[rotation % states.len()]
    }

    #[must_use]
    pub const fn color(self) -> PieceColor {
        match self {
            PieceKind::I => PieceColor::Cyan,
            PieceKind::O => PieceColor::Yellow,
            PieceKind::T => PieceColor::Purple,
            PieceKind::L => PieceColor::Orange,
            PieceKind::J => PieceColor::Blue,
            PieceKind::S => PieceColor::Green,
            PieceKind::Z => PieceColor::Red,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrisml_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrisml_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('L'), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

const ROTATION_STATES: [&[RotationState]; PieceKind::LEN] = [
    // I-piece: vertical, horizontal
    &[
        [(0, 0), (0, 1), (0, 2), (0, 3)],
        [(0, 0), (1, 0), (2, 0), (3, 0)],
    ],
    // O-piece
    &[[(0, 0), (1, 0), (0, 1), (1, 1)]],
    // T-piece
    &[
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // L-piece
    &[
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
    // J-piece
    &[
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // S-piece
    &[
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
    ],
    // Z-piece
    &[
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
    ],
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rand::{Rng as _, SeedableRng as _, rngs::StdRng};

    use super::*;

    #[test]
    fn test_rotation_counts() {
        let expected = [
            (PieceKind::I, 2),
            (PieceKind::O, 1),
            (PieceKind::T, 4),
            (PieceKind::L, 4),
            (PieceKind::J, 4),
            (PieceKind::S, 2),
            (PieceKind::Z, 2),
        ];
        for (kind, count) in expected {
            assert_eq!(kind.rotation_count(), count, "{kind:?}");
        }
    }

    #[test]
    fn test_rotation_states_have_distinct_blocks() {
        for kind in PieceKind::ALL {
            for state in kind.rotation_states() {
                let unique: HashSet<_> = state.iter().collect();
                assert_eq!(unique.len(), 4, "{kind:?} has overlapping blocks");
            }
        }
    }

    #[test]
    fn test_blocks_wrap_rotation_index() {
        assert_eq!(PieceKind::I.blocks(2), PieceKind::I.blocks(0));
        assert_eq!(PieceKind::S.blocks(3), PieceKind::S.blocks(1));
        assert_eq!(PieceKind::O.blocks(3), PieceKind::O.blocks(0));
        assert_eq!(PieceKind::T.blocks(5), PieceKind::T.blocks(1));
    }

    #[test]
    fn test_i_piece_horizontal_is_rotation_one() {
        let horizontal = PieceKind::I.blocks(1);
        assert!(horizontal.iter().all(|&(_, dy)| dy == 0));
        let vertical = PieceKind::I.blocks(0);
        assert!(vertical.iter().all(|&(dx, _)| dx == 0));
    }

    #[test]
    fn test_spawn_position() {
        let piece = Piece::new(PieceKind::J);
        assert_eq!(piece.position(), PiecePosition::new(4, 0));
        assert_eq!(piece.rotation(), 0);
        let positions: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(positions, vec![(4, 0), (4, 1), (5, 1), (6, 1)]);
    }

    #[test]
    fn test_two_state_piece_returns_after_two_rotations() {
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            let piece = Piece::new(kind);
            let twice = piece.rotated_forward().rotated_forward();
            assert_eq!(twice, piece);
        }
    }

    #[test]
    fn test_cell_value_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_cell_value(kind.cell_value()), Some(kind));
        }
        assert_eq!(PieceKind::from_cell_value(0), None);
        assert_eq!(PieceKind::from_cell_value(8), None);
        assert_eq!(PieceKind::Z.cell_value(), 7);
    }

    #[test]
    fn test_colors() {
        assert_eq!(PieceKind::I.color(), PieceColor::Cyan);
        assert_eq!(PieceKind::Z.color(), PieceColor::Red);
    }

    #[test]
    fn test_uniform_sampling_covers_all_kinds() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<PieceKind> = (0..500).map(|_| rng.random()).collect();
        assert_eq!(seen.len(), PieceKind::LEN);
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::from_parts(PieceKind::S, PiecePosition::new(4, -1), 1);

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"S#1@4,-1\"");

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_deserialization_error_cases() {
        // Invalid format
        assert!(serde_json::from_str::<Piece>("\"S1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1#4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@4\"").is_err());

        // Invalid piece kind
        assert!(serde_json::from_str::<Piece>("\"X#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"SS#1@4,18\"").is_err());

        // Rotation beyond the kind's rotation count
        assert!(serde_json::from_str::<Piece>("\"S#2@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"O#1@4,18\"").is_err());

        // Invalid coordinates
        assert!(serde_json::from_str::<Piece>("\"S#1@abc,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@4,xyz\"").is_err());
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    fn any_piece() -> impl Strategy<Value = Piece> {
        (0..PieceKind::LEN, -3..12i32, -3..22i32, 0..4usize).prop_map(|(k, x, y, r)| {
            let kind = PieceKind::ALL[k];
            Piece::from_parts(kind, PiecePosition::new(x, y), r)
        })
    }

    proptest! {
        #[test]
        fn rotate_forward_then_backward_is_identity(piece in any_piece()) {
            prop_assert_eq!(piece.rotated_forward().rotated_backward(), piece);
            prop_assert_eq!(piece.rotated_backward().rotated_forward(), piece);
        }

        #[test]
        fn rotation_count_forward_rotations_is_identity(piece in any_piece()) {
            let count = piece.kind().rotation_count();
            prop_assert_eq!(piece.rotated_forward_times(count), piece);
        }

        #[test]
        fn moving_keeps_shape(piece in any_piece(), dx in -3..3i32, dy in -3..3i32) {
            let moved = piece.checked_moved(dx, dy).unwrap();
            let expected: Vec<_> = piece.occupied_positions().map(|(x, y)| (x + dx, y + dy)).collect();
            let actual: Vec<_> = moved.occupied_positions().collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_overflowing_move_is_rejected() {
        let piece = Piece::new(PieceKind::T);
        assert_eq!(piece.checked_moved(i32::MAX, 0), None);
        assert_eq!(piece.with_y(1).checked_moved(0, i32::MAX), None);
        // Spawn x is positive, so only the upper bound overflows.
        assert!(piece.checked_moved(i32::MIN, 0).is_some());
        assert_eq!(piece.with_x(-1).checked_moved(i32::MIN, 0), None);
    }

    #[test]
    fn test_occupied_positions_saturate() {
        for kind in PieceKind::ALL {
            let piece = Piece::from_parts(kind, PiecePosition::new(i32::MAX, i32::MIN), 0);
            for (x, y) in piece.occupied_positions() {
                assert!(x > i32::MAX - 4, "{kind:?} x = {x}");
                assert!(y < i32::MIN + 4, "{kind:?} y = {y}");
            }
        }
    }
}
