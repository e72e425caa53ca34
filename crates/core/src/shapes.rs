//! Shapes module - the piece catalog and the piece generator
//!
//! Every template is stored pre-normalized: the smallest x and the smallest y
//! among its offsets are both 0, and offsets are listed in row-major order
//! (by y, then x). Instances copy the offsets by value, so a template can be
//! dealt any number of times without aliasing.

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::types::{Color, Offset, PieceId, MAX_BOARD_SIZE, MAX_PIECE_CELLS};

/// The shapes a piece can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Single,
    DominoH,
    DominoV,
    Line3H,
    Line3V,
    Line4H,
    Line4V,
    Line5H,
    Line5V,
    Square2,
    Square3,
    Corner,
    TUp,
    TDown,
    L,
    J,
    S,
    Z,
    U,
    /// Ad-hoc shape built with [`Piece::custom`]; never dealt
    Custom,
}

impl ShapeKind {
    /// The full catalog, in a fixed order (excludes [`ShapeKind::Custom`])
    pub const ALL: [Self; 19] = [
        Self::Single,
        Self::DominoH,
        Self::DominoV,
        Self::Line3H,
        Self::Line3V,
        Self::Line4H,
        Self::Line4V,
        Self::Line5H,
        Self::Line5V,
        Self::Square2,
        Self::Square3,
        Self::Corner,
        Self::TUp,
        Self::TDown,
        Self::L,
        Self::J,
        Self::S,
        Self::Z,
        Self::U,
    ];

    /// Cell offsets, normalized and row-major
    pub fn offsets(&self) -> &'static [Offset] {
        match self {
            Self::Single => &[(0, 0)],
            Self::DominoH => &[(0, 0), (1, 0)],
            Self::DominoV => &[(0, 0), (0, 1)],
            Self::Line3H => &[(0, 0), (1, 0), (2, 0)],
            Self::Line3V => &[(0, 0), (0, 1), (0, 2)],
            Self::Line4H => &[(0, 0), (1, 0), (2, 0), (3, 0)],
            Self::Line4V => &[(0, 0), (0, 1), (0, 2), (0, 3)],
            Self::Line5H => &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)],
            Self::Line5V => &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)],
            Self::Square2 => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            Self::Square3 => &[
                (0, 0),
                (1, 0),
                (2, 0),
                (0, 1),
                (1, 1),
                (2, 1),
                (0, 2),
                (1, 2),
                (2, 2),
            ],
            // #.
            // ##
            Self::Corner => &[(0, 0), (0, 1), (1, 1)],
            // .#.
            // ###
            Self::TUp => &[(1, 0), (0, 1), (1, 1), (2, 1)],
            // ###
            // .#.
            Self::TDown => &[(0, 0), (1, 0), (2, 0), (1, 1)],
            Self::L => &[(0, 0), (0, 1), (0, 2), (1, 2)],
            Self::J => &[(1, 0), (1, 1), (0, 2), (1, 2)],
            Self::S => &[(1, 0), (2, 0), (0, 1), (1, 1)],
            Self::Z => &[(0, 0), (1, 0), (1, 1), (2, 1)],
            // #.#
            // ###
            Self::U => &[(0, 0), (2, 0), (0, 1), (1, 1), (2, 1)],
            Self::Custom => &[],
        }
    }

    /// Tight bounding box `(width, height)`
    pub fn bounds(&self) -> (u8, u8) {
        bounds_of(self.offsets())
    }

    /// Lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::DominoH => "domino_h",
            Self::DominoV => "domino_v",
            Self::Line3H => "line3_h",
            Self::Line3V => "line3_v",
            Self::Line4H => "line4_h",
            Self::Line4V => "line4_v",
            Self::Line5H => "line5_h",
            Self::Line5V => "line5_v",
            Self::Square2 => "square2",
            Self::Square3 => "square3",
            Self::Corner => "corner",
            Self::TUp => "t_up",
            Self::TDown => "t_down",
            Self::L => "l",
            Self::J => "j",
            Self::S => "s",
            Self::Z => "z",
            Self::U => "u",
            Self::Custom => "custom",
        }
    }

    /// Parse from [`as_str`](ShapeKind::as_str) form (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
    }
}

/// Tight bounding box of a set of offsets. Empty sets have a 0x0 box.
pub fn bounds_of(offsets: &[Offset]) -> (u8, u8) {
    if offsets.is_empty() {
        return (0, 0);
    }
    let w = offsets.iter().map(|&(x, _)| x).max().unwrap_or(0) + 1;
    let h = offsets.iter().map(|&(_, y)| y).max().unwrap_or(0) + 1;
    (w, h)
}

/// A dealt piece: a copy of one template plus identity and color
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub kind: ShapeKind,
    pub color: Color,
    cells: ArrayVec<Offset, MAX_PIECE_CELLS>,
    width: u8,
    height: u8,
}

impl Piece {
    /// Instantiate a template
    pub fn new(id: PieceId, kind: ShapeKind, color: Color) -> Self {
        let mut cells = ArrayVec::new();
        cells.extend(kind.offsets().iter().copied());
        let (width, height) = kind.bounds();
        Self {
            id,
            kind,
            color,
            cells,
            width,
            height,
        }
    }

    /// Build a piece from arbitrary offsets (puzzles, scripted games).
    ///
    /// Offsets are normalized, sorted row-major and deduplicated. Returns None
    /// for an empty set, one larger than [`MAX_PIECE_CELLS`], or one whose
    /// bounding box exceeds [`MAX_BOARD_SIZE`].
    pub fn custom(id: PieceId, color: Color, offsets: &[Offset]) -> Option<Self> {
        let min_x = offsets.iter().map(|&(x, _)| x).min()?;
        let min_y = offsets.iter().map(|&(_, y)| y).min()?;

        let mut normalized: Vec<Offset> = offsets
            .iter()
            .map(|&(x, y)| (x - min_x, y - min_y))
            .collect();
        normalized.sort_by_key(|&(x, y)| (y, x));
        normalized.dedup();

        let mut cells: ArrayVec<Offset, MAX_PIECE_CELLS> = ArrayVec::new();
        cells.try_extend_from_slice(&normalized).ok()?;
        if cells.iter().any(|&(x, y)| x >= MAX_BOARD_SIZE || y >= MAX_BOARD_SIZE) {
            return None;
        }
        let (width, height) = bounds_of(&cells);
        Some(Self {
            id,
            kind: ShapeKind::Custom,
            color,
            cells,
            width,
            height,
        })
    }

    /// Cell offsets in row-major order
    pub fn cells(&self) -> &[Offset] {
        &self.cells
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Deals fresh pieces: uniform shape, uniform color, monotonic identity
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: SimpleRng,
    next_id: u32,
}

impl PieceGenerator {
    /// Create a generator with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            next_id: 1,
        }
    }

    /// Deal a single piece
    pub fn next_piece(&mut self) -> Piece {
        let kind = *self.rng.pick(&ShapeKind::ALL);
        let color = *self.rng.pick(&Color::ALL);
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        Piece::new(id, kind, color)
    }

    /// Deal `count` independent pieces
    pub fn generate(&mut self, count: usize) -> Vec<Piece> {
        (0..count).map(|_| self.next_piece()).collect()
    }

    /// Identity the next dealt piece will receive
    pub fn peek_id(&self) -> PieceId {
        PieceId(self.next_id)
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}
