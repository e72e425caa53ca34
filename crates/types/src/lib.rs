//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the puzzle engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, session coordination, wire protocol).
//!
//! # Board Dimensions
//!
//! The board is square and its size is chosen per session:
//!
//! - **Canonical size**: 9 × 9 ([`DEFAULT_BOARD_SIZE`])
//! - **Classic size**: 10 × 10 ([`CLASSIC_BOARD_SIZE`])
//! - **Upper bound**: [`MAX_BOARD_SIZE`]
//!
//! Coordinates are `(x, y)` with `x` growing to the right and `y` growing downward.
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LINE_BONUS` | 10 | Bonus per completed row or column |
//! | `SQUARE_BONUS` | 15 | Bonus per completed 3×3 square |
//! | `COMBO_STEP_NUMERATOR` / `COMBO_STEP_DENOMINATOR` | 1/5 | Multiplier growth per clear |
//!
//! # Presentation Timing
//!
//! The engine never waits. These are hints forwarded to whoever animates the
//! round phases:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PLACE_SETTLE_MS` | 140 | Pause between "will place" and the commit |
//! | `CLEAR_SETTLE_MS` | 350 | Pause between "will clear" and the clear |
//!
//! # Examples
//!
//! ```
//! use block_blast_types::{Color, RuleSet, SessionConfig, DEFAULT_BOARD_SIZE};
//!
//! let config = SessionConfig::blast(7);
//! assert_eq!(config.board_size, DEFAULT_BOARD_SIZE);
//! assert_eq!(config.rules.square_size(), Some(3));
//!
//! assert_eq!(RuleSet::from_str("CLASSIC"), Some(RuleSet::Classic));
//! assert_eq!(Color::from_index(1), Some(Color::Blue));
//! ```

use std::fmt;

/// Canonical board size (9 × 9)
pub const DEFAULT_BOARD_SIZE: u8 = 9;

/// Board size of the row/column-only ruleset (10 × 10)
pub const CLASSIC_BOARD_SIZE: u8 = 10;

/// Largest supported board size
pub const MAX_BOARD_SIZE: u8 = 16;

/// Canonical number of tray slots
pub const DEFAULT_TRAY_CAPACITY: u8 = 3;

/// Largest supported tray
pub const MAX_TRAY_CAPACITY: usize = 8;

/// Largest number of cells in a single catalog piece (the 3×3 block)
pub const MAX_PIECE_CELLS: usize = 9;

/// Edge length of the clearable sub-squares under [`RuleSet::Blast`]
pub const SQUARE_SIZE: u8 = 3;

/// Bonus per completed row or column
pub const LINE_BONUS: u32 = 10;

/// Bonus per completed sub-square
pub const SQUARE_BONUS: u32 = 15;

/// Combo multiplier grows by `NUMERATOR / DENOMINATOR` per clear (0.2).
pub const COMBO_STEP_NUMERATOR: u32 = 1;

/// Combo multiplier step denominator
pub const COMBO_STEP_DENOMINATOR: u32 = 5;

/// Presentation hint: settle time before a placement is committed
pub const PLACE_SETTLE_MS: u32 = 140;

/// Presentation hint: settle time before completed lines are removed
pub const CLEAR_SETTLE_MS: u32 = 350;

/// A board coordinate `(x, y)`
pub type Coord = (u8, u8);

/// Offset of a single piece cell relative to the piece origin `(dx, dy)`
pub type Offset = (u8, u8);

/// Color tag attached to occupied cells
///
/// The palette has eight entries. On the wire and in snapshots a color is its
/// 1-based [`index`](Color::index); 0 is reserved for "empty".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Orange,
    Green,
    Rose,
    Yellow,
    Violet,
    Pink,
    Sky,
}

impl Color {
    /// Every palette entry, in index order
    pub const ALL: [Self; 8] = [
        Self::Blue,
        Self::Orange,
        Self::Green,
        Self::Rose,
        Self::Yellow,
        Self::Violet,
        Self::Pink,
        Self::Sky,
    ];

    /// 1-based palette index
    pub fn index(&self) -> u8 {
        match self {
            Color::Blue => 1,
            Color::Orange => 2,
            Color::Green => 3,
            Color::Rose => 4,
            Color::Yellow => 5,
            Color::Violet => 6,
            Color::Pink => 7,
            Color::Sky => 8,
        }
    }

    /// Inverse of [`Color::index`]
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=8 => Some(Self::ALL[(index - 1) as usize]),
            _ => None,
        }
    }

    /// CSS hex string
    pub fn hex(&self) -> &'static str {
        match self {
            Color::Blue => "#60a5fa",
            Color::Orange => "#f97316",
            Color::Green => "#34d399",
            Color::Rose => "#f43f5e",
            Color::Yellow => "#eab308",
            Color::Violet => "#a78bfa",
            Color::Pink => "#fb7185",
            Color::Sky => "#38bdf8",
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Orange => "orange",
            Color::Green => "green",
            Color::Rose => "rose",
            Color::Yellow => "yellow",
            Color::Violet => "violet",
            Color::Pink => "pink",
            Color::Sky => "sky",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Color)`: Cell covered by a committed piece of that color
pub type Cell = Option<Color>;

/// Unique identity of a dealt piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which completed structures are cleared
///
/// - **Blast**: rows, columns and every 3×3 sub-square (canonical)
/// - **Classic**: rows and columns only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleSet {
    #[default]
    Blast,
    Classic,
}

impl RuleSet {
    /// Edge length of clearable sub-squares, if this ruleset clears squares
    pub fn square_size(&self) -> Option<u8> {
        match self {
            RuleSet::Blast => Some(SQUARE_SIZE),
            RuleSet::Classic => None,
        }
    }

    /// Parse ruleset from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blast" => Some(RuleSet::Blast),
            "classic" => Some(RuleSet::Classic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSet::Blast => "blast",
            RuleSet::Classic => "classic",
        }
    }
}

/// Parameters fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionConfig {
    pub board_size: u8,
    pub tray_capacity: u8,
    pub rules: RuleSet,
    /// Seed for the piece generator
    pub seed: u32,
}

impl SessionConfig {
    /// 9 × 9 board, three pieces, rows + columns + 3×3 squares
    pub fn blast(seed: u32) -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            tray_capacity: DEFAULT_TRAY_CAPACITY,
            rules: RuleSet::Blast,
            seed,
        }
    }

    /// 10 × 10 board, three pieces, rows + columns only
    pub fn classic(seed: u32) -> Self {
        Self {
            board_size: CLASSIC_BOARD_SIZE,
            tray_capacity: DEFAULT_TRAY_CAPACITY,
            rules: RuleSet::Classic,
            seed,
        }
    }

    /// Preset for a ruleset
    pub fn for_rules(rules: RuleSet, seed: u32) -> Self {
        match rules {
            RuleSet::Blast => Self::blast(seed),
            RuleSet::Classic => Self::classic(seed),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::blast(1)
    }
}

/// Number of structures completed by one placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClearCounts {
    pub rows: u32,
    pub cols: u32,
    pub squares: u32,
}

impl ClearCounts {
    pub fn total(&self) -> u32 {
        self.rows + self.cols + self.squares
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// How long a presentation layer should linger on each announced phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettleDelays {
    pub place_ms: u32,
    pub clear_ms: u32,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            place_ms: PLACE_SETTLE_MS,
            clear_ms: CLEAR_SETTLE_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_defaults() {
        assert_eq!(DEFAULT_BOARD_SIZE, 9);
        assert_eq!(DEFAULT_TRAY_CAPACITY, 3);
        assert_eq!(SQUARE_SIZE, 3);
        assert_eq!(LINE_BONUS, 10);
        assert_eq!(SQUARE_BONUS, 15);
        assert_eq!(PLACE_SETTLE_MS, 140);
        assert_eq!(CLEAR_SETTLE_MS, 350);
    }

    #[test]
    fn palette_indices_roundtrip() {
        for (i, color) in Color::ALL.iter().enumerate() {
            assert_eq!(color.index() as usize, i + 1);
            assert_eq!(Color::from_index(color.index()), Some(*color));
        }
        assert_eq!(Color::from_index(0), None);
        assert_eq!(Color::from_index(9), None);
    }

    #[test]
    fn rule_set_parsing() {
        assert_eq!(RuleSet::from_str("blast"), Some(RuleSet::Blast));
        assert_eq!(RuleSet::from_str("Classic"), Some(RuleSet::Classic));
        assert_eq!(RuleSet::from_str("hexagon"), None);
        assert_eq!(RuleSet::Classic.square_size(), None);
    }

    #[test]
    fn clear_counts_total() {
        let counts = ClearCounts {
            rows: 1,
            cols: 2,
            squares: 1,
        };
        assert_eq!(counts.total(), 4);
        assert!(!counts.is_empty());
        assert!(ClearCounts::default().is_empty());
    }
}
