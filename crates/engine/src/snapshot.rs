//! Plain-data view of a session for renderers, clients and persistence.

use crate::core::ShapeKind;
use crate::phase::RoundPhase;
use crate::types::{Color, Offset, PieceId, RuleSet};

/// One tray piece as seen from outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSnapshot {
    pub id: PieceId,
    pub kind: ShapeKind,
    pub color: Color,
    /// Normalized offsets, row-major
    pub cells: Vec<Offset>,
    pub width: u8,
    pub height: u8,
    /// Whether the piece fits anywhere on the current board
    pub placeable: bool,
}

/// Whole-session snapshot. Reusable: [`crate::Session::snapshot_into`] overwrites in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub board_size: u8,
    /// Row-major grid: 0 = empty, 1..=8 = palette index
    pub board: Vec<u8>,
    pub tray: Vec<Option<PieceSnapshot>>,
    pub score: u32,
    pub rules: RuleSet,
    pub phase: RoundPhase,
    pub game_over: bool,
    pub episode_id: u32,
    pub rounds: u32,
    pub seed: u32,
}

impl GameSnapshot {
    /// Palette index at (x, y), or None out of bounds
    pub fn cell(&self, x: u8, y: u8) -> Option<u8> {
        if x >= self.board_size || y >= self.board_size {
            return None;
        }
        self.board
            .get(y as usize * self.board_size as usize + x as usize)
            .copied()
    }

    pub fn occupied_count(&self) -> usize {
        self.board.iter().filter(|&&c| c != 0).count()
    }

    /// Number of pieces still in the tray
    pub fn pieces_left(&self) -> usize {
        self.tray.iter().flatten().count()
    }
}
