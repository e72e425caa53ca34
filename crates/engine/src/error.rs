use thiserror::Error;

use crate::types::{PieceId, MAX_BOARD_SIZE, MAX_TRAY_CAPACITY};

/// Why a placement command was rejected. Rejections never change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("piece {0} is not in the tray")]
    UnknownPiece(PieceId),
    #[error("piece {0} was already placed")]
    SlotEmpty(PieceId),
    #[error("piece {piece} does not fit at ({x}, {y}) or any aligned origin")]
    NoValidPlacement { piece: PieceId, x: i8, y: i8 },
    #[error("game is over; restart to play again")]
    GameOver,
    #[error("a round is already in progress")]
    RoundInProgress,
}

impl PlaceError {
    /// Stable wire code
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::UnknownPiece(_) | PlaceError::SlotEmpty(_) => "invalid_command",
            PlaceError::NoValidPlacement { .. } => "no_valid_placement",
            PlaceError::GameOver => "game_over",
            PlaceError::RoundInProgress => "busy",
        }
    }
}

/// Rejected session configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board size {0} outside 1..={max}", max = MAX_BOARD_SIZE)]
    BoardSize(u8),
    #[error("tray capacity {0} outside 1..={max}", max = MAX_TRAY_CAPACITY)]
    TrayCapacity(u8),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}
