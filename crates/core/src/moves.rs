//! Moves module - exhaustive move availability
//!
//! Cost is pieces x origins x cells; only origins that keep the piece's
//! bounding box on the board are tried, the rest fail the bounds check anyway.

use crate::board::Board;
use crate::placement::can_place;
use crate::shapes::Piece;

/// Iterate over every origin where `piece` fits, row-major
pub fn placements<'a>(board: &'a Board, piece: &'a Piece) -> impl Iterator<Item = (i8, i8)> + 'a {
    let n = board.size();
    let max_x = n.checked_sub(piece.width()).map(|v| v as i16).unwrap_or(-1);
    let max_y = n.checked_sub(piece.height()).map(|v| v as i16).unwrap_or(-1);
    (0..=max_y)
        .flat_map(move |y| (0..=max_x).map(move |x| (x as i8, y as i8)))
        .filter(move |&(x, y)| can_place(board, piece, x, y))
}

/// True if `piece` fits at any origin
pub fn fits_anywhere(board: &Board, piece: &Piece) -> bool {
    placements(board, piece).next().is_some()
}

/// Number of origins where `piece` fits
pub fn placement_count(board: &Board, piece: &Piece) -> usize {
    placements(board, piece).count()
}

/// True if the tray still offers a move.
///
/// An exhausted tray (every slot empty) counts as having a move: a fresh
/// batch is about to be dealt.
pub fn has_any_move(board: &Board, tray: &[Option<Piece>]) -> bool {
    let mut remaining = tray.iter().flatten().peekable();
    if remaining.peek().is_none() {
        return true;
    }
    remaining.any(|piece| fits_anywhere(board, piece))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;
    use crate::types::{Color, PieceId};

    fn piece(kind: ShapeKind) -> Piece {
        Piece::new(PieceId(1), kind, Color::Yellow)
    }

    #[test]
    fn empty_board_counts_every_origin() {
        let board = Board::new(9);
        assert_eq!(placement_count(&board, &piece(ShapeKind::Single)), 81);
        assert_eq!(placement_count(&board, &piece(ShapeKind::Line5H)), 5 * 9);
        assert_eq!(placement_count(&board, &piece(ShapeKind::Square3)), 49);
    }

    #[test]
    fn piece_larger_than_board_never_fits() {
        let board = Board::new(2);
        assert!(!fits_anywhere(&board, &piece(ShapeKind::Line3H)));
        assert_eq!(placement_count(&board, &piece(ShapeKind::Square3)), 0);
    }

    #[test]
    fn exhausted_tray_has_move() {
        let full = Board::from_rows(&["##", "##"]);
        assert!(has_any_move(&full, &[None, None, None]));
        assert!(has_any_move(&full, &[]));
    }

    #[test]
    fn one_hole_board() {
        let board = Board::from_rows(&[
            "#########",
            "#########",
            "#########",
            "#########",
            "####.####",
            "#########",
            "#########",
            "#########",
            "#########",
        ]);
        assert!(!has_any_move(&board, &[Some(piece(ShapeKind::DominoH)), None, None]));
        assert!(has_any_move(
            &board,
            &[Some(piece(ShapeKind::DominoH)), Some(piece(ShapeKind::Single)), None]
        ));
    }
}
