//! Placement module - validating and committing pieces
//!
//! A piece fits at an origin when every offset lands on an in-bounds empty
//! cell. When the requested origin does not fit, [`resolve_origin`] applies the
//! snap-alignment policy: each filled cell of the piece, in row-major order, is
//! pinned to the requested target and the origin recomputed from it. The first
//! origin that fits wins.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::shapes::Piece;
use crate::types::{Coord, MAX_PIECE_CELLS};

/// Coordinates covered by one committed piece
pub type PlacedCells = ArrayVec<Coord, MAX_PIECE_CELLS>;

/// A resolved origin for a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub x: i8,
    pub y: i8,
    /// True when the requested origin did not fit and a snap retry was used
    pub snapped: bool,
}

/// Check whether `piece` fits with its (0, 0) offset mapped to (x, y)
pub fn can_place(board: &Board, piece: &Piece, x: i8, y: i8) -> bool {
    piece.cells().iter().all(|&(dx, dy)| {
        let Some((px, py)) = offset_coord(x, y, dx, dy) else {
            return false;
        };
        board.is_valid(px, py)
    })
}

/// Commit `piece` at (x, y) and return the covered coordinates in row-major order.
///
/// The caller must have checked [`can_place`]; committing onto an occupied or
/// out-of-bounds cell panics inside [`Board::occupy`].
pub fn commit(board: &mut Board, piece: &Piece, x: i8, y: i8) -> PlacedCells {
    debug_assert!(can_place(board, piece, x, y));

    let mut placed = PlacedCells::new();
    for &(dx, dy) in piece.cells() {
        let (px, py) = offset_coord(x, y, dx, dy)
            .unwrap_or_else(|| panic!("piece offset ({}, {}) overflows origin ({}, {})", dx, dy, x, y));
        board.occupy(px, py, piece.color);
        placed.push((px as u8, py as u8));
    }
    placed
}

/// Find where `piece` lands for a drop aimed at (target_x, target_y).
///
/// Tries the target as the origin first, then once per filled cell with that
/// cell pinned to the target. Returns `None` when nothing fits.
pub fn resolve_origin(board: &Board, piece: &Piece, target_x: i8, target_y: i8) -> Option<Placement> {
    if can_place(board, piece, target_x, target_y) {
        return Some(Placement {
            x: target_x,
            y: target_y,
            snapped: false,
        });
    }

    piece.cells().iter().find_map(|&(dx, dy)| {
        let x = target_x.checked_sub(dx as i8)?;
        let y = target_y.checked_sub(dy as i8)?;
        can_place(board, piece, x, y).then_some(Placement {
            x,
            y,
            snapped: true,
        })
    })
}

#[inline]
fn offset_coord(x: i8, y: i8, dx: u8, dy: u8) -> Option<(i8, i8)> {
    Some((x.checked_add(dx as i8)?, y.checked_add(dy as i8)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;
    use crate::types::{Color, PieceId};

    fn piece(kind: ShapeKind) -> Piece {
        Piece::new(PieceId(1), kind, Color::Green)
    }

    #[test]
    fn fits_on_empty_board_inside_bounds_only() {
        let board = Board::new(9);
        let line = piece(ShapeKind::Line5H);
        assert!(can_place(&board, &line, 0, 0));
        assert!(can_place(&board, &line, 4, 8));
        assert!(!can_place(&board, &line, 5, 0));
        assert!(!can_place(&board, &line, -1, 0));
        assert!(!can_place(&board, &line, 0, 9));
    }

    #[test]
    fn blocked_by_occupied_cell() {
        let mut board = Board::new(9);
        board.occupy(2, 0, Color::Blue);
        let line = piece(ShapeKind::Line3H);
        assert!(!can_place(&board, &line, 0, 0));
        assert!(can_place(&board, &line, 3, 0));
    }

    #[test]
    fn holes_in_shape_do_not_collide() {
        // U has an empty cell at (1, 0).
        let mut board = Board::new(9);
        board.occupy(1, 0, Color::Blue);
        assert!(can_place(&board, &piece(ShapeKind::U), 0, 0));
    }

    #[test]
    fn commit_returns_covered_cells_with_color() {
        let mut board = Board::new(9);
        let t = piece(ShapeKind::TUp);
        let placed = commit(&mut board, &t, 2, 3);
        assert_eq!(placed.as_slice(), &[(3, 3), (2, 4), (3, 4), (4, 4)]);
        assert_eq!(board.occupied_count(), 4);
        assert_eq!(board.get(3, 3), Some(Some(Color::Green)));
    }

    #[test]
    fn direct_fit_is_not_snapped() {
        let board = Board::new(9);
        let placement = resolve_origin(&board, &piece(ShapeKind::Square2), 3, 3).unwrap();
        assert_eq!(placement, Placement { x: 3, y: 3, snapped: false });
    }

    #[test]
    fn snap_pins_first_fitting_cell() {
        let board = Board::new(9);
        // L spans 2x3; aimed at the bottom-right corner it overflows, and the
        // first offset that fits when pinned is (1, 2).
        let l = piece(ShapeKind::L);
        let placement = resolve_origin(&board, &l, 8, 8).unwrap();
        assert_eq!(placement, Placement { x: 7, y: 6, snapped: true });
    }

    #[test]
    fn nothing_fits() {
        let board = Board::from_rows(&["#.#", "###", "#.#"]);
        assert_eq!(resolve_origin(&board, &piece(ShapeKind::DominoH), 1, 0), None);
    }
}
