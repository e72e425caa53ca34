//! Board tests - grid primitives, clears and move availability

use block_blast::core::clear::{apply_clear, find_clears};
use block_blast::core::moves::{has_any_move, placement_count};
use block_blast::core::{Board, Piece, ShapeKind};
use block_blast::types::{Color, PieceId, RuleSet, DEFAULT_BOARD_SIZE};

fn piece(id: u32, kind: ShapeKind) -> Piece {
    Piece::new(PieceId(id), kind, Color::Violet)
}

#[test]
fn test_board_new_empty() {
    let board = Board::new(DEFAULT_BOARD_SIZE);
    assert_eq!(board.size(), 9);

    for y in 0..9 {
        for x in 0..9 {
            assert!(board.is_valid(x, y), "Cell ({}, {}) should be valid", x, y);
            assert_eq!(board.get(x, y), Some(None));
        }
    }
    assert!(board.is_empty());
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new(9);

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(9, 0), None);
    assert_eq!(board.get(0, 9), None);
    assert!(!board.is_in_bounds(9, 9));
    assert!(!board.is_valid(-1, 4));
}

#[test]
fn test_board_occupy_and_clear() {
    let mut board = Board::new(9);

    board.occupy(5, 7, Color::Orange);
    assert_eq!(board.get(5, 7), Some(Some(Color::Orange)));
    assert!(board.is_occupied(5, 7));
    assert_eq!(board.occupied_count(), 1);

    board.clear(5, 7);
    assert_eq!(board.get(5, 7), Some(None));

    // Clearing twice is a no-op
    board.clear(5, 7);
    assert!(board.is_empty());
}

#[test]
#[should_panic]
fn test_board_occupy_twice_panics() {
    let mut board = Board::new(9);
    board.occupy(0, 0, Color::Blue);
    board.occupy(0, 0, Color::Green);
}

#[test]
#[should_panic]
fn test_board_occupy_out_of_bounds_panics() {
    let mut board = Board::new(9);
    board.occupy(9, 0, Color::Blue);
}

#[test]
#[should_panic]
fn test_board_clear_out_of_bounds_panics() {
    let mut board = Board::new(9);
    board.clear(0, -1);
}

#[test]
fn test_full_board_clears_everything_once() {
    let mut board = Board::new(9);
    for y in 0..9 {
        for x in 0..9 {
            board.occupy(x, y, Color::Yellow);
        }
    }

    let outcome = find_clears(&board, RuleSet::Blast);
    assert_eq!(outcome.counts.rows, 9);
    assert_eq!(outcome.counts.cols, 9);
    // Sliding 3x3 windows: 7 x 7 top-left positions
    assert_eq!(outcome.counts.squares, 49);
    assert_eq!(outcome.cells.len(), 81);

    let mut sorted = outcome.cells.clone();
    sorted.sort_by_key(|&(x, y)| (y, x));
    sorted.dedup();
    assert_eq!(sorted.len(), 81, "every cell listed exactly once");

    apply_clear(&mut board, &outcome.cells);
    assert!(board.is_empty());
}

#[test]
fn test_full_board_classic_has_no_squares() {
    let mut board = Board::new(10);
    for y in 0..10 {
        for x in 0..10 {
            board.occupy(x, y, Color::Pink);
        }
    }
    let outcome = find_clears(&board, RuleSet::Classic);
    assert_eq!(outcome.counts.rows, 10);
    assert_eq!(outcome.counts.cols, 10);
    assert_eq!(outcome.counts.squares, 0);
    assert_eq!(outcome.cells.len(), 100);
}

#[test]
fn test_apply_clear_is_idempotent() {
    let mut board = Board::from_rows(&[
        "#########",
        "#........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
    ]);
    let outcome = find_clears(&board, RuleSet::Blast);
    assert_eq!(outcome.counts.rows, 1);

    apply_clear(&mut board, &outcome.cells);
    let once = board.clone();
    apply_clear(&mut board, &outcome.cells);
    assert_eq!(board, once);
    assert_eq!(board.occupied_count(), 1);
}

#[test]
fn test_row_and_square_share_cells() {
    // Row 0 is full and so is the top-left 3x3 block.
    let board = Board::from_rows(&[
        "#########",
        "###......",
        "###......",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
    ]);
    let outcome = find_clears(&board, RuleSet::Blast);
    assert_eq!(outcome.counts.rows, 1);
    assert_eq!(outcome.counts.cols, 0);
    assert_eq!(outcome.counts.squares, 1);
    // 9 row cells + 6 extra square cells
    assert_eq!(outcome.cells.len(), 15);
}

#[test]
fn test_one_hole_board_move_availability() {
    let mut board = Board::new(9);
    for y in 0..9 {
        for x in 0..9 {
            if (x, y) != (4, 4) {
                board.occupy(x, y, Color::Blue);
            }
        }
    }

    let domino = Some(piece(1, ShapeKind::DominoH));
    assert!(!has_any_move(&board, &[domino.clone(), None, None]));

    let single = Some(piece(2, ShapeKind::Single));
    assert!(has_any_move(&board, &[domino, single, None]));
}

#[test]
fn test_empty_tray_counts_as_a_move() {
    let board = Board::from_rows(&["##", "##"]);
    assert!(has_any_move(&board, &[None, None, None]));
}

#[test]
fn test_placement_count_on_empty_board() {
    let board = Board::new(9);
    assert_eq!(placement_count(&board, &piece(1, ShapeKind::Single)), 81);
    assert_eq!(placement_count(&board, &piece(2, ShapeKind::Line5H)), 5 * 9);
    assert_eq!(placement_count(&board, &piece(3, ShapeKind::Square3)), 49);
}

#[test]
fn test_ascii_roundtrip() {
    let rows = ["#..", ".#.", "..#"];
    let board = Board::from_rows(&rows);
    assert_eq!(board.to_ascii(), "#..\n.#.\n..#\n");
}
