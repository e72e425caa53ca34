//! Pieces module tests - catalog, generator, tray and placement

use block_blast::core::placement::{can_place, commit, resolve_origin, Placement};
use block_blast::core::{Board, Piece, PieceGenerator, ShapeKind, Tray, TrayLookup};
use block_blast::types::{Color, PieceId, MAX_PIECE_CELLS};

// ============== Catalog Tests ==============

#[test]
fn test_catalog_cell_counts() {
    let expect = [
        (ShapeKind::Single, 1),
        (ShapeKind::DominoH, 2),
        (ShapeKind::Line3V, 3),
        (ShapeKind::Line4H, 4),
        (ShapeKind::Line5V, 5),
        (ShapeKind::Square2, 4),
        (ShapeKind::Square3, 9),
        (ShapeKind::Corner, 3),
        (ShapeKind::TUp, 4),
        (ShapeKind::U, 5),
    ];
    for (kind, cells) in expect {
        assert_eq!(kind.offsets().len(), cells, "{:?}", kind);
    }
}

#[test]
fn test_every_template_fits_an_empty_board() {
    let board = Board::new(9);
    for kind in ShapeKind::ALL {
        let piece = Piece::new(PieceId(1), kind, Color::Sky);
        assert!(can_place(&board, &piece, 0, 0), "{:?}", kind);
        assert!(piece.len() <= MAX_PIECE_CELLS);
    }
}

#[test]
fn test_instances_do_not_alias_templates() {
    let a = Piece::new(PieceId(1), ShapeKind::S, Color::Blue);
    let b = Piece::new(PieceId(2), ShapeKind::S, Color::Rose);
    assert_eq!(a.cells(), b.cells());
    assert_ne!(a, b);
    assert_eq!(a.cells(), ShapeKind::S.offsets());
}

#[test]
fn test_custom_piece_rules() {
    let piece = Piece::custom(PieceId(5), Color::Pink, &[(3, 4), (2, 4), (2, 5)]).unwrap();
    assert_eq!(piece.kind, ShapeKind::Custom);
    assert_eq!(piece.cells(), &[(0, 0), (1, 0), (0, 1)]);
    assert_eq!((piece.width(), piece.height()), (2, 2));

    assert!(Piece::custom(PieceId(6), Color::Pink, &[]).is_none());
    let too_many: Vec<(u8, u8)> = (0..10).map(|x| (x, 0)).collect();
    assert!(Piece::custom(PieceId(7), Color::Pink, &too_many).is_none());
}

// ============== Generator Tests ==============

#[test]
fn test_generator_is_deterministic() {
    let mut a = PieceGenerator::new(2024);
    let mut b = PieceGenerator::new(2024);
    for _ in 0..50 {
        assert_eq!(a.next_piece(), b.next_piece());
    }
}

#[test]
fn test_generator_covers_catalog() {
    let mut gen = PieceGenerator::new(9);
    let pieces = gen.generate(2000);
    for kind in ShapeKind::ALL {
        assert!(pieces.iter().any(|p| p.kind == kind), "{:?} never dealt", kind);
    }
    assert!(pieces.iter().all(|p| p.kind != ShapeKind::Custom));
}

// ============== Tray Tests ==============

#[test]
fn test_tray_refills_only_when_exhausted() {
    let mut gen = PieceGenerator::new(1);
    let mut tray = Tray::new(3);
    tray.deal(&mut gen);
    let ids: Vec<PieceId> = tray.pieces().map(|p| p.id).collect();
    assert_eq!(ids, vec![PieceId(1), PieceId(2), PieceId(3)]);

    tray.take(0).unwrap();
    assert!(!tray.refill_if_exhausted(&mut gen));
    assert_eq!(tray.remaining(), 2);

    tray.take(1).unwrap();
    tray.take(2).unwrap();
    assert!(tray.is_exhausted());
    assert!(tray.refill_if_exhausted(&mut gen));
    let ids: Vec<PieceId> = tray.pieces().map(|p| p.id).collect();
    assert_eq!(ids, vec![PieceId(4), PieceId(5), PieceId(6)]);
}

#[test]
fn test_tray_lookup_distinguishes_consumed() {
    let mut gen = PieceGenerator::new(1);
    let mut tray = Tray::new(3);
    tray.deal(&mut gen);

    assert_eq!(tray.find(PieceId(2)), Ok(1));
    tray.take(1);
    assert_eq!(tray.find(PieceId(2)), Err(TrayLookup::Consumed));
    assert_eq!(tray.find(PieceId(40)), Err(TrayLookup::Unknown));
    assert!(tray.take(1).is_none());
}

// ============== Placement Tests ==============

#[test]
fn test_commit_places_exact_footprint() {
    let mut board = Board::new(9);
    let z = Piece::new(PieceId(1), ShapeKind::Z, Color::Yellow);
    let placed = commit(&mut board, &z, 6, 7);
    assert_eq!(placed.as_slice(), &[(6, 7), (7, 7), (7, 8), (8, 8)]);
    assert_eq!(board.occupied_count(), 4);
}

#[test]
fn test_snap_prefers_requested_origin() {
    let board = Board::new(9);
    let square = Piece::new(PieceId(1), ShapeKind::Square2, Color::Blue);
    assert_eq!(
        resolve_origin(&board, &square, 0, 0),
        Some(Placement { x: 0, y: 0, snapped: false })
    );
    // Bottom-right corner: only the last cell pinned fits.
    assert_eq!(
        resolve_origin(&board, &square, 8, 8),
        Some(Placement { x: 7, y: 7, snapped: true })
    );
}

#[test]
fn test_snap_considers_only_pinned_origins() {
    let mut board = Board::new(9);
    board.occupy(1, 0, Color::Blue);
    let line = Piece::new(PieceId(1), ShapeKind::Line3H, Color::Blue);
    // Every origin that puts a line cell on (0, 0) overlaps (1, 0) or leaves the board.
    assert_eq!(resolve_origin(&board, &line, 0, 0), None);
    assert!(can_place(&board, &line, 2, 0));
}
