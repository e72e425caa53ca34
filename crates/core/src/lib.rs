//! Core puzzle logic module - pure, deterministic, and testable
//!
//! This crate contains the rules of the block-placement puzzle: the piece
//! catalog, the board, placement validation, line/square clearing, scoring and
//! move availability. It has **zero dependencies** on rendering, input,
//! networking or storage, making it:
//!
//! - **Deterministic**: Same seed produces identical piece sequences
//! - **Testable**: Every rule is a plain function over plain data
//! - **Portable**: Can run in any environment (server, browser, headless bot)
//!
//! # Module Structure
//!
//! - [`board`]: N×N grid with occupy/clear primitives and fullness scans
//! - [`shapes`]: Piece templates and the randomized piece generator
//! - [`placement`]: Fit checks, commits and snap-alignment
//! - [`clear`]: Row, column and 3×3 square detection
//! - [`scoring`]: Cell points, clear bonuses and the combo multiplier
//! - [`moves`]: Exhaustive "is any move left" oracle
//! - [`tray`]: The fixed-capacity set of pieces on offer
//! - [`rng`]: Seeded LCG
//!
//! # Example
//!
//! ```
//! use block_blast_core::{clear, placement, scoring, Board, Piece, ShapeKind};
//! use block_blast_core::types::{Color, PieceId, RuleSet};
//!
//! let mut board = Board::new(9);
//! let line = Piece::new(PieceId(1), ShapeKind::Line3H, Color::Blue);
//!
//! let spot = placement::resolve_origin(&board, &line, 0, 0).unwrap();
//! let placed = placement::commit(&mut board, &line, spot.x, spot.y);
//! let outcome = clear::find_clears(&board, RuleSet::Blast);
//! let score = scoring::calculate_score(placed.len() as u32, outcome.counts);
//!
//! assert_eq!(score.total, 3);
//! ```

pub mod board;
pub mod clear;
pub mod moves;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod shapes;
pub mod tray;

pub use block_blast_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use clear::{apply_clear, find_clears, ClearOutcome};
pub use moves::has_any_move;
pub use placement::{can_place, commit, resolve_origin, Placement};
pub use rng::SimpleRng;
pub use scoring::{calculate_score, ScoreResult};
pub use shapes::{Piece, PieceGenerator, ShapeKind};
pub use tray::{Tray, TrayLookup};
