//! Greedy autoplayer.
//!
//! Tries every (piece, origin) pair on a scratch board and keeps the one that
//! scores most, breaking ties by the emptier resulting board. Earlier slots and
//! row-major origins win remaining ties, so play is fully deterministic.

use crate::core::{apply_clear, commit, find_clears, moves, scoring, Board};
use crate::error::PlaceError;
use crate::session::Session;
use crate::types::PieceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyMove {
    pub piece_id: PieceId,
    pub x: i8,
    pub y: i8,
    /// Points the move would earn
    pub score_delta: u32,
    /// Occupied cells after the move's clears
    pub occupancy: usize,
}

impl GreedyMove {
    fn beats(&self, other: &GreedyMove) -> bool {
        self.score_delta > other.score_delta
            || (self.score_delta == other.score_delta && self.occupancy < other.occupancy)
    }
}

/// The greedy choice for the current position, or None if nothing fits
pub fn best_move(session: &Session) -> Option<GreedyMove> {
    let rules = session.config().rules;
    let board = session.board();
    let mut scratch = Board::new(board.size());
    let mut best: Option<GreedyMove> = None;

    for piece in session.tray().pieces() {
        for (x, y) in moves::placements(board, piece) {
            scratch.clone_from(board);
            let placed = commit(&mut scratch, piece, x, y);
            let outcome = find_clears(&scratch, rules);
            apply_clear(&mut scratch, &outcome.cells);
            let score = scoring::calculate_score(placed.len() as u32, outcome.counts);

            let candidate = GreedyMove {
                piece_id: piece.id,
                x,
                y,
                score_delta: score.total,
                occupancy: scratch.occupied_count(),
            };
            if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }
    }

    best
}

/// Summary of a greedy run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GreedyRun {
    pub rounds: u32,
    pub score: u32,
    pub game_over: bool,
}

/// Play greedily until game over or `max_rounds` placements
pub fn play(session: &mut Session, max_rounds: u32) -> Result<GreedyRun, PlaceError> {
    let mut run = GreedyRun::default();
    while run.rounds < max_rounds && !session.is_game_over() {
        let Some(mv) = best_move(session) else {
            break;
        };
        session.attempt_placement(mv.piece_id, mv.x, mv.y)?;
        run.rounds += 1;
    }
    run.score = session.score();
    run.game_over = session.is_game_over();
    Ok(run)
}
