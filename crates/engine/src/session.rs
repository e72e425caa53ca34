//! Session module - one game from first deal to game over
//!
//! [`Session`] owns the board, the tray, the piece generator and the running
//! score, and drives each placement command through the round state machine
//! described in [`crate::phase`]:
//!
//! 1. **Validating**: look the piece up, resolve an origin (with snap-alignment)
//! 2. **Placing**: announce the cells about to be filled
//! 3. **Placed**: commit the piece, empty its tray slot
//! 4. **Clearing / Cleared**: announce and remove completed structures (skipped if none)
//! 5. **Scored**: add the delta computed from *this* round's clear counts
//! 6. **TerminalCheck**: refill an exhausted tray, then ask the move oracle
//!
//! Rejections happen only during validation and leave every piece of state as
//! it was. Once a piece is committed the round always runs to the end.

use arrayvec::ArrayVec;

use crate::core::placement::PlacedCells;
use crate::core::{
    apply_clear, commit, find_clears, has_any_move, moves, resolve_origin, scoring, Board,
    ClearOutcome, Piece, PieceGenerator, Placement, ScoreResult, ShapeKind, Tray, TrayLookup,
};
use crate::error::{ConfigError, PlaceError};
use crate::phase::{NoopObserver, RoundObserver, RoundPhase};
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::{PieceId, SessionConfig, MAX_BOARD_SIZE, MAX_TRAY_CAPACITY};

/// Most phases a single round can enter
pub const MAX_ROUND_PHASES: usize = 8;

/// Everything one accepted placement did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub piece_id: PieceId,
    pub shape: ShapeKind,
    /// Origin the piece was committed at
    pub origin: (i8, i8),
    /// True when the requested origin did not fit and snap-alignment chose another
    pub snapped: bool,
    /// Cells filled by the piece, row-major
    pub placed: PlacedCells,
    pub clear: ClearOutcome,
    pub score: ScoreResult,
    /// Cumulative session score after this round
    pub total_score: u32,
    /// True when this round emptied the tray and a new batch was dealt
    pub tray_refilled: bool,
    /// True when no piece in the tray fits anywhere any more
    pub game_over: bool,
    /// Phases entered, in order, ending in `Idle` or `GameOver`
    pub phases: ArrayVec<RoundPhase, MAX_ROUND_PHASES>,
    /// Board after the round
    pub board: Board,
    pub episode_id: u32,
}

impl RoundResult {
    /// Points added by this round
    pub fn score_delta(&self) -> u32 {
        self.score.total
    }
}

/// A single game session
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    board: Board,
    tray: Tray,
    generator: PieceGenerator,
    score: u32,
    phase: RoundPhase,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Accepted placements in the current episode.
    rounds: u32,
}

impl Session {
    /// Start a session: empty board, freshly dealt tray, zero score
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        validate_config(&config)?;

        let mut session = Self {
            config,
            board: Board::new(config.board_size),
            tray: Tray::new(config.tray_capacity as usize),
            generator: PieceGenerator::new(config.seed),
            score: 0,
            phase: RoundPhase::Idle,
            episode_id: 0,
            rounds: 0,
        };
        session.tray.deal(&mut session.generator);
        session.settle_terminal();
        Ok(session)
    }

    /// Start a session from an arranged position (puzzles, replays, tests).
    ///
    /// `tray` may be shorter than the configured capacity; missing slots are
    /// empty. An all-empty tray is dealt immediately, as after a round.
    pub fn from_position(
        config: SessionConfig,
        board: Board,
        tray: Vec<Option<Piece>>,
    ) -> Result<Self, ConfigError> {
        validate_config(&config)?;
        if board.size() != config.board_size {
            return Err(ConfigError::InvalidValue {
                key: "board",
                value: format!("{0}x{0} board for a {1}x{1} session", board.size(), config.board_size),
            });
        }
        if tray.len() > config.tray_capacity as usize {
            return Err(ConfigError::TrayCapacity(tray.len().min(u8::MAX as usize) as u8));
        }

        let mut generator = PieceGenerator::new(config.seed);
        // Keep dealt identities unique against the arranged pieces.
        let max_id = tray.iter().flatten().map(|p| p.id.0).max().unwrap_or(0);
        while generator.peek_id().0 <= max_id {
            generator.next_piece();
        }

        let mut slots = Tray::new(config.tray_capacity as usize);
        slots.set_slots(tray);
        slots.refill_if_exhausted(&mut generator);

        let mut session = Self {
            config,
            board,
            tray: slots,
            generator,
            score: 0,
            phase: RoundPhase::Idle,
            episode_id: 0,
            rounds: 0,
        };
        session.settle_terminal();
        Ok(session)
    }

    /// Place `piece` aimed at (x, y) without observing the phases
    pub fn attempt_placement(&mut self, piece: PieceId, x: i8, y: i8) -> Result<RoundResult, PlaceError> {
        self.attempt_placement_with(piece, x, y, &mut NoopObserver)
    }

    /// Place `piece` aimed at (x, y), reporting every phase to `observer`
    pub fn attempt_placement_with<O>(
        &mut self,
        piece: PieceId,
        x: i8,
        y: i8,
        observer: &mut O,
    ) -> Result<RoundResult, PlaceError>
    where
        O: RoundObserver + ?Sized,
    {
        if self.phase == RoundPhase::GameOver {
            return Err(PlaceError::GameOver);
        }
        if self.phase.in_round() {
            return Err(PlaceError::RoundInProgress);
        }

        let mut phases = ArrayVec::new();

        self.enter(RoundPhase::Validating, &mut phases, observer);
        let (taken, spot) = match self.claim(piece, x, y) {
            Ok(claimed) => claimed,
            Err(err) => {
                self.enter(RoundPhase::Idle, &mut phases, observer);
                return Err(err);
            }
        };

        self.enter(RoundPhase::Placing, &mut phases, observer);
        observer.on_will_place(&footprint(&taken, spot.x, spot.y));

        let placed = commit(&mut self.board, &taken, spot.x, spot.y);
        self.enter(RoundPhase::Placed, &mut phases, observer);

        let clear = find_clears(&self.board, self.config.rules);
        if !clear.is_empty() {
            self.enter(RoundPhase::Clearing, &mut phases, observer);
            observer.on_will_clear(&clear.cells);
            apply_clear(&mut self.board, &clear.cells);
            self.enter(RoundPhase::Cleared, &mut phases, observer);
        }

        let score = scoring::calculate_score(placed.len() as u32, clear.counts);
        self.score = self.score.saturating_add(score.total);
        self.enter(RoundPhase::Scored, &mut phases, observer);

        self.enter(RoundPhase::TerminalCheck, &mut phases, observer);
        let tray_refilled = self.tray.refill_if_exhausted(&mut self.generator);
        let alive = has_any_move(&self.board, self.tray.slots());
        self.rounds += 1;
        let end = if alive { RoundPhase::Idle } else { RoundPhase::GameOver };
        self.enter(end, &mut phases, observer);

        Ok(RoundResult {
            piece_id: taken.id,
            shape: taken.kind,
            origin: (spot.x, spot.y),
            snapped: spot.snapped,
            placed,
            clear,
            score,
            total_score: self.score,
            tray_refilled,
            game_over: !alive,
            phases,
            board: self.board.clone(),
            episode_id: self.episode_id,
        })
    }

    /// Fresh board, fresh tray, zero score. Piece identities keep counting up.
    pub fn restart(&mut self) {
        self.board.reset();
        self.tray.deal(&mut self.generator);
        self.score = 0;
        self.rounds = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.phase = RoundPhase::Idle;
        self.settle_terminal();
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RoundPhase::GameOver
    }

    /// The score to report once the game has ended
    pub fn final_score(&self) -> Option<u32> {
        self.is_game_over().then_some(self.score)
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Per slot: whether that piece fits anywhere right now (`false` for empty slots)
    pub fn placeable(&self) -> ArrayVec<bool, MAX_TRAY_CAPACITY> {
        self.tray
            .slots()
            .iter()
            .map(|slot| {
                slot.as_ref()
                    .is_some_and(|piece| moves::fits_anywhere(&self.board, piece))
            })
            .collect()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.board_size = self.config.board_size;
        out.rules = self.config.rules;
        out.tray.clear();
        for slot in self.tray.slots() {
            out.tray.push(slot.as_ref().map(|piece| PieceSnapshot {
                id: piece.id,
                kind: piece.kind,
                color: piece.color,
                cells: piece.cells().to_vec(),
                width: piece.width(),
                height: piece.height(),
                placeable: moves::fits_anywhere(&self.board, piece),
            }));
        }
        out.score = self.score;
        out.phase = self.phase;
        out.game_over = self.is_game_over();
        out.episode_id = self.episode_id;
        out.rounds = self.rounds;
        out.seed = self.config.seed;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Resolve an origin for `piece`, then take it out of the tray.
    /// Nothing is touched unless both steps succeed.
    fn claim(&mut self, piece: PieceId, x: i8, y: i8) -> Result<(Piece, Placement), PlaceError> {
        let slot = self.tray.find(piece).map_err(|lookup| match lookup {
            TrayLookup::Consumed => PlaceError::SlotEmpty(piece),
            TrayLookup::Unknown => PlaceError::UnknownPiece(piece),
        })?;
        let candidate = self.tray.get(slot).ok_or(PlaceError::SlotEmpty(piece))?;
        let spot = resolve_origin(&self.board, candidate, x, y)
            .ok_or(PlaceError::NoValidPlacement { piece, x, y })?;
        let taken = self.tray.take(slot).ok_or(PlaceError::SlotEmpty(piece))?;
        Ok((taken, spot))
    }

    fn enter<O>(
        &mut self,
        next: RoundPhase,
        phases: &mut ArrayVec<RoundPhase, MAX_ROUND_PHASES>,
        observer: &mut O,
    ) where
        O: RoundObserver + ?Sized,
    {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal phase transition {:?} -> {:?}",
            self.phase,
            next
        );
        self.phase = next;
        phases.push(next);
        observer.on_phase(next);
    }

    /// Outside a round: mark the game over if the tray is dead on arrival
    fn settle_terminal(&mut self) {
        if !has_any_move(&self.board, self.tray.slots()) {
            self.phase = RoundPhase::GameOver;
        }
    }
}

fn validate_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if !(1..=MAX_BOARD_SIZE).contains(&config.board_size) {
        return Err(ConfigError::BoardSize(config.board_size));
    }
    if !(1..=MAX_TRAY_CAPACITY).contains(&(config.tray_capacity as usize)) {
        return Err(ConfigError::TrayCapacity(config.tray_capacity));
    }
    Ok(())
}

fn footprint(piece: &Piece, x: i8, y: i8) -> PlacedCells {
    piece
        .cells()
        .iter()
        .map(|&(dx, dy)| ((x + dx as i8) as u8, (y + dy as i8) as u8))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::RecordingObserver;
    use crate::types::{Color, RuleSet};

    fn piece(id: u32, kind: ShapeKind) -> Piece {
        Piece::new(PieceId(id), kind, Color::Orange)
    }

    #[test]
    fn new_session_is_idle_with_full_tray() {
        let session = Session::new(SessionConfig::blast(1)).unwrap();
        assert_eq!(session.phase(), RoundPhase::Idle);
        assert_eq!(session.tray().remaining(), 3);
        assert!(session.board().is_empty());
        assert_eq!(session.score(), 0);
        assert_eq!(session.final_score(), None);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut config = SessionConfig::blast(1);
        config.board_size = 0;
        assert_eq!(Session::new(config).unwrap_err(), ConfigError::BoardSize(0));

        let mut config = SessionConfig::blast(1);
        config.tray_capacity = 9;
        assert_eq!(Session::new(config).unwrap_err(), ConfigError::TrayCapacity(9));
    }

    #[test]
    fn rejection_leaves_state_untouched() {
        let board = Board::from_rows(&["#.#", "###", "#.#"]);
        let mut config = SessionConfig::blast(1);
        config.board_size = 3;
        let mut session = Session::from_position(
            config,
            board.clone(),
            vec![Some(piece(1, ShapeKind::DominoH)), Some(piece(2, ShapeKind::Single))],
        )
        .unwrap();

        let err = session.attempt_placement(PieceId(1), 1, 0).unwrap_err();
        assert_eq!(err, PlaceError::NoValidPlacement { piece: PieceId(1), x: 1, y: 0 });
        assert_eq!(session.board(), &board);
        assert_eq!(session.tray().remaining(), 2);
        assert_eq!(session.phase(), RoundPhase::Idle);

        assert_eq!(
            session.attempt_placement(PieceId(77), 0, 0).unwrap_err(),
            PlaceError::UnknownPiece(PieceId(77))
        );
    }

    #[test]
    fn consumed_piece_reports_slot_empty() {
        let mut session = Session::from_position(
            SessionConfig::blast(1),
            Board::new(9),
            vec![Some(piece(1, ShapeKind::Single)), Some(piece(2, ShapeKind::Single))],
        )
        .unwrap();
        session.attempt_placement(PieceId(1), 0, 0).unwrap();
        assert_eq!(
            session.attempt_placement(PieceId(1), 1, 1).unwrap_err(),
            PlaceError::SlotEmpty(PieceId(1))
        );
    }

    #[test]
    fn round_without_clear_skips_clearing_phases() {
        let mut session = Session::from_position(
            SessionConfig::blast(1),
            Board::new(9),
            vec![Some(piece(1, ShapeKind::Square2)), Some(piece(2, ShapeKind::Single))],
        )
        .unwrap();
        let mut observer = RecordingObserver::default();
        let result = session
            .attempt_placement_with(PieceId(1), 4, 4, &mut observer)
            .unwrap();

        use RoundPhase::*;
        assert_eq!(
            result.phases.as_slice(),
            &[Validating, Placing, Placed, Scored, TerminalCheck, Idle]
        );
        assert_eq!(observer.phases, result.phases.to_vec());
        assert_eq!(observer.will_place, vec![vec![(4, 4), (5, 4), (4, 5), (5, 5)]]);
        assert!(observer.will_clear.is_empty());
        assert_eq!(result.score_delta(), 4);
        assert!(!result.tray_refilled);
    }

    #[test]
    fn ids_stay_unique_after_arranged_tray() {
        let mut session = Session::from_position(
            SessionConfig::blast(1),
            Board::new(9),
            vec![Some(piece(5, ShapeKind::Single))],
        )
        .unwrap();
        let result = session.attempt_placement(PieceId(5), 0, 0).unwrap();
        assert!(result.tray_refilled);
        assert!(session.tray().pieces().all(|p| p.id.0 > 5));
    }

    #[test]
    fn classic_rules_ignore_squares() {
        let board = Board::from_rows(&[
            "##........",
            "###.......",
            "###.......",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
            "..........",
        ]);
        let mut session = Session::from_position(
            SessionConfig::classic(1),
            board,
            vec![Some(piece(1, ShapeKind::Single)), Some(piece(2, ShapeKind::Single))],
        )
        .unwrap();
        assert_eq!(session.config().rules, RuleSet::Classic);
        let result = session.attempt_placement(PieceId(1), 2, 0).unwrap();
        assert!(result.clear.is_empty());
        assert_eq!(session.board().occupied_count(), 9);
    }

    #[test]
    fn snapshot_reflects_tray_and_board() {
        let session = Session::new(SessionConfig::blast(3)).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.board.len(), 81);
        assert!(snap.board.iter().all(|c| *c == 0));
        assert_eq!(snap.tray.len(), 3);
        assert!(snap.tray.iter().flatten().all(|p| p.placeable));
        assert!(!snap.game_over);
    }
}
