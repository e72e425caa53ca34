//! Round phases and the hooks a presentation layer can attach to them.
//!
//! A round walks
//! `Idle → Validating → Placing → Placed → [Clearing → Cleared] → Scored → TerminalCheck → Idle | GameOver`.
//! `Clearing`/`Cleared` are skipped when the placement completes nothing, and a
//! rejected command goes straight from `Validating` back to `Idle`.
//!
//! Phase boundaries are logical. The engine never sleeps; an observer that
//! wants to animate decides for itself how long to linger.

use crate::types::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundPhase {
    #[default]
    Idle,
    Validating,
    Placing,
    Placed,
    Clearing,
    Cleared,
    Scored,
    TerminalCheck,
    GameOver,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::Validating => "validating",
            RoundPhase::Placing => "placing",
            RoundPhase::Placed => "placed",
            RoundPhase::Clearing => "clearing",
            RoundPhase::Cleared => "cleared",
            RoundPhase::Scored => "scored",
            RoundPhase::TerminalCheck => "terminal_check",
            RoundPhase::GameOver => "game_over",
        }
    }

    /// True while a round is between validation and the terminal check
    pub fn in_round(&self) -> bool {
        !matches!(self, RoundPhase::Idle | RoundPhase::GameOver)
    }

    /// Whether the state machine allows `self -> next`
    pub fn can_advance_to(&self, next: RoundPhase) -> bool {
        use RoundPhase::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Placing)
                | (Validating, Idle)
                | (Placing, Placed)
                | (Placed, Clearing)
                | (Placed, Scored)
                | (Clearing, Cleared)
                | (Cleared, Scored)
                | (Scored, TerminalCheck)
                | (TerminalCheck, Idle)
                | (TerminalCheck, GameOver)
                | (GameOver, Idle)
        )
    }
}

/// Hooks invoked synchronously while a round runs. Every method defaults to a no-op.
pub trait RoundObserver {
    /// Called on every phase transition, after the new phase is entered
    fn on_phase(&mut self, _phase: RoundPhase) {}

    /// The listed cells are about to be filled
    fn on_will_place(&mut self, _cells: &[Coord]) {}

    /// The listed cells are about to be emptied
    fn on_will_clear(&mut self, _cells: &[Coord]) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RoundObserver for NoopObserver {}

/// Observer that records what it was told, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingObserver {
    pub phases: Vec<RoundPhase>,
    pub will_place: Vec<Vec<Coord>>,
    pub will_clear: Vec<Vec<Coord>>,
}

impl RoundObserver for RecordingObserver {
    fn on_phase(&mut self, phase: RoundPhase) {
        self.phases.push(phase);
    }

    fn on_will_place(&mut self, cells: &[Coord]) {
        self.will_place.push(cells.to_vec());
    }

    fn on_will_clear(&mut self, cells: &[Coord]) {
        self.will_clear.push(cells.to_vec());
    }
}
