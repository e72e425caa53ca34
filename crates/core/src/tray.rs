//! Tray module - the fixed-capacity set of pieces on offer
//!
//! A batch is dealt into every slot at once. Consuming a piece empties its
//! slot; the tray is refilled only after the last slot has been emptied,
//! never partially.

use arrayvec::ArrayVec;

use crate::shapes::{Piece, PieceGenerator};
use crate::types::{PieceId, MAX_TRAY_CAPACITY};

/// Why a piece identity could not be found in the tray
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayLookup {
    /// The identity was dealt in this batch and has already been used
    Consumed,
    /// The identity is not part of the current batch
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tray {
    slots: ArrayVec<Option<Piece>, MAX_TRAY_CAPACITY>,
    /// Identities consumed from the current batch
    spent: ArrayVec<PieceId, MAX_TRAY_CAPACITY>,
}

impl Tray {
    /// Create an empty tray with `capacity` slots
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or above [`MAX_TRAY_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        assert!(
            (1..=MAX_TRAY_CAPACITY).contains(&capacity),
            "tray capacity {} outside 1..={}",
            capacity,
            MAX_TRAY_CAPACITY
        );
        let mut slots = ArrayVec::new();
        for _ in 0..capacity {
            slots.push(None);
        }
        Self {
            slots,
            spent: ArrayVec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// All slots, in order
    pub fn slots(&self) -> &[Option<Piece>] {
        &self.slots
    }

    /// Pieces still on offer, in slot order
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.slots.iter().flatten()
    }

    /// Number of pieces still on offer
    pub fn remaining(&self) -> usize {
        self.pieces().count()
    }

    /// True when every slot is empty
    pub fn is_exhausted(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// Locate a piece by identity
    pub fn find(&self, id: PieceId) -> Result<usize, TrayLookup> {
        if let Some(idx) = self
            .slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|p| p.id == id))
        {
            return Ok(idx);
        }
        if self.spent.contains(&id) {
            Err(TrayLookup::Consumed)
        } else {
            Err(TrayLookup::Unknown)
        }
    }

    /// Borrow the piece in `slot`
    pub fn get(&self, slot: usize) -> Option<&Piece> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Remove and return the piece in `slot`
    pub fn take(&mut self, slot: usize) -> Option<Piece> {
        let piece = self.slots.get_mut(slot)?.take()?;
        self.spent.push(piece.id);
        Some(piece)
    }

    /// Deal a fresh batch into every slot, discarding whatever was left
    pub fn deal(&mut self, generator: &mut PieceGenerator) {
        self.spent.clear();
        for slot in &mut self.slots {
            *slot = Some(generator.next_piece());
        }
    }

    /// Deal a fresh batch only if the tray is exhausted. Returns true if it dealt.
    pub fn refill_if_exhausted(&mut self, generator: &mut PieceGenerator) -> bool {
        if !self.is_exhausted() {
            return false;
        }
        self.deal(generator);
        true
    }

    /// Replace the slots with explicit pieces (scripted games and tests)
    ///
    /// # Panics
    ///
    /// Panics if more pieces are given than the tray has slots.
    pub fn set_slots(&mut self, pieces: Vec<Option<Piece>>) {
        assert!(pieces.len() <= self.capacity(), "too many pieces for tray");
        self.spent.clear();
        let capacity = self.capacity();
        self.slots.clear();
        for piece in pieces {
            self.slots.push(piece);
        }
        while self.slots.len() < capacity {
            self.slots.push(None);
        }
    }
}
