use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::types::cell_index;
use crate::*;

/// Where a single card is in its reveal/resolve cycle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardPhase {
    /// Face down and pickable.
    #[default]
    Hidden,
    /// Picked, the reveal animation has not finished yet.
    Flipping,
    /// Face up and waiting to be paired.
    Open,
    /// Face up after a mismatch, waiting for its reveal timer to hide it.
    Lingering,
    /// The hide animation is running.
    Hiding,
    Matched,
}

impl CardPhase {
    pub const fn is_pickable(self) -> bool {
        matches!(self, Self::Hidden)
    }

    /// Face up as far as the player can see.
    pub const fn is_visually_open(self) -> bool {
        matches!(self, Self::Open | Self::Lingering | Self::Hiding)
    }
}

/// Bookkeeping for revealed-but-unmatched cards.
///
/// Replaces separate visual and logic sets with one phase per cell. The logic set is the cells in
/// [`CardPhase::Open`], kept in reveal order because the resolver pairs cards by that order; the visual set is every
/// cell that [`CardPhase::is_visually_open`]. The logic set is always a subset of the visual set.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenCards {
    phases: Vec<CardPhase>,
    reveal_order: Vec<CellIndex>,
    timers: RevealTimers,
}

impl OpenCards {
    /// Fresh bookkeeping for `state`, matched cells start as [`CardPhase::Matched`] and everything else face down.
    pub fn new(state: &SessionState) -> Self {
        let phases = state
            .matched_flags()
            .iter()
            .map(|&matched| {
                if matched {
                    CardPhase::Matched
                } else {
                    CardPhase::Hidden
                }
            })
            .collect();
        Self {
            phases,
            reveal_order: Vec::new(),
            timers: RevealTimers::new(),
        }
    }

    pub fn empty(total_cards: CellCount) -> Self {
        Self {
            phases: vec![CardPhase::Hidden; usize::from(total_cards)],
            reveal_order: Vec::new(),
            timers: RevealTimers::new(),
        }
    }

    pub fn phase(&self, cell: CellIndex) -> Option<CardPhase> {
        self.phases.get(usize::from(cell)).copied()
    }

    /// Cells currently eligible for pairing, in the order they were revealed.
    pub fn logic_open(&self) -> &[CellIndex] {
        &self.reveal_order
    }

    /// Cells currently face up on screen and not matched.
    pub fn visual_open(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.phases
            .iter()
            .enumerate()
            .filter(|(_, phase)| phase.is_visually_open())
            .map(|(pos, _)| cell_index(pos))
    }

    pub fn timers(&self) -> &RevealTimers {
        &self.timers
    }

    /// Locks a face-down cell for its reveal animation. Returns false for any other phase.
    pub fn begin_flip(&mut self, cell: CellIndex) -> bool {
        self.transition(cell, CardPhase::Hidden, CardPhase::Flipping)
    }

    /// Commits a flipped cell into the logic set and starts its reveal timer.
    pub fn commit(&mut self, cell: CellIndex, budget: Duration) -> bool {
        if !self.transition(cell, CardPhase::Flipping, CardPhase::Open) {
            return false;
        }
        self.reveal_order.push(cell);
        self.timers.start(cell, budget);
        true
    }

    /// Removes a matched cell from every open structure.
    pub fn settle(&mut self, cell: CellIndex) {
        self.leave_logic(cell);
        self.timers.cancel(cell);
        self.set(cell, CardPhase::Matched);
    }

    /// Drops a mismatched cell from the logic set, it stays face up with its timer running.
    pub fn linger(&mut self, cell: CellIndex) {
        self.leave_logic(cell);
        self.set(cell, CardPhase::Lingering);
    }

    /// Drops a cell from the logic set and its timer, and marks it as flipping back.
    pub fn begin_hide(&mut self, cell: CellIndex) {
        self.leave_logic(cell);
        self.timers.cancel(cell);
        if self.phase(cell).is_some_and(CardPhase::is_visually_open) {
            self.set(cell, CardPhase::Hiding);
        }
    }

    /// Clears a cell from the visual set once its hide animation completed.
    pub fn finish_hide(&mut self, cell: CellIndex) -> bool {
        self.transition(cell, CardPhase::Hiding, CardPhase::Hidden)
    }

    /// Advances every running reveal timer, matched cells are skipped.
    pub fn advance_timers(&mut self, elapsed: Duration) -> Expired {
        let phases = &self.phases;
        self.timers.advance(elapsed, |cell| {
            matches!(phases.get(usize::from(cell)), Some(CardPhase::Matched))
        })
    }

    fn transition(&mut self, cell: CellIndex, from: CardPhase, to: CardPhase) -> bool {
        match self.phases.get_mut(usize::from(cell)) {
            Some(phase) if *phase == from => {
                *phase = to;
                true
            }
            _ => false,
        }
    }

    fn set(&mut self, cell: CellIndex, to: CardPhase) {
        if let Some(phase) = self.phases.get_mut(usize::from(cell)) {
            *phase = to;
        }
    }

    fn leave_logic(&mut self, cell: CellIndex) {
        self.reveal_order.retain(|&open| open != cell);
    }
}
