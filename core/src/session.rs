use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::types::cell_index;
use crate::*;

/// Authoritative record of one game in progress, and the unit that gets persisted.
///
/// Only the dealt values, matched flags, counters and layout live here. Which cards are currently face up is
/// transient bookkeeping held by [`OpenCards`] and is never saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    layout: LayoutId,
    cell_values: Vec<CardValue>,
    matched: Vec<bool>,
    click_count: Saturating<u32>,
    match_count: Saturating<u32>,
}

impl SessionState {
    pub fn new(deck: Deck, layout: LayoutId) -> Self {
        let total = deck.values().len();
        Self {
            layout,
            cell_values: deck.into_values(),
            matched: vec![false; total],
            click_count: Saturating(0),
            match_count: Saturating(0),
        }
    }

    /// Checks a restored record before it is trusted.
    ///
    /// Both cards of a value must share their matched flag, and the match counter must agree with the flags.
    pub fn validate(&self) -> Result<()> {
        if self.cell_values.len() != self.matched.len() {
            return Err(GameError::LengthMismatch {
                values: self.cell_values.len(),
                flags: self.matched.len(),
            });
        }
        Deck::from_values(self.cell_values.clone())?;

        let mut first_flag = BTreeMap::new();
        for (&value, &matched) in self.cell_values.iter().zip(&self.matched) {
            if first_flag.insert(value, matched).is_some_and(|first| first != matched) {
                return Err(GameError::PartnerNotMatched(value));
            }
        }

        let cells = self.matched.iter().filter(|&&matched| matched).count();
        if cells as u64 != 2 * u64::from(self.match_count.0) {
            return Err(GameError::MatchCountMismatch {
                cells,
                matches: self.match_count.0,
            });
        }
        Ok(())
    }

    pub fn layout(&self) -> &LayoutId {
        &self.layout
    }

    pub fn total_cards(&self) -> CellCount {
        cell_index(self.cell_values.len())
    }

    pub fn cell_values(&self) -> &[CardValue] {
        &self.cell_values
    }

    pub fn matched_flags(&self) -> &[bool] {
        &self.matched
    }

    pub fn value_at(&self, cell: CellIndex) -> Option<CardValue> {
        self.cell_values.get(usize::from(cell)).copied()
    }

    pub fn contains(&self, cell: CellIndex) -> bool {
        usize::from(cell) < self.cell_values.len()
    }

    pub fn is_matched(&self, cell: CellIndex) -> bool {
        self.matched.get(usize::from(cell)).copied().unwrap_or(false)
    }

    pub fn click_count(&self) -> u32 {
        self.click_count.0
    }

    pub fn match_count(&self) -> u32 {
        self.match_count.0
    }

    pub fn is_complete(&self) -> bool {
        self.matched.iter().all(|&matched| matched)
    }

    pub(crate) fn record_click(&mut self) {
        self.click_count += 1;
    }

    /// Flags both cells as matched and counts the match. Flags are never cleared again.
    pub(crate) fn record_match(&mut self, a: CellIndex, b: CellIndex) {
        for cell in [a, b] {
            if let Some(matched) = self.matched.get_mut(usize::from(cell)) {
                *matched = true;
            }
        }
        self.match_count += 1;
    }
}
