#![no_std]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::BitOr;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use types::cell_index;

pub use driver::*;
pub use error::*;
pub use generator::*;
pub use open::*;
pub use presentation::*;
pub use resolver::*;
pub use session::*;
pub use store::*;
pub use timer::*;
pub use types::*;

mod driver;
mod error;
mod generator;
mod open;
mod presentation;
mod resolver;
mod session;
mod store;
mod timer;
mod types;

/// What happens to a pair that was evaluated and did not match.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MismatchPolicy {
    /// Start flipping both cards back as soon as the mismatch is known.
    #[default]
    HideImmediately,
    /// Leave both cards face up until their reveal timer runs out.
    LingerUntilTimeout,
}

/// Which matched flags the resolver consults before accepting a pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchRule {
    /// Only the earlier revealed card of the pair must be unmatched.
    #[default]
    FirstCardOnly,
    /// Both cards of the pair must be unmatched.
    BothCards,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// How long a revealed card may stay open without being matched.
    pub reveal_duration: Duration,
    /// Delay between the final match and the terminal event.
    pub grace_period: Duration,
    pub mismatch: MismatchPolicy,
    pub match_rule: MatchRule,
}

impl GameConfig {
    pub const MIN_REVEAL: Duration = Duration::from_secs(1);
    pub const MAX_REVEAL: Duration = Duration::from_secs(10);
    pub const DEFAULT_REVEAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_GRACE: Duration = Duration::from_secs(2);

    pub const fn new_unchecked(reveal_duration: Duration, grace_period: Duration) -> Self {
        Self {
            reveal_duration,
            grace_period,
            mismatch: MismatchPolicy::HideImmediately,
            match_rule: MatchRule::FirstCardOnly,
        }
    }

    pub fn new(reveal_duration: Duration, grace_period: Duration) -> Self {
        let reveal_duration = reveal_duration.clamp(Self::MIN_REVEAL, Self::MAX_REVEAL);
        Self::new_unchecked(reveal_duration, grace_period)
    }

    pub const fn with_mismatch(self, mismatch: MismatchPolicy) -> Self {
        Self { mismatch, ..self }
    }

    pub const fn with_match_rule(self, match_rule: MatchRule) -> Self {
        Self { match_rule, ..self }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_REVEAL, Self::DEFAULT_GRACE)
    }
}

/// Flags owned by whoever launches a session, read once when the section is enabled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSetup {
    pub total_cards: CellCount,
    pub prior_save_exists: bool,
    /// Layout used when a fresh deck is dealt, a restored session keeps its own.
    pub layout: LayoutId,
}

impl SessionSetup {
    pub fn new(total_cards: CellCount, layout: impl Into<LayoutId>) -> Self {
        Self {
            total_cards,
            prior_save_exists: false,
            layout: layout.into(),
        }
    }

    pub fn with_prior_save(self, prior_save_exists: bool) -> Self {
        Self {
            prior_save_exists,
            ..self
        }
    }
}

/// Checks that `total_cards` can be dealt as pairs.
pub fn check_total_cards(total_cards: CellCount) -> Result<CellCount> {
    if total_cards == 0 {
        Err(GameError::EmptyDeck)
    } else if total_cards % 2 != 0 {
        Err(GameError::OddCardCount(total_cards))
    } else {
        Ok(total_cards)
    }
}

/// A dealt sequence of card values where every value in `0..total_cards / 2` appears exactly twice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CardValue>", into = "Vec<CardValue>")]
pub struct Deck {
    values: Vec<CardValue>,
}

impl Deck {
    pub fn from_values(values: Vec<CardValue>) -> Result<Self> {
        let total_cards =
            CellCount::try_from(values.len()).map_err(|_| GameError::TooManyCards(values.len()))?;
        let pair_count = usize::from(check_total_cards(total_cards)? / 2);

        let mut seen = vec![0u8; pair_count];
        for &value in &values {
            let slot = seen
                .get_mut(usize::from(value))
                .ok_or(GameError::UnpairedValue(value))?;
            *slot = slot.saturating_add(1);
        }
        if let Some(value) = seen.iter().position(|&count| count != 2) {
            return Err(GameError::UnpairedValue(cell_index(value)));
        }

        Ok(Self { values })
    }

    pub fn total_cards(&self) -> CellCount {
        cell_index(self.values.len())
    }

    pub fn pair_count(&self) -> CellCount {
        self.total_cards() / 2
    }

    pub fn values(&self) -> &[CardValue] {
        &self.values
    }

    pub fn value_at(&self, cell: CellIndex) -> Result<CardValue> {
        self.values
            .get(usize::from(cell))
            .copied()
            .ok_or(GameError::InvalidIndex(cell))
    }

    pub fn into_values(self) -> Vec<CardValue> {
        self.values
    }
}

impl TryFrom<Vec<CardValue>> for Deck {
    type Error = GameError;

    fn try_from(values: Vec<CardValue>) -> Result<Self> {
        Self::from_values(values)
    }
}

impl From<Deck> for Vec<CardValue> {
    fn from(deck: Deck) -> Self {
        deck.values
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PickOutcome {
    /// The pick was not accepted, the cell is matched, already face up, or the section is not active.
    Ignored,
    /// The cell was locked and its reveal animation requested.
    Flipping,
}

impl PickOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Ignored => false,
            Self::Flipping => true,
        }
    }
}

/// Result of committing a revealed card and re-evaluating the open set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResolveOutcome {
    NoChange,
    /// A single card is open and waiting for its pair.
    Waiting,
    Mismatched,
    Matched,
    /// The last pair was matched, the section is ending.
    Completed,
}

impl ResolveOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

impl BitOr for ResolveOutcome {
    type Output = ResolveOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use ResolveOutcome::*;
        match (self, rhs) {
            (Completed, _) => Completed,
            (_, Completed) => Completed,
            (Matched, _) => Matched,
            (_, Matched) => Matched,
            (Mismatched, _) => Mismatched,
            (_, Mismatched) => Mismatched,
            (Waiting, _) => Waiting,
            (_, Waiting) => Waiting,
            (NoChange, NoChange) => NoChange,
        }
    }
}
