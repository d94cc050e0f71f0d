use thiserror::Error;

use crate::{CardValue, CellCount, CellIndex};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot pair an odd number of cards ({0})")]
    OddCardCount(CellCount),
    #[error("Deck has no cards")]
    EmptyDeck,
    #[error("Deck of {0} cards does not fit the cell index range")]
    TooManyCards(usize),
    #[error("Invalid cell index {0}")]
    InvalidIndex(CellIndex),
    #[error("Card value {0} does not appear exactly twice")]
    UnpairedValue(CardValue),
    #[error("Deck has {values} values but {flags} matched flags")]
    LengthMismatch { values: usize, flags: usize },
    #[error("Only one card of value {0} is matched")]
    PartnerNotMatched(CardValue),
    #[error("{cells} matched cells disagree with {matches} recorded matches")]
    MatchCountMismatch { cells: usize, matches: u32 },
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure reported by a [`SessionStore`](crate::SessionStore).
///
/// The driver never surfaces these, a failed load is the same as no save.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not encode saved session")]
    Encode(#[source] serde_json::Error),
    #[error("Saved session is not readable")]
    Decode(#[source] serde_json::Error),
    #[error("Saved session is inconsistent: {0}")]
    Invalid(#[from] GameError),
    #[error("Storage is unavailable")]
    Unavailable,
}
