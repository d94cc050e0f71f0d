use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Position of a card on the grid, `0..total_cards`.
pub type CellIndex = u16;

/// Card category; exactly two cells share each value.
pub type CardValue = u16;

/// Count type used for deck sizes, click and match counters.
pub type CellCount = u16;

/// Opaque description of the grid shape a session was dealt on.
///
/// The core never interprets it, it is only carried through persistence so a restored session is shown on the same
/// layout it was saved with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutId(String);

impl LayoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LayoutId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts a slice position back into a [`CellIndex`], decks are bounded by [`CellCount`] so this never truncates.
pub(crate) fn cell_index(pos: usize) -> CellIndex {
    pos as CellIndex
}
