use crate::*;
pub use random::*;

mod random;

pub trait DeckGenerator {
    fn generate(&mut self, total_cards: CellCount) -> Result<Deck>;
}

/// Deals the same deck every time, regardless of the requested size.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetDeck(pub Deck);

impl DeckGenerator for PresetDeck {
    fn generate(&mut self, total_cards: CellCount) -> Result<Deck> {
        if self.0.total_cards() != total_cards {
            log::warn!(
                "Preset deck has {} cards, requested {}, dealt anyway",
                self.0.total_cards(),
                total_cards
            );
        }
        Ok(self.0.clone())
    }
}
