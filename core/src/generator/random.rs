use alloc::vec;
use alloc::vec::Vec;
use rand::prelude::*;

use super::*;

/// Deals pairs by drawing two distinct cells at random for each value in turn.
///
/// The result is a uniformly random assignment of cells to paired values, which is weaker than shuffling the whole
/// deck as a permutation but enough for dealing face-down pairs.
#[derive(Clone, Debug)]
pub struct RandomDeckGenerator {
    rng: SmallRng,
}

impl RandomDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate(&mut self, total_cards: CellCount) -> Result<Deck> {
        let total_cards = check_total_cards(total_cards)?;

        let mut free_cells: Vec<CellIndex> = (0..total_cards).collect();
        let mut values = vec![0; usize::from(total_cards)];

        for value in 0..total_cards / 2 {
            for _ in 0..2 {
                let pick = self.rng.random_range(0..free_cells.len());
                let cell = free_cells.swap_remove(pick);
                values[usize::from(cell)] = value;
            }
        }

        log::trace!("Dealt {} cards: {:?}", total_cards, values);
        Deck::from_values(values)
    }
}
