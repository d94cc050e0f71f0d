use smallvec::SmallVec;

use crate::*;

/// Verdict for one evaluated pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PairVerdict {
    Match,
    Mismatch,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EvaluatedPair {
    pub first: CellIndex,
    pub second: CellIndex,
    pub verdict: PairVerdict,
}

/// Every pair considered in one resolution pass, in reveal order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub pairs: SmallVec<[EvaluatedPair; 2]>,
    /// Trailing card left open without a partner.
    pub waiting: Option<CellIndex>,
}

impl Resolution {
    pub fn matches(&self) -> impl Iterator<Item = &EvaluatedPair> {
        self.pairs
            .iter()
            .filter(|pair| pair.verdict == PairVerdict::Match)
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &EvaluatedPair> {
        self.pairs
            .iter()
            .filter(|pair| pair.verdict == PairVerdict::Mismatch)
    }

    pub fn outcome(&self) -> ResolveOutcome {
        let waiting = if self.waiting.is_some() {
            ResolveOutcome::Waiting
        } else {
            ResolveOutcome::NoChange
        };
        self.pairs
            .iter()
            .map(|pair| match pair.verdict {
                PairVerdict::Match => ResolveOutcome::Matched,
                PairVerdict::Mismatch => ResolveOutcome::Mismatched,
            })
            .fold(waiting, core::ops::BitOr::bitor)
    }
}

/// Pairs open cards by reveal order (1st with 2nd, 3rd with 4th, ...) and settles each pair.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MatchResolver {
    rule: MatchRule,
}

impl MatchResolver {
    pub const fn new(rule: MatchRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }

    pub fn is_match(&self, state: &SessionState, first: CellIndex, second: CellIndex) -> bool {
        let unmatched = match self.rule {
            MatchRule::FirstCardOnly => !state.is_matched(first),
            MatchRule::BothCards => !state.is_matched(first) && !state.is_matched(second),
        };
        first != second && unmatched && state.value_at(first) == state.value_at(second)
    }

    /// Re-evaluates the whole logic set.
    ///
    /// Each evaluated pair counts one click. Matches are flagged in `state` and removed from every open structure;
    /// mismatches only leave the logic set and keep their reveal timers, the caller decides when they flip back.
    pub fn resolve(&self, state: &mut SessionState, open: &mut OpenCards) -> Resolution {
        let snapshot: SmallVec<[CellIndex; 4]> = open.logic_open().iter().copied().collect();
        let mut resolution = Resolution::default();

        for chunk in snapshot.chunks(2) {
            let &[first, second] = chunk else {
                resolution.waiting = chunk.first().copied();
                break;
            };
            state.record_click();

            let verdict = if self.is_match(state, first, second) {
                log::debug!(
                    "Match on cells {} and {}, value {:?}",
                    first,
                    second,
                    state.value_at(first)
                );
                state.record_match(first, second);
                open.settle(first);
                open.settle(second);
                PairVerdict::Match
            } else {
                log::trace!("Mismatch on cells {} and {}", first, second);
                open.linger(first);
                open.linger(second);
                PairVerdict::Mismatch
            };

            resolution.pairs.push(EvaluatedPair {
                first,
                second,
                verdict,
            });
        }

        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::time::Duration;

    const BUDGET: Duration = Duration::from_secs(5);

    fn setup(values: &[CardValue]) -> (SessionState, OpenCards) {
        let state = SessionState::new(Deck::from_values(values.to_vec()).unwrap(), "test".into());
        let open = OpenCards::new(&state);
        (state, open)
    }

    fn reveal(open: &mut OpenCards, cells: &[CellIndex]) {
        for &cell in cells {
            assert!(open.begin_flip(cell));
            assert!(open.commit(cell, BUDGET));
        }
    }

    #[test]
    fn single_open_card_waits() {
        let (mut state, mut open) = setup(&[0, 0, 1, 1]);
        reveal(&mut open, &[0]);

        let resolution = MatchResolver::default().resolve(&mut state, &mut open);

        assert_eq!(resolution.outcome(), ResolveOutcome::Waiting);
        assert_eq!(resolution.waiting, Some(0));
        assert_eq!(state.click_count(), 0);
        assert_eq!(open.logic_open(), &[0]);
    }

    #[test]
    fn matching_pair_is_flagged_and_settled() {
        let (mut state, mut open) = setup(&[0, 0, 1, 1]);
        reveal(&mut open, &[0, 1]);

        let resolution = MatchResolver::default().resolve(&mut state, &mut open);

        assert_eq!(resolution.outcome(), ResolveOutcome::Matched);
        assert_eq!(state.matched_flags(), &[true, true, false, false]);
        assert_eq!(state.match_count(), 1);
        assert_eq!(state.click_count(), 1);
        assert!(open.logic_open().is_empty());
        assert!(open.timers().is_empty());
        assert_eq!(open.visual_open().count(), 0);
    }

    #[test]
    fn mismatching_pair_leaves_logic_set_only() {
        let (mut state, mut open) = setup(&[0, 1, 0, 1]);
        reveal(&mut open, &[0, 1]);

        let resolution = MatchResolver::default().resolve(&mut state, &mut open);

        assert_eq!(resolution.outcome(), ResolveOutcome::Mismatched);
        assert_eq!(state.matched_flags(), &[false; 4]);
        assert_eq!(state.match_count(), 0);
        assert_eq!(state.click_count(), 1);
        assert!(open.logic_open().is_empty());
        assert_eq!(open.visual_open().collect::<alloc::vec::Vec<_>>(), vec![0, 1]);
        assert_eq!(open.timers().len(), 2);
    }

    #[test]
    fn pairs_follow_reveal_order_not_index_order() {
        let (mut state, mut open) = setup(&[0, 1, 0, 1]);
        reveal(&mut open, &[0, 2, 1]);

        let resolution = MatchResolver::default().resolve(&mut state, &mut open);

        assert_eq!(resolution.pairs.len(), 1);
        assert_eq!(resolution.pairs[0].first, 0);
        assert_eq!(resolution.pairs[0].second, 2);
        assert_eq!(resolution.outcome(), ResolveOutcome::Matched);
        assert_eq!(resolution.waiting, Some(1));
        assert_eq!(state.click_count(), 1);
        assert_eq!(open.logic_open(), &[1]);
    }

    #[test]
    fn clicks_count_pairs_not_cards() {
        let (mut state, mut open) = setup(&[0, 1, 2, 0, 1, 2]);
        reveal(&mut open, &[0, 1, 2, 3, 4]);

        let resolution = MatchResolver::default().resolve(&mut state, &mut open);

        assert_eq!(resolution.pairs.len(), 2);
        assert_eq!(state.click_count(), 2);
        assert_eq!(resolution.outcome(), ResolveOutcome::Mismatched);
        assert_eq!(open.logic_open(), &[4]);
    }

    #[test]
    fn first_card_only_rule_ignores_second_flag() {
        let (mut state, _) = setup(&[0, 0, 1, 1]);
        state.record_match(1, 1);

        assert!(MatchResolver::new(MatchRule::FirstCardOnly).is_match(&state, 0, 1));
        assert!(!MatchResolver::new(MatchRule::BothCards).is_match(&state, 0, 1));
        assert!(!MatchResolver::new(MatchRule::FirstCardOnly).is_match(&state, 1, 0));
    }

    #[test]
    fn a_card_never_matches_itself() {
        let (state, _) = setup(&[0, 0, 1, 1]);

        assert!(!MatchResolver::default().is_match(&state, 2, 2));
    }
}
