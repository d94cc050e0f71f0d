use alloc::collections::BTreeMap;
use core::time::Duration;
use smallvec::SmallVec;
use web_time::Instant;

use crate::*;

/// Cells whose countdown ran out during a single tick.
pub type Expired = SmallVec<[CellIndex; 4]>;

/// Per-cell countdowns for revealed cards that have not been matched yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RevealTimers {
    remaining: BTreeMap<CellIndex, Duration>,
}

impl RevealTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, cell: CellIndex, budget: Duration) {
        self.remaining.insert(cell, budget);
    }

    pub fn cancel(&mut self, cell: CellIndex) -> bool {
        self.remaining.remove(&cell).is_some()
    }

    pub fn remaining(&self, cell: CellIndex) -> Option<Duration> {
        self.remaining.get(&cell).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }

    /// Counts every running timer down by `elapsed` and removes the ones that reached zero.
    ///
    /// Cells for which `skip` returns true are left untouched, matched cells can linger here only through stale
    /// bookkeeping and must never time out.
    pub fn advance(&mut self, elapsed: Duration, skip: impl Fn(CellIndex) -> bool) -> Expired {
        let mut expired = Expired::new();
        for (&cell, remaining) in self.remaining.iter_mut() {
            if skip(cell) {
                continue;
            }
            *remaining = remaining.saturating_sub(elapsed);
            if remaining.is_zero() {
                expired.push(cell);
            }
        }
        for cell in &expired {
            self.remaining.remove(cell);
        }
        expired
    }
}

/// One-shot countdown that can be cancelled before it fires.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Deferred {
    remaining: Option<Duration>,
}

impl Deferred {
    pub const fn idle() -> Self {
        Self { remaining: None }
    }

    pub fn schedule(&mut self, delay: Duration) {
        self.remaining = Some(delay);
    }

    pub fn cancel(&mut self) -> bool {
        self.remaining.take().is_some()
    }

    pub const fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Returns true exactly once, on the tick that exhausts the delay.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        match self.remaining {
            None => false,
            Some(remaining) if remaining <= elapsed => {
                self.remaining = None;
                true
            }
            Some(remaining) => {
                self.remaining = Some(remaining - elapsed);
                false
            }
        }
    }
}

/// Measures wall-clock time between frames so a host loop can feed [`GameDriver::tick`].
#[derive(Copy, Clone, Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Time since the previous call, zero on the first call after construction or [`reset`](Self::reset).
    pub fn delta(&mut self) -> Duration {
        self.delta_at(Instant::now())
    }

    pub fn delta_at(&mut self, now: Instant) -> Duration {
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);
        delta
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
