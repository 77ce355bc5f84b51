//! The two tiebreak policies that assign the engine-owned `deconflict` field
//! on insertion: ROEL (random-order) and IOEL (insertion-order).
//!
//! Each policy is a strategy object injected into a single
//! [`EventList`](crate::list::EventList) at construction, selected via
//! `EventList::random(seed)` / `EventList::insertion_order()`.

use rand::{RngCore, SeedableRng, rngs::StdRng};

/// Assigns a distinct `deconflict` value to an event about to be inserted.
///
/// `is_empty_before_insert` tells the policy whether the list was empty
/// immediately before this insertion, which IOEL uses to reset its counter
/// and amortise rollover.
pub trait Deconflicter {
    /// Returns the deconflict value to assign to the event currently being
    /// inserted.
    fn next(&mut self, is_empty_before_insert: bool) -> i64;
}

/// ROEL: draws a uniformly random `i64` from a seedable stream local to the
/// list. Probability of collision across practical sizes is negligible but
/// not zero; a collision is not retried here — it surfaces later as a
/// comparator-detected [`InvariantViolation`](simq_core::EventListError::InvariantViolation)
/// rather than being papered over by a silent resample.
#[derive(Debug)]
pub struct RandomDeconflicter {
    rng: StdRng,
}

impl RandomDeconflicter {
    /// Creates a new random tiebreak stream seeded with `seed`.
    ///
    /// The RNG is local to this instance, never process-wide.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Deconflicter for RandomDeconflicter {
    fn next(&mut self, _is_empty_before_insert: bool) -> i64 {
        self.rng.next_u64() as i64
    }
}

/// IOEL: a monotonically increasing counter seeded at `i64::MIN`, reset to
/// the seed whenever the list is empty at the start of an `add`. Same-time
/// events are therefore processed in insertion order.
///
/// Widened to `i128` internally and narrowed only at the point a value is
/// actually handed to the event, which pushes the already-impractical wrap
/// case further out still without changing the `i64` shape of
/// `Event::deconflict`.
#[derive(Debug)]
pub struct SequentialDeconflicter {
    seed: i128,
    counter: i128,
}

impl SequentialDeconflicter {
    /// Creates a new insertion-order counter.
    #[must_use]
    pub fn new() -> Self {
        let seed = i64::MIN as i128;
        Self {
            seed,
            counter: seed,
        }
    }
}

impl Default for SequentialDeconflicter {
    fn default() -> Self {
        Self::new()
    }
}

impl Deconflicter for SequentialDeconflicter {
    fn next(&mut self, is_empty_before_insert: bool) -> i64 {
        if is_empty_before_insert {
            self.counter = self.seed;
        }
        self.counter += 1;
        if self.counter > i64::MAX as i128 {
            log::warn!("IOEL deconflict counter exceeded i64 range; saturating (out-of-specification)");
            self.counter = i64::MAX as i128;
        }
        self.counter as i64
    }
}
