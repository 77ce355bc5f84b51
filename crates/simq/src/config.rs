//! Plain configuration for constructing an [`EventList`](crate::list::EventList),
//! covering the plain-data construction options: `default_reset_time` and
//! `tiebreak_policy` (+ `rng_seed` folded into the latter). The two
//! closure-valued options (`factory`, `to_string_fn`) have no
//! sensible `Default`/`Builder` representation for a boxed closure field, so
//! they remain post-construction setters on the list itself
//! (`set_factory` / `set_to_string_fn`) rather than config fields.
//!
//! `event_class_tag` has no Rust analogue: with no factory registered the
//! list always falls back to the concrete, infallible `Event::new`, so there
//! is never a runtime type token to carry. See `DESIGN.md`.

use derive_builder::Builder;

/// Selects which tiebreak discipline a freshly constructed event list uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiebreakPolicy {
    /// ROEL: same-time events are ordered by a seeded pseudo-random stream.
    Random {
        /// Seeds the local, non-process-wide RNG.
        seed: u64,
    },
    /// IOEL: same-time events are ordered by insertion order.
    InsertionOrder,
}

impl Default for TiebreakPolicy {
    fn default() -> Self {
        Self::InsertionOrder
    }
}

/// Construction-time configuration for an
/// [`EventList`](crate::list::EventList).
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct EventListConfig {
    /// Clock value installed by the parameterless `reset()`.
    #[builder(default = "f64::NEG_INFINITY")]
    pub default_reset_time: f64,
    /// Which tiebreak discipline the list is constructed with.
    #[builder(default)]
    pub tiebreak_policy: TiebreakPolicy,
}

impl Default for EventListConfig {
    fn default() -> Self {
        Self {
            default_reset_time: f64::NEG_INFINITY,
            tiebreak_policy: TiebreakPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn default_config_has_neg_infinity_reset_and_insertion_order() {
        let config = EventListConfig::default();
        assert_eq!(config.default_reset_time, f64::NEG_INFINITY);
        assert_eq!(config.tiebreak_policy, TiebreakPolicy::InsertionOrder);
    }

    #[rstest]
    fn builder_overrides_defaults() {
        let config = EventListConfigBuilder::default()
            .default_reset_time(5.0)
            .tiebreak_policy(TiebreakPolicy::Random { seed: 7 })
            .build()
            .unwrap();
        assert_eq!(config.default_reset_time, 5.0);
        assert_eq!(config.tiebreak_policy, TiebreakPolicy::Random { seed: 7 });
    }
}
