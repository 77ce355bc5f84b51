//! The three error kinds surfaced by every fallible `simq` operation.

use thiserror::Error;

/// Result alias used throughout `simq` and `simq-core`.
pub type Result<T> = std::result::Result<T, EventListError>;

/// Errors produced by the event list, its tiebreak policies, and the timer.
///
/// All three kinds are caller-recoverable failures, not process aborts: the
/// engine performs no local retry or recovery and never panics on a
/// caller-reachable condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventListError {
    /// Bad input: a time less than the clock, a negative or infinite delay,
    /// an event already enrolled, or an `end` less than the current clock.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// A lifecycle violation: reentrant `run`/`reset`, scheduling an
    /// already-scheduled timer, or an event construction fallback failing.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// The comparator observed a same-key-distinct-objects or
    /// distinct-key-same-object pair, or the clock attempted to go
    /// backwards during a run. Treated as a fatal bug, not a retryable
    /// condition.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl EventListError {
    /// Shorthand for constructing an [`EventListError::IllegalArgument`].
    pub fn illegal_argument(msg: impl Into<String>) -> Self {
        Self::IllegalArgument(msg.into())
    }

    /// Shorthand for constructing an [`EventListError::IllegalState`].
    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }

    /// Shorthand for constructing an [`EventListError::InvariantViolation`].
    pub fn invariant_violation(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
