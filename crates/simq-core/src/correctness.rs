//! Small validation helpers that turn a bad input into an
//! [`EventListError::IllegalArgument`](crate::EventListError::IllegalArgument).
//!
//! Centralises the "check an argument, fail with a typed error" boilerplate
//! instead of hand-rolling it at every call site. None of these panic: every
//! check here guards a condition the caller can legitimately trigger at
//! runtime, so it must be recoverable rather than an `expect()`.

use crate::error::{EventListError, Result};

/// Checks that `value` is neither `NaN` nor infinite.
pub fn check_finite(value: f64, name: &str) -> Result<()> {
    if value.is_nan() {
        return Err(EventListError::illegal_argument(format!(
            "{name} must not be NaN"
        )));
    }
    if value.is_infinite() {
        return Err(EventListError::illegal_argument(format!(
            "{name} must be finite, was {value}"
        )));
    }
    Ok(())
}

/// Checks that `value` is not `NaN` (infinities are permitted).
pub fn check_not_nan(value: f64, name: &str) -> Result<()> {
    if value.is_nan() {
        return Err(EventListError::illegal_argument(format!(
            "{name} must not be NaN"
        )));
    }
    Ok(())
}

/// Checks that `value` is greater than or equal to zero.
pub fn check_non_negative(value: f64, name: &str) -> Result<()> {
    if value < 0.0 {
        return Err(EventListError::illegal_argument(format!(
            "{name} must be non-negative, was {value}"
        )));
    }
    Ok(())
}

/// Checks an arbitrary predicate, attaching `message` on failure.
pub fn check_predicate(predicate: bool, message: impl Into<String>) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        Err(EventListError::illegal_argument(message.into()))
    }
}
