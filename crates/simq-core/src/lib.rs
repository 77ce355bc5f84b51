//! Error taxonomy and correctness-checking helpers shared by `simq`.
//!
//! This crate carries no domain knowledge of events, lists, or timers; it
//! exists purely so the domain crate never has to hand-roll input validation
//! or invent its own error enum at each call site.

pub mod correctness;
pub mod error;

pub use error::{EventListError, Result};
