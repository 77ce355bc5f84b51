//! Injected construction for the `schedule(time, action, name)` family of
//! operations, which mint an event rather than taking one.

use std::rc::Rc;

use ustr::Ustr;

use crate::event::{Callback, Event};

/// Constructs a fresh event from a `(time, name, callback)` triple.
///
/// Registered on an [`EventList`](crate::list::EventList) via `set_factory`.
/// The source models this as a default-constructor fallback keyed off a
/// runtime type token when no factory is registered; in Rust there is
/// always a concrete, infallible fallback (`Event::new`), so unlike the
/// source this constructor call can never itself fail — see `list::EventList`
/// for where the fallback is applied.
pub type EventFactory<T> = Rc<dyn Fn(f64, Option<Ustr>, Option<Callback<T>>) -> Event<T>>;

/// The default factory: a thin wrapper over `Event::new` with no payload.
pub fn default_factory<T>() -> EventFactory<T> {
    Rc::new(|time, name, callback| Event::new(time, name, None, callback))
}
