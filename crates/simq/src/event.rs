//! The scheduled unit of work enrolled in an [`EventList`](crate::list::EventList).

use std::fmt;
use std::rc::Rc;

use ustr::Ustr;

/// A callback invoked when an [`Event`] is processed by the list running it.
///
/// Single-threaded only: `EventList`/`Event` are never `Send`/`Sync`, so there
/// is no thread-safe variant to carry alongside this one.
pub type Callback<T> = Rc<dyn Fn(Event<T>)>;

struct EventInner<T> {
    name: Option<Ustr>,
    time: std::cell::Cell<f64>,
    deconflict: std::cell::Cell<i64>,
    payload: std::cell::RefCell<Option<T>>,
    callback: Option<Callback<T>>,
    enrolled: std::cell::Cell<bool>,
}

/// A cheaply-cloneable handle over a scheduled event.
///
/// Cloning an `Event` clones the handle, not the event: two clones refer to
/// the same logical event, and the comparator's "same object" clause is
/// `Rc::ptr_eq` on the underlying handle, not structural equality. Two
/// distinct `Event`s with identical `time`/`name`/payload are still distinct
/// events.
///
/// While an event is enrolled in a list, its `time` and `deconflict` fields
/// must not be mutated by code outside the engine; doing so is undefined
/// behaviour from the engine's point of view (the ordered container and the
/// event's own fields would disagree about where it sits).
pub struct Event<T>(Rc<EventInner<T>>);

impl<T> Event<T> {
    /// Creates a new event with the given scheduled `time`, advisory `name`,
    /// opaque `payload`, and optional `callback`.
    ///
    /// A `None` callback is a valid, supported configuration: the event then
    /// acts as a pure time marker with no side effect when processed.
    #[must_use]
    pub fn new(
        time: f64,
        name: Option<Ustr>,
        payload: Option<T>,
        callback: Option<Callback<T>>,
    ) -> Self {
        Self(Rc::new(EventInner {
            name,
            time: std::cell::Cell::new(time),
            deconflict: std::cell::Cell::new(0),
            payload: std::cell::RefCell::new(payload),
            callback,
            enrolled: std::cell::Cell::new(false),
        }))
    }

    /// The event's scheduled time.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.0.time.get()
    }

    /// The advisory display name, never inspected by the engine.
    #[must_use]
    pub fn name(&self) -> Option<Ustr> {
        self.0.name
    }

    /// The engine-assigned tiebreaker.
    #[must_use]
    pub fn deconflict(&self) -> i64 {
        self.0.deconflict.get()
    }

    /// Invokes the callback, if any, passing a fresh handle to this event.
    pub fn fire(&self) {
        if let Some(callback) = &self.0.callback {
            callback(self.clone());
        }
    }

    /// Returns `true` if this event has a registered callback.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.0.callback.is_some()
    }

    /// Replaces the payload, returning the previous one.
    pub fn replace_payload(&self, payload: Option<T>) -> Option<T> {
        self.0.payload.replace(payload)
    }

    /// Runs `f` against a borrow of the payload.
    pub fn with_payload<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.0.payload.borrow().as_ref())
    }

    /// Sets the scheduled time directly.
    ///
    /// Only the engine should call this while the event is enrolled in a
    /// list; see the struct-level documentation.
    pub(crate) fn set_time(&self, time: f64) {
        self.0.time.set(time);
    }

    /// Sets the engine-assigned tiebreaker directly.
    pub(crate) fn set_deconflict(&self, deconflict: i64) {
        self.0.deconflict.set(deconflict);
    }

    pub(crate) fn is_enrolled(&self) -> bool {
        self.0.enrolled.get()
    }

    pub(crate) fn set_enrolled(&self, enrolled: bool) {
        self.0.enrolled.set(enrolled);
    }

    /// Identity comparison: do these two handles refer to the same event?
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for Event<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.0.name)
            .field("time", &self.0.time.get())
            .field("deconflict", &self.0.deconflict.get())
            .field("enrolled", &self.0.enrolled.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn clones_share_identity() {
        let event: Event<i32> = Event::new(1.0, None, None, None);
        let clone = event.clone();
        assert!(Event::ptr_eq(&event, &clone));
    }

    #[rstest]
    fn distinct_events_are_not_identical_even_with_same_fields() {
        let a: Event<i32> = Event::new(1.0, None, None, None);
        let b: Event<i32> = Event::new(1.0, None, None, None);
        assert!(!Event::ptr_eq(&a, &b));
    }

    #[rstest]
    fn no_callback_is_a_pure_time_marker() {
        let event: Event<i32> = Event::new(1.0, None, None, None);
        assert!(!event.has_callback());
        event.fire(); // must not panic
    }
}
