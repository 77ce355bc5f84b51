//! The total order over events and the key type used by the ordered container.

use std::cmp::Ordering;

use simq_core::EventListError;

use crate::event::Event;

/// Total order on events: primary key scheduled `time` (ascending), secondary
/// key `deconflict` (ascending). Equal keys are only legal when `a` and `b`
/// are the same object (by `Rc` identity); any other agreement between "keys
/// equal" and "objects identical" is an invariant violation the caller must
/// treat as a fatal bug, not retry.
///
/// Pure: never mutates or assigns `time`/`deconflict`. Deconflict assignment
/// is the insertion operation's responsibility, not the comparator's.
pub fn compare<T>(a: &Event<T>, b: &Event<T>) -> Result<Ordering, EventListError> {
    let ordering = match a.time().partial_cmp(&b.time()) {
        Some(ordering) => ordering.then_with(|| a.deconflict().cmp(&b.deconflict())),
        None => {
            return Err(EventListError::invariant_violation(
                "comparator observed a non-orderable time (NaN is not permitted)",
            ));
        }
    };

    let same_object = Event::ptr_eq(a, b);
    match (ordering, same_object) {
        (Ordering::Equal, false) => Err(EventListError::invariant_violation(format!(
            "two distinct events share the same key (time={}, deconflict={})",
            a.time(),
            a.deconflict()
        ))),
        (Ordering::Less | Ordering::Greater, true) => Err(EventListError::invariant_violation(
            "the same event compared unequal to itself",
        )),
        _ => Ok(ordering),
    }
}

/// The key under which events are stored in the ordered container backing
/// [`EventList`](crate::list::EventList). Ordering mirrors [`compare`]'s
/// first two clauses; the identity clause is enforced by the insertion
/// logic before a key is ever constructed; `OrderKey`'s own `Ord` impl
/// cannot see the underlying event, so it never needs to raise the identity
/// violation itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrderKey(pub f64, pub i64);

impl Eq for OrderKey {}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0).then_with(|| self.1.cmp(&other.1))
    }
}

impl<T> From<&Event<T>> for OrderKey {
    fn from(event: &Event<T>) -> Self {
        Self(event.time(), event.deconflict())
    }
}
