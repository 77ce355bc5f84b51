//! The event list core: the ordered container, the clock, the listener
//! registries, the running/non-running lifecycle, and the run/run-until/
//! single-step engine.
//!
//! ROEL and IOEL are not separate types but a single list parameterized by
//! an injected [`Deconflicter`], selected at construction via
//! [`EventList::random`] / [`EventList::insertion_order`] /
//! [`EventList::from_config`].

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use simq_core::correctness::check_not_nan;
use simq_core::error::{EventListError, Result};
use ustr::Ustr;

use crate::comparator::OrderKey;
use crate::config::{EventListConfig, TiebreakPolicy};
use crate::deconflict::{Deconflicter, RandomDeconflicter, SequentialDeconflicter};
use crate::event::{Callback, Event};
use crate::factory::EventFactory;
use crate::listener::{FineListener, ResetListener, SimClock, UpdateListener};

/// A renderer for [`EventList`]'s `Display` impl, overriding the default
/// `"EventList[t=<clock>]"` rendering.
pub type ToStringFn<T> = Box<dyn Fn(&EventList<T>) -> String>;

/// A priority-ordered, time-stamped event list.
///
/// Always handed out wrapped in `Rc` (see [`EventList::random`] /
/// [`EventList::insertion_order`] / [`EventList::from_config`]) because a
/// scheduled callback routinely needs to reach back into the list running
/// it — timers do exactly this, and so does an event whose own callback
/// reschedules it.
///
/// Not `Send`/`Sync`: every field is `Cell`/`RefCell`-backed interior
/// mutability intended for single-threaded cooperative use, per the
/// concurrency model. Sharing an `EventList` across threads is a compile
/// error rather than a runtime check.
pub struct EventList<T> {
    clock: Cell<f64>,
    default_reset_time: Cell<f64>,
    first_update: Cell<bool>,
    running: Cell<bool>,
    interrupted: Cell<bool>,
    events: RefCell<BTreeMap<OrderKey, Event<T>>>,
    deconflict: RefCell<Box<dyn Deconflicter>>,
    reset_listeners: RefCell<Vec<Rc<dyn ResetListener>>>,
    listeners: RefCell<Vec<Rc<dyn UpdateListener>>>,
    fine_listeners: RefCell<Vec<Rc<dyn FineListener>>>,
    factory: RefCell<Option<EventFactory<T>>>,
    to_string_fn: RefCell<Option<ToStringFn<T>>>,
}

impl<T> EventList<T> {
    fn with_deconflicter(deconflicter: Box<dyn Deconflicter>, default_reset_time: f64) -> Rc<Self> {
        Rc::new(Self {
            clock: Cell::new(default_reset_time),
            default_reset_time: Cell::new(default_reset_time),
            first_update: Cell::new(true),
            running: Cell::new(false),
            interrupted: Cell::new(false),
            events: RefCell::new(BTreeMap::new()),
            deconflict: RefCell::new(deconflicter),
            reset_listeners: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            fine_listeners: RefCell::new(Vec::new()),
            factory: RefCell::new(None),
            to_string_fn: RefCell::new(None),
        })
    }

    /// Constructs a ROEL (random-order) event list, seeding the local RNG
    /// with `seed`. Same seed + same insertion sequence of same-time events
    /// ⇒ same processing order across independent runs.
    #[must_use]
    pub fn random(seed: u64) -> Rc<Self> {
        Self::with_deconflicter(Box::new(RandomDeconflicter::new(seed)), f64::NEG_INFINITY)
    }

    /// Constructs an IOEL (insertion-order) event list: same-time events are
    /// processed in the order they were inserted.
    #[must_use]
    pub fn insertion_order() -> Rc<Self> {
        Self::with_deconflicter(Box::new(SequentialDeconflicter::new()), f64::NEG_INFINITY)
    }

    /// Constructs a list from a plain [`EventListConfig`].
    #[must_use]
    pub fn from_config(config: EventListConfig) -> Rc<Self> {
        let deconflicter: Box<dyn Deconflicter> = match config.tiebreak_policy {
            TiebreakPolicy::Random { seed } => Box::new(RandomDeconflicter::new(seed)),
            TiebreakPolicy::InsertionOrder => Box::new(SequentialDeconflicter::new()),
        };
        Self::with_deconflicter(deconflicter, config.default_reset_time)
    }

    /// The current clock ("last update time").
    #[must_use]
    pub fn time(&self) -> f64 {
        self.clock.get()
    }

    /// The clock value installed by the parameterless `reset()`.
    #[must_use]
    pub fn default_reset_time(&self) -> f64 {
        self.default_reset_time.get()
    }

    /// Sets the clock value installed by the parameterless `reset()`.
    pub fn set_default_reset_time(&self, time: f64) {
        self.default_reset_time.set(time);
    }

    /// The number of events currently enrolled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether the list currently holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a run/run-until/single-step is currently in progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Registers an event-minting factory for the `schedule(time, action,
    /// name)` family of operations. Replaces any previously registered
    /// factory.
    pub fn set_factory(&self, factory: EventFactory<T>) {
        *self.factory.borrow_mut() = Some(factory);
    }

    /// Overrides the `Display` rendering (default `"EventList[t=<clock>]"`).
    pub fn set_to_string_fn(&self, to_string_fn: ToStringFn<T>) {
        *self.to_string_fn.borrow_mut() = Some(to_string_fn);
    }

    /// Requests that the run loop stop at the next iteration boundary,
    /// leaving the list non-empty and the clock at the last processed
    /// event's time. Cleared automatically at the start of the next
    /// `run`/`run_until`/`run_single_step` call.
    pub fn interrupt(&self) {
        self.interrupted.set(true);
    }

    /// Whether a cooperative interruption is currently pending.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.get()
    }

    // -- listener registration -------------------------------------------------

    /// Registers a reset-only listener. A listener already registered (by
    /// `Rc` identity) is silently deduplicated, since the registry behaves
    /// as a set.
    pub fn add_reset_listener(&self, listener: Rc<dyn ResetListener>) {
        let mut listeners = self.reset_listeners.borrow_mut();
        if !listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// Unregisters a reset-only listener previously added with
    /// [`add_reset_listener`](Self::add_reset_listener).
    pub fn remove_reset_listener(&self, listener: &Rc<dyn ResetListener>) {
        self.reset_listeners
            .borrow_mut()
            .retain(|l| !Rc::ptr_eq(l, listener));
    }

    /// Registers a reset+update+empty listener.
    pub fn add_listener(&self, listener: Rc<dyn UpdateListener>) {
        let mut listeners = self.listeners.borrow_mut();
        if !listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// Unregisters a listener previously added with
    /// [`add_listener`](Self::add_listener).
    pub fn remove_listener(&self, listener: &Rc<dyn UpdateListener>) {
        self.listeners.borrow_mut().retain(|l| !Rc::ptr_eq(l, listener));
    }

    /// Registers a reset+update+empty+per-event (fine) listener.
    pub fn add_fine_listener(&self, listener: Rc<dyn FineListener>) {
        let mut listeners = self.fine_listeners.borrow_mut();
        if !listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// Unregisters a fine listener previously added with
    /// [`add_fine_listener`](Self::add_fine_listener).
    pub fn remove_fine_listener(&self, listener: &Rc<dyn FineListener>) {
        self.fine_listeners
            .borrow_mut()
            .retain(|l| !Rc::ptr_eq(l, listener));
    }

    fn fire_reset(&self) {
        for listener in self.fine_listeners.borrow().iter() {
            listener.on_reset(self);
        }
        for listener in self.listeners.borrow().iter() {
            listener.on_reset(self);
        }
        for listener in self.reset_listeners.borrow().iter() {
            listener.on_reset(self);
        }
    }

    fn fire_update(&self, time: f64) {
        for listener in self.fine_listeners.borrow().iter() {
            listener.on_update(self, time);
        }
        for listener in self.listeners.borrow().iter() {
            listener.on_update(self, time);
        }
    }

    fn fire_empty(&self, time: f64) {
        for listener in self.fine_listeners.borrow().iter() {
            listener.on_empty(self, time);
        }
        for listener in self.listeners.borrow().iter() {
            listener.on_empty(self, time);
        }
    }

    fn fire_next_event(&self, time_of_previous_event: f64) {
        for listener in self.fine_listeners.borrow().iter() {
            listener.on_next_event(self, time_of_previous_event);
        }
    }

    // -- container operations ---------------------------------------------------

    /// Inserts `event` without clock validation, assigning it a fresh
    /// tiebreaker. Returns `false` (a no-op) if the event is already
    /// enrolled somewhere. Rejects a `NaN` event time with
    /// `IllegalArgument`, since `NaN` has no place in the list's total
    /// order.
    pub fn add(&self, event: Event<T>) -> Result<bool> {
        if event.is_enrolled() {
            return Ok(false);
        }
        check_not_nan(event.time(), "event.time")?;
        let is_empty_before_insert = self.events.borrow().is_empty();
        let deconflict = self.deconflict.borrow_mut().next(is_empty_before_insert);
        event.set_deconflict(deconflict);
        let key = OrderKey::from(&event);

        let mut events = self.events.borrow_mut();
        if events.contains_key(&key) {
            return Err(EventListError::invariant_violation(format!(
                "deconflict collision at (time={}, deconflict={})",
                key.0, key.1
            )));
        }
        events.insert(key, event.clone());
        drop(events);
        event.set_enrolled(true);
        log::trace!("enrolled event (time={}, deconflict={})", key.0, key.1);
        Ok(true)
    }

    /// Inserts every event in `events`, returning `true` if any was actually
    /// inserted (i.e. wasn't already enrolled).
    pub fn add_all(&self, events: impl IntoIterator<Item = Event<T>>) -> Result<bool> {
        let mut added_any = false;
        for event in events {
            if self.add(event)? {
                added_any = true;
            }
        }
        Ok(added_any)
    }

    /// Removes `event` from the list if present, returning whether it was
    /// removed.
    pub fn remove(&self, event: &Event<T>) -> bool {
        if !event.is_enrolled() {
            return false;
        }
        let key = OrderKey::from(event);
        let removed = self.events.borrow_mut().remove(&key);
        if removed.is_some() {
            event.set_enrolled(false);
            true
        } else {
            false
        }
    }

    /// Whether `event` is currently enrolled in *this* list.
    #[must_use]
    pub fn contains(&self, event: &Event<T>) -> bool {
        let key = OrderKey::from(event);
        self.events
            .borrow()
            .get(&key)
            .is_some_and(|enrolled| Event::ptr_eq(enrolled, event))
    }

    fn construct_event(&self, time: f64, name: Option<Ustr>, callback: Option<Callback<T>>) -> Event<T> {
        match self.factory.borrow().as_ref() {
            Some(factory) => factory(time, name, callback),
            None => Event::new(time, name, None, callback),
        }
    }

    // -- validated scheduling ---------------------------------------------------

    /// Enrolls `event`, enforcing `event.time() >= clock` and
    /// non-membership. This is the sole place "scheduling in the past" is
    /// detected at submission time.
    pub fn schedule(&self, event: Event<T>) -> Result<()> {
        if event.is_enrolled() {
            return Err(EventListError::illegal_argument(
                "event is already scheduled",
            ));
        }
        let clock = self.clock.get();
        if event.time() < clock {
            return Err(EventListError::illegal_argument(format!(
                "cannot schedule event at time {} before current clock {clock}",
                event.time()
            )));
        }
        self.add(event)?;
        Ok(())
    }

    /// Sets `event`'s time then schedules it.
    pub fn schedule_at(&self, time: f64, event: Event<T>) -> Result<()> {
        check_not_nan(time, "time")?;
        if event.is_enrolled() {
            return Err(EventListError::illegal_argument(
                "event is already scheduled",
            ));
        }
        event.set_time(time);
        self.schedule(event)
    }

    /// Equivalent to `remove(e); event.time := t; add(e)`, with the
    /// scheduling-in-the-past check applied to `t`.
    pub fn reschedule(&self, time: f64, event: Event<T>) -> Result<()> {
        self.remove(&event);
        self.schedule_at(time, event)
    }

    /// Constructs a fresh event from `(time, callback, name)` via the
    /// registered factory (or `Event::new` if none is registered) and
    /// schedules it.
    pub fn schedule_new(
        &self,
        time: f64,
        callback: Option<Callback<T>>,
        name: Option<Ustr>,
    ) -> Result<Event<T>> {
        check_not_nan(time, "time")?;
        let clock = self.clock.get();
        if time < clock {
            return Err(EventListError::illegal_argument(format!(
                "cannot schedule event at time {time} before current clock {clock}"
            )));
        }
        let event = self.construct_event(time, name, callback);
        self.add(event.clone())?;
        Ok(event)
    }

    /// Sets `event`'s time to the current clock value, then schedules it.
    pub fn schedule_now(&self, event: Event<T>) -> Result<()> {
        let clock = self.clock.get();
        self.schedule_at(clock, event)
    }

    /// Constructs a fresh event at the current clock value via the
    /// registered factory (or `Event::new`) and schedules it.
    pub fn schedule_now_new(
        &self,
        callback: Option<Callback<T>>,
        name: Option<Ustr>,
    ) -> Result<Event<T>> {
        let clock = self.clock.get();
        self.schedule_new(clock, callback, name)
    }

    // -- reset --------------------------------------------------------------

    /// Clears all events, resets the clock to `default_reset_time`, and
    /// fires a reset notification.
    pub fn reset(&self) -> Result<()> {
        self.reset_to(self.default_reset_time.get())
    }

    /// Clears all events, resets the clock to `time`, and fires a reset
    /// notification.
    pub fn reset_to(&self, time: f64) -> Result<()> {
        check_not_nan(time, "time")?;
        if self.running.get() {
            return Err(EventListError::illegal_state(
                "cannot reset an event list while it is running",
            ));
        }
        {
            let mut events = self.events.borrow_mut();
            for event in events.values() {
                event.set_enrolled(false);
            }
            events.clear();
        }
        self.clock.set(time);
        self.first_update.set(true);
        self.fire_reset();
        Ok(())
    }

    // -- run loop -------------------------------------------------------------

    fn enter_running(&self) -> Result<()> {
        if self.running.get() {
            return Err(EventListError::illegal_state(
                "run is already in progress (reentrant or concurrent run)",
            ));
        }
        self.running.set(true);
        self.interrupted.set(false);
        Ok(())
    }

    fn exit_running(&self) {
        self.running.set(false);
    }

    fn clock_advance(&self, new_time: f64) -> Result<()> {
        let first_update = self.first_update.get();
        let current = self.clock.get();
        if !first_update && new_time < current {
            return Err(EventListError::invariant_violation(format!(
                "clock attempted to go backwards from {current} to {new_time}"
            )));
        }
        if first_update || new_time > current {
            self.clock.set(new_time);
            self.first_update.set(false);
            self.fire_update(new_time);
        }
        Ok(())
    }

    /// Processes exactly one event: fires the next-event notification, polls
    /// the earliest event, advances the clock, then invokes its callback.
    fn step_once(&self) -> Result<()> {
        let prev_time = self.clock.get();
        self.fire_next_event(prev_time);
        let event = {
            let mut events = self.events.borrow_mut();
            let key = *events
                .keys()
                .next()
                .expect("step_once called on a non-empty list");
            events.remove(&key).expect("key was just observed")
        };
        event.set_enrolled(false);
        self.clock_advance(event.time())?;
        event.fire();
        Ok(())
    }

    fn should_process(&self, end: Option<f64>, inclusive: bool) -> bool {
        let events = self.events.borrow();
        match events.keys().next() {
            None => false,
            Some(key) => match end {
                None => true,
                Some(end) => key.0 < end || (inclusive && key.0 == end),
            },
        }
    }

    fn run_loop(&self, end: Option<f64>, inclusive: bool, set_time_to_end: bool) -> Result<()> {
        self.enter_running()?;
        let outcome = (|| {
            if let Some(end) = end
                && end < self.clock.get()
            {
                return Err(EventListError::illegal_argument(format!(
                    "end {end} is before the current clock {}",
                    self.clock.get()
                )));
            }
            while !self.interrupted.get() && self.should_process(end, inclusive) {
                self.step_once()?;
            }
            if let Some(end) = end
                && inclusive
                && set_time_to_end
                && self.clock.get() < end
            {
                self.clock_advance(end)?;
            }
            if self.is_empty() {
                self.fire_empty(self.clock.get());
            }
            Ok(())
        })();
        self.exit_running();
        outcome
    }

    /// Runs until the list is empty or a cooperative interruption is
    /// observed.
    pub fn run(&self) -> Result<()> {
        self.run_loop(None, false, false)
    }

    /// Runs events with `time < end`, plus `time == end` iff `inclusive`;
    /// optionally advances the clock to `end` once the bounded portion of
    /// the run completes with time left on the clock.
    pub fn run_until(&self, end: f64, inclusive: bool, set_time_to_end: bool) -> Result<()> {
        check_not_nan(end, "end")?;
        self.run_loop(Some(end), inclusive, set_time_to_end)
    }

    /// Processes at most one event. A no-op (no notifications at all) if the
    /// list is already empty when called.
    pub fn run_single_step(&self) -> Result<()> {
        self.enter_running()?;
        let outcome = (|| {
            if self.is_empty() {
                return Ok(());
            }
            self.step_once()?;
            if self.is_empty() {
                self.fire_empty(self.clock.get());
            }
            Ok(())
        })();
        self.exit_running();
        outcome
    }
}

impl<T> SimClock for EventList<T> {
    fn time(&self) -> f64 {
        self.clock.get()
    }

    fn len(&self) -> usize {
        self.events.borrow().len()
    }
}

impl<T> fmt::Display for EventList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(to_string_fn) = self.to_string_fn.borrow().as_ref() {
            write!(f, "{}", to_string_fn(self))
        } else {
            write!(f, "EventList[t={}]", self.clock.get())
        }
    }
}

impl<T> fmt::Debug for EventList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventList")
            .field("clock", &self.clock.get())
            .field("len", &self.len())
            .field("running", &self.running.get())
            .field("interrupted", &self.interrupted.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn push_times(list: &EventList<()>, times: &[f64]) -> Vec<Event<()>> {
        times
            .iter()
            .map(|&time| {
                let event = Event::new(time, None, None, None);
                list.schedule(event.clone()).unwrap();
                event
            })
            .collect()
    }

    #[rstest]
    fn scenario_two_events_run_to_completion() {
        let list = EventList::<()>::insertion_order();
        let observed = Rc::new(RefCell::new(Vec::new()));
        push_times(&list, &[15.8, 10.0]);

        struct Recorder(Rc<RefCell<Vec<f64>>>);
        impl ResetListener for Recorder {
            fn on_reset(&self, _list: &dyn SimClock) {}
        }
        impl UpdateListener for Recorder {
            fn on_update(&self, _list: &dyn SimClock, time: f64) {
                self.0.borrow_mut().push(time);
            }
            fn on_empty(&self, _list: &dyn SimClock, _time: f64) {}
        }
        list.add_listener(Rc::new(Recorder(Rc::clone(&observed))));

        list.run().unwrap();
        assert_eq!(list.time(), 15.8);
        assert!(list.is_empty());
        assert_eq!(*observed.borrow(), vec![10.0, 15.8]);
    }

    #[rstest]
    fn scenario_reset_from_non_default_clock() {
        let list = EventList::<()>::insertion_order();
        list.set_default_reset_time(5.0);
        list.reset_to(-25.0).unwrap();
        assert_eq!(list.time(), -25.0);

        let event = Event::new(15.8, None, None, None);
        list.schedule(event).unwrap();
        list.run().unwrap();
        assert_eq!(list.time(), 15.8);

        list.reset().unwrap();
        assert_eq!(list.time(), 5.0);
        assert!(list.is_empty());
    }

    #[rstest]
    fn scenario_auto_rescheduling_event() {
        let list = EventList::<()>::insertion_order();
        let fire_count = Rc::new(RefCell::new(0));

        let inner_list: Rc<EventList<()>> = Rc::clone(&list);
        let count = Rc::clone(&fire_count);
        let callback: Callback<()> = Rc::new(move |this_event: Event<()>| {
            *count.borrow_mut() += 1;
            let next_time = this_event.time() + 1.0;
            if next_time <= 16.0 {
                inner_list
                    .schedule_at(next_time, this_event)
                    .expect("reschedule within horizon must succeed");
            }
        });
        let event = Event::new(1.0, None, None, Some(callback));
        list.schedule(event).unwrap();

        list.run().unwrap();
        assert_eq!(*fire_count.borrow(), 16);
        assert_eq!(list.time(), 16.0);
    }

    #[rstest]
    fn scenario_run_until_semantics() {
        let list = EventList::<()>::insertion_order();
        let events = push_times(&list, &[10.0, 15.8]);

        list.run_until(10.0, false, false).unwrap();
        assert_eq!(list.len(), 2);

        list.run_until(10.0, true, false).unwrap();
        assert_eq!(list.len(), 1);
        assert!(!list.contains(&events[0]));
        assert!(list.contains(&events[1]));

        list.run_until(15.0, true, false).unwrap();
        assert_eq!(list.len(), 1);

        list.run_until(20.0, false, false).unwrap();
        assert!(list.is_empty());
    }

    #[rstest]
    fn scheduling_in_the_past_is_rejected() {
        let list = EventList::<()>::insertion_order();
        push_times(&list, &[15.8, 10.0]);
        list.run().unwrap();
        assert_eq!(list.time(), 15.8);

        let stale = Event::new(10.0, None, None, None);
        assert!(matches!(
            list.schedule(stale),
            Err(EventListError::IllegalArgument(_))
        ));
    }

    #[rstest]
    fn run_on_empty_list_fires_exactly_one_empty_notification() {
        let list = EventList::<()>::insertion_order();
        let empties = Rc::new(RefCell::new(0));

        struct Recorder(Rc<RefCell<i32>>);
        impl ResetListener for Recorder {
            fn on_reset(&self, _list: &dyn SimClock) {}
        }
        impl UpdateListener for Recorder {
            fn on_update(&self, _list: &dyn SimClock, _time: f64) {}
            fn on_empty(&self, _list: &dyn SimClock, _time: f64) {
                *self.0.borrow_mut() += 1;
            }
        }
        list.add_listener(Rc::new(Recorder(Rc::clone(&empties))));

        let before = list.time();
        list.run().unwrap();
        assert_eq!(*empties.borrow(), 1);
        assert_eq!(list.time(), before);
    }

    #[rstest]
    fn first_event_always_fires_an_update_even_at_neg_infinity() {
        let list = EventList::<()>::insertion_order();
        let updates = Rc::new(RefCell::new(0));

        struct Recorder(Rc<RefCell<i32>>);
        impl ResetListener for Recorder {
            fn on_reset(&self, _list: &dyn SimClock) {}
        }
        impl UpdateListener for Recorder {
            fn on_update(&self, _list: &dyn SimClock, _time: f64) {
                *self.0.borrow_mut() += 1;
            }
            fn on_empty(&self, _list: &dyn SimClock, _time: f64) {}
        }
        list.add_listener(Rc::new(Recorder(Rc::clone(&updates))));

        let event = Event::new(f64::NEG_INFINITY, None, None, None);
        list.schedule(event).unwrap();
        list.run().unwrap();
        assert_eq!(*updates.borrow(), 1);
    }

    #[rstest]
    fn reentrant_run_fails_with_illegal_state() {
        let list = EventList::<()>::insertion_order();
        let outer_list: Rc<EventList<()>> = Rc::clone(&list);
        let result = Rc::new(RefCell::new(None));
        let captured = Rc::clone(&result);

        let callback: Callback<()> = Rc::new(move |_event| {
            *captured.borrow_mut() = Some(outer_list.run().is_err());
        });
        let event = Event::new(0.0, None, None, Some(callback));
        list.schedule_at(0.0, event).unwrap();
        list.run().unwrap();

        assert_eq!(*result.borrow(), Some(true));
    }

    #[rstest]
    fn add_is_a_no_op_when_event_already_enrolled() {
        let list = EventList::<()>::insertion_order();
        let event = Event::new(1.0, None, None, None);
        assert!(list.add(event.clone()).unwrap());
        assert!(!list.add(event).unwrap());
        assert_eq!(list.len(), 1);
    }

    #[rstest]
    fn interrupt_stops_the_run_loop_leaving_remainder_enrolled() {
        let list = EventList::<()>::insertion_order();
        let captured_list: Rc<EventList<()>> = Rc::clone(&list);

        let callback: Callback<()> = Rc::new(move |_event| {
            captured_list.interrupt();
        });
        let first = Event::new(1.0, None, None, Some(callback));
        let second = Event::new(2.0, None, None, None);
        list.schedule(first).unwrap();
        list.schedule(second).unwrap();

        list.run().unwrap();
        assert_eq!(list.time(), 1.0);
        assert_eq!(list.len(), 1);

        list.run().unwrap();
        assert!(list.is_empty());
    }

    #[rstest]
    fn ioel_preserves_insertion_order_for_same_time_events() {
        let list = EventList::<()>::insertion_order();
        let order = Rc::new(RefCell::new(Vec::new()));

        for i in 0..5 {
            let recorded = Rc::clone(&order);
            let callback: Callback<()> = Rc::new(move |_event| {
                recorded.borrow_mut().push(i);
            });
            let event = Event::new(1.0, None, None, Some(callback));
            list.schedule(event).unwrap();
        }

        list.run().unwrap();
        assert_eq!(*order.borrow(), vec![0, 1, 2, 3, 4]);
    }

    #[rstest]
    fn roel_same_seed_reproduces_same_order() {
        fn run_with_seed(seed: u64) -> Vec<i32> {
            let list = EventList::<()>::random(seed);
            let order = Rc::new(RefCell::new(Vec::new()));
            for i in 0..20 {
                let recorded = Rc::clone(&order);
                let callback: Callback<()> = Rc::new(move |_event| {
                    recorded.borrow_mut().push(i);
                });
                let event = Event::new(1.0, None, None, Some(callback));
                list.schedule(event).unwrap();
            }
            list.run().unwrap();
            Rc::try_unwrap(order).unwrap().into_inner()
        }

        assert_eq!(run_with_seed(42), run_with_seed(42));
    }

    proptest! {
        #[test]
        fn observed_times_within_a_run_are_non_decreasing(
            mut times in prop::collection::vec(0.0f64..1_000.0, 1..40),
        ) {
            times.sort_by(f64::total_cmp);
            let list = EventList::<()>::insertion_order();
            list.reset_to(0.0).unwrap();
            for &time in &times {
                list.schedule(Event::new(time, None, None, None)).unwrap();
            }

            let observed = Rc::new(RefCell::new(Vec::new()));
            struct Recorder(Rc<RefCell<Vec<f64>>>);
            impl ResetListener for Recorder {
                fn on_reset(&self, _list: &dyn SimClock) {}
            }
            impl UpdateListener for Recorder {
                fn on_update(&self, _list: &dyn SimClock, time: f64) {
                    self.0.borrow_mut().push(time);
                }
                fn on_empty(&self, _list: &dyn SimClock, _time: f64) {}
            }
            list.add_listener(Rc::new(Recorder(Rc::clone(&observed))));

            list.run().unwrap();

            let observed = observed.borrow();
            for window in observed.windows(2) {
                prop_assert!(window[1] >= window[0]);
            }
        }
    }
}
