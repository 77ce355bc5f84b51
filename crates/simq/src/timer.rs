//! A single-shot, cancellable delay abstraction layered directly on top of
//! [`EventList`](crate::list::EventList): `schedule` enrolls one hidden event
//! on the caller's list; when that event is processed, the timer clears
//! itself to idle and then invokes the user-overridable expiration hook.
//!
//! The three hooks (`on_schedule`, `on_expire`, `on_cancel`) are plain
//! function-valued fields rather than virtual methods, so a timer is
//! configured by installing closures instead of subclassing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use simq_core::correctness::check_finite;
use simq_core::error::{EventListError, Result};
use ustr::Ustr;

use crate::event::Event;
use crate::list::EventList;

/// A hook invoked with the clock time at which it fires: `on_schedule`
/// receives the clock at scheduling time, `on_expire` the event's (now
/// elapsed) scheduled time, `on_cancel` the clock at cancellation time.
pub type TimerHook = Rc<dyn Fn(f64)>;

struct TimerState<T> {
    name: Ustr,
    host: RefCell<Option<Rc<EventList<T>>>>,
    on_schedule: RefCell<Option<TimerHook>>,
    on_expire: RefCell<Option<TimerHook>>,
    on_cancel: RefCell<Option<TimerHook>>,
}

/// A single-shot, cancellable timer. State machine: `IDLE` → `SCHEDULED` →
/// `IDLE`; no other states. A timer may be rescheduled on the same or a
/// different list only once it has returned to idle.
pub struct Timer<T> {
    state: Rc<TimerState<T>>,
    expire_event: Event<T>,
}

impl<T: 'static> Timer<T> {
    /// Creates a new, idle timer. `name` substitutes the empty string when
    /// `None`.
    #[must_use]
    pub fn new(name: Option<Ustr>) -> Self {
        let state = Rc::new(TimerState {
            name: name.unwrap_or_else(|| Ustr::from("")),
            host: RefCell::new(None),
            on_schedule: RefCell::new(None),
            on_expire: RefCell::new(None),
            on_cancel: RefCell::new(None),
        });

        let callback_state = Rc::clone(&state);
        let expire_event = Event::new(
            f64::NEG_INFINITY,
            Some(state.name),
            None,
            Some(Rc::new(move |event: Event<T>| {
                // Clear to idle first so the user hook may reschedule immediately.
                callback_state.host.borrow_mut().take();
                if let Some(hook) = callback_state.on_expire.borrow().as_ref() {
                    hook(event.time());
                }
            })),
        );

        Self {
            state,
            expire_event,
        }
    }

    /// The timer's advisory name (empty string if none was given).
    #[must_use]
    pub fn name(&self) -> Ustr {
        self.state.name
    }

    /// Whether the timer is currently scheduled on a list (as opposed to
    /// idle).
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.state.host.borrow().is_some()
    }

    /// Installs the hook invoked when `schedule` successfully enrolls the
    /// timer's internal event.
    pub fn set_on_schedule(&self, hook: Option<TimerHook>) {
        *self.state.on_schedule.borrow_mut() = hook;
    }

    /// Installs the hook invoked when the timer expires, after the timer
    /// has already been returned to idle.
    pub fn set_on_expire(&self, hook: Option<TimerHook>) {
        *self.state.on_expire.borrow_mut() = hook;
    }

    /// Installs the hook invoked when `cancel` actually removes a scheduled
    /// timer (never invoked for a no-op cancel of an already-idle timer).
    pub fn set_on_cancel(&self, hook: Option<TimerHook>) {
        *self.state.on_cancel.borrow_mut() = hook;
    }

    /// Schedules the timer to expire `delay` time units from `list`'s
    /// current clock.
    ///
    /// Fails with `IllegalArgument` on a negative or infinite delay or an
    /// infinite list clock; fails with `IllegalState` if already scheduled.
    pub fn schedule(&self, delay: f64, list: &Rc<EventList<T>>) -> Result<()> {
        check_finite(delay, "delay")?;
        if delay < 0.0 {
            return Err(EventListError::illegal_argument(format!(
                "timer delay must be non-negative, was {delay}"
            )));
        }
        if self.is_scheduled() {
            return Err(EventListError::illegal_state(
                "timer is already scheduled; cancel it before rescheduling",
            ));
        }
        let clock = list.time();
        if clock.is_infinite() {
            return Err(EventListError::illegal_argument(
                "cannot schedule a timer against an infinite list clock",
            ));
        }

        self.expire_event.set_time(clock + delay);
        list.schedule(self.expire_event.clone())?;
        *self.state.host.borrow_mut() = Some(Rc::clone(list));
        log::debug!("timer '{}' scheduled to expire at {}", self.state.name, clock + delay);

        if let Some(hook) = self.state.on_schedule.borrow().as_ref() {
            hook(clock);
        }
        Ok(())
    }

    /// Cancels the timer. A no-op if the timer is already idle; otherwise
    /// removes the internal event from its host list and invokes
    /// `on_cancel` with the clock value observed just before clearing.
    pub fn cancel(&self) {
        let host = self.state.host.borrow_mut().take();
        if let Some(host) = host {
            let clock_at_cancel = host.time();
            host.remove(&self.expire_event);
            log::debug!("timer '{}' cancelled at {clock_at_cancel}", self.state.name);
            if let Some(hook) = self.state.on_cancel.borrow().as_ref() {
                hook(clock_at_cancel);
            }
        }
    }
}

impl<T> fmt::Debug for Timer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("name", &self.state.name)
            .field("scheduled", &self.state.host.borrow().is_some())
            .finish_non_exhaustive()
    }
}
