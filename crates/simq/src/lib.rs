//! `simq`: a single-threaded, priority-ordered discrete-event simulation
//! engine.
//!
//! A [`list::EventList`] holds a totally ordered set of [`event::Event`]s
//! keyed by `(time, deconflict)`. Running the list repeatedly extracts the
//! earliest event, advances the simulated clock, fans out listener
//! notifications, and invokes the event's callback — which may itself
//! schedule further events. Two tiebreak disciplines decide the order among
//! same-time events: ROEL (random, seeded) and IOEL (insertion order); see
//! [`deconflict`]. A single-shot [`timer::Timer`] is layered directly on top
//! of the list.
//!
//! ```
//! use std::rc::Rc;
//!
//! use simq::event::Event;
//! use simq::list::EventList;
//!
//! let list = EventList::<()>::insertion_order();
//! let fired = Rc::new(std::cell::Cell::new(false));
//! let captured = Rc::clone(&fired);
//! let callback: simq::event::Callback<()> = Rc::new(move |_event| captured.set(true));
//! list.schedule_new(1.0, Some(callback), None).unwrap();
//! list.run().unwrap();
//! assert!(fired.get());
//! ```

pub mod comparator;
pub mod config;
pub mod deconflict;
pub mod event;
pub mod factory;
pub mod list;
pub mod listener;
pub mod timer;

pub use config::{EventListConfig, EventListConfigBuilder, TiebreakPolicy};
pub use deconflict::{Deconflicter, RandomDeconflicter, SequentialDeconflicter};
pub use event::{Callback, Event};
pub use factory::{EventFactory, default_factory};
pub use list::EventList;
pub use listener::{FineListener, ResetListener, SimClock, UpdateListener};
pub use simq_core::{EventListError, Result};
pub use timer::{Timer, TimerHook};
