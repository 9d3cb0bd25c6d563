//! Time sources for stamping outgoing reports.
//!
//! Sample timestamps always come from the caller. The pipeline only asks its
//! clock for the publish time of a report and to pace the status report.

use crate::units::{Time, Timestamp};
use std::{cell::Cell, rc::Rc, time::Instant};

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Microseconds since this clock was created
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        let elapsed = Instant::now().duration_since(self.start);
        Timestamp::from_micros(elapsed.as_micros() as u64)
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        ManualClock {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance(&self, dt: Time) {
        self.now.set(self.now.get() + dt);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}
