use chrono::{DateTime, Local, NaiveDate};
use std::rc::Rc;
use std::time::Instant;

/// Source of wall-clock time (for calendar days and timestamps) and monotonic
/// time (for debounce deadlines).
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
    fn instant(&self) -> Instant;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }

    fn instant(&self) -> Instant {
        (**self).instant()
    }
}

#[cfg(test)]
pub use manual::ManualClock;
