//! where the engine gets the time from, and how often it asks

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use chrono::NaiveDateTime;

/// how often the engine samples the clock
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub trait ClockSource {
    /// the current local wall clock time
    fn now(&self) -> NaiveDateTime;
}

/// the host's local clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// a clock that only moves when told to
/// clones share the same time, so a test can keep one and hand another to the engine
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    now: Rc<Cell<NaiveDateTime>>,
}

impl SimulatedClock {
    #[must_use]
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        // past the end of the calendar the clock just stops
        if let Some(now) = chrono::Duration::from_std(by)
            .ok()
            .and_then(|by| self.now.get().checked_add_signed(by))
        {
            self.now.set(now);
        }
    }
}

impl ClockSource for SimulatedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

/// a repeating deadline on the monotonic clock
/// the service loop waits on it and calls the engine whenever it comes due
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// how long until the next tick, zero if it's overdue
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.next.saturating_duration_since(Instant::now())
    }

    /// consumes the tick if it's due
    /// a late tick schedules the next one from now instead of bursting to catch up
    pub fn poll(&mut self) -> bool {
        let now = Instant::now();
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}
