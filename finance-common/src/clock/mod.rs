use chrono::{Local, NaiveDateTime, SubsecRound};
use std::sync::Arc;

pub type ClockHandle = Arc<dyn Clock>;

/// Source of the current wall-clock time. Timestamps are naive local date-times.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl LocalClock {
    pub fn new() -> Self {
        Self
    }
}

// Truncated to microseconds, the precision of a Postgres TIMESTAMP
impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(6)
    }
}

/// A clock that is stuck at a single instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}
