use std::time::SystemTime;

/// The source of "now" for freshness decisions.
///
/// The clock is not required to be monotonic. While it reads earlier than an entry's
/// [`last_check_time`](crate::CacheEntry::last_check_time), that entry is checked on every
/// access, and its `last_check_time` does not move backwards.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// A [`Clock`] reading the system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
