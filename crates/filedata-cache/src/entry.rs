use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// The state the cache keeps for a single path.
///
/// Entries are created on the first request for a path and updated in place by every
/// check that actually touches the file system. They are never removed.
pub struct CacheEntry<T> {
    pub(crate) value: Option<Arc<T>>,
    pub(crate) file_exists: bool,
    pub(crate) last_modified: Option<SystemTime>,
    pub(crate) last_check_time: SystemTime,
    pub(crate) last_check_changed: bool,
}

impl<T> CacheEntry<T> {
    /// The last successfully derived value.
    ///
    /// `None` if the file is missing or the loader failed on the last reload.
    pub fn value(&self) -> Option<&Arc<T>> {
        self.value.as_ref()
    }

    /// Whether the file existed at the last check.
    pub fn file_exists(&self) -> bool {
        self.file_exists
    }

    /// The modification time observed at the last check.
    ///
    /// `None` when the file was missing or its `mtime` could not be read.
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    /// When the file system was last consulted for this path.
    pub fn last_check_time(&self) -> SystemTime {
        self.last_check_time
    }

    /// Whether the last check changed the value: a new load, or the file appearing or
    /// disappearing.
    pub fn last_check_changed(&self) -> bool {
        self.last_check_changed
    }

    /// Returns `true` if the entry was checked less than `interval` before `now`.
    ///
    /// An entry checked "in the future", after the clock was set back, is stale.
    pub(crate) fn is_fresh(&self, now: SystemTime, interval: Duration) -> bool {
        match now.duration_since(self.last_check_time) {
            Ok(elapsed) => elapsed < interval,
            Err(_) => false,
        }
    }
}

// Manual impl, `T` itself does not need to be `Clone`.
impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            file_exists: self.file_exists,
            last_modified: self.last_modified,
            last_check_time: self.last_check_time,
            last_check_changed: self.last_check_changed,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CacheEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("value", &self.value)
            .field("file_exists", &self.file_exists)
            .field("last_modified", &self.last_modified)
            .field("last_check_time", &self.last_check_time)
            .field("last_check_changed", &self.last_check_changed)
            .finish()
    }
}
