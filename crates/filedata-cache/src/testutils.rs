//! Stub collaborators for exercising a [`FileDataCache`](crate::FileDataCache) without a real
//! file system or wall clock.
//!
//! Both stubs are cheap handles around shared state: keep a clone around to manipulate the
//! stub after handing it to the cache.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use crate::{Clock, FileProbe};

/// How often each [`FileProbe`] method was called.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProbeCalls {
    /// Calls to [`FileProbe::exists`].
    pub exists: usize,
    /// Calls to [`FileProbe::modified`].
    pub modified: usize,
    /// Calls to [`FileProbe::read_to_string`].
    pub read: usize,
}

#[derive(Clone, Debug)]
struct StubFile {
    modified: Option<SystemTime>,
    content: Option<String>,
}

#[derive(Debug, Default)]
struct StubState {
    files: HashMap<PathBuf, StubFile>,
    calls: ProbeCalls,
}

/// An in-memory [`FileProbe`] that counts how it is used.
///
/// Paths that were never added do not exist.
#[derive(Clone, Debug, Default)]
pub struct StubProbe {
    state: Rc<RefCell<StubState>>,
}

impl StubProbe {
    /// Creates a probe without any files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file with the given modification time and content.
    pub fn set_file(&self, path: impl Into<PathBuf>, modified: SystemTime, content: &str) {
        self.state.borrow_mut().files.insert(
            path.into(),
            StubFile {
                modified: Some(modified),
                content: Some(content.to_owned()),
            },
        );
    }

    /// Changes the modification time of a file, adding an empty file if needed.
    pub fn set_modified(&self, path: impl Into<PathBuf>, modified: SystemTime) {
        let mut state = self.state.borrow_mut();
        let file = state.files.entry(path.into()).or_insert(StubFile {
            modified: None,
            content: Some(String::new()),
        });
        file.modified = Some(modified);
    }

    /// Makes `modified` fail for an existing file.
    pub fn fail_modified(&self, path: impl AsRef<Path>) {
        if let Some(file) = self.state.borrow_mut().files.get_mut(path.as_ref()) {
            file.modified = None;
        }
    }

    /// Makes `read_to_string` fail for an existing file.
    pub fn fail_read(&self, path: impl AsRef<Path>) {
        if let Some(file) = self.state.borrow_mut().files.get_mut(path.as_ref()) {
            file.content = None;
        }
    }

    /// Removes a file.
    pub fn remove(&self, path: impl AsRef<Path>) {
        self.state.borrow_mut().files.remove(path.as_ref());
    }

    /// The calls made so far.
    pub fn calls(&self) -> ProbeCalls {
        self.state.borrow().calls
    }

    fn file(&self, path: &Path) -> io::Result<StubFile> {
        self.state
            .borrow()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

impl FileProbe for StubProbe {
    fn exists(&self, path: &Path) -> bool {
        self.state.borrow_mut().calls.exists += 1;
        self.file(path).is_ok()
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.state.borrow_mut().calls.modified += 1;
        self.file(path)?
            .modified
            .ok_or_else(|| io::Error::other("stat failed"))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.state.borrow_mut().calls.read += 1;
        self.file(path)?
            .content
            .ok_or_else(|| io::Error::from(io::ErrorKind::PermissionDenied))
    }
}

/// A [`Clock`] that only moves when told to.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<SystemTime>>,
}

impl ManualClock {
    /// Creates a clock standing at `now`.
    pub fn new(now: SystemTime) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Creates a clock standing `millis` milliseconds after the Unix epoch.
    pub fn at_millis(millis: u64) -> Self {
        Self::new(SystemTime::UNIX_EPOCH + Duration::from_millis(millis))
    }

    /// Moves the clock to `now`, which may be in the past.
    pub fn set(&self, now: SystemTime) {
        self.now.set(now);
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now.get()
    }
}
