use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use indexmap::IndexMap;

use crate::{CacheConfig, CacheEntry, Clock, Diagnostic, FileProbe, Loader, LocalFs, SystemClock};

/// Logs at `info` when the cache is verbose, and at the given level otherwise.
macro_rules! check_event {
    ($verbose:expr, $level:ident, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::$level!($($arg)+)
        }
    };
}

/// Per-call options for [`FileDataCache::load_data_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Check the file system even if the entry is still within its check interval.
    pub bypass_cache: bool,
}

impl LoadOptions {
    /// Options that force a file system check.
    pub fn bypass() -> Self {
        Self { bypass_cache: true }
    }
}

/// The result of a single [`FileDataCache::load_data_with`] call.
#[derive(Debug)]
pub struct LoadOutcome<T> {
    /// The current value for the path, if any.
    pub value: Option<Arc<T>>,
    /// Whether this call changed the cached value.
    ///
    /// This is the entry's [`last_check_changed`](CacheEntry::last_check_changed) flag when a
    /// check happened, and always `false` when the entry was still fresh.
    pub has_changed: bool,
    /// Whether the file system was consulted during this call.
    pub checked: bool,
    /// Soft failures observed during the check, in the order they happened.
    pub diagnostics: Vec<Diagnostic>,
}

/// An in-memory cache of values derived from files, refreshed lazily.
///
/// On every [`load_data`](Self::load_data) the cache first looks at its entry for the path.
/// An entry checked less than [`check_interval`](CacheConfig::check_interval) ago is returned
/// as is, without any file system access. Otherwise the file is probed:
///
/// - A missing file clears the value. This counts as a change only if the file existed
///   at the previous check.
/// - An existing file whose modification time equals the previously observed one keeps
///   the cached value.
/// - Anything else (a new path, a file that reappeared, a different or unreadable `mtime`)
///   invokes the [`Loader`]. A failing loader leaves the value empty rather than serving
///   the stale one.
///
/// Change detection relies solely on existence and modification time, values are never
/// compared. The cache is not synchronized, callers sharing it across threads need to
/// wrap it in a lock.
pub struct FileDataCache<L: Loader, P = LocalFs, C = SystemClock> {
    config: CacheConfig,
    loader: L,
    probe: P,
    clock: C,
    entries: IndexMap<PathBuf, CacheEntry<L::Value>>,
}

impl<L: Loader, P, C> fmt::Debug for FileDataCache<L, P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDataCache")
            .field("config", &self.config)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<L: Loader> FileDataCache<L> {
    /// Creates a cache working on the local file system and the system clock.
    pub fn new(config: CacheConfig, loader: L) -> Self {
        Self::with_parts(config, loader, LocalFs, SystemClock)
    }
}

impl<L, P, C> FileDataCache<L, P, C>
where
    L: Loader,
    P: FileProbe,
    C: Clock,
{
    /// Creates a cache with explicit collaborators.
    pub fn with_parts(config: CacheConfig, loader: L, probe: P, clock: C) -> Self {
        Self {
            config,
            loader,
            probe,
            clock,
            entries: IndexMap::new(),
        }
    }

    /// The configuration this cache was created with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the current value for `path`, checking the file if the entry is stale.
    ///
    /// `None` means the file is missing or could not be loaded.
    pub fn load_data(&mut self, path: impl AsRef<Path>) -> Option<Arc<L::Value>> {
        self.load_data_with(path, LoadOptions::default()).value
    }

    /// Returns the current value for `path` along with what this call observed.
    ///
    /// See the [type-level docs](Self) for the refresh rules.
    pub fn load_data_with(
        &mut self,
        path: impl AsRef<Path>,
        options: LoadOptions,
    ) -> LoadOutcome<L::Value> {
        let path = path.as_ref();
        let now = self.clock.now();

        let previous = self.entries.get(path);
        if let Some(entry) = previous {
            if !options.bypass_cache && entry.is_fresh(now, self.config.check_interval) {
                check_event!(self.config.verbose, trace, path = %path.display(), "Serving cached file data");
                return LoadOutcome {
                    value: entry.value.clone(),
                    has_changed: false,
                    checked: false,
                    diagnostics: Vec::new(),
                };
            }
        }

        let previous = previous.cloned();
        let mut diagnostics = Vec::new();
        let entry = self.check(path, now, previous.as_ref(), &mut diagnostics);

        let outcome = LoadOutcome {
            value: entry.value.clone(),
            has_changed: entry.last_check_changed,
            checked: true,
            diagnostics,
        };
        self.entries.insert(path.to_owned(), entry);
        outcome
    }

    /// Probes the file and produces the updated entry.
    fn check(
        &self,
        path: &Path,
        now: SystemTime,
        previous: Option<&CacheEntry<L::Value>>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> CacheEntry<L::Value> {
        let verbose = self.config.verbose;
        let last_check_time = previous.map_or(now, |entry| entry.last_check_time.max(now));

        if !self.probe.exists(path) {
            tracing::info!(path = %path.display(), "Path not found");
            diagnostics.push(Diagnostic::NotFound(path.to_owned()));
            return CacheEntry {
                value: None,
                file_exists: false,
                last_modified: None,
                last_check_time,
                last_check_changed: previous.is_some_and(|entry| entry.file_exists),
            };
        }

        let last_modified = match self.probe.modified(path) {
            Ok(mtime) => Some(mtime),
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "Failed to read modification time");
                diagnostics.push(Diagnostic::ModifiedUnavailable {
                    path: path.to_owned(),
                    source: error,
                });
                None
            }
        };

        // An unknown mtime never proves the file unchanged.
        if let Some(previous) = previous {
            if previous.file_exists
                && last_modified.is_some()
                && previous.last_modified == last_modified
            {
                check_event!(verbose, debug, path = %path.display(), "File unchanged");
                return CacheEntry {
                    value: previous.value.clone(),
                    file_exists: true,
                    last_modified,
                    last_check_time,
                    last_check_changed: false,
                };
            }
        }

        let content = if self.config.read_file {
            match self.probe.read_to_string(path) {
                Ok(content) => Some(content),
                Err(error) => {
                    tracing::warn!(path = %path.display(), error = %error, "Failed to read file content");
                    diagnostics.push(Diagnostic::ContentUnavailable {
                        path: path.to_owned(),
                        source: error,
                    });
                    None
                }
            }
        } else {
            None
        };

        let (value, last_check_changed) = match self.loader.load(path, content.as_deref()) {
            Ok(value) => {
                check_event!(verbose, debug, path = %path.display(), "File loaded");
                (Some(Arc::new(value)), true)
            }
            Err(error) => {
                let error = error.into();
                let file_name = file_name(path);
                tracing::warn!(file_name = %file_name, error = ?error, "Failed to load file");
                diagnostics.push(Diagnostic::LoadFailed {
                    file_name,
                    source: error,
                });
                // Dropping a loaded value or a file appearing is a change, a failed first load is not.
                let changed =
                    previous.is_some_and(|entry| entry.value.is_some() || !entry.file_exists);
                (None, changed)
            }
        };

        CacheEntry {
            value,
            file_exists: true,
            last_modified,
            last_check_time,
            last_check_changed,
        }
    }
}

impl<L: Loader, P, C> FileDataCache<L, P, C> {
    /// The number of paths known to the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no path was requested yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All requested paths, in the order they were first requested.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    /// The current values, in the same order as [`paths`](Self::paths).
    pub fn values(&self) -> impl Iterator<Item = Option<&Arc<L::Value>>> {
        self.entries.values().map(CacheEntry::value)
    }

    /// All paths with their entries, in the order they were first requested.
    pub fn entries(&self) -> impl Iterator<Item = (&Path, &CacheEntry<L::Value>)> {
        self.entries
            .iter()
            .map(|(path, entry)| (path.as_path(), entry))
    }

    /// The entry for `path`, or `None` if it was never requested.
    ///
    /// This never touches the file system.
    pub fn entry(&self, path: impl AsRef<Path>) -> Option<&CacheEntry<L::Value>> {
        self.entries.get(path.as_ref())
    }
}

/// The base name of `path`, for diagnostics.
fn file_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}
