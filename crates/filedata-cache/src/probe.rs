use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// The file system queries a [`FileDataCache`](crate::FileDataCache) performs.
///
/// Each method is called individually and at most once per check.
pub trait FileProbe {
    /// Returns `true` if something exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Returns the modification time of `path`.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Reads the whole file at `path` as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// A [`FileProbe`] backed by [`std::fs`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFs;

impl FileProbe for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(path)?.modified()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
