//! Helpers for testing against the real file system.
//!
//! When writing tests, keep the following points in mind:
//!
//!  - In every test, call [`setup`]. This will set up the logger so that all console output
//!    is captured by the test runner.
//!
//!  - When using [`tempdir`], make sure that the handle to the temp directory is held for the
//!    entire lifetime of the test. Dropping it deletes the directory and everything in it.
//!
//!  - File systems differ in `mtime` resolution, and two writes in quick succession may end up
//!    with the same timestamp. Use [`write_file`] to pin the modification time explicitly
//!    instead of sleeping between writes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::fmt;
use tracing_subscriber::util::SubscriberInitExt;

pub use tempfile::TempDir;

/// Setup the test environment.
///
///  - Initializes logs: The logger only captures logs from the `filedata` crates and mutes all
///    other logs.
pub fn setup() {
    fmt()
        .with_env_filter(EnvFilter::new("filedata_cache=trace,filedata=trace"))
        .with_target(false)
        .pretty()
        .with_test_writer()
        .try_init()
        .ok();
}

/// Collects formatted log lines in memory.
#[derive(Clone, Debug, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` and returns its result together with everything it logged at `info` or above.
///
/// Lines look like `" INFO File loaded path=/a.json"`, without timestamps or targets. The
/// subscriber only applies to the current thread while `f` runs.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let subscriber = fmt()
        .with_max_level(LevelFilter::INFO)
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .finish();

    let result = {
        let _guard = subscriber.set_default();
        f()
    };

    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}

/// Creates a temporary directory.
///
/// The directory is deleted when the [`TempDir`] instance is dropped.
pub fn tempdir() -> TempDir {
    TempDir::new().unwrap()
}

/// A fixed point in time, `secs` seconds after the Unix epoch.
pub fn timestamp(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

/// Writes `contents` to `name` inside `dir` and sets its modification time to `modified`.
///
/// Returns the full path of the file.
pub fn write_file(dir: &Path, name: &str, contents: &str, modified: SystemTime) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    set_modified(&path, modified);
    path
}

/// Sets the modification time of an existing file.
pub fn set_modified(path: &Path, modified: SystemTime) {
    filetime::set_file_mtime(path, FileTime::from_system_time(modified)).unwrap();
}
