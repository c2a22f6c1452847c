//! A lazily refreshing cache of values derived from files.
//!
//! The [`FileDataCache`] maps a path to whatever a [`Loader`] derives from that file, and
//! only goes back to the file system once per [`CacheConfig::check_interval`] per path.
//! When it does, it compares the file's modification time with the one it saw last and
//! only invokes the [`Loader`] again when the file appeared or its `mtime` moved.
//!
//! ## Collaborators
//!
//! The cache does not touch the file system or the clock directly. It goes through:
//!
//! - a [`FileProbe`], answering existence, modification time and (optionally) content
//!   queries. [`LocalFs`] wires these to [`std::fs`].
//! - a [`Clock`], which is [`SystemClock`] outside of tests.
//!
//! ## Failures
//!
//! Nothing that goes wrong while checking a file is propagated as an error. Missing files,
//! failing `stat` calls, unreadable content and failing loaders are all absorbed, logged
//! via `tracing`, and reported as [`Diagnostic`]s inside the [`LoadOutcome`]. Callers get
//! back an absent value instead.

#![warn(missing_docs, missing_debug_implementations)]

mod cache;
mod clock;
mod config;
mod diagnostic;
mod entry;
mod loader;
mod probe;

#[cfg(any(test, feature = "test"))]
pub mod testutils;


pub use cache::*;
pub use clock::*;
pub use config::*;
pub use diagnostic::*;
pub use entry::*;
pub use loader::*;
pub use probe::*;
