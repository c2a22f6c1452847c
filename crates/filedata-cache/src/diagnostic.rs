use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A soft failure observed while checking a file.
///
/// Diagnostics never abort a [`load_data`](crate::FileDataCache::load_data) call. They are
/// logged when they happen and handed back in the [`LoadOutcome`](crate::LoadOutcome).
#[derive(Debug, Error)]
pub enum Diagnostic {
    /// Nothing exists at the path.
    ///
    /// This is an observable state rather than an error, the entry is marked as missing.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file exists but its modification time could not be read.
    ///
    /// The file is reloaded, as an unknown `mtime` cannot prove it unchanged.
    #[error("failed to read modification time of {}", .path.display())]
    ModifiedUnavailable {
        /// The probed path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The file content could not be read for the loader.
    ///
    /// The loader is still invoked, without content.
    #[error("failed to read content of {}", .path.display())]
    ContentUnavailable {
        /// The probed path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The loader failed to derive a value.
    #[error("failed to load file: {file_name}")]
    LoadFailed {
        /// The base name of the file.
        file_name: String,
        /// The error returned by the loader.
        #[source]
        source: anyhow::Error,
    },
}

impl Diagnostic {
    /// Returns `true` for [`Diagnostic::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
