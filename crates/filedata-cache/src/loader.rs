use std::path::Path;

/// Derives a value from a file.
///
/// The loader is pure computation from the cache's point of view. When the cache is
/// configured with [`read_file`](crate::CacheConfig::read_file), `content` carries the
/// file's text, otherwise it is always `None`.
///
/// Any `Fn(&Path, Option<&str>) -> Result<T, E>` closure is a loader.
pub trait Loader {
    /// The derived value.
    type Value;
    /// The error produced when the file cannot be turned into a value.
    type Error: Into<anyhow::Error>;

    /// Derives the value for `path`.
    fn load(&self, path: &Path, content: Option<&str>) -> Result<Self::Value, Self::Error>;
}

impl<F, T, E> Loader for F
where
    F: Fn(&Path, Option<&str>) -> Result<T, E>,
    E: Into<anyhow::Error>,
{
    type Value = T;
    type Error = E;

    fn load(&self, path: &Path, content: Option<&str>) -> Result<T, E> {
        self(path, content)
    }
}
