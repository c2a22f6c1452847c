use std::time::Duration;

use serde::Deserialize;

/// Configuration of a [`FileDataCache`](crate::FileDataCache).
///
/// The configuration is fixed for the lifetime of the cache.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a checked entry is trusted without touching the file system again.
    ///
    /// A zero interval re-checks the file on every access.
    #[serde(with = "humantime_serde")]
    pub check_interval: Duration,

    /// Read the file's text and hand it to the loader.
    ///
    /// When disabled, the loader receives no content and is expected to read the file itself.
    pub read_file: bool,

    /// Log every check outcome and cache hit at `info` level.
    pub verbose: bool,
}

impl CacheConfig {
    /// The check interval used when none is configured.
    pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(20);

    /// Sets [`check_interval`](Self::check_interval).
    pub fn with_check_interval(mut self, check_interval: Duration) -> Self {
        self.check_interval = check_interval;
        self
    }

    /// Sets [`read_file`](Self::read_file).
    pub fn with_read_file(mut self, read_file: bool) -> Self {
        self.read_file = read_file;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            check_interval: Self::DEFAULT_CHECK_INTERVAL,
            read_file: false,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.check_interval, Duration::from_secs(20));
        assert!(!config.read_file);
        assert!(!config.verbose);
    }

    #[test]
    fn test_partial_yaml() {
        // Unset fields keep their defaults.
        let yaml = r#"
            check_interval: 500ms
        "#;
        let config: CacheConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.check_interval, Duration::from_millis(500));
        assert!(!config.read_file);

        let yaml = r#"
            read_file: true
            verbose: true
        "#;
        let config: CacheConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.check_interval, CacheConfig::DEFAULT_CHECK_INTERVAL);
        assert!(config.read_file);
        assert!(config.verbose);
    }

    #[test]
    fn test_zero_interval() {
        let yaml = r#"
            check_interval: 0s
        "#;
        let config: CacheConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.check_interval, Duration::ZERO);
    }

    #[test]
    fn test_invalid_interval() {
        let yaml = r#"
            check_interval: soon
        "#;
        assert!(serde_yaml::from_str::<CacheConfig>(yaml).is_err());
    }
}
