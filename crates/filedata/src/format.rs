//! Turns files into JSON values, based on their extension.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// The formats `filedata` knows how to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
    Toml,
    /// Anything else, kept as a single string.
    Text,
}

impl FileFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("yaml" | "yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Text,
        }
    }

    pub fn parse(self, content: &str) -> Result<Value> {
        match self {
            Self::Json => serde_json::from_str(content).context("invalid JSON"),
            Self::Yaml => serde_yaml::from_str(content).context("invalid YAML"),
            Self::Toml => toml::from_str(content).context("invalid TOML"),
            Self::Text => Ok(Value::String(content.to_owned())),
        }
    }
}

/// The loader handed to the cache.
///
/// Uses `content` when the cache read the file already, and reads it otherwise.
pub fn load_file(path: &Path, content: Option<&str>) -> Result<Value> {
    let content = match content {
        Some(content) => Cow::Borrowed(content),
        None => Cow::Owned(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
    };

    FileFormat::from_path(path).parse(&content)
}
