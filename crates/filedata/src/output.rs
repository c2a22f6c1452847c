use std::error::Error;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use filedata_cache::{CacheEntry, LoadOutcome};
use serde::Serialize;
use serde_json::Value;

/// One line of output, describing the state of a single path.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub path: &'a Path,
    pub exists: bool,
    pub changed: bool,
    pub value: Option<&'a Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl<'a> Report<'a> {
    pub fn new(
        path: &'a Path,
        entry: Option<&CacheEntry<Value>>,
        outcome: &'a LoadOutcome<Value>,
    ) -> Self {
        Self {
            path,
            exists: entry.is_some_and(CacheEntry::file_exists),
            changed: outcome.has_changed,
            value: outcome.value.as_deref(),
            errors: outcome
                .diagnostics
                .iter()
                // A missing file is already conveyed by `exists`.
                .filter(|diagnostic| !diagnostic.is_not_found())
                .map(|diagnostic| error_chain(diagnostic))
                .collect(),
        }
    }

    /// Writes the report as a single JSON line.
    pub fn write(&self, mut writer: impl Write) -> Result<()> {
        serde_json::to_writer(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// Formats an error with all of its sources, separated by colons.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(error) = source {
        write!(message, ": {error}").ok();
        source = error.source();
    }
    message
}
