//! Exposes the command line application.
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filedata_cache::{Clock, FileDataCache, FileProbe, LoadOptions, Loader};
use serde_json::Value;
use tracing::level_filters::LevelFilter;

use crate::config::{Config, LogFormat};
use crate::format;
use crate::logging;
use crate::output::Report;

/// `filedata` commands.
#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Load every path once and print its current value.
    Show {
        /// The files to load.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Check the file system for every path, even within the check interval.
        #[arg(long)]
        bypass_cache: bool,
    },

    /// Keep polling the given paths and print every change.
    Watch {
        /// The files to watch.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// How long to wait between two polls.
        #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
        poll: Duration,

        /// Stop after this many polls.
        #[arg(long)]
        iterations: Option<u64>,

        /// Check the file system on every poll, even within the check interval.
        #[arg(long)]
        bypass_cache: bool,
    },
}

/// Loads JSON, YAML, TOML or plain text files and reports their contents as JSON lines.
///
/// Files are only re-read when their modification time changes, and at most once per
/// check interval.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about)]
struct Cli {
    /// Path to your configuration file.
    #[arg(long, short, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// How long a loaded file is trusted before checking it again.
    ///
    /// Overrides `cache.check_interval` from the configuration file.
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    interval: Option<Duration>,

    /// Read files in the cache and pass their content to the parser.
    #[arg(long, global = true)]
    read_file: bool,

    /// The severity level of logging output.
    ///
    /// Possible values:
    /// off, error, warn, info, debug, trace
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,

    /// The log format.
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Returns the path to the configuration file.
    fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Applies command line overrides on top of the configuration file.
    fn apply(&self, config: &mut Config) {
        if let Some(interval) = self.interval {
            config.cache.check_interval = interval;
        }
        if self.read_file {
            config.cache.read_file = true;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

/// Options of the `watch` command.
#[derive(Clone, Copy, Debug)]
struct WatchOptions {
    poll: Duration,
    iterations: Option<u64>,
    bypass_cache: bool,
}

/// Runs the main application.
pub fn execute() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::get(cli.config()).context("failed loading config")?;
    cli.apply(&mut config);

    logging::init_logging(&config);
    tracing::debug!(?config, "Starting filedata");

    let mut cache = FileDataCache::new(config.cache, format::load_file);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Show {
            paths,
            bypass_cache,
        } => show(&mut cache, &paths, LoadOptions { bypass_cache }, &mut out),
        Command::Watch {
            paths,
            poll,
            iterations,
            bypass_cache,
        } => {
            let options = WatchOptions {
                poll,
                iterations,
                bypass_cache,
            };
            watch(&mut cache, &paths, options, &mut out, thread::sleep)
        }
    }
}

/// Loads each path once and writes one report per path.
fn show<L, P, C>(
    cache: &mut FileDataCache<L, P, C>,
    paths: &[PathBuf],
    options: LoadOptions,
    mut out: impl Write,
) -> Result<()>
where
    L: Loader<Value = Value>,
    P: FileProbe,
    C: Clock,
{
    for path in paths {
        let outcome = cache.load_data_with(path, options);
        Report::new(path, cache.entry(path), &outcome).write(&mut out)?;
    }
    Ok(())
}

/// Polls all paths, reporting everything on the first round and only changes afterwards.
fn watch<L, P, C>(
    cache: &mut FileDataCache<L, P, C>,
    paths: &[PathBuf],
    options: WatchOptions,
    mut out: impl Write,
    mut sleep: impl FnMut(Duration),
) -> Result<()>
where
    L: Loader<Value = Value>,
    P: FileProbe,
    C: Clock,
{
    let load_options = LoadOptions {
        bypass_cache: options.bypass_cache,
    };

    let mut round = 0;
    loop {
        for path in paths {
            let outcome = cache.load_data_with(path, load_options);
            if round == 0 || outcome.has_changed {
                Report::new(path, cache.entry(path), &outcome).write(&mut out)?;
                out.flush()?;
            }
        }

        round += 1;
        if options.iterations.is_some_and(|iterations| round >= iterations) {
            return Ok(());
        }
        sleep(options.poll);
    }
}
