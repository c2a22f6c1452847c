//! Loads structured files through a [`FileDataCache`](filedata_cache::FileDataCache) and
//! reports what it sees.

#![warn(
    missing_docs,
    missing_debug_implementations,
    unused_crate_dependencies,
    clippy::all
)]

mod cli;
mod config;
mod format;
mod logging;
mod output;

fn main() {
    match cli::execute() {
        Ok(()) => std::process::exit(0),
        Err(error) => {
            logging::ensure_log_error(&error);
            std::process::exit(1);
        }
    }
}
