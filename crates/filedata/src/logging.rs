use std::env;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, LogFormat};

fn get_rust_log(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::OFF => "off",
        LevelFilter::ERROR => "ERROR",
        LevelFilter::WARN => "WARN",
        LevelFilter::INFO => "INFO",
        LevelFilter::DEBUG => {
            "INFO,\
             filedata=DEBUG,\
             filedata_cache=DEBUG"
        }
        LevelFilter::TRACE => {
            "INFO,\
             filedata=TRACE,\
             filedata_cache=TRACE"
        }
    }
}

/// Initializes logging for `filedata`.
///
/// This considers the `RUST_LOG` environment variable and defaults it to the level specified in the
/// configuration. Logs go to `stderr`, `stdout` is reserved for reports.
pub fn init_logging(config: &Config) {
    let rust_log =
        env::var("RUST_LOG").unwrap_or_else(|_| get_rust_log(config.logging.level).to_string());

    let fmt_layer = {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(UtcTime::rfc_3339())
            .with_target(true);

        match (config.logging.format, console::user_attended_stderr()) {
            (LogFormat::Auto, true) | (LogFormat::Pretty, _) => layer.pretty().boxed(),
            (LogFormat::Auto, false) | (LogFormat::Simplified, _) => {
                layer.compact().with_ansi(false).boxed()
            }
            (LogFormat::Json, _) => layer.json().flatten_event(true).boxed(),
        }
    }
    .with_filter(EnvFilter::new(&rust_log));

    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Logs an error to the configured logger or `stderr` if not yet configured.
pub fn ensure_log_error(error: &anyhow::Error) {
    if tracing::Level::ERROR <= tracing::level_filters::STATIC_MAX_LEVEL
        && tracing::Level::ERROR <= LevelFilter::current()
    {
        tracing::error!("{:?}", error);
    } else {
        eprintln!("{error:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_scopes_verbose_levels() {
        assert_eq!(get_rust_log(LevelFilter::INFO), "INFO");
        assert_eq!(
            get_rust_log(LevelFilter::DEBUG),
            "INFO,filedata=DEBUG,filedata_cache=DEBUG"
        );
        assert!(EnvFilter::try_new(get_rust_log(LevelFilter::TRACE)).is_ok());
        assert!(EnvFilter::try_new(get_rust_log(LevelFilter::OFF)).is_ok());
    }
}
