//! Logging setup
//!
//! Provides JSON-formatted and human-readable logging with optional file output.
//! Console output goes to stderr so command output on stdout stays parseable.

use crate::config::LoggingConfig;
use anyhow::Result;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const BOOTSTRAP_LEVEL: &str = "chatlist=warn";

/// Run `f` with a temporary stderr subscriber on the current thread
///
/// Configuration is loaded before the configured level is known; this makes
/// its warnings visible anyway. `RUST_LOG` is honored, otherwise only
/// warnings and errors are shown.
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    tracing::subscriber::with_default(bootstrap_subscriber(std::io::stderr), f)
}

fn bootstrap_subscriber<W>(make_writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(BOOTSTRAP_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(make_writer)
        .finish()
}

/// Initialize logging based on configuration.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
///
/// Returns error if the level is not a valid filter, the log file cannot be
/// opened, or a global subscriber is already installed
///
/// # Examples
///
/// ```no_run
/// use chatlist::config::LoggingConfig;
/// use chatlist::logging::init_logging;
///
/// init_logging(&LoggingConfig::default()).unwrap();
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config)?);

    if config.json_format {
        let console_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr);

        if let Some(file_path) = &config.file_path {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;

            let file_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(Arc::new(file));

            registry.with(console_layer).with(file_layer).try_init()?;
        } else {
            registry.with(console_layer).try_init()?;
        }
    } else {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr);

        if let Some(file_path) = &config.file_path {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(file_path)?;

            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(Arc::new(file));

            registry.with(console_layer).with(file_layer).try_init()?;
        } else {
            registry.with(console_layer).try_init()?;
        }
    }

    Ok(())
}

/// Filter from `RUST_LOG`, falling back to `chatlist=<level>`
fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(format!("chatlist={}", config.level))?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_filter_uses_configured_level() {
        std::env::remove_var("RUST_LOG");
        let config = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        let filter = env_filter(&config).unwrap();
        assert_eq!(filter.to_string(), "chatlist=debug");
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    #[serial]
    fn test_bootstrap_subscriber_captures_config_warnings() {
        std::env::remove_var("RUST_LOG");
        std::env::set_var("CHATLIST_CACHE_TTL_SECONDS", "soon");
        let buf = SharedBuf::default();
        let writer = buf.clone();

        let cli = crate::cli::Cli {
            config: None,
            verbose: false,
            db_path: None,
            command: crate::cli::Commands::List {
                query: None,
                json: false,
            },
        };
        let subscriber = bootstrap_subscriber(move || writer.clone());
        let config = tracing::subscriber::with_default(subscriber, || {
            crate::config::Config::load("does-not-exist.yaml", &cli)
        })
        .unwrap();
        std::env::remove_var("CHATLIST_CACHE_TTL_SECONDS");

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Config file not found at does-not-exist.yaml"));
        assert!(output.contains("Invalid CHATLIST_CACHE_TTL_SECONDS: soon"));
        assert_eq!(config.source.cache_ttl_seconds, 300);
    }

    #[test]
    #[serial]
    fn test_bootstrap_subscriber_hides_debug() {
        std::env::remove_var("RUST_LOG");
        let buf = SharedBuf::default();
        let writer = buf.clone();

        tracing::subscriber::with_default(bootstrap_subscriber(move || writer.clone()), || {
            tracing::debug!("not shown");
        });

        assert!(buf.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert_eq!(config.file_path, None);
    }
}
