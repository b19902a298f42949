//! Subscriber setup for binaries embedding the resolvers
//!
//! The resolvers only emit `tracing` events: `debug!` when a page no longer
//! carries the expected markup, `warn!` when a provider answers with a
//! malformed payload. Nothing is printed until a subscriber is installed.

use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;

/// Install a global subscriber from `config`
///
/// `level` is the default verbosity; `RUST_LOG` directives, when present,
/// are layered on top (e.g. `RUST_LOG=anixart_link_parser::kodik=trace`).
/// Fails on an unknown level, an unwritable log file, or when a global
/// subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level: LevelFilter = config
        .level
        .parse()
        .with_context(|| format!("unknown log level {:?}", config.level))?;

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let (writer, ansi) = match &config.file_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {path}"))?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stdout), true),
    };

    let output: Box<dyn Layer<Registry> + Send + Sync> = if config.format == "json" {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(writer)
            .boxed()
    } else {
        fmt::layer()
            .pretty()
            .with_file(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .boxed()
    };

    tracing_subscriber::registry().with(output).with(filter).try_init()?;
    Ok(())
}
