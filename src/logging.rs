//! Logging initialization
//!
//! Console output honors `RUST_LOG`; a daily-rolling file under `logs/`
//! keeps the full record. Credentials never reach either sink (see
//! `core::Credential`).

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Returns the appender guard; dropping it stops the background log writer,
/// so hold it for the life of the process.
pub fn init_logging() -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily("logs", "tax-provider.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()?;

    Ok(guard)
}
