//! # nightsplit-logging
//!
//! Logging for the nightsplit converter.
//!
//! ## Key Types
//!
//! - [`Logger`] - Structured run event logging
//! - [`LogEvent`] - Run event types
//! - [`LogFormat`] - Output formats (Pretty, JSON, Compact)
//!
//! Run events go to stderr through [`Logger`]. Diagnostics from the library
//! crates use `tracing` and are shown once [`init_tracing`] has installed a
//! subscriber.

mod events;

pub use events::{LogEvent, LogFormat, Logger};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for the application
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Pretty | LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
    }
}
