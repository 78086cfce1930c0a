// src/logging.rs

use std::path::Path;

use color_eyre::eyre::Result;
use lazy_static::lazy_static;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = "reconnaissance.log".to_string();
}

/// Initializes leveled, timestamped logging to both a file in the run's
/// output directory and stderr. Stdout is left to the final JSON report.
///
/// The level defaults to `info` (`debug` with `--verbose`) and can be
/// overridden through `RUST_LOG` or the crate-specific env var.
pub fn initialize_logging(output_dir: &Path, verbose: bool) -> Result<()> {
    let log_path = output_dir.join(LOG_FILE.clone());
    let log_file = std::fs::File::create(log_path)?;

    let default_level = if verbose { "debug" } else { "info" };
    let log_level = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV.clone()))
        .unwrap_or_else(|_| format!("{}={}", env!("CARGO_CRATE_NAME"), default_level));

    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(EnvFilter::new(log_level.clone()));

    let stderr_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(stderr_subscriber)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
