// src/main.rs

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{error, warn};
use url::Url;

mod core;
mod logging;

use crate::core::models::ReconReport;
use crate::core::{discovery, report, validator};

/// Per-request timeout applied to every HTTP/HTTPS probe attempt.
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(name = "recon", version, about = "Subdomain reconnaissance: discover, validate, report")]
struct Cli {
    /// Target domain for reconnaissance
    domain: String,

    /// Output directory for reports and artifacts
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Write only the JSON report
    #[arg(long, conflicts_with = "csv_only")]
    json_only: bool,

    /// Write only the CSV report
    #[arg(long)]
    csv_only: bool,

    /// Enumeration tool timeout in seconds
    #[arg(short, long, default_value_t = 300)]
    timeout: u64,

    /// Number of concurrent validation workers
    #[arg(short, long, default_value_t = 20)]
    workers: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.output_dir)?;
    logging::initialize_logging(&cli.output_dir, cli.verbose)?;

    let domain = normalize_domain(&cli.domain);
    let report = run_reconnaissance(&domain, &cli).await;

    // Reports are persisted even for runs that found or validated nothing.
    // Partial-failure runs still exit 0; only failing to persist is fatal.
    let persisted = report::save_reports(&report, &cli.output_dir, cli.json_only, cli.csv_only);
    println!("{}", serde_json::to_string_pretty(&report)?);
    persisted
}

/// Drives the full pipeline: discovery, concurrent validation, assembly.
/// Stage failures end up in the report's error list instead of aborting, so
/// the caller always receives a report to persist.
async fn run_reconnaissance(domain: &str, cli: &Cli) -> ReconReport {
    let timestamp = Utc::now();
    let mut errors = Vec::new();

    let hostnames = discovery::discover_hostnames(
        domain,
        &cli.output_dir,
        Duration::from_secs(cli.timeout),
    )
    .await;

    let records = if hostnames.is_empty() {
        let message = format!("No subdomains found for {domain}");
        warn!("{message}");
        errors.push(message);
        Vec::new()
    } else {
        match validator::run_validation(&hostnames, cli.workers, HTTP_REQUEST_TIMEOUT).await {
            Ok(records) => records,
            Err(e) => {
                let message = format!("Error during reconnaissance: {e}");
                error!("{message}");
                errors.push(message);
                Vec::new()
            }
        }
    };

    report::assemble(domain, timestamp, records, errors)
}

/// Reduces user input to a bare domain, accepting forms like
/// `https://example.com/path` alongside `example.com`.
fn normalize_domain(input: &str) -> String {
    let input = input.trim();
    let with_scheme = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    };

    Url::parse(&with_scheme)
        .ok()
        .and_then(|url| url.host_str().map(String::from))
        .unwrap_or_else(|| input.to_string())
}

#[cfg(test)]
mod tests {
    use super::normalize_domain;

    #[test]
    fn normalize_accepts_bare_domains_and_urls() {
        assert_eq!(normalize_domain("example.com"), "example.com");
        assert_eq!(normalize_domain("https://example.com"), "example.com");
        assert_eq!(normalize_domain("http://www.example.com/login"), "www.example.com");
        assert_eq!(normalize_domain("  example.com "), "example.com");
    }
}
