// src/core/discovery.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{Result, bail};
use tokio::process::Command;
use tracing::{info, warn};

/// Conventional subdomain labels probed when automated enumeration is
/// unavailable. Each is prefixed to the target domain.
const FALLBACK_LABELS: &[&str] = &[
    "www", "mail", "ftp", "admin", "api", "app", "dev", "test", "staging",
    "blog", "shop", "store", "forum", "support", "help", "docs", "cdn",
    "static", "assets", "images", "media", "files", "download", "uploads",
];

/// Supplies the candidate hostnames for a run.
///
/// Tries passive enumeration through the external `amass` tool first; any
/// failure on that path (tool not installed, non-zero exit, timeout, missing
/// results file) is recoverable and falls back to the static label list.
/// Tool unavailability therefore never propagates to the caller. A tool run
/// that succeeds but finds nothing returns an empty list, which the caller
/// records as a run-level error.
pub async fn discover_hostnames(domain: &str, output_dir: &Path, timeout: Duration) -> Vec<String> {
    match run_amass(domain, output_dir, timeout).await {
        Ok(hostnames) => {
            info!(count = hostnames.len(), "Amass enumeration completed.");
            hostnames
        }
        Err(e) => {
            warn!(error = %e, "Amass unavailable, using fallback subdomain list.");
            fallback_hostnames(domain)
        }
    }
}

/// Runs `amass enum -passive` against the domain, bounded by `timeout`, and
/// parses the hostnames out of its results file. The file is an incidental
/// artifact left in the output directory.
async fn run_amass(domain: &str, output_dir: &Path, timeout: Duration) -> Result<Vec<String>> {
    let lookup = if cfg!(windows) { "where" } else { "which" };
    let check = Command::new(lookup).arg("amass").output().await?;
    if !check.status.success() {
        bail!("amass not found in PATH");
    }

    let results_file = amass_results_path(domain, output_dir);
    info!(domain, file = %results_file.display(), "Running amass passive enumeration.");

    let output = tokio::time::timeout(
        timeout,
        Command::new("amass")
            .args(["enum", "-passive", "-d", domain, "-o"])
            .arg(&results_file)
            .output(),
    )
    .await??;

    if !output.status.success() {
        bail!(
            "amass exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let contents = tokio::fs::read_to_string(&results_file).await?;
    Ok(parse_amass_output(&contents))
}

fn amass_results_path(domain: &str, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{domain}_amass_results.txt"))
}

/// Takes the first whitespace-separated token of each non-empty line. Amass
/// text output may append metadata after the hostname.
fn parse_amass_output(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Builds the static candidate list: every conventional label prefixed to
/// the domain, plus the bare domain itself.
pub fn fallback_hostnames(domain: &str) -> Vec<String> {
    let mut hostnames: Vec<String> = FALLBACK_LABELS
        .iter()
        .map(|label| format!("{label}.{domain}"))
        .collect();
    hostnames.push(domain.to_string());
    hostnames
}
