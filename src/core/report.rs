// src/core/report.rs

use std::path::Path;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Serialize;
use tracing::info;

use crate::core::models::{ReconReport, SubdomainRecord};

/// Builds the run report from the merged validation records.
///
/// Pure aggregation: counts the records, filters the active subset (either
/// prober signalling success qualifies), and carries forward any errors
/// collected during the run. The report is immutable once returned.
pub fn assemble(
    domain: &str,
    timestamp: DateTime<Utc>,
    subdomains: Vec<SubdomainRecord>,
    errors: Vec<String>,
) -> ReconReport {
    let active_hosts: Vec<SubdomainRecord> = subdomains
        .iter()
        .filter(|record| record.is_active())
        .cloned()
        .collect();

    ReconReport {
        domain: domain.to_string(),
        timestamp,
        total_subdomains: subdomains.len(),
        active_subdomains: active_hosts.len(),
        subdomains,
        active_hosts,
        errors,
    }
}

/// Renders the report as pretty-printed JSON.
pub fn render_json(report: &ReconReport) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).wrap_err("failed to serialize JSON report")
}

/// One CSV row, flattened from a `SubdomainRecord`. The address list is
/// joined into a single cell; column order follows the record's fields.
#[derive(Serialize)]
struct CsvRow<'a> {
    subdomain: &'a str,
    http_status: Option<u16>,
    https_status: Option<u16>,
    active: bool,
    redirects_to: Option<&'a str>,
    server: Option<&'a str>,
    ip_addresses: String,
    dns_active: bool,
}

impl<'a> From<&'a SubdomainRecord> for CsvRow<'a> {
    fn from(record: &'a SubdomainRecord) -> Self {
        Self {
            subdomain: &record.subdomain,
            http_status: record.http_status,
            https_status: record.https_status,
            active: record.active,
            redirects_to: record.redirects_to.as_deref(),
            server: record.server.as_deref(),
            ip_addresses: record
                .ip_addresses
                .iter()
                .map(|ip| ip.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            dns_active: record.dns_active,
        }
    }
}

/// Renders the report's records as CSV, one row per record. The header is
/// emitted with the first row, so an empty record set yields an empty file
/// rather than an error.
pub fn render_csv(report: &ReconReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in &report.subdomains {
        writer
            .serialize(CsvRow::from(record))
            .wrap_err("failed to serialize CSV row")?;
    }
    writer
        .into_inner()
        .map_err(|e| eyre!("failed to flush CSV report: {e}"))
}

/// Persists the report into the output directory, honoring the format
/// selection flags. This is the one step the run must not skip: it is called
/// even when validation produced nothing.
pub fn save_reports(
    report: &ReconReport,
    output_dir: &Path,
    json_only: bool,
    csv_only: bool,
) -> Result<()> {
    if !csv_only {
        let path = output_dir.join(format!("{}_reconnaissance_report.json", report.domain));
        std::fs::write(&path, render_json(report)?)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "JSON report written.");
    }

    if !json_only {
        let path = output_dir.join(format!("{}_subdomains.csv", report.domain));
        std::fs::write(&path, render_csv(report)?)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "CSV report written.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn live_record(subdomain: &str, status: u16) -> SubdomainRecord {
        SubdomainRecord {
            subdomain: subdomain.to_string(),
            http_status: Some(status),
            https_status: Some(status),
            active: true,
            redirects_to: Some(format!("https://{subdomain}/")),
            server: Some("nginx".to_string()),
            ip_addresses: vec![
                IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)),
                IpAddr::V4(Ipv4Addr::new(192, 0, 2, 2)),
            ],
            dns_active: true,
        }
    }

    fn dead_record(subdomain: &str) -> SubdomainRecord {
        SubdomainRecord {
            subdomain: subdomain.to_string(),
            http_status: None,
            https_status: None,
            active: false,
            redirects_to: None,
            server: None,
            ip_addresses: Vec::new(),
            dns_active: false,
        }
    }

    #[test]
    fn assemble_counts_live_and_dead_hosts() {
        let records = vec![live_record("www.ex.com", 200), dead_record("dead.ex.com")];
        let report = assemble("ex.com", Utc::now(), records, Vec::new());

        assert_eq!(report.total_subdomains, 2);
        assert_eq!(report.active_subdomains, 1);
        assert_eq!(report.active_hosts.len(), 1);
        assert_eq!(report.active_hosts[0].subdomain, "www.ex.com");
        assert_eq!(report.active_hosts[0].http_status, Some(200));
        assert!(report.errors.is_empty());
    }

    #[test]
    fn dns_only_resolution_counts_as_active() {
        let mut record = dead_record("mx.ex.com");
        record.dns_active = true;
        record.ip_addresses = vec![IpAddr::V4(Ipv4Addr::new(192, 0, 2, 9))];

        let report = assemble("ex.com", Utc::now(), vec![record], Vec::new());
        assert_eq!(report.active_subdomains, 1);
    }

    #[test]
    fn json_report_round_trips() {
        let records = vec![live_record("www.ex.com", 200), dead_record("dead.ex.com")];
        let report = assemble("ex.com", Utc::now(), records, vec!["boom".to_string()]);

        let bytes = render_json(&report).unwrap();
        let parsed: ReconReport = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed.total_subdomains, report.total_subdomains);
        assert_eq!(parsed.active_subdomains, report.active_subdomains);
        let hostnames: Vec<&str> = parsed.subdomains.iter().map(|r| r.subdomain.as_str()).collect();
        assert_eq!(hostnames, vec!["www.ex.com", "dead.ex.com"]);
        assert_eq!(parsed.errors, vec!["boom"]);
    }

    #[test]
    fn csv_row_count_matches_record_count() {
        let records = vec![
            live_record("www.ex.com", 200),
            dead_record("dead.ex.com"),
            live_record("api.ex.com", 503),
        ];
        let report = assemble("ex.com", Utc::now(), records, Vec::new());

        let bytes = render_csv(&report).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // Header plus one row per record.
        assert_eq!(lines.len(), 1 + report.subdomains.len());
        assert!(lines[0].starts_with("subdomain,http_status"));
        assert!(lines[1].contains("192.0.2.1, 192.0.2.2"));
    }

    #[test]
    fn empty_record_set_renders_empty_csv() {
        let report = assemble("ex.com", Utc::now(), Vec::new(), Vec::new());
        let bytes = render_csv(&report).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn save_reports_honors_format_flags() {
        let dir = std::env::temp_dir().join(format!("recon-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let report = assemble("ex.com", Utc::now(), vec![live_record("www.ex.com", 200)], Vec::new());

        save_reports(&report, &dir, true, false).unwrap();
        assert!(dir.join("ex.com_reconnaissance_report.json").exists());
        assert!(!dir.join("ex.com_subdomains.csv").exists());

        save_reports(&report, &dir, false, false).unwrap();
        assert!(dir.join("ex.com_subdomains.csv").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
