// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

// --- Probe Result Models ---

// The outcome of a single DNS resolution attempt for one hostname.
// Produced exactly once per hostname by the DNS prober and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsProbeResult {
    pub subdomain: String,
    pub ip_addresses: Vec<IpAddr>,
    pub dns_active: bool,
}

impl DnsProbeResult {
    /// The default "nothing resolved" outcome for a hostname.
    pub fn unresolved(subdomain: &str) -> Self {
        Self {
            subdomain: subdomain.to_string(),
            ip_addresses: Vec::new(),
            dns_active: false,
        }
    }
}

// The outcome of one HTTP plus one HTTPS request attempt for one hostname.
// `active` is set as soon as either scheme returned any response, regardless
// of the status code value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpProbeResult {
    pub subdomain: String,
    pub http_status: Option<u16>,
    pub https_status: Option<u16>,
    pub active: bool,
    pub redirects_to: Option<String>,
    pub server: Option<String>,
}

impl HttpProbeResult {
    /// The default "no response on either scheme" outcome for a hostname.
    pub fn unreachable(subdomain: &str) -> Self {
        Self {
            subdomain: subdomain.to_string(),
            http_status: None,
            https_status: None,
            active: false,
            redirects_to: None,
            server: None,
        }
    }
}

// --- Merged Record ---

// One entry of the final report: the DNS and HTTP(S) outcomes for a single
// hostname merged together. A hostname whose probes all failed still gets a
// record, with every field at its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubdomainRecord {
    pub subdomain: String,
    pub http_status: Option<u16>,
    pub https_status: Option<u16>,
    pub active: bool,
    pub redirects_to: Option<String>,
    pub server: Option<String>,
    pub ip_addresses: Vec<IpAddr>,
    pub dns_active: bool,
}

impl SubdomainRecord {
    /// Whether either prober reported a positive signal for this hostname.
    /// DNS-only resolution counts: a host that resolves but serves no HTTP
    /// is still live infrastructure worth reporting.
    pub fn is_active(&self) -> bool {
        self.active || self.dns_active
    }
}

// --- Main Report ---

// The full result of one reconnaissance run. Built once by the report
// assembler and immutable afterwards; serialized to the JSON and CSV sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconReport {
    pub domain: String,
    pub timestamp: DateTime<Utc>,
    pub total_subdomains: usize,
    pub active_subdomains: usize,
    pub subdomains: Vec<SubdomainRecord>,
    pub active_hosts: Vec<SubdomainRecord>,
    pub errors: Vec<String>,
}
