// src/core/validator/dns_prober.rs

use tracing::{debug, warn};

use crate::core::models::DnsProbeResult;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};

/// Builds the shared Tokio-based asynchronous resolver used by every DNS
/// probe of a run.
pub fn build_resolver() -> TokioAsyncResolver {
    TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
}

/// Resolves one hostname to its A/AAAA addresses.
///
/// This function never fails: every resolver error (NXDOMAIN, timeout, no
/// route, servfail) collapses into the `dns_active: false` outcome with an
/// empty address set. The error itself is only logged.
///
/// # Arguments
/// * `resolver` - The shared async resolver for this run.
/// * `hostname` - The fully-qualified hostname to resolve.
///
/// # Returns
/// A `DnsProbeResult` describing the resolution outcome.
pub async fn run_dns_probe(resolver: &TokioAsyncResolver, hostname: &str) -> DnsProbeResult {
    debug!(hostname, "Starting DNS probe.");

    match resolver.lookup_ip(hostname).await {
        Ok(lookup) => {
            let ip_addresses: Vec<_> = lookup.iter().collect();
            debug!(hostname, count = ip_addresses.len(), "Hostname resolved.");
            DnsProbeResult {
                subdomain: hostname.to_string(),
                ip_addresses,
                dns_active: true,
            }
        }
        Err(e) => {
            warn!(hostname, error = %e, "DNS resolution failed.");
            DnsProbeResult::unresolved(hostname)
        }
    }
}
