// src/core/validator/mod.rs

// Public interface of the concurrent validation pipeline. The two prober
// sub-modules each handle one probe kind; this module owns the fan-out,
// the join barrier, and the per-hostname merge.
pub mod dns_prober;
pub mod http_prober;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::core::models::{DnsProbeResult, HttpProbeResult, SubdomainRecord};
use self::dns_prober::run_dns_probe;
use self::http_prober::run_http_probe;

/// A completed probe task of either kind, tagged so the collector can route
/// it into the right lookup table.
enum ProbeOutcome {
    Dns(DnsProbeResult),
    Http(HttpProbeResult),
}

/// Validates every discovered hostname over DNS and HTTP(S) concurrently.
///
/// One DNS task and one HTTP(S) task are submitted per hostname into a pool
/// bounded by `max_concurrency` permits shared across both probe kinds.
/// Individual probe failures are absorbed by the probers themselves; a task
/// that dies anyway (panic, runtime shutdown) is logged and its hostname is
/// emitted with default fields rather than dropped. The returned records are
/// in the same order as the input hostnames, regardless of completion order.
///
/// The only fatal path is constructing the shared HTTP client, which means
/// the pipeline itself could not start.
///
/// # Arguments
/// * `hostnames` - The candidate hostnames, in report order.
/// * `max_concurrency` - Upper bound on simultaneously in-flight probes.
/// * `request_timeout` - Per-request timeout applied to every HTTP attempt.
///
/// # Returns
/// One merged `SubdomainRecord` per input hostname, in input order.
pub async fn run_validation(
    hostnames: &[String],
    max_concurrency: usize,
    request_timeout: Duration,
) -> Result<Vec<SubdomainRecord>> {
    info!(
        hostnames = hostnames.len(),
        workers = max_concurrency,
        "Starting validation pipeline."
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!("recon/", env!("CARGO_PKG_VERSION")))
        .timeout(request_timeout)
        .build()
        .wrap_err("failed to build HTTP client for validation")?;
    let resolver = dns_prober::build_resolver();

    let (dns_results, http_results) = run_probes(
        hostnames,
        max_concurrency,
        move |hostname| {
            let resolver = resolver.clone();
            async move { run_dns_probe(&resolver, &hostname).await }
        },
        move |hostname| {
            let client = client.clone();
            async move { run_http_probe(&client, &hostname).await }
        },
    )
    .await;

    let records: Vec<SubdomainRecord> = hostnames
        .iter()
        .map(|hostname| {
            merge_record(
                hostname,
                dns_results.get(hostname.as_str()).cloned(),
                http_results.get(hostname.as_str()).cloned(),
            )
        })
        .collect();

    info!(
        records = records.len(),
        active = records.iter().filter(|r| r.is_active()).count(),
        "Validation pipeline finished."
    );
    Ok(records)
}

/// Fans both probe kinds out over the hostname set and collects completions.
///
/// Every task first acquires one permit of a semaphore shared across both
/// kinds, so at most `max_concurrency` probes are in flight at once. The
/// `JoinSet` drain is the join barrier: completions are consumed in arrival
/// order and keyed by hostname into two per-kind tables. Each hostname/kind
/// pair is written by exactly one task, so the tables need no locking of
/// their own. A task that fails to join contributes no entry and never
/// cancels its siblings.
async fn run_probes<DFut, HFut>(
    hostnames: &[String],
    max_concurrency: usize,
    dns_fn: impl Fn(String) -> DFut,
    http_fn: impl Fn(String) -> HFut,
) -> (
    HashMap<String, DnsProbeResult>,
    HashMap<String, HttpProbeResult>,
)
where
    DFut: Future<Output = DnsProbeResult> + Send + 'static,
    HFut: Future<Output = HttpProbeResult> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrency));
    let mut tasks: JoinSet<Option<ProbeOutcome>> = JoinSet::new();

    for hostname in hostnames {
        let dns_probe = dns_fn(hostname.clone());
        let permits = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok()?;
            Some(ProbeOutcome::Dns(dns_probe.await))
        });

        let http_probe = http_fn(hostname.clone());
        let permits = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok()?;
            Some(ProbeOutcome::Http(http_probe.await))
        });
    }

    let mut dns_results = HashMap::new();
    let mut http_results = HashMap::new();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(ProbeOutcome::Dns(result))) => {
                dns_results.insert(result.subdomain.clone(), result);
            }
            Ok(Some(ProbeOutcome::Http(result))) => {
                http_results.insert(result.subdomain.clone(), result);
            }
            // The semaphore was closed under the task; only possible if the
            // pool is being torn down.
            Ok(None) => warn!("Probe task skipped: worker pool shut down."),
            Err(e) => error!(error = %e, "Probe task failed to complete."),
        }
    }

    (dns_results, http_results)
}

/// Combines the optional per-kind outcomes for one hostname into a single
/// record. Absent outcomes leave the corresponding fields at their defaults;
/// the hostname itself is always carried through.
fn merge_record(
    hostname: &str,
    dns: Option<DnsProbeResult>,
    http: Option<HttpProbeResult>,
) -> SubdomainRecord {
    let dns = dns.unwrap_or_else(|| DnsProbeResult::unresolved(hostname));
    let http = http.unwrap_or_else(|| HttpProbeResult::unreachable(hostname));

    SubdomainRecord {
        subdomain: hostname.to_string(),
        http_status: http.http_status,
        https_status: http.https_status,
        active: http.active,
        redirects_to: http.redirects_to,
        server: http.server,
        ip_addresses: dns.ip_addresses,
        dns_active: dns.dns_active,
    }
}
