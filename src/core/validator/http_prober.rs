// src/core/validator/http_prober.rs

use tracing::{debug, info};

use crate::core::models::HttpProbeResult;
use reqwest::Client;
use reqwest::header;

/// What a single successful GET attempt over one scheme yielded.
#[derive(Debug, Clone)]
pub(crate) struct HttpAttempt {
    pub status: u16,
    pub final_url: String,
    pub server: Option<String>,
}

/// Probes one hostname over both plain HTTP and HTTPS.
///
/// The two GET requests run concurrently and are evaluated independently: a
/// connect error, TLS error, or timeout on one scheme never suppresses the
/// other scheme's outcome. Any response at all, including 4xx/5xx, marks the
/// host as active. This function never fails; failed attempts simply leave
/// their fields unset.
///
/// # Arguments
/// * `client` - The shared HTTP client for this run (carries the timeout and
///   redirect policy).
/// * `hostname` - The hostname to probe, without a scheme.
///
/// # Returns
/// An `HttpProbeResult` merging both attempts, with HTTPS taking precedence
/// for the shared `redirects_to`/`server` fields when both respond.
pub async fn run_http_probe(client: &Client, hostname: &str) -> HttpProbeResult {
    debug!(hostname, "Starting HTTP(S) probe.");

    let (http, https) = tokio::join!(
        attempt_request(client, "http", hostname),
        attempt_request(client, "https", hostname)
    );

    let result = combine_attempts(hostname, http, https);
    if result.active {
        info!(
            hostname,
            http_status = ?result.http_status,
            https_status = ?result.https_status,
            "Host responded."
        );
    }
    result
}

/// Issues one GET to `<scheme>://<hostname>`, following redirects to
/// completion. Returns `None` on any transport or protocol failure.
async fn attempt_request(client: &Client, scheme: &str, hostname: &str) -> Option<HttpAttempt> {
    let url = format!("{scheme}://{hostname}");
    match client.get(&url).send().await {
        Ok(response) => {
            let server = response
                .headers()
                .get(header::SERVER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Some(HttpAttempt {
                status: response.status().as_u16(),
                final_url: response.url().to_string(),
                server,
            })
        }
        Err(e) => {
            debug!(url, error = %e, "HTTP attempt failed.");
            None
        }
    }
}

/// Folds the two per-scheme attempts into one result.
///
/// Precedence is deterministic: the HTTP attempt is applied first, then a
/// successful HTTPS attempt overwrites `redirects_to` and `server` wholesale.
pub(crate) fn combine_attempts(
    hostname: &str,
    http: Option<HttpAttempt>,
    https: Option<HttpAttempt>,
) -> HttpProbeResult {
    let mut result = HttpProbeResult::unreachable(hostname);

    if let Some(attempt) = http {
        result.http_status = Some(attempt.status);
        result.active = true;
        result.redirects_to = Some(attempt.final_url);
        result.server = attempt.server;
    }

    if let Some(attempt) = https {
        result.https_status = Some(attempt.status);
        result.active = true;
        result.redirects_to = Some(attempt.final_url);
        result.server = attempt.server;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(status: u16, url: &str, server: Option<&str>) -> HttpAttempt {
        HttpAttempt {
            status,
            final_url: url.to_string(),
            server: server.map(str::to_string),
        }
    }

    #[test]
    fn both_schemes_failing_leaves_defaults() {
        let result = combine_attempts("dead.example.com", None, None);
        assert!(!result.active);
        assert_eq!(result.http_status, None);
        assert_eq!(result.https_status, None);
        assert_eq!(result.redirects_to, None);
        assert_eq!(result.server, None);
    }

    #[test]
    fn http_failure_does_not_suppress_https_success() {
        let https = attempt(200, "https://www.example.com/", Some("nginx"));
        let result = combine_attempts("www.example.com", None, Some(https));
        assert!(result.active);
        assert_eq!(result.http_status, None);
        assert_eq!(result.https_status, Some(200));
        assert_eq!(result.server.as_deref(), Some("nginx"));
    }

    #[test]
    fn https_failure_does_not_suppress_http_success() {
        let http = attempt(301, "http://example.com/", Some("Apache"));
        let result = combine_attempts("example.com", Some(http), None);
        assert!(result.active);
        assert_eq!(result.http_status, Some(301));
        assert_eq!(result.https_status, None);
        assert_eq!(result.redirects_to.as_deref(), Some("http://example.com/"));
    }

    #[test]
    fn https_takes_precedence_when_both_succeed() {
        let http = attempt(301, "http://www.example.com/", Some("Apache"));
        let https = attempt(200, "https://www.example.com/", Some("nginx"));
        let result = combine_attempts("www.example.com", Some(http), Some(https));
        assert_eq!(result.http_status, Some(301));
        assert_eq!(result.https_status, Some(200));
        assert_eq!(
            result.redirects_to.as_deref(),
            Some("https://www.example.com/")
        );
        assert_eq!(result.server.as_deref(), Some("nginx"));
    }

    #[test]
    fn https_without_server_header_still_overrides() {
        let http = attempt(200, "http://example.com/", Some("Apache"));
        let https = attempt(200, "https://example.com/", None);
        let result = combine_attempts("example.com", Some(http), Some(https));
        // Whole-attempt precedence: the HTTPS attempt's missing header wins
        // over the HTTP one, keeping the outcome order-independent.
        assert_eq!(result.server, None);
    }
}
