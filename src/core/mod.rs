// src/core/mod.rs

// Root of the `core` module. Exposes the data model, the hostname discovery
// stage, the concurrent validation pipeline, and the report assembler.

/// Contains all data structures shared across the pipeline, such as
/// `DnsProbeResult`, `SubdomainRecord`, and the final `ReconReport`.
pub mod models;

/// Supplies the candidate hostnames for a run, either from an external
/// passive-enumeration tool or from a static fallback list.
pub mod discovery;

/// Houses the concurrent validation pipeline: the DNS and HTTP(S) probers
/// and the coordinator that fans them out under a bounded worker budget.
pub mod validator;

/// Aggregates validated records into a run report and renders it to the
/// JSON and CSV output formats.
pub mod report;
