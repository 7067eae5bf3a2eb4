//! Organelle path resolution binary.
//!
//! Reads a contig graph and similarity-hit tables, resolves the requested
//! organelle and prints the run report as JSON on stdout.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `ORGPATH_GRAPH`: contig graph file (required)
//! - `ORGPATH_HITS`: contig-vs-marker hit table
//! - `ORGPATH_PLASTID_HITS`: contig-vs-plastid-reference hit table
//! - `ORGPATH_JUNCTION_HITS`: contig junction hit table
//! - `ORGPATH_POLICY`: JSON policy file (default: built-in policy)
//! - `ORGPATH_ORGANELLE`: `mt` or `pt`, overrides the policy
//! - `ORGPATH_TAXON`: `plant`, `animal` or `fungi`, overrides the policy
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! ORGPATH_GRAPH=asm/graph.txt ORGPATH_HITS=asm/markers.tsv ORGPATH_TAXON=plant cargo run --bin orgpath_resolve
//! ```

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use organelle_path_kernel::{
    read_graph, GraphStore, Organelle, OrganellePipeline, PipelineHits, ResolvePolicyV1, SimilarityHit,
    Taxon,
};

/// Initialize the tracing subscriber with JSON or pretty format.
///
/// Logs go to stderr so stdout carries only the report.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "orgpath_resolve=info,organelle_path_kernel=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Read an optional hit table named by an environment variable.
fn load_hits(var: &str) -> Result<Vec<SimilarityHit>, Box<dyn std::error::Error>> {
    let Ok(path) = std::env::var(var) else {
        return Ok(Vec::new());
    };
    let text = std::fs::read_to_string(&path)?;
    let hits = SimilarityHit::parse_all(&text)?;
    info!(source = var, path = %path, hits = hits.len(), "Hit table loaded");
    Ok(hits)
}

fn load_policy() -> Result<ResolvePolicyV1, Box<dyn std::error::Error>> {
    let mut policy = match std::env::var("ORGPATH_POLICY") {
        Ok(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        Err(_) => ResolvePolicyV1::default(),
    };
    if let Ok(value) = std::env::var("ORGPATH_ORGANELLE") {
        match Organelle::from_str(&value) {
            Some(organelle) => policy.organelle = organelle,
            None => warn!(value = %value, "Unknown organelle, keeping policy value"),
        }
    }
    if let Ok(value) = std::env::var("ORGPATH_TAXON") {
        match Taxon::from_str(&value) {
            Some(taxon) => policy.taxon = taxon,
            None => warn!(value = %value, "Unknown taxon, keeping policy value"),
        }
    }
    Ok(policy)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let version = env!("CARGO_PKG_VERSION");
    let build_sha = option_env!("BUILD_SHA").unwrap_or("dev");
    info!(version = version, build_sha = build_sha, "Starting organelle path resolution");

    let policy = load_policy()?;
    info!(
        policy_id = policy.policy_id(),
        params_hash = %policy.params_hash(),
        organelle = %policy.organelle,
        taxon = %policy.taxon,
        "Policy loaded"
    );

    let graph_path = std::env::var("ORGPATH_GRAPH").map_err(|_| "ORGPATH_GRAPH is not set")?;
    let load_start = Instant::now();
    let store = read_graph(BufReader::new(File::open(&graph_path)?))?;
    info!(
        path = %graph_path,
        contigs = store.contigs().len(),
        links = store.links().len(),
        latency_ms = load_start.elapsed().as_millis() as u64,
        "Contig graph loaded"
    );

    let hits = PipelineHits {
        markers: load_hits("ORGPATH_HITS")?,
        plastid: load_hits("ORGPATH_PLASTID_HITS")?,
        junctions: load_hits("ORGPATH_JUNCTION_HITS")?,
    };

    let run_start = Instant::now();
    let pipeline = OrganellePipeline::new(Arc::new(store), policy);
    let report = match pipeline.run(&hits) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Resolution aborted");
            return Err(e.into());
        }
    };

    if !report.is_success() {
        warn!("Failed to find a path for the requested organelle");
    }
    info!(
        latency_ms = run_start.elapsed().as_millis() as u64,
        assembled = report.assembled().len(),
        fingerprint = %report.fingerprint,
        "Resolution complete"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
