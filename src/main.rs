//! profile-geofix - Geo-fix stage for profile records
//!
//! This is the composition root that wires together all the components.
//! Profiles are read as JSON lines from stdin and written to stdout; logs
//! go to stderr.

use profile_geofix::{
    load_config, GeocodeResolver, GoogleMapsGeocoder, JsonLinesPipeline, ProfileGeoFixer,
    ResolverConfig,
};
use std::sync::Arc;
use tokio::io::{BufReader, BufWriter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "starting profile-geofix keys={} sentinel={} timeout={:?} concurrency={}",
        cfg.api_keys.len(),
        cfg.sentinel_on_not_found,
        cfg.call_timeout,
        cfg.concurrency
    );

    // ===== COMPOSITION ROOT =====

    // 1. Outbound adapter (Google Maps)
    let geocoder = Arc::new(GoogleMapsGeocoder::new(&cfg.base_url, cfg.call_timeout)?);

    // 2. Application services
    let resolver = GeocodeResolver::new(
        cfg.api_keys.clone(),
        geocoder,
        ResolverConfig::new(cfg.sentinel_on_not_found).call_timeout(cfg.call_timeout),
    )?;
    let fixer = ProfileGeoFixer::new(Arc::new(resolver));

    // 3. Inbound adapter (stdin -> stdout)
    let pipeline = JsonLinesPipeline::new(fixer, cfg.concurrency);
    let stats = pipeline
        .run(
            BufReader::new(tokio::io::stdin()),
            BufWriter::new(tokio::io::stdout()),
        )
        .await?;

    tracing::info!(
        "done: {} forwarded, {} resolved ({} unresolvable), {} invalid",
        stats.forwarded,
        stats.resolved,
        stats.unresolvable,
        stats.invalid
    );

    Ok(())
}
