// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Plan CLI
//!
//! Compiles a topology manifest and prints the provisioning plan as JSON.
//!
//! Run with: cargo run --bin topology-plan -- topology.json [--teardown]
//!
//! - The manifest path is the first argument, or `TOPOLOGY_MANIFEST`
//! - `TOPOLOGY_REGION` and `TOPOLOGY_AVAILABILITY_ZONES` select the zone
//!   inventory (see `CompilerSettings::from_env`)
//! - `--teardown` prints the delete plan instead
//!
//! Logs go to stderr; stdout carries only the plan.

use anyhow::{Context, Result};
use cim_topology::{
    CompilerSettings, LoggingBackend, Operation, ProvisioningBackend, TopologyBuilder,
    TopologyManifest,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

/// Command line options
#[derive(Parser, Debug, Clone)]
#[command(name = "topology-plan")]
#[command(about = "Compile a topology manifest into a provisioning plan")]
#[command(version)]
struct CliOptions {
    /// Path to the topology manifest (JSON)
    #[arg(env = "TOPOLOGY_MANIFEST", value_name = "FILE")]
    manifest: PathBuf,

    /// Print the delete plan instead of the creation plan
    #[arg(long)]
    teardown: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let options = CliOptions::parse();
    let settings = CompilerSettings::from_env();

    info!("🚀 Compiling topology {}", options.manifest.display());
    info!("  - Region: {}", settings.inventory.region);
    info!("  - Zones: {}", settings.inventory.zones.join(", "));

    let manifest = TopologyManifest::from_path(&options.manifest)
        .with_context(|| format!("Failed to load manifest {}", options.manifest.display()))?;

    let mut builder = TopologyBuilder::from_manifest(&manifest, settings)
        .context("Failed to build topology")?;
    for event in builder.take_uncommitted_events() {
        debug!("📝 {} ({})", event.event_type(), event.event_id());
    }

    let plan = builder.emit().context("Failed to emit plan")?;

    let operations: Vec<Operation> = if options.teardown {
        plan.teardown().collect()
    } else {
        plan.operations().collect()
    };

    // Log what would be handed over without provisioning anything
    let mut backend = LoggingBackend::new();
    backend
        .apply(operations.clone())
        .await
        .context("Failed to hand plan to backend")?;
    debug!("Backend accepted {} operations", backend.operations().len());

    println!("{}", serde_json::to_string_pretty(&operations)?);
    info!("✅ Planned {} operations", operations.len());

    Ok(())
}
