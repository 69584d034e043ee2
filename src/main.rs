// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `armsync` - reconcile a YAML manifest of Azure DNS and network resources.
//!
//! ```bash
//! export AZURE_SUBSCRIPTION_ID=... AZURE_RESOURCEGROUP_NAME=... AZURE_LOCATION=westeurope
//! export AZURE_ACCESS_TOKEN=$(az account get-access-token --query accessToken -o tsv)
//! armsync --manifest desired.yaml --dry-run
//! ```

use anyhow::{Context, Result};
use armsync::arm::credential::StaticTokenCredential;
use armsync::cloud::ArmCloud;
use armsync::config::CloudConfig;
use armsync::constants::ENV_ACCESS_TOKEN;
use armsync::manifest::{reconcile_manifest, Manifest};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "armsync")]
#[command(about = "Reconcile Azure DNS zones, record sets and security groups", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the desired-state manifest (YAML)
    #[arg(short, long)]
    manifest: PathBuf,

    /// Plan every resource without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("armsync")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

fn init_logging() {
    // RUST_LOG selects the level (default info), RUST_LOG_FORMAT=json switches to JSON lines
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    init_logging();
    info!(manifest = %cli.manifest.display(), dry_run = cli.dry_run, "Starting armsync");

    let config = CloudConfig::from_env().context("invalid Azure configuration")?;
    debug!(
        subscription_id = %config.subscription_id,
        resource_group = %config.resource_group,
        region = %config.region,
        endpoint = %config.endpoint,
        "Loaded configuration"
    );

    let token = std::env::var(ENV_ACCESS_TOKEN)
        .with_context(|| format!("environment variable {ENV_ACCESS_TOKEN} must be set"))?;
    let cloud = ArmCloud::new(config, Arc::new(StaticTokenCredential::new(token)))
        .context("failed to construct Azure clients")?;

    let mut manifest = Manifest::load(&cli.manifest).await?;
    info!(resources = manifest.len(), "Loaded manifest");

    let report = reconcile_manifest(&cloud, &mut manifest, cli.dry_run).await?;

    for entry in &report.entries {
        let verb = if report.dry_run { "would be" } else { "was" };
        println!("{} {} {verb} {}", entry.kind, entry.name, entry.outcome);
    }
    Ok(())
}
