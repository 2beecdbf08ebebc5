//! Command-line interface for factd.
//!
//! Thin wrappers around the library operations: publish-and-serve on the
//! authority, inventory and fact gathering on any node, and a one-shot
//! collector fetch for manual reconciliation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::FactsConfig;
use crate::fetch::PullClient;
use crate::{facts, inventory, publisher};

/// factd - collector distribution and fact gathering
#[derive(Parser, Debug)]
#[command(name = "factd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish the canonical collector set and serve it (authority mode)
    Serve,

    /// Print this node's collector inventory as JSON
    Inventory,

    /// Run all installed collectors and print the aggregated facts as JSON
    Facts,

    /// Fetch one collector from an authority into the local collector dir
    Fetch {
        /// Collector name
        name: String,

        /// Authority base URL (e.g. http://authority:8090)
        #[arg(long)]
        from: String,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = FactsConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Serve => {
                let (manifest, server) = publisher::publish(&config).await?;
                print_sorted(&manifest)?;

                tokio::signal::ctrl_c()
                    .await
                    .context("Failed to listen for shutdown signal")?;
                info!("Shutting down pull endpoint");
                server.shutdown().await?;
                Ok(())
            }

            Commands::Inventory => {
                let manifest = inventory::build(&config.collector_dir).await?;
                print_sorted(&manifest)
            }

            Commands::Facts => {
                let facts = facts::gather(&config).await?;
                print_sorted(&facts)
            }

            Commands::Fetch { name, from } => {
                let client = PullClient::new(from);
                let hash = client.fetch(&name, &config.collector_dir).await?;
                println!("{}  {}", hash, name);
                Ok(())
            }
        }
    }
}

/// Print a map as pretty JSON with stable key order.
fn print_sorted<V: serde::Serialize>(
    map: &std::collections::HashMap<String, V>,
) -> Result<()> {
    let sorted: BTreeMap<_, _> = map.iter().collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&sorted).context("Failed to serialize output")?
    );
    Ok(())
}
