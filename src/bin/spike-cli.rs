//! # Spike CLI Tool
//!
//! Command-line interface for probing what a spike control plane serves,
//! built on the versioned clientset.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use spike_clientset::logging::init_structured_logging_with;
use spike_clientset::{Clientset, DiscoveryGetter, DiscoveryInterface, RestConfig};

#[derive(Parser, Debug)]
#[command(name = "spike-cli")]
#[command(about = "Inspect API groups and resources served by a spike control plane")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path (default: ./spike-client.toml or ~/.spike/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server URL or host:port, overriding the loaded configuration
    #[arg(long, env = "SPIKE_HOST")]
    host: Option<String>,

    /// Maximum sustained queries per second
    #[arg(long)]
    qps: Option<f32>,

    /// Maximum burst for throttle
    #[arg(long)]
    burst: Option<u32>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List API groups and versions the server supports
    Groups,
    /// List resources served under a group version (e.g. spike.local/v1alpha1)
    Resources {
        #[arg(value_name = "GROUP_VERSION")]
        group_version: String,
    },
    /// Show server build information
    Version,
}

impl Cli {
    fn rest_config(&self) -> Result<RestConfig> {
        let mut config = match &self.config {
            Some(path) => RestConfig::load_from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => RestConfig::load().context("loading client config")?,
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(qps) = self.qps {
            config.qps = qps;
        }
        if let Some(burst) = self.burst {
            config.burst = burst;
        }
        Ok(config)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = match cli.verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    };
    init_structured_logging_with(directive);

    let config = cli.rest_config()?;
    info!(host = %config.host, "Connecting to spike control plane");

    let clientset = Clientset::new_for_config(&config).context("building clientset")?;
    let discovery = clientset
        .discovery()
        .context("clientset has no discovery client")?;

    match cli.command {
        Commands::Groups => print_json(&discovery.server_groups().await?),
        Commands::Resources { group_version } => print_json(
            &discovery
                .server_resources_for_group_version(&group_version)
                .await?,
        ),
        Commands::Version => print_json(&discovery.server_version().await?),
    }
}
