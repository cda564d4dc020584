use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::api::{self, AppState};
use crate::config::Config;
use crate::services::LiveAggregator;
use crate::types::{GlobalDeal, RankedDeal, RegionId};

/// Cheapest high-discount spot instances across every region
#[derive(Parser)]
#[command(name = "spotscout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.spotscout/config.toml if present)
    #[arg(long, global = true, env = "SPOTSCOUT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP query API (default)
    Serve {
        /// Listen address, overrides `listen_addr`
        #[arg(long)]
        addr: Option<String>,

        /// Directory served for non-API paths
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// List standard regions
    Regions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show ranked deals for one region
    Deals {
        /// Region code, e.g. us-east-1
        #[arg(long)]
        region: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the best deal of each region, cheapest per vCPU first
    Best {
        /// Number of regions to show, overrides `top_n`
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        limit: Option<u16>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let aggregator = LiveAggregator::from_config(&config)?;

        match self.command {
            None => serve(config, aggregator, None, None).await,
            Some(Commands::Serve { addr, static_dir }) => {
                serve(config, aggregator, addr, static_dir).await
            }
            Some(Commands::Regions { json }) => {
                let regions = aggregator.regions().await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&regions)?);
                } else {
                    print!("{}", format_regions(&regions));
                }
                Ok(())
            }
            Some(Commands::Deals { region, json }) => {
                let deals = aggregator.region_deals(&RegionId::new(region)).await?;
                if json {
                    let records: Vec<_> = deals.iter().map(|d| &d.record).collect();
                    println!("{}", serde_json::to_string_pretty(&records)?);
                } else {
                    print!("{}", format_region_deals(&deals));
                }
                Ok(())
            }
            Some(Commands::Best { limit, json }) => {
                let top_n = limit.map(usize::from).unwrap_or(config.top_n);
                let deals = aggregator.best_global_deals(top_n).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&deals)?);
                } else {
                    print!("{}", format_global_deals(&deals));
                }
                Ok(())
            }
        }
    }
}

async fn serve(
    config: Config,
    aggregator: LiveAggregator,
    addr: Option<String>,
    static_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let addr = addr.unwrap_or(config.listen_addr);
    let static_dir = static_dir.or(config.static_dir);
    let state = AppState {
        aggregator: Arc::new(aggregator),
        top_n: config.top_n,
    };
    api::serve(state, &addr, static_dir.as_deref()).await?;
    Ok(())
}

fn format_regions(regions: &[RegionId]) -> String {
    regions.iter().map(|r| format!("{}\n", r)).collect()
}

fn format_region_deals(deals: &[RankedDeal]) -> String {
    let mut out = format!(
        "{:<18} {:>5} {:>12} {:>8} {:>10} {:>10}\n",
        "INSTANCE", "VCPUS", "MEMORY", "SAVINGS", "PRICE/H", "PER VCPU"
    );
    for deal in deals {
        out.push_str(&format!(
            "{:<18} {:>5} {:>12} {:>7}% {:>10.4} {:>10.4}\n",
            deal.record.instance_type,
            deal.record.vcpus,
            deal.record.memory,
            deal.discount_pct,
            deal.spot_price,
            deal.price_per_unit
        ));
    }
    out
}

fn format_global_deals(deals: &[GlobalDeal]) -> String {
    let mut out = format!(
        "{:<16} {:<18} {:>5} {:>12} {:>10} {:>10}\n",
        "REGION", "INSTANCE", "VCPUS", "MEMORY", "PRICE/H", "PER VCPU"
    );
    for deal in deals {
        out.push_str(&format!(
            "{:<16} {:<18} {:>5} {:>12} {:>10.4} {:>10.4}\n",
            deal.region,
            deal.instance_type,
            deal.vcpus,
            deal.memory,
            deal.spot_price,
            deal.price_per_unit
        ));
    }
    out
}
