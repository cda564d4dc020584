//! Upstream clients and the deal pipeline

pub mod aggregator;
pub mod deal_filter;
pub mod http;
pub mod pricing;
pub mod region_catalog;

pub use aggregator::GlobalAggregator;
pub use deal_filter::DealFilter;
pub use pricing::PricingClient;
pub use region_catalog::RegionCatalogClient;

use async_trait::async_trait;

use crate::config::Config;
use crate::types::{PriceRecord, RegionId, Result};

/// Source of region identifiers
#[async_trait]
pub trait RegionSource: Send + Sync {
    /// Region codes, ascending
    async fn fetch_regions(&self) -> Result<Vec<RegionId>>;
}

/// Source of per-region spot offers
#[async_trait]
pub trait PricingSource: Send + Sync {
    /// All offers the provider returns for `region`; empty is not an error
    async fn fetch_pricing(&self, region: &RegionId) -> Result<Vec<PriceRecord>>;
}

/// Aggregator wired to the real upstream services
pub type LiveAggregator = GlobalAggregator<RegionCatalogClient, PricingClient>;

impl LiveAggregator {
    /// Build the clients from config, sharing one HTTP client between them
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = http::build_client(config.request_timeout())?;
        let regions = RegionCatalogClient::new(
            http.clone(),
            config.catalog_url.clone(),
            config.region_type.clone(),
        );
        let pricing = PricingClient::new(
            http,
            config.pricing_url.clone(),
            config.min_vcpus,
            config.max_vcpus,
        );
        Ok(GlobalAggregator::new(
            regions,
            pricing,
            DealFilter::new(config.min_discount_pct),
        ))
    }
}
