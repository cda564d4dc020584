//! Spot pricing client
//!
//! One lookup per region against the pricing provider. The provider does the
//! EBS and vCPU-range filtering server-side; nothing is cached.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use super::http::fetch_json;
use super::PricingSource;
use crate::types::{PriceRecord, RegionId, Result};

/// Provider response document. `Prices` may be missing or `null`.
#[derive(Debug, Deserialize)]
pub struct PricingResponse {
    #[serde(rename = "Prices", default)]
    pub prices: Option<Vec<PriceRecord>>,
}

pub struct PricingClient {
    http: reqwest::Client,
    url: String,
    min_vcpus: u32,
    max_vcpus: u32,
}

impl PricingClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>, min_vcpus: u32, max_vcpus: u32) -> Self {
        Self {
            http,
            url: url.into(),
            min_vcpus,
            max_vcpus,
        }
    }

    /// Provider filter expression: EBS-backed, vCPUs within the inclusive range
    fn filter(&self) -> String {
        format!("ebs,cpu>={},cpu<={}", self.min_vcpus, self.max_vcpus)
    }
}

#[async_trait]
impl PricingSource for PricingClient {
    async fn fetch_pricing(&self, region: &RegionId) -> Result<Vec<PriceRecord>> {
        let filter = self.filter();
        let request = self
            .http
            .get(&self.url)
            .query(&[("region", region.as_str()), ("filter", filter.as_str())])
            .header(ACCEPT, "json");

        let response: PricingResponse = fetch_json(request).await?;
        let records = response.prices.unwrap_or_default();

        debug!(%region, records = records.len(), "fetched spot prices");
        Ok(records)
    }
}
