//! Region catalog client
//!
//! Reads the provider's public location catalog and keeps only standard
//! regions (the descriptor `type` matches the configured tag).

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use super::http::fetch_json;
use super::RegionSource;
use crate::types::{null_as_default, RegionId, Result};

/// One catalog entry. Only `code` and `type` are used.
#[derive(Debug, Deserialize, Default)]
#[allow(dead_code)] // label/name/continent are part of the document, not of ranking
struct RegionDescriptor {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    code: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    continent: String,
}

pub struct RegionCatalogClient {
    http: reqwest::Client,
    url: String,
    region_type: String,
}

impl RegionCatalogClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>, region_type: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            region_type: region_type.into(),
        }
    }

    /// Region codes of every descriptor tagged as a standard region, ascending
    fn standard_regions(
        catalog: HashMap<String, RegionDescriptor>,
        region_type: &str,
    ) -> Vec<RegionId> {
        let mut regions: Vec<RegionId> = catalog
            .into_values()
            .filter(|d| d.kind == region_type)
            .map(|d| RegionId::new(d.code))
            .collect();
        regions.sort();
        regions
    }
}

#[async_trait]
impl RegionSource for RegionCatalogClient {
    async fn fetch_regions(&self) -> Result<Vec<RegionId>> {
        let catalog: HashMap<String, RegionDescriptor> =
            fetch_json(self.http.get(&self.url)).await?;
        let total = catalog.len();

        let regions = Self::standard_regions(catalog, &self.region_type);
        debug!(total, kept = regions.len(), "parsed region catalog");
        Ok(regions)
    }
}
