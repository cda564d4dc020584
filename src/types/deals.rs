//! Pricing and deal types

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Cloud region code (e.g. "us-east-1")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RegionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// One instance-type offer as returned by the pricing provider.
///
/// Field names follow the provider's wire format and are kept as-is when the
/// record is served back out. Discount and price stay strings; they are only
/// parsed when a record is ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "InstanceType", default, deserialize_with = "null_as_default")]
    pub instance_type: String,
    #[serde(rename = "VCPUS", default, deserialize_with = "null_as_default")]
    pub vcpus: u32,
    #[serde(rename = "Memory", default, deserialize_with = "null_as_default")]
    pub memory: String,
    /// Percentage string, e.g. "63%"
    #[serde(rename = "SpotSavingRate", default, deserialize_with = "null_as_default")]
    pub spot_saving_rate: String,
    /// Decimal string in currency per hour, e.g. "0.0412"
    #[serde(rename = "SpotPrice", default, deserialize_with = "null_as_default")]
    pub spot_price: String,
}

/// Read a JSON `null` as the field's default, so one null field leaves the
/// decision to the record-level rules instead of failing the whole document
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A record that passed the discount threshold, with its ranking metric
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDeal {
    pub record: PriceRecord,
    pub discount_pct: i64,
    pub spot_price: f64,
    /// `spot_price / vcpus`; always finite
    pub price_per_unit: f64,
}

/// The cheapest-per-vCPU deal of one region
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalDeal {
    pub instance_type: String,
    #[serde(rename = "cpus")]
    pub vcpus: u32,
    pub memory: String,
    #[serde(rename = "price")]
    pub spot_price: f64,
    #[serde(rename = "pricePerVCPU")]
    pub price_per_unit: f64,
    pub region: RegionId,
}

impl GlobalDeal {
    pub fn from_ranked(deal: RankedDeal, region: RegionId) -> Self {
        Self {
            instance_type: deal.record.instance_type,
            vcpus: deal.record.vcpus,
            memory: deal.record.memory,
            spot_price: deal.spot_price,
            price_per_unit: deal.price_per_unit,
            region,
        }
    }
}
