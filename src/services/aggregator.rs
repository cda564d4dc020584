//! Global aggregator: one pricing lookup per region, run concurrently
//!
//! ```text
//! catalog ──► [r0, r1, .. rn] ──► spawn per region: pricing ─► filter ─► head
//!                                              │
//!                          mpsc (capacity n) ◄─┘   (read after every task joined)
//!                                              │
//!                         order by catalog slot, stable sort by $/vCPU, top N
//! ```
//!
//! A region that fails is logged and contributes nothing. Only a catalog
//! failure or an empty merged result fails the whole aggregation.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{DealFilter, PricingSource, RegionSource};
use crate::types::{GlobalDeal, RankedDeal, RegionId, Result, SpotScoutError};

pub struct GlobalAggregator<R, P> {
    regions: R,
    pricing: Arc<P>,
    filter: DealFilter,
}

impl<R, P> GlobalAggregator<R, P>
where
    R: RegionSource,
    P: PricingSource + 'static,
{
    pub fn new(regions: R, pricing: P, filter: DealFilter) -> Self {
        Self {
            regions,
            pricing: Arc::new(pricing),
            filter,
        }
    }

    /// Standard regions from the catalog, ascending
    pub async fn regions(&self) -> Result<Vec<RegionId>> {
        self.regions.fetch_regions().await
    }

    /// Ranked deals of a single region
    pub async fn region_deals(&self, region: &RegionId) -> Result<Vec<RankedDeal>> {
        region_deals(self.pricing.as_ref(), &self.filter, region).await
    }

    /// The `top_n` cheapest-per-vCPU deals across all regions, at most one
    /// per region.
    pub async fn best_global_deals(&self, top_n: usize) -> Result<Vec<GlobalDeal>> {
        let regions = self.regions.fetch_regions().await.map_err(|e| {
            warn!(error = %e, "region catalog fetch failed");
            SpotScoutError::CatalogUnavailable(Box::new(e))
        })?;

        let region_count = regions.len();
        let deals = self.fan_out(regions).await;
        info!(
            regions = region_count,
            with_deals = deals.len(),
            "collected per-region best deals"
        );

        rank_global(deals, top_n)
    }

    /// Run every region's pipeline concurrently and wait for all of them.
    ///
    /// Returned deals are in catalog order, whatever order the tasks
    /// finished in.
    async fn fan_out(&self, regions: Vec<RegionId>) -> Vec<GlobalDeal> {
        // Capacity covers one send per region, so no task ever waits on it
        let (tx, mut rx) = mpsc::channel::<(usize, GlobalDeal)>(regions.len().max(1));
        let mut units = JoinSet::new();

        for (slot, region) in regions.into_iter().enumerate() {
            let tx = tx.clone();
            let pricing = Arc::clone(&self.pricing);
            let filter = self.filter;

            units.spawn(async move {
                let result = region_deals(pricing.as_ref(), &filter, &region).await;
                match result {
                    Ok(deals) => match deals.into_iter().next() {
                        Some(best) => {
                            let deal = GlobalDeal::from_ranked(best, region);
                            // Receiver outlives every task
                            let _ = tx.send((slot, deal)).await;
                        }
                        None => debug!(%region, "no qualifying deals"),
                    },
                    Err(e) => warn!(%region, error = %e, "skipping region"),
                }
            });
        }
        drop(tx);

        while let Some(joined) = units.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "region task did not complete");
            }
        }

        let mut collected = Vec::new();
        while let Some(entry) = rx.recv().await {
            collected.push(entry);
        }
        collected.sort_by_key(|(slot, _)| *slot);
        collected.into_iter().map(|(_, deal)| deal).collect()
    }
}

async fn region_deals<P>(pricing: &P, filter: &DealFilter, region: &RegionId) -> Result<Vec<RankedDeal>>
where
    P: PricingSource + ?Sized,
{
    let records = pricing.fetch_pricing(region).await?;
    Ok(filter.select_deals(records))
}

/// Stable sort by price per vCPU and truncate; an empty input is an error
fn rank_global(mut deals: Vec<GlobalDeal>, top_n: usize) -> Result<Vec<GlobalDeal>> {
    if deals.is_empty() {
        return Err(SpotScoutError::NoResultsFound);
    }
    deals.sort_by(|a, b| a.price_per_unit.total_cmp(&b.price_per_unit));
    deals.truncate(top_n);
    Ok(deals)
}
