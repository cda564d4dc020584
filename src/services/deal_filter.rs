//! Discount threshold and price-per-vCPU ranking
//!
//! Pure: malformed numeric fields never raise an error. A record whose
//! discount does not parse is dropped; a record whose price does not parse is
//! ranked at price 0.0 (logged, since it will look like the cheapest offer).

use crate::types::{PriceRecord, RankedDeal};
use tracing::warn;

/// Default minimum discount; a deal must beat it strictly
pub const DEFAULT_MIN_DISCOUNT_PCT: i64 = 50;

#[derive(Debug, Clone, Copy)]
pub struct DealFilter {
    min_discount_pct: i64,
}

impl Default for DealFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DISCOUNT_PCT)
    }
}

impl DealFilter {
    pub fn new(min_discount_pct: i64) -> Self {
        Self { min_discount_pct }
    }

    /// Keep records discounted strictly above the threshold, cheapest per
    /// vCPU first. Equal prices keep their input order.
    pub fn select_deals(&self, records: Vec<PriceRecord>) -> Vec<RankedDeal> {
        let mut deals: Vec<RankedDeal> = records
            .into_iter()
            .filter_map(|record| self.rank(record))
            .collect();

        // sort_by is stable
        deals.sort_by(|a, b| a.price_per_unit.total_cmp(&b.price_per_unit));
        deals
    }

    fn rank(&self, record: PriceRecord) -> Option<RankedDeal> {
        let discount_pct = parse_discount(&record.spot_saving_rate)?;
        if discount_pct <= self.min_discount_pct {
            return None;
        }
        // No divisor to rank by
        if record.vcpus == 0 {
            return None;
        }

        let spot_price = parse_price(&record.spot_price).unwrap_or_else(|| {
            warn!(
                instance_type = %record.instance_type,
                spot_price = %record.spot_price,
                "unparsable spot price, ranking at 0.0"
            );
            0.0
        });
        let price_per_unit = spot_price / f64::from(record.vcpus);

        Some(RankedDeal {
            record,
            discount_pct,
            spot_price,
            price_per_unit,
        })
    }
}

/// "63%" → 63. Exactly one trailing '%' is stripped; anything else that is
/// not an integer yields None.
pub fn parse_discount(rate: &str) -> Option<i64> {
    rate.strip_suffix('%').unwrap_or(rate).parse().ok()
}

/// Finite decimal price, or None
pub fn parse_price(price: &str) -> Option<f64> {
    price.parse::<f64>().ok().filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(instance_type: &str, vcpus: u32, rate: &str, price: &str) -> PriceRecord {
        PriceRecord {
            instance_type: instance_type.to_string(),
            vcpus,
            memory: format!("{} GiB", vcpus * 2),
            spot_saving_rate: rate.to_string(),
            spot_price: price.to_string(),
        }
    }

    fn types(deals: &[RankedDeal]) -> Vec<&str> {
        deals
            .iter()
            .map(|d| d.record.instance_type.as_str())
            .collect()
    }

    // ========== parse_discount tests ==========

    #[test]
    fn test_parse_discount_with_and_without_suffix() {
        assert_eq!(parse_discount("63%"), Some(63));
        assert_eq!(parse_discount("63"), Some(63));
        assert_eq!(parse_discount("+70%"), Some(70));
        assert_eq!(parse_discount("-5%"), Some(-5));
    }

    #[test]
    fn test_parse_discount_rejects_non_integers() {
        assert_eq!(parse_discount("63.5%"), None);
        assert_eq!(parse_discount("63%%"), None);
        assert_eq!(parse_discount(" 63%"), None);
        assert_eq!(parse_discount("%"), None);
        assert_eq!(parse_discount(""), None);
        assert_eq!(parse_discount("n/a"), None);
    }

    // ========== parse_price tests ==========

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("0.0412"), Some(0.0412));
        assert_eq!(parse_price("1"), Some(1.0));
        assert_eq!(parse_price("$1"), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
    }

    // ========== threshold tests ==========

    #[test]
    fn test_threshold_is_strict() {
        let deals = DealFilter::default().select_deals(vec![
            record("at", 4, "50%", "0.10"),
            record("above", 4, "51%", "0.10"),
            record("below", 4, "12%", "0.01"),
        ]);

        assert_eq!(types(&deals), vec!["above"]);
    }

    #[test]
    fn test_unparsable_discount_is_dropped() {
        let deals = DealFilter::default().select_deals(vec![
            record("garbled", 4, "lots", "0.01"),
            record("empty", 4, "", "0.01"),
            record("fine", 4, "80%", "0.40"),
        ]);

        assert_eq!(types(&deals), vec!["fine"]);
        assert_eq!(deals[0].discount_pct, 80);
    }

    #[test]
    fn test_custom_threshold() {
        let deals = DealFilter::new(75).select_deals(vec![
            record("a", 4, "70%", "0.10"),
            record("b", 4, "76%", "0.10"),
        ]);

        assert_eq!(types(&deals), vec!["b"]);
    }

    #[test]
    fn test_zero_vcpus_is_dropped() {
        let deals = DealFilter::default().select_deals(vec![
            record("broken", 0, "90%", "0.10"),
            record("ok", 2, "90%", "0.10"),
        ]);

        assert_eq!(types(&deals), vec!["ok"]);
        assert!(deals.iter().all(|d| d.price_per_unit.is_finite()));
    }

    // ========== ranking tests ==========

    #[test]
    fn test_ranked_by_price_per_vcpu() {
        let deals = DealFilter::default().select_deals(vec![
            record("m5.large", 8, "60%", "0.80"),  // 0.100
            record("c5.xlarge", 4, "70%", "0.30"), // 0.075
            record("r5.2xlarge", 16, "55%", "2.40"), // 0.150
        ]);

        assert_eq!(types(&deals), vec!["c5.xlarge", "m5.large", "r5.2xlarge"]);
        assert!((deals[0].price_per_unit - 0.075).abs() < 1e-12);
        assert!((deals[1].price_per_unit - 0.1).abs() < 1e-12);
        assert!((deals[0].spot_price - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let deals = DealFilter::default().select_deals(vec![
            record("first", 4, "60%", "0.40"),
            record("cheap", 4, "60%", "0.04"),
            record("second", 8, "60%", "0.80"),
            record("third", 2, "60%", "0.20"),
        ]);

        assert_eq!(types(&deals), vec!["cheap", "first", "second", "third"]);
    }

    #[test]
    fn test_output_is_sorted_for_many_records() {
        let records: Vec<PriceRecord> = (0..200u32)
            .map(|i| {
                let vcpus = 4 + (i * 7) % 29;
                let price = format!("{:.4}", ((i * 37) % 101) as f64 / 100.0);
                record(&format!("t{}", i), vcpus, "66%", &price)
            })
            .collect();

        let deals = DealFilter::default().select_deals(records);

        assert_eq!(deals.len(), 200);
        assert!(deals
            .windows(2)
            .all(|w| w[0].price_per_unit <= w[1].price_per_unit));
    }

    #[test]
    fn test_unparsable_price_ranks_as_zero() {
        let deals = DealFilter::default().select_deals(vec![
            record("real", 4, "60%", "0.04"),
            record("mystery", 4, "60%", "call us"),
        ]);

        assert_eq!(types(&deals), vec!["mystery", "real"]);
        assert_eq!(deals[0].spot_price, 0.0);
        assert_eq!(deals[0].price_per_unit, 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(DealFilter::default().select_deals(Vec::new()).is_empty());
    }
}
