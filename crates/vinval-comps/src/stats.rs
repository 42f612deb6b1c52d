//! Summary statistics over a set of comparables.

use serde::Serialize;
use vinval_core::{ComparableVehicle, DealerType};

/// Aggregate numbers over a comparable set.
///
/// An empty set yields all zeros. Treat `total == 0` as "no data" rather
/// than doing further arithmetic on the zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableStats {
    pub total: usize,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_mileage: f64,
    pub min_mileage: u64,
    pub max_mileage: u64,
    pub franchise_count: usize,
    pub independent_count: usize,
}

#[must_use]
pub fn compute_stats(records: &[ComparableVehicle]) -> ComparableStats {
    let mut stats = ComparableStats {
        total: records.len(),
        ..ComparableStats::default()
    };

    let prices: Vec<f64> = records
        .iter()
        .map(|v| v.price)
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();
    if !prices.is_empty() {
        stats.avg_price = mean(&prices);
        stats.min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
        stats.max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    }

    let mileages: Vec<u64> = records.iter().map(|v| v.mileage).collect();
    if !mileages.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let as_f64: Vec<f64> = mileages.iter().map(|m| *m as f64).collect();
        stats.avg_mileage = mean(&as_f64);
        stats.min_mileage = mileages.iter().copied().min().unwrap_or_default();
        stats.max_mileage = mileages.iter().copied().max().unwrap_or_default();
    }

    for vehicle in records {
        match vehicle.dealer_type {
            Some(DealerType::Franchise) => stats.franchise_count += 1,
            Some(DealerType::Independent) => stats.independent_count += 1,
            None => {}
        }
    }

    stats
}

/// Arithmetic mean; `0.0` for an empty slice.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    values.iter().sum::<f64>() / n
}
