//! Strategy-driven selection of comparable listings.
//!
//! Every strategy is a pre-filter plus a sort key. Sorting uses the stable
//! `sort_by`, so records with equal keys keep their input order.
//!
//! When a strategy is missing its required parameter the selector degrades:
//! it returns the first `limit` records of the input, unfiltered and
//! unsorted, and logs a warning. Callers rely on always getting something
//! to render, so this must not become an error.

use std::cmp::Ordering;

use serde_json::json;
use tracing::Level;
use vinval_core::{ComparableVehicle, Selection, StrategyKind};

use crate::log::{EventLog, TracingLog};

/// Selects at most `selection.limit` records, logging through `tracing`.
#[must_use]
pub fn select(records: &[ComparableVehicle], selection: &Selection) -> Vec<ComparableVehicle> {
    select_with(records, selection, &TracingLog)
}

/// Same as [`select`], reporting degraded selections to the given [`EventLog`].
#[must_use]
pub fn select_with(
    records: &[ComparableVehicle],
    selection: &Selection,
    log: &dyn EventLog,
) -> Vec<ComparableVehicle> {
    let limit = selection.effective_limit();

    if let Some(param) = selection.missing_required_param() {
        log.log(
            Level::WARN,
            "selection strategy missing required parameter; returning unranked listings",
            &json!({
                "strategy": selection.strategy.as_str(),
                "missing": param,
                "limit": limit,
                "available": records.len(),
            }),
        );
        return records.iter().take(limit).cloned().collect();
    }

    let params = &selection.params;
    let mut ranked: Vec<&ComparableVehicle> =
        records.iter().filter(|v| keep(v, selection)).collect();

    match selection.strategy {
        StrategyKind::TopPrice | StrategyKind::DealerType | StrategyKind::PriceRange => {
            ranked.sort_by(|a, b| b.price.total_cmp(&a.price));
        }
        StrategyKind::ClosestPrice => {
            let target = params.target_price.unwrap_or_default();
            ranked.sort_by(|a, b| (a.price - target).abs().total_cmp(&(b.price - target).abs()));
        }
        StrategyKind::ClosestMileage => {
            let target = params.target_mileage.unwrap_or_default();
            ranked.sort_by_key(|v| v.mileage.abs_diff(target));
        }
        StrategyKind::LowestMileage | StrategyKind::MileageRange => {
            ranked.sort_by_key(|v| v.mileage);
        }
        StrategyKind::ClosestDistance => {
            ranked.sort_by(|a, b| cmp_present(a.distance_miles(), b.distance_miles()));
        }
        StrategyKind::NewestListings => {
            ranked.sort_by(|a, b| b.listing_date.cmp(&a.listing_date));
        }
        StrategyKind::FastestSelling => {
            ranked.sort_by_key(|v| v.days_on_market);
        }
    }

    ranked.into_iter().take(limit).cloned().collect()
}

/// Pre-filter for the selection's strategy.
fn keep(vehicle: &ComparableVehicle, selection: &Selection) -> bool {
    let params = &selection.params;
    match selection.strategy {
        StrategyKind::ClosestDistance => vehicle.distance_miles().is_some(),
        StrategyKind::NewestListings => vehicle.listing_date.is_some(),
        StrategyKind::FastestSelling => vehicle.days_on_market.is_some(),
        StrategyKind::DealerType => vehicle.dealer_type == params.dealer_type,
        StrategyKind::PriceRange => {
            params.min_price.is_none_or(|min| vehicle.price >= min)
                && params.max_price.is_none_or(|max| vehicle.price <= max)
        }
        StrategyKind::MileageRange => {
            params.min_miles.is_none_or(|min| vehicle.mileage >= min)
                && params.max_miles.is_none_or(|max| vehicle.mileage <= max)
        }
        StrategyKind::TopPrice
        | StrategyKind::ClosestPrice
        | StrategyKind::ClosestMileage
        | StrategyKind::LowestMileage => true,
    }
}

/// Orders two values that the pre-filter guarantees are present.
fn cmp_present(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        _ => Ordering::Equal,
    }
}
