//! Report assembly: one valuation summary, overall stats, and a ranked
//! comparable list per configured section.

use serde::Serialize;
use vinval_core::{ComparableVehicle, ReportSection, StrategyKind, ValuationSummary};

use crate::log::{EventLog, TracingLog};
use crate::select::select_with;
use crate::stats::{compute_stats, ComparableStats};
use crate::valuation::{derive_summary, PricePrediction};

/// The vehicle being valued.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSectionResult {
    pub title: String,
    pub strategy: StrategyKind,
    pub listings: Vec<ComparableVehicle>,
    pub stats: ComparableStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationReport {
    pub subject: ReportSubject,
    /// `None` when the provider returned no usable prediction.
    pub summary: Option<ValuationSummary>,
    pub stats: ComparableStats,
    pub sections: Vec<ReportSectionResult>,
}

/// Builds a report, logging degraded sections through `tracing`.
#[must_use]
pub fn build_report(
    subject: &ReportSubject,
    comparables: &[ComparableVehicle],
    prediction: Option<&PricePrediction>,
    sections: &[ReportSection],
) -> ValuationReport {
    build_report_with(subject, comparables, prediction, sections, &TracingLog)
}

/// Same as [`build_report`] with an explicit [`EventLog`].
///
/// Sections that leave `targetPrice` or `targetMileage` unset are aimed at
/// the subject: the predicted price and the subject's mileage. When neither
/// is known the selector's degraded fallback applies.
#[must_use]
pub fn build_report_with(
    subject: &ReportSubject,
    comparables: &[ComparableVehicle],
    prediction: Option<&PricePrediction>,
    sections: &[ReportSection],
    log: &dyn EventLog,
) -> ValuationReport {
    let stats = compute_stats(comparables);
    let data_points = u64::try_from(stats.total).unwrap_or(u64::MAX);
    let summary = prediction.map(|p| derive_summary(p, data_points));

    let sections = sections
        .iter()
        .map(|section| {
            let mut selection = section.selection();
            if selection.params.target_price.is_none() {
                selection.params.target_price = prediction.map(|p| p.predicted_price);
            }
            if selection.params.target_mileage.is_none() {
                selection.params.target_mileage = subject.mileage;
            }

            let listings = select_with(comparables, &selection, log);
            ReportSectionResult {
                title: section.title.clone(),
                strategy: section.strategy,
                stats: compute_stats(&listings),
                listings,
            }
        })
        .collect();

    ValuationReport {
        subject: subject.clone(),
        summary,
        stats,
        sections,
    }
}
