//! `valuate`: live MarketCheck lookup for one vehicle.
//!
//! The VIN is validated before any request is made. A failed comparable
//! search aborts the run; a failed or unusable prediction is logged and the
//! report is printed without a summary.

use std::path::Path;

use anyhow::Context;
use vinval_comps::{
    build_report, extract_listing_array, normalize_listings, parse_prediction, ReportSubject,
    ValuationReport,
};
use vinval_core::{AppConfig, ReportSection};
use vinval_marketcheck::{ComparablesQuery, MarketCheckClient, PredictionQuery};

const SOURCE: &str = "marketcheck";

pub(crate) async fn run_valuate(
    config: &AppConfig,
    raw_vin: &str,
    miles: u64,
    zip: &str,
    sections_path: Option<&Path>,
) -> anyhow::Result<()> {
    let vin = vinval_core::validate_vin(raw_vin)?;
    let sections = load_report_sections(config, sections_path)?;
    let client = MarketCheckClient::from_config(config)?;

    let request = ValuationRequest {
        vin,
        miles,
        zip: zip.to_owned(),
        radius_miles: config.search_radius_miles,
        rows: config.search_rows,
    };
    let report = build_valuation(&client, &request, &sections).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// A validated valuation lookup.
#[derive(Debug, Clone)]
pub(crate) struct ValuationRequest {
    pub(crate) vin: String,
    pub(crate) miles: u64,
    pub(crate) zip: String,
    pub(crate) radius_miles: u32,
    pub(crate) rows: u32,
}

/// Fetches comparables and the price prediction concurrently and assembles
/// the report.
///
/// # Errors
///
/// Returns an error if the comparable search fails. Prediction failures only
/// drop the summary.
pub(crate) async fn build_valuation(
    client: &MarketCheckClient,
    request: &ValuationRequest,
    sections: &[ReportSection],
) -> anyhow::Result<ValuationReport> {
    let vin = request.vin.as_str();
    let comparables_query = ComparablesQuery {
        vin: request.vin.clone(),
        zip: request.zip.clone(),
        radius_miles: request.radius_miles,
        rows: request.rows,
    };
    let prediction_query = PredictionQuery {
        vin: request.vin.clone(),
        miles: request.miles,
        zip: request.zip.clone(),
    };
    let (search, prediction) = tokio::join!(
        client.fetch_comparables(&comparables_query),
        client.predict_price(&prediction_query),
    );

    let search = search.context("MarketCheck comparable search failed")?;
    let comparables = match extract_listing_array(&search) {
        Some(listings) => normalize_listings(listings, SOURCE)?,
        None => {
            tracing::warn!(vin, "search response carried no listings array");
            Vec::new()
        }
    };

    let prediction = match prediction {
        Ok(payload) => {
            let parsed = parse_prediction(&payload);
            if parsed.is_none() {
                tracing::warn!(vin, "prediction response has no usable predicted price");
            }
            parsed
        }
        Err(e) => {
            tracing::warn!(vin, error = %e, "price prediction failed, continuing without summary");
            None
        }
    };

    let subject = ReportSubject {
        vin: Some(request.vin.clone()),
        mileage: Some(request.miles),
        zip: Some(request.zip.clone()),
    };
    let report = build_report(&subject, &comparables, prediction.as_ref(), sections);
    tracing::info!(
        comparables = report.stats.total,
        sections = report.sections.len(),
        has_summary = report.summary.is_some(),
        "valuation report built"
    );
    Ok(report)
}

/// Resolve report sections: an explicit path must load; the configured path
/// falls back to the built-in sections when the file does not exist.
pub(crate) fn load_report_sections(
    config: &AppConfig,
    explicit: Option<&Path>,
) -> anyhow::Result<Vec<ReportSection>> {
    if let Some(path) = explicit {
        let file = vinval_core::load_sections(path)
            .with_context(|| format!("loading report sections from {}", path.display()))?;
        return Ok(file.sections);
    }

    let path = config.report_sections_path.as_path();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no report sections file; using defaults");
        return Ok(vinval_core::default_sections());
    }
    let file = vinval_core::load_sections(path)
        .with_context(|| format!("loading report sections from {}", path.display()))?;
    Ok(file.sections)
}
