//! `select` and `summarize`: run the pipeline over saved provider payloads
//! without network access.

use std::path::Path;

use anyhow::Context;
use serde_json::{json, Value};
use vinval_comps::{
    compute_stats, derive_summary, extract_listing_array, normalize_listings, parse_prediction,
    select,
};
use vinval_core::{ComparableVehicle, Selection, SelectionParams};

use crate::SelectArgs;

const SOURCE: &str = "file";

pub(crate) fn run_select(args: &SelectArgs) -> anyhow::Result<()> {
    let comparables = read_listings(&args.listings)?;
    let selection = selection_from_args(args);
    let listings = select(&comparables, &selection);

    let output = json!({
        "selection": selection,
        "stats": compute_stats(&listings),
        "listings": listings,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) fn run_summarize(
    prediction_path: &Path,
    listings_path: Option<&Path>,
) -> anyhow::Result<()> {
    let payload = read_json(prediction_path)?;
    let prediction = parse_prediction(&payload).with_context(|| {
        format!(
            "{} has no positive predicted price",
            prediction_path.display()
        )
    })?;

    let data_points = match listings_path {
        Some(path) => read_listings(path)?.len(),
        None => 0,
    };
    let summary = derive_summary(&prediction, u64::try_from(data_points)?);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub(crate) fn selection_from_args(args: &SelectArgs) -> Selection {
    Selection::new(args.strategy)
        .with_limit(args.limit)
        .with_params(SelectionParams {
            target_price: args.target_price,
            target_mileage: args.target_mileage,
            dealer_type: args.dealer_type,
            min_price: args.min_price,
            max_price: args.max_price,
            min_miles: args.min_miles,
            max_miles: args.max_miles,
        })
}

fn read_listings(path: &Path) -> anyhow::Result<Vec<ComparableVehicle>> {
    let payload = read_json(path)?;
    let listings = extract_listing_array(&payload)
        .with_context(|| format!("{} contains no listings array", path.display()))?;
    Ok(normalize_listings(listings, SOURCE)?)
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {} as JSON", path.display()))
}
