//! Normalization from raw provider listings to [`ComparableVehicle`].
//!
//! Field lookup is driven by the alias table in [`crate::fields`]; this
//! module validates the resolved values and assembles canonical records.
//! A bad record is dropped and reported at debug level, it never fails the
//! whole batch.

use serde_json::{json, Value};
use thiserror::Error;
use tracing::Level;
use vinval_core::{ComparableVehicle, DealerType, Location};

use crate::error::NormalizeError;
use crate::fields::{aliases, as_date, as_number, as_text, lookup_path, resolve, Field};
use crate::log::{EventLog, TracingLog};

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Why a single raw listing was excluded from the normalized output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropReason {
    #[error("listing is not a JSON object")]
    NotAnObject,
    #[error("listing has no usable price")]
    MissingPrice,
    #[error("listing price is not positive")]
    NonPositivePrice,
    #[error("listing has no usable mileage")]
    MissingMileage,
    #[error("listing mileage is negative")]
    NegativeMileage,
    #[error("listing has no usable model year")]
    MissingYear,
    #[error("listing model year {0} is outside 1900..=2100")]
    ImplausibleYear(i64),
}

/// Locates the listing array inside a provider response envelope.
///
/// Checks `listings`, `comparables.listings`, `comparables` and `comps`, in
/// that order. A payload that is itself an array is returned unchanged.
/// Returns `None` when no array is found.
#[must_use]
pub fn extract_listing_array(payload: &Value) -> Option<&Value> {
    if payload.is_array() {
        return Some(payload);
    }
    ["listings", "comparables.listings", "comparables", "comps"]
        .iter()
        .filter_map(|path| lookup_path(payload, path))
        .find(|v| v.is_array())
}

/// Normalizes an array of raw provider listings, logging drops via `tracing`.
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidInput`] if `raw` is not a JSON array.
pub fn normalize_listings(
    raw: &Value,
    source: &str,
) -> Result<Vec<ComparableVehicle>, NormalizeError> {
    normalize_listings_with(raw, source, &TracingLog)
}

/// Same as [`normalize_listings`], reporting drops to the given [`EventLog`].
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidInput`] if `raw` is not a JSON array.
pub fn normalize_listings_with(
    raw: &Value,
    source: &str,
    log: &dyn EventLog,
) -> Result<Vec<ComparableVehicle>, NormalizeError> {
    let Some(items) = raw.as_array() else {
        return Err(NormalizeError::InvalidInput {
            found: json_kind(raw),
        });
    };

    let mut vehicles = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match normalize_listing(item, source) {
            Ok(vehicle) => vehicles.push(vehicle),
            Err(reason) => log.log(
                Level::DEBUG,
                "dropping malformed comparable listing",
                &json!({
                    "index": index,
                    "reason": reason.to_string(),
                    "vin": item.get("vin"),
                    "source": source,
                }),
            ),
        }
    }

    if vehicles.len() < items.len() {
        log.log(
            Level::INFO,
            "normalized comparable listings with drops",
            &json!({
                "received": items.len(),
                "kept": vehicles.len(),
                "source": source,
            }),
        );
    }

    Ok(vehicles)
}

/// Normalizes one raw listing.
///
/// `default_source` is used when the listing carries no `source` field.
///
/// # Errors
///
/// Returns the [`DropReason`] when the listing cannot become a valid
/// canonical record.
pub fn normalize_listing(
    raw: &Value,
    default_source: &str,
) -> Result<ComparableVehicle, DropReason> {
    if !raw.is_object() {
        return Err(DropReason::NotAnObject);
    }

    let price = resolve(raw, aliases(Field::Price), as_number).ok_or(DropReason::MissingPrice)?;
    if price <= 0.0 {
        return Err(DropReason::NonPositivePrice);
    }

    let mileage =
        resolve(raw, aliases(Field::Mileage), as_number).ok_or(DropReason::MissingMileage)?;
    if mileage < 0.0 {
        return Err(DropReason::NegativeMileage);
    }

    let year = resolve_year(raw)?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mileage = mileage.round() as u64;

    Ok(ComparableVehicle {
        vin: resolve(raw, aliases(Field::Vin), as_text),
        year,
        make: resolve(raw, aliases(Field::Make), as_text).unwrap_or_default(),
        model: resolve(raw, aliases(Field::Model), as_text).unwrap_or_default(),
        trim: resolve(raw, aliases(Field::Trim), as_text),
        mileage,
        price,
        location: resolve_location(raw),
        listing_date: resolve(raw, aliases(Field::ListingDate), as_date),
        days_on_market: resolve(raw, aliases(Field::DaysOnMarket), as_non_negative_u32),
        dealer_type: resolve(raw, aliases(Field::DealerType), as_dealer_type),
        source: resolve(raw, aliases(Field::Source), as_text)
            .unwrap_or_else(|| default_source.to_string()),
    })
}

fn resolve_year(raw: &Value) -> Result<i32, DropReason> {
    let paths = aliases(Field::Year);
    let Some(year) = resolve(raw, paths, as_number) else {
        return Err(DropReason::MissingYear);
    };
    if year.fract() != 0.0 {
        return Err(DropReason::MissingYear);
    }
    #[allow(clippy::cast_possible_truncation)]
    let year = year as i64;
    i32::try_from(year)
        .ok()
        .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
        .ok_or(DropReason::ImplausibleYear(year))
}

fn as_non_negative_u32(value: &Value) -> Option<u32> {
    let n = as_number(value)?;
    if n < 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(n.round() as u32)
}

fn as_dealer_type(value: &Value) -> Option<DealerType> {
    value.as_str()?.parse().ok()
}

/// Resolves the structured location, then attaches the distance.
///
/// Structured objects win over a bare string; a record with only a distance
/// still gets a `Location` carrying just that distance.
fn resolve_location(raw: &Value) -> Option<Location> {
    let paths = aliases(Field::Location);
    let mut location = resolve(raw, paths, structured_location)
        .or_else(|| resolve(raw, paths, |v| v.as_str().and_then(parse_location_label)))
        .unwrap_or_default();

    location.distance_miles =
        resolve(raw, aliases(Field::Distance), as_number).filter(|d| *d >= 0.0);

    (!location.is_empty()).then_some(location)
}

fn structured_location(value: &Value) -> Option<Location> {
    if !value.is_object() {
        return None;
    }
    let location = Location {
        city: resolve(value, &["city"], as_text),
        state: resolve(value, &["state", "state_code"], as_text),
        zip: resolve(value, &["zip", "zip_code", "postal_code"], as_text),
        distance_miles: None,
    };
    let has_address = location.city.is_some() || location.state.is_some() || location.zip.is_some();
    has_address.then_some(location)
}

/// Parses `"City, ST"` or `"City, ST 12345"`. Anything else is kept
/// verbatim as the city label.
fn parse_location_label(label: &str) -> Option<Location> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    let verbatim = || Location {
        city: Some(label.to_string()),
        ..Location::default()
    };

    let Some((city, rest)) = label.split_once(',') else {
        return Some(verbatim());
    };
    let city = city.trim();
    if city.is_empty() {
        return Some(verbatim());
    }

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let (state, zip) = match tokens.as_slice() {
        [state] if is_state_code(state) => (*state, None),
        [state, zip] if is_state_code(state) && is_zip(zip) => (*state, Some(*zip)),
        _ => return Some(verbatim()),
    };

    Some(Location {
        city: Some(city.to_string()),
        state: Some(state.to_ascii_uppercase()),
        zip: zip.map(str::to_string),
        distance_miles: None,
    })
}

fn is_state_code(token: &str) -> bool {
    token.len() == 2 && token.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_zip(token: &str) -> bool {
    let (five, plus_four) = token.split_once('-').unwrap_or((token, ""));
    five.len() == 5
        && five.chars().all(|c| c.is_ascii_digit())
        && (plus_four.is_empty()
            || (plus_four.len() == 4 && plus_four.chars().all(|c| c.is_ascii_digit())))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
