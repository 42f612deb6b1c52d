//! Field-alias resolution over loosely-typed provider JSON.
//!
//! Providers name the same attribute differently (`miles` vs `mileage`,
//! `dom` vs `dos_active`) and nest some of them (`build.year`,
//! `dealer.city`). Every alias lives in [`LISTING_FIELDS`], in priority
//! order: canonical camelCase name first, snake_case next, provider aliases
//! last. Dotted entries walk nested objects.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// Canonical attributes of a comparable listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Vin,
    Year,
    Make,
    Model,
    Trim,
    Mileage,
    Price,
    Location,
    Distance,
    ListingDate,
    DaysOnMarket,
    DealerType,
    Source,
}

pub(crate) const LISTING_FIELDS: &[(Field, &[&str])] = &[
    (Field::Vin, &["vin"]),
    (Field::Year, &["year", "build.year"]),
    (Field::Make, &["make", "build.make"]),
    (Field::Model, &["model", "build.model"]),
    (Field::Trim, &["trim", "build.trim"]),
    (Field::Mileage, &["mileage", "miles"]),
    (Field::Price, &["price"]),
    (Field::Location, &["location", "dealer_address", "dealer"]),
    (
        Field::Distance,
        &[
            "location.distanceMiles",
            "location.distance_miles",
            "distanceMiles",
            "distance_miles",
            "dist",
            "distance",
        ],
    ),
    (
        Field::ListingDate,
        &[
            "listingDate",
            "listing_date",
            "first_seen_at_date",
            "first_seen_at",
        ],
    ),
    (
        Field::DaysOnMarket,
        &["daysOnMarket", "days_on_market", "dom", "dos_active"],
    ),
    (
        Field::DealerType,
        &["dealerType", "dealer_type", "dealer.dealer_type"],
    ),
    (Field::Source, &["source"]),
];

/// Alias paths for `field`, in priority order.
pub(crate) fn aliases(field: Field) -> &'static [&'static str] {
    LISTING_FIELDS
        .iter()
        .find(|(f, _)| *f == field)
        .map_or(&[], |(_, paths)| paths)
}

/// Follows a dotted path through nested objects. `null` counts as absent.
pub(crate) fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}

/// Returns the first alias whose value `coerce` accepts.
///
/// A canonical field that is present but unusable (e.g. `"price": "call"`)
/// does not shadow a usable alias further down the list.
pub(crate) fn resolve<T>(
    record: &Value,
    paths: &[&str],
    coerce: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    paths
        .iter()
        .filter_map(|path| lookup_path(record, path))
        .find_map(coerce)
}

/// JSON number, or a numeric string such as `"$18,500"` or `"42,000 mi"`.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

/// Non-empty trimmed string. Numbers are rendered, so `"trim": 300` survives.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `YYYY-MM-DD`, an RFC 3339 timestamp, or unix seconds.
pub(crate) fn as_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| {
                    DateTime::parse_from_rfc3339(s)
                        .ok()
                        .map(|dt| dt.date_naive())
                })
                .or_else(|| {
                    s.get(..10)
                        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
                })
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

fn parse_numeric_str(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_'))
        .collect();
    let end = cleaned
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (c == '-' && i == 0)))
        .map_or(cleaned.len(), |(i, _)| i);
    cleaned[..end]
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
}
