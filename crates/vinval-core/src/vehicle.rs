use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Seller classification for a comparable listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealerType {
    /// Brand-affiliated dealership.
    Franchise,
    Independent,
}

impl std::fmt::Display for DealerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealerType::Franchise => write!(f, "franchise"),
            DealerType::Independent => write!(f, "independent"),
        }
    }
}

impl std::str::FromStr for DealerType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "franchise" => Ok(DealerType::Franchise),
            "independent" => Ok(DealerType::Independent),
            _ => Err(CoreError::UnknownDealerType(s.to_string())),
        }
    }
}

/// Structured listing location.
///
/// Providers sometimes send a bare `"City, ST 12345"` string; the normalizer
/// always resolves it to this shape. When the string cannot be split, the
/// whole value is kept verbatim in `city` as an opaque label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// Distance from the search origin in miles, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
}

impl Location {
    /// Returns `true` when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city.is_none()
            && self.state.is_none()
            && self.zip.is_none()
            && self.distance_miles.is_none()
    }
}

/// One market listing used as valuation evidence, in canonical form.
///
/// Serialized field names are camelCase; feeding a serialized list back
/// through the normalizer yields an equal list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableVehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    pub year: i32,
    pub make: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    /// Odometer reading, canonicalized from the provider's `miles`/`mileage`.
    pub mileage: u64,
    /// Asking price in whole currency units. Always `> 0` after normalization.
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_on_market: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_type: Option<DealerType>,
    /// Provider the listing came from (e.g. `"marketcheck"`).
    pub source: String,
}

impl ComparableVehicle {
    /// Distance from the search origin, if the location carries one.
    #[must_use]
    pub fn distance_miles(&self) -> Option<f64> {
        self.location.as_ref().and_then(|l| l.distance_miles)
    }
}
