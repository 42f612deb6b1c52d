use serde::{Deserialize, Serialize};

use crate::{CoreError, DealerType};

/// Number of records returned when a selection does not set a limit.
pub const DEFAULT_LIMIT: usize = 10;

/// Ranking rule applied by the listing selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    TopPrice,
    ClosestPrice,
    ClosestMileage,
    LowestMileage,
    ClosestDistance,
    NewestListings,
    FastestSelling,
    DealerType,
    PriceRange,
    MileageRange,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 10] = [
        StrategyKind::TopPrice,
        StrategyKind::ClosestPrice,
        StrategyKind::ClosestMileage,
        StrategyKind::LowestMileage,
        StrategyKind::ClosestDistance,
        StrategyKind::NewestListings,
        StrategyKind::FastestSelling,
        StrategyKind::DealerType,
        StrategyKind::PriceRange,
        StrategyKind::MileageRange,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::TopPrice => "top_price",
            StrategyKind::ClosestPrice => "closest_price",
            StrategyKind::ClosestMileage => "closest_mileage",
            StrategyKind::LowestMileage => "lowest_mileage",
            StrategyKind::ClosestDistance => "closest_distance",
            StrategyKind::NewestListings => "newest_listings",
            StrategyKind::FastestSelling => "fastest_selling",
            StrategyKind::DealerType => "dealer_type",
            StrategyKind::PriceRange => "price_range",
            StrategyKind::MileageRange => "mileage_range",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| CoreError::UnknownStrategy(s.to_string()))
    }
}

/// Strategy-specific parameters. Each strategy reads only the fields it needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_mileage: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_type: Option<DealerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_miles: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_miles: Option<u64>,
}

/// A strategy tag, its parameters, and a result limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub strategy: StrategyKind,
    #[serde(default)]
    pub params: SelectionParams,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

pub(crate) fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Selection {
    /// A selection with default parameters and a limit of [`DEFAULT_LIMIT`].
    #[must_use]
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            params: SelectionParams::default(),
            limit: DEFAULT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: SelectionParams) -> Self {
        self.params = params;
        self
    }

    /// Limit actually applied by the selector; zero is clamped to one.
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        self.limit.max(1)
    }

    /// Name of the parameter this strategy requires but is missing, if any.
    #[must_use]
    pub fn missing_required_param(&self) -> Option<&'static str> {
        match self.strategy {
            StrategyKind::ClosestPrice if self.params.target_price.is_none() => {
                Some("targetPrice")
            }
            StrategyKind::ClosestMileage if self.params.target_mileage.is_none() => {
                Some("targetMileage")
            }
            StrategyKind::DealerType if self.params.dealer_type.is_none() => Some("dealerType"),
            _ => None,
        }
    }
}
