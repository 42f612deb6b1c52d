use serde::{Deserialize, Serialize};

/// Coarse reliability signal attached to a price prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// Valuation shown to the user. Derived per request, never persisted.
///
/// `low_value <= average_value <= high_value` holds for every summary derived
/// from a positive prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSummary {
    pub average_value: f64,
    pub low_value: f64,
    pub high_value: f64,
    pub confidence: Confidence,
    pub data_point_count: u64,
}
