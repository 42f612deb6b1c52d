//! Valuation summary derivation from a provider price prediction.

use serde_json::Value;
use vinval_core::{Confidence, ValuationSummary};

use crate::fields::{as_number, resolve};

/// Half-width of the band used when the provider sends no price range.
///
/// A fixed heuristic band, not a statistical interval.
pub const FALLBACK_BAND: f64 = 0.10;

/// Scores at or above this (0–100 scale) map to [`Confidence::High`].
pub const HIGH_CONFIDENCE_SCORE: f64 = 80.0;

/// Scores at or above this (0–100 scale) map to [`Confidence::Medium`].
pub const MEDIUM_CONFIDENCE_SCORE: f64 = 50.0;

const PREDICTED_PRICE_FIELDS: &[&str] = &[
    "predicted_price",
    "predictedPrice",
    "marketcheck_price",
    "price",
];
const RANGE_FIELDS: &[&str] = &["price_range", "priceRange", "range"];
const RANGE_MIN_FIELDS: &[&str] = &["min", "lower_bound", "low"];
const RANGE_MAX_FIELDS: &[&str] = &["max", "upper_bound", "high"];
const CONFIDENCE_FIELDS: &[&str] = &["confidence", "confidence_score", "confidenceScore"];

/// Provider-reported confidence, either a label or a 0–100 score.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfidenceSignal {
    Text(String),
    Score(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricePrediction {
    pub predicted_price: f64,
    pub range: Option<PriceRange>,
    pub confidence: Option<ConfidenceSignal>,
}

impl PricePrediction {
    #[must_use]
    pub fn new(predicted_price: f64) -> Self {
        Self {
            predicted_price,
            range: None,
            confidence: None,
        }
    }
}

/// Maps a provider confidence signal onto [`Confidence`].
///
/// Labels: containing "high" → high, containing "medium" or "moderate" →
/// medium, any other label → low. Scores: `>= 80` high, `>= 50` medium,
/// otherwise low. A missing or non-finite signal is medium, not low.
#[must_use]
pub fn map_confidence(signal: Option<&ConfidenceSignal>) -> Confidence {
    match signal {
        Some(ConfidenceSignal::Text(label)) => {
            let label = label.to_lowercase();
            if label.contains("high") {
                Confidence::High
            } else if label.contains("medium") || label.contains("moderate") {
                Confidence::Medium
            } else {
                Confidence::Low
            }
        }
        Some(ConfidenceSignal::Score(score)) if score.is_finite() => {
            if *score >= HIGH_CONFIDENCE_SCORE {
                Confidence::High
            } else if *score >= MEDIUM_CONFIDENCE_SCORE {
                Confidence::Medium
            } else {
                Confidence::Low
            }
        }
        Some(ConfidenceSignal::Score(_)) | None => Confidence::Medium,
    }
}

/// Combines a prediction with the comparable count into a [`ValuationSummary`].
///
/// Without a usable provider range the bounds are `round(p * 0.9)` and
/// `round(p * 1.1)`. A provider range is ordered and widened to contain the
/// rounded prediction, so `low <= average <= high` always holds.
#[must_use]
pub fn derive_summary(prediction: &PricePrediction, data_point_count: u64) -> ValuationSummary {
    let predicted = prediction.predicted_price;
    let average_value = predicted.round();

    let (low_value, high_value) = match prediction.range.filter(is_usable_range) {
        Some(range) => {
            let low = range.min.min(range.max);
            let high = range.min.max(range.max);
            (low.min(average_value), high.max(average_value))
        }
        None => (
            (predicted * (1.0 - FALLBACK_BAND)).round(),
            (predicted * (1.0 + FALLBACK_BAND)).round(),
        ),
    };

    ValuationSummary {
        average_value,
        low_value,
        high_value,
        confidence: map_confidence(prediction.confidence.as_ref()),
        data_point_count,
    }
}

fn is_usable_range(range: &PriceRange) -> bool {
    range.min.is_finite() && range.max.is_finite() && range.min > 0.0 && range.max > 0.0
}

/// Reads a provider prediction payload.
///
/// Returns `None` when the payload has no positive, finite predicted price.
#[must_use]
pub fn parse_prediction(payload: &Value) -> Option<PricePrediction> {
    let predicted_price =
        resolve(payload, PREDICTED_PRICE_FIELDS, as_number).filter(|p| *p > 0.0)?;

    let range = resolve(payload, RANGE_FIELDS, |value| {
        Some(PriceRange {
            min: resolve(value, RANGE_MIN_FIELDS, as_number)?,
            max: resolve(value, RANGE_MAX_FIELDS, as_number)?,
        })
    });

    let confidence = resolve(payload, CONFIDENCE_FIELDS, |value| match value {
        Value::String(s) => Some(ConfidenceSignal::Text(s.clone())),
        Value::Number(n) => n.as_f64().map(ConfidenceSignal::Score),
        _ => None,
    });

    Some(PricePrediction {
        predicted_price,
        range,
        confidence,
    })
}
