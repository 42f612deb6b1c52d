//! Comparable-vehicle pipeline: normalize raw provider listings, select
//! ranked subsets, aggregate statistics and derive the valuation summary.

pub mod error;
pub(crate) mod fields;
pub mod log;
pub mod normalize;
pub mod report;
pub mod select;
pub mod stats;
pub mod valuation;

pub use error::NormalizeError;
pub use log::{EventLog, TracingLog};
pub use normalize::{
    extract_listing_array, normalize_listing, normalize_listings, normalize_listings_with,
    DropReason,
};
pub use report::{
    build_report, build_report_with, ReportSectionResult, ReportSubject, ValuationReport,
};
pub use select::{select, select_with};
pub use stats::{compute_stats, ComparableStats};
pub use valuation::{
    derive_summary, map_confidence, parse_prediction, ConfidenceSignal, PricePrediction,
    PriceRange,
};
