pub mod app_config;
pub mod config;
pub mod sections;
pub mod selection;
pub mod valuation;
pub mod vehicle;
pub mod vin;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use sections::{default_sections, load_sections, ReportSection, SectionsFile};
pub use selection::{Selection, SelectionParams, StrategyKind, DEFAULT_LIMIT};
pub use valuation::{Confidence, ValuationSummary};
pub use vehicle::{ComparableVehicle, DealerType, Location};
pub use vin::validate_vin;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read report sections file {path}: {source}")]
    SectionsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse report sections file: {0}")]
    SectionsFileParse(#[from] serde_yaml::Error),

    #[error("report sections validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid VIN \"{vin}\": {reason}")]
    InvalidVin { vin: String, reason: String },

    #[error("unknown selection strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown dealer type: {0}")]
    UnknownDealerType(String),
}
