//! Report section configuration.
//!
//! A valuation report embeds one ranked comparable list per section. The
//! list of sections is read from a YAML file:
//!
//! ```yaml
//! sections:
//!   - title: Highest priced
//!     strategy: top_price
//!     limit: 10
//!   - title: Franchise dealers
//!     strategy: dealer_type
//!     params:
//!       dealerType: franchise
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::selection::{default_limit, Selection, SelectionParams, StrategyKind};
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub strategy: StrategyKind,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub params: SelectionParams,
}

impl ReportSection {
    #[must_use]
    pub fn new(title: &str, strategy: StrategyKind) -> Self {
        Self {
            title: title.to_string(),
            strategy,
            limit: default_limit(),
            params: SelectionParams::default(),
        }
    }

    /// The selector input described by this section.
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection {
            strategy: self.strategy,
            params: self.params.clone(),
            limit: self.limit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SectionsFile {
    pub sections: Vec<ReportSection>,
}

/// Sections used when no configuration file is present.
#[must_use]
pub fn default_sections() -> Vec<ReportSection> {
    vec![
        ReportSection::new("Highest priced", StrategyKind::TopPrice),
        ReportSection::new("Closest mileage", StrategyKind::ClosestMileage),
        ReportSection::new("Lowest mileage", StrategyKind::LowestMileage),
        ReportSection::new("Newest listings", StrategyKind::NewestListings),
        ReportSection::new("Fastest selling", StrategyKind::FastestSelling),
        ReportSection::new("Nearest", StrategyKind::ClosestDistance),
    ]
}

/// Load and validate report sections from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sections(path: &Path) -> Result<SectionsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SectionsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_sections(&content)
}

fn parse_sections(content: &str) -> Result<SectionsFile, ConfigError> {
    let sections_file: SectionsFile = serde_yaml::from_str(content)?;
    validate_sections(&sections_file)?;
    Ok(sections_file)
}

fn validate_sections(sections_file: &SectionsFile) -> Result<(), ConfigError> {
    if sections_file.sections.is_empty() {
        return Err(ConfigError::Validation(
            "at least one report section is required".to_string(),
        ));
    }

    let mut seen_titles = HashSet::new();
    for section in &sections_file.sections {
        if section.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "section title must be non-empty".to_string(),
            ));
        }

        if section.limit == 0 {
            return Err(ConfigError::Validation(format!(
                "section '{}' has limit 0; must be at least 1",
                section.title
            )));
        }

        if !seen_titles.insert(section.title.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate section title: '{}'",
                section.title
            )));
        }
    }

    Ok(())
}
