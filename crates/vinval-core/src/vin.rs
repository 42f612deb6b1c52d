use std::sync::LazyLock;

use regex::Regex;

use crate::CoreError;

/// 17 characters, digits and capital letters, never `I`, `O` or `Q`.
static VIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").expect("valid regex"));

/// Validates a VIN and returns it trimmed and upper-cased.
///
/// The check digit (position 9) is not verified.
///
/// # Errors
///
/// Returns [`CoreError::InvalidVin`] if the VIN has the wrong length or
/// contains characters outside the VIN alphabet.
pub fn validate_vin(raw: &str) -> Result<String, CoreError> {
    let vin = raw.trim().to_ascii_uppercase();
    if vin.len() != 17 {
        return Err(CoreError::InvalidVin {
            vin,
            reason: format!("expected 17 characters, got {}", raw.trim().len()),
        });
    }
    if !VIN_RE.is_match(&vin) {
        return Err(CoreError::InvalidVin {
            vin,
            reason: "contains characters outside the VIN alphabet (I, O and Q are not allowed)"
                .to_string(),
        });
    }
    Ok(vin)
}
