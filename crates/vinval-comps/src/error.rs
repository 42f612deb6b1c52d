use thiserror::Error;

/// Errors surfaced by the listing normalizer.
///
/// Individual malformed records never produce an error; they are dropped.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The payload handed to the normalizer is not a JSON array.
    #[error("invalid listing input: expected a JSON array, got {found}")]
    InvalidInput { found: &'static str },
}
