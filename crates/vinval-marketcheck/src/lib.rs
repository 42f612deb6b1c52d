//! Client for the MarketCheck REST API: comparable listing search and price
//! prediction, with bounded retry on transient failures.
//!
//! Responses are returned as raw JSON; `vinval-comps` owns their
//! interpretation.

pub mod client;
pub mod error;
pub(crate) mod retry;

pub use client::{ComparablesQuery, MarketCheckClient, PredictionQuery};
pub use error::ProviderError;
pub use retry::RetryPolicy;
