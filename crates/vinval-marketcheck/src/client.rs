//! HTTP client for the MarketCheck REST API.
//!
//! Wraps `reqwest` with API key handling, status classification and the
//! [`RetryPolicy`]. Both endpoints return the raw JSON body after checking
//! for a `code`/`message` error envelope.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use vinval_core::AppConfig;

use crate::error::ProviderError;
use crate::retry::{retry_with_backoff, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://mc-api.marketcheck.com/";
const DEFAULT_USER_AGENT: &str = "vinval/0.1 (vehicle-valuation)";

const SEARCH_ACTIVE_PATH: &str = "v2/search/car/active";
const PREDICT_PRICE_PATH: &str = "v2/predict/car/us/marketcheck_price/comparables";

/// Active used-car listings near `zip` that match `vin`'s build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparablesQuery {
    pub vin: String,
    pub zip: String,
    pub radius_miles: u32,
    pub rows: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionQuery {
    pub vin: String,
    pub miles: u64,
    pub zip: String,
}

/// Client for the MarketCheck REST API.
///
/// Use [`MarketCheckClient::from_config`] in the application and
/// [`MarketCheckClient::with_base_url`] to point at a mock server in tests.
pub struct MarketCheckClient {
    client: Client,
    api_key: String,
    base_url: Url,
    retry: RetryPolicy,
}

impl MarketCheckClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Self::build(api_key, timeout_secs, DEFAULT_USER_AGENT, base_url)
    }

    /// Creates a client from application config: base URL, timeout, user
    /// agent and retry policy.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::MissingApiKey`] if no API key is configured.
    /// - [`ProviderError::InvalidBaseUrl`] if the configured base URL does not parse.
    /// - [`ProviderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .marketcheck_api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey)?;
        let client = Self::build(
            api_key,
            config.request_timeout_secs,
            &config.user_agent,
            &config.marketcheck_base_url,
        )?;
        Ok(client.with_retry_policy(RetryPolicy::from_config(config)))
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(transport_error)?;

        // Exactly one trailing slash so `Url::join` appends endpoint paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            retry: RetryPolicy::default(),
        })
    }

    /// Searches active used-car listings comparable to the query VIN.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::RateLimited`] / [`ProviderError::ServerError`] once
    ///   the retry budget is spent.
    /// - [`ProviderError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ProviderError::ApiError`] if the body is an error envelope.
    /// - [`ProviderError::Http`] on network failure.
    /// - [`ProviderError::Deserialize`] if the body is not JSON.
    pub async fn fetch_comparables(
        &self,
        query: &ComparablesQuery,
    ) -> Result<Value, ProviderError> {
        let radius = query.radius_miles.to_string();
        let rows = query.rows.to_string();
        let url = self.build_url(
            SEARCH_ACTIVE_PATH,
            &[
                ("vin", query.vin.as_str()),
                ("zip", query.zip.as_str()),
                ("radius", radius.as_str()),
                ("rows", rows.as_str()),
                ("car_type", "used"),
            ],
        )?;
        let body = self.get_with_retry(SEARCH_ACTIVE_PATH, &url).await?;
        let num_found = body.get("num_found").and_then(serde_json::Value::as_u64);
        tracing::debug!(vin = %query.vin, num_found, "fetched MarketCheck comparables");
        Ok(body)
    }

    /// Requests a MarketCheck price prediction for the VIN at the given mileage.
    ///
    /// # Errors
    ///
    /// Same as [`MarketCheckClient::fetch_comparables`].
    pub async fn predict_price(&self, query: &PredictionQuery) -> Result<Value, ProviderError> {
        let miles = query.miles.to_string();
        let url = self.build_url(
            PREDICT_PRICE_PATH,
            &[
                ("vin", query.vin.as_str()),
                ("miles", miles.as_str()),
                ("zip", query.zip.as_str()),
                ("car_type", "used"),
            ],
        )?;
        let body = self.get_with_retry(PREDICT_PRICE_PATH, &url).await?;
        tracing::debug!(vin = %query.vin, "fetched MarketCheck price prediction");
        Ok(body)
    }

    /// Joins `path` onto the base URL and appends `api_key` plus `params`,
    /// percent-encoded via [`Url::query_pairs_mut`].
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ProviderError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_with_retry(&self, endpoint: &str, url: &Url) -> Result<Value, ProviderError> {
        let body = retry_with_backoff(self.retry, || self.request_json(endpoint, url)).await?;
        Self::check_api_error(&body)?;
        Ok(body)
    }

    /// Sends one GET, classifies the status, and parses the body as JSON.
    ///
    /// Transport errors have their URL stripped; it carries the API key.
    async fn request_json(&self, endpoint: &str, url: &Url) -> Result<Value, ProviderError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, endpoint));
        }
        let body = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
            context: endpoint.to_owned(),
            source: e,
        })
    }

    /// Rejects a body shaped `{"code": ..., "message": "..."}`.
    fn check_api_error(body: &Value) -> Result<(), ProviderError> {
        let Some(object) = body.as_object() else {
            return Ok(());
        };
        match (object.get("code"), object.get("message").and_then(Value::as_str)) {
            (Some(code), Some(message)) if !code.is_null() => {
                Err(ProviderError::ApiError(format!("{code}: {message}")))
            }
            _ => Ok(()),
        }
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Http(err.without_url())
}

fn classify_status(status: StatusCode, endpoint: &str) -> ProviderError {
    let endpoint = endpoint.to_owned();
    if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited { endpoint }
    } else if status.is_server_error() {
        ProviderError::ServerError {
            status: status.as_u16(),
            endpoint,
        }
    } else {
        ProviderError::UnexpectedStatus {
            status: status.as_u16(),
            endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn test_client(base_url: &str) -> MarketCheckClient {
        MarketCheckClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_path_and_key() {
        let client = test_client("https://mc-api.marketcheck.com");
        let url = client
            .build_url(SEARCH_ACTIVE_PATH, &[("vin", "1HGCV1F34KA000001")])
            .unwrap();
        assert_eq!(url.host_str(), Some("mc-api.marketcheck.com"));
        assert_eq!(url.path(), "/v2/search/car/active");
        assert_eq!(url.query(), Some("api_key=test-key&vin=1HGCV1F34KA000001"));
    }

    #[test]
    fn build_url_keeps_base_path_prefix() {
        let client = test_client("https://proxy.example.com/marketcheck/");
        let url = client.build_url(PREDICT_PRICE_PATH, &[]).unwrap();
        assert_eq!(
            url.path(),
            "/marketcheck/v2/predict/car/us/marketcheck_price/comparables"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://mc-api.marketcheck.com");
        let url = client.build_url(SEARCH_ACTIVE_PATH, &[("zip", "787 01&x")]).unwrap();
        assert!(
            url.as_str().contains("787+01%26x") || url.as_str().contains("787%2001%26x"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = MarketCheckClient::with_base_url("k", 30, "not a url");
        assert!(matches!(result, Err(ProviderError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn classifies_statuses() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "e"),
            ProviderError::RateLimited { .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "e"),
            ProviderError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "e"),
            ProviderError::UnexpectedStatus { status: 401, .. }
        ));
    }

    #[test]
    fn error_envelope_is_detected() {
        let err = MarketCheckClient::check_api_error(&json!({
            "code": 422,
            "message": "Invalid VIN"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "MarketCheck API error: 422: Invalid VIN");

        let listings = json!({ "num_found": 0, "listings": [] });
        assert!(MarketCheckClient::check_api_error(&listings).is_ok());
        assert!(MarketCheckClient::check_api_error(&json!([])).is_ok());
    }
}
