//! Integration tests for `MarketCheckClient` using wiremock HTTP mocks.

use vinval_marketcheck::{
    ComparablesQuery, MarketCheckClient, PredictionQuery, ProviderError, RetryPolicy,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/v2/search/car/active";
const PREDICT_PATH: &str = "/v2/predict/car/us/marketcheck_price/comparables";

fn test_client(base_url: &str) -> MarketCheckClient {
    MarketCheckClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_retry_policy(RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 0,
            max_delay_ms: 0,
        })
}

fn comparables_query() -> ComparablesQuery {
    ComparablesQuery {
        vin: "1HGCV1F34KA000001".to_owned(),
        zip: "78701".to_owned(),
        radius_miles: 100,
        rows: 50,
    }
}

#[tokio::test]
async fn fetch_comparables_sends_search_params() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "num_found": 1,
        "listings": [
            { "vin": "1HGCV1F34KA000002", "price": 21_000, "miles": 30_000 }
        ]
    });

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("api_key", "test-key"))
        .and(query_param("vin", "1HGCV1F34KA000001"))
        .and(query_param("zip", "78701"))
        .and(query_param("radius", "100"))
        .and(query_param("rows", "50"))
        .and(query_param("car_type", "used"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = client
        .fetch_comparables(&comparables_query())
        .await
        .expect("should return payload");

    assert_eq!(payload, body);
}

#[tokio::test]
async fn predict_price_sends_vin_miles_and_zip() {
    let server = MockServer::start().await;
    let body = serde_json::json!({ "predicted_price": 20_500, "confidence": "high" });

    Mock::given(method("GET"))
        .and(path(PREDICT_PATH))
        .and(query_param("vin", "1HGCV1F34KA000001"))
        .and(query_param("miles", "42000"))
        .and(query_param("zip", "78701"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = client
        .predict_price(&PredictionQuery {
            vin: "1HGCV1F34KA000001".to_owned(),
            miles: 42_000,
            zip: "78701".to_owned(),
        })
        .await
        .expect("should return payload");

    assert_eq!(payload["predicted_price"], 20_500);
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "listings": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = client
        .fetch_comparables(&comparables_query())
        .await
        .expect("third attempt should succeed");

    assert_eq!(payload["listings"], serde_json::json!([]));
}

#[tokio::test]
async fn rate_limit_exhausts_attempt_budget() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_comparables(&comparables_query())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited { .. }), "{err}");
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_comparables(&comparables_query())
        .await
        .unwrap_err();

    assert!(
        matches!(err, ProviderError::UnexpectedStatus { status: 404, .. }),
        "{err}"
    );
}

#[tokio::test]
async fn error_envelope_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PREDICT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 401,
            "message": "Invalid API key"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .predict_price(&PredictionQuery {
            vin: "1HGCV1F34KA000001".to_owned(),
            miles: 1,
            zip: "78701".to_owned(),
        })
        .await
        .unwrap_err();

    match err {
        ProviderError::ApiError(message) => assert!(message.contains("Invalid API key")),
        other => panic!("expected ApiError, got {other}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_comparables(&comparables_query())
        .await
        .unwrap_err();

    match err {
        ProviderError::Deserialize { context, .. } => {
            assert_eq!(context, "v2/search/car/active");
            assert!(!context.contains("test-key"));
        }
        other => panic!("expected Deserialize, got {other}"),
    }
}

#[tokio::test]
async fn transport_errors_do_not_expose_the_api_key() {
    let client = MarketCheckClient::with_base_url("super-secret-key", 5, "http://127.0.0.1:1")
        .expect("client construction should not fail")
        .with_retry_policy(RetryPolicy {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        });

    let err = client
        .fetch_comparables(&comparables_query())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Http(_)), "{err}");
    assert!(!err.to_string().contains("super-secret-key"), "{err}");
    assert!(!format!("{err:?}").contains("super-secret-key"), "{err:?}");
}
