use std::path::PathBuf;

use clap::Parser;
use vinval_core::{AppConfig, DealerType, Environment, StrategyKind, DEFAULT_LIMIT};

use super::*;

fn config_with_sections_path(path: &str) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "info".to_string(),
        marketcheck_api_key: None,
        marketcheck_base_url: "http://localhost".to_string(),
        request_timeout_secs: 30,
        user_agent: "vinval-test".to_string(),
        max_attempts: 3,
        backoff_base_ms: 0,
        backoff_max_ms: 0,
        search_radius_miles: 100,
        search_rows: 50,
        report_sections_path: PathBuf::from(path),
    }
}

fn select_args(argv: &[&str]) -> SelectArgs {
    let mut full = vec!["vinval", "select", "--listings", "comps.json"];
    full.extend_from_slice(argv);
    match Cli::try_parse_from(full).expect("expected valid cli args").command {
        Commands::Select(args) => args,
        other => panic!("expected select, got {other:?}"),
    }
}

#[test]
fn parses_valuate_command() {
    let cli = Cli::try_parse_from([
        "vinval",
        "valuate",
        "--vin",
        "1HGCV1F34KA000001",
        "--miles",
        "42000",
        "--zip",
        "78701",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Valuate {
            miles: 42_000,
            sections: None,
            ..
        }
    ));
}

#[test]
fn valuate_requires_miles() {
    let result = Cli::try_parse_from(["vinval", "valuate", "--vin", "X", "--zip", "78701"]);
    assert!(result.is_err());
}

#[test]
fn select_defaults_limit() {
    let args = select_args(&["--strategy", "top_price"]);
    assert_eq!(args.strategy, StrategyKind::TopPrice);
    assert_eq!(args.limit, DEFAULT_LIMIT);
    assert!(args.target_price.is_none());
}

#[test]
fn select_accepts_kebab_strategy_and_params() {
    let args = select_args(&[
        "--strategy",
        "closest-mileage",
        "--target-mileage",
        "40000",
        "--limit",
        "3",
    ]);
    let selection = offline::selection_from_args(&args);
    assert_eq!(selection.strategy, StrategyKind::ClosestMileage);
    assert_eq!(selection.limit, 3);
    assert_eq!(selection.params.target_mileage, Some(40_000));
    assert!(selection.missing_required_param().is_none());
}

#[test]
fn select_parses_dealer_type() {
    let args = select_args(&["--strategy", "dealer_type", "--dealer-type", "Franchise"]);
    assert_eq!(args.dealer_type, Some(DealerType::Franchise));
}

#[test]
fn select_rejects_unknown_strategy() {
    let result = Cli::try_parse_from([
        "vinval",
        "select",
        "--listings",
        "comps.json",
        "--strategy",
        "cheapest",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_summarize_command() {
    let cli = Cli::try_parse_from(["vinval", "summarize", "--prediction", "p.json"])
        .expect("expected valid cli args");
    match cli.command {
        Commands::Summarize {
            prediction,
            listings,
        } => {
            assert_eq!(prediction, PathBuf::from("p.json"));
            assert!(listings.is_none());
        }
        other => panic!("expected summarize, got {other:?}"),
    }
}

#[test]
fn missing_sections_file_falls_back_to_defaults() {
    let config = config_with_sections_path("/nonexistent/vinval/report_sections.yaml");
    let sections = valuate::load_report_sections(&config, None).unwrap();
    assert_eq!(sections, vinval_core::default_sections());
}

#[test]
fn explicit_sections_file_must_exist() {
    let config = config_with_sections_path("/nonexistent/vinval/report_sections.yaml");
    let missing = std::path::Path::new("/nonexistent/vinval/explicit.yaml");
    assert!(valuate::load_report_sections(&config, Some(missing)).is_err());
}

#[test]
fn bundled_sections_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/report_sections.yaml");
    let config = config_with_sections_path(path);
    let sections = valuate::load_report_sections(&config, None).unwrap();
    assert!(sections
        .iter()
        .any(|s| s.strategy == StrategyKind::DealerType));
}

#[test]
fn production_logs_disable_ansi() {
    assert!(!log_ansi(&Environment::Production));
    assert!(log_ansi(&Environment::Development));
    assert!(log_ansi(&Environment::Test));
}

mod valuation {
    use serde_json::json;
    use vinval_core::{ReportSection, StrategyKind};
    use vinval_marketcheck::{MarketCheckClient, RetryPolicy};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::valuate::{build_valuation, ValuationRequest};

    const SEARCH_PATH: &str = "/v2/search/car/active";
    const PREDICT_PATH: &str = "/v2/predict/car/us/marketcheck_price/comparables";

    fn client(base_url: &str) -> MarketCheckClient {
        MarketCheckClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
            .with_retry_policy(RetryPolicy {
                max_attempts: 3,
                base_delay_ms: 0,
                max_delay_ms: 0,
            })
    }

    fn request() -> ValuationRequest {
        ValuationRequest {
            vin: "1HGCV1F34KA000001".to_string(),
            miles: 40_000,
            zip: "78701".to_string(),
            radius_miles: 100,
            rows: 50,
        }
    }

    fn sections() -> Vec<ReportSection> {
        vec![
            ReportSection::new("Highest priced", StrategyKind::TopPrice),
            ReportSection::new("Closest mileage", StrategyKind::ClosestMileage),
        ]
    }

    fn search_body() -> serde_json::Value {
        json!({
            "num_found": 3,
            "listings": [
                { "vin": "1HGCV1F34KA000002", "price": 18_000, "miles": 30_000,
                  "build": { "year": 2019, "make": "Honda", "model": "Accord" } },
                { "vin": "1HGCV1F34KA000003", "price": 22_000, "miles": 55_000,
                  "build": { "year": 2019, "make": "Honda", "model": "Accord" } },
                { "vin": "1HGCV1F34KA000004", "price": 19_500, "miles": 42_000,
                  "build": { "year": 2019, "make": "Honda", "model": "Accord" } }
            ]
        })
    }

    async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn builds_report_with_summary() {
        let server = MockServer::start().await;
        mount(&server, SEARCH_PATH, ResponseTemplate::new(200).set_body_json(search_body())).await;
        mount(
            &server,
            PREDICT_PATH,
            ResponseTemplate::new(200)
                .set_body_json(json!({ "predicted_price": 20_000, "confidence": 85 })),
        )
        .await;

        let report = build_valuation(&client(&server.uri()), &request(), &sections())
            .await
            .expect("report should build");

        let summary = report.summary.expect("summary present");
        assert_eq!(summary.data_point_count, 3);
        assert!((summary.low_value - 18_000.0).abs() < f64::EPSILON);
        assert_eq!(report.stats.total, 3);
        let mileages: Vec<u64> = report.sections[1].listings.iter().map(|v| v.mileage).collect();
        assert_eq!(mileages, [42_000, 30_000, 55_000]);
    }

    #[tokio::test]
    async fn failed_prediction_keeps_report_without_summary() {
        let server = MockServer::start().await;
        mount(&server, SEARCH_PATH, ResponseTemplate::new(200).set_body_json(search_body())).await;
        Mock::given(method("GET"))
            .and(path(PREDICT_PATH))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let report = build_valuation(&client(&server.uri()), &request(), &sections())
            .await
            .expect("prediction failure must not abort the report");

        assert!(report.summary.is_none());
        assert_eq!(report.stats.total, 3);
        assert_eq!(report.sections[0].listings.len(), 3);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["summary"].is_null());
    }

    #[tokio::test]
    async fn failed_search_aborts_the_run() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        mount(
            &server,
            PREDICT_PATH,
            ResponseTemplate::new(200).set_body_json(json!({ "predicted_price": 20_000 })),
        )
        .await;

        let err = build_valuation(&client(&server.uri()), &request(), &sections())
            .await
            .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("comparable search failed"), "{message}");
        assert!(message.contains("404"), "{message}");
        assert!(!message.contains("test-key"), "{message}");
    }

    #[tokio::test]
    async fn search_without_listings_yields_empty_sections() {
        let server = MockServer::start().await;
        mount(
            &server,
            SEARCH_PATH,
            ResponseTemplate::new(200).set_body_json(json!({ "num_found": 0 })),
        )
        .await;
        mount(
            &server,
            PREDICT_PATH,
            ResponseTemplate::new(200).set_body_json(json!({ "predicted_price": 20_000 })),
        )
        .await;

        let report = build_valuation(&client(&server.uri()), &request(), &sections())
            .await
            .expect("report should build");

        assert_eq!(report.stats.total, 0);
        assert_eq!(report.sections.len(), 2);
        assert!(report.sections.iter().all(|s| s.listings.is_empty()));
        assert_eq!(report.summary.map(|s| s.data_point_count), Some(0));
    }
}
