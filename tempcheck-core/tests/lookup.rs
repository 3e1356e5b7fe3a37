//! End-to-end lookups against mocked geocoding and forecast endpoints.

use std::time::Duration;
use tempcheck_core::{Config, LookupError, WeatherLookup};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKYO: &str = "Tokyo, Japan";

fn lookup_for(server: &MockServer) -> WeatherLookup {
    let config = Config {
        forecast_base_url: server.uri(),
        geocoding_base_url: server.uri(),
        ..Config::default()
    };
    WeatherLookup::from_config(&config).expect("valid config")
}

async fn mount_tokyo_geocode(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", TOKYO))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"name": "Tokyo", "latitude": 35.6895, "longitude": 139.6917, "country": "Japan"}
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, temperatures: serde_json::Value, times: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "35.6895"))
        .and(query_param("longitude", "139.6917"))
        .and(query_param("hourly", "temperature_2m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 35.7,
            "longitude": 139.6875,
            "hourly": {"temperature_2m": temperatures, "time": times}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn resolves_location_and_returns_latest_temperature() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;
    mount_forecast(
        &server,
        serde_json::json!([18.2, 19.1, 19.8]),
        serde_json::json!(["2024-05-01T00:00", "2024-05-01T01:00", "2024-05-01T02:00"]),
    )
    .await;

    let temperature = lookup_for(&server).lookup(TOKYO).await.expect("lookup succeeds");

    assert!((temperature - 19.8).abs() < 1e-4, "got {temperature}");
}

#[tokio::test]
async fn unknown_location_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": []
        })))
        .mount(&server)
        .await;

    // Nothing may reach the forecast endpoint.
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let result = lookup_for(&server).lookup("Qwxyzqwxyz Nonexistent").await;

    assert_eq!(result, Err(LookupError::NotFound));
}

#[tokio::test]
async fn empty_temperature_series_is_no_data() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;
    mount_forecast(
        &server,
        serde_json::json!([]),
        serde_json::json!(["2024-05-01T00:00", "2024-05-01T01:00"]),
    )
    .await;

    let result = lookup_for(&server).lookup(TOKYO).await;

    assert_eq!(result, Err(LookupError::NoData));
}

#[tokio::test]
async fn connection_refused_is_network_error_with_cause() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;

    // Grab a free port and release it so the forecast request has nowhere to go.
    let dead = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let dead_url = format!("http://{}", dead.local_addr().expect("addr"));
    drop(dead);

    let config = Config {
        forecast_base_url: dead_url,
        geocoding_base_url: server.uri(),
        ..Config::default()
    };
    let lookup = WeatherLookup::from_config(&config).expect("valid config");

    match lookup.lookup(TOKYO).await {
        Err(LookupError::Network(msg)) => {
            assert!(msg.contains("request to forecast failed"), "got {msg}");
            assert!(msg.to_lowercase().contains("refused"), "got {msg}");
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_network_error() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    match lookup_for(&server).lookup(TOKYO).await {
        Err(LookupError::Network(msg)) => {
            assert!(msg.contains("503"), "got {msg}");
            assert!(msg.contains("Service Unavailable"), "got {msg}");
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_forecast_is_network_error_not_no_data() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"latitude": 35.7})),
        )
        .mount(&server)
        .await;

    let result = lookup_for(&server).lookup(TOKYO).await;

    assert!(matches!(result, Err(LookupError::Network(ref msg)) if !msg.is_empty()));
}

#[tokio::test]
async fn hourly_without_temperature_key_is_network_error() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 35.7,
            "longitude": 139.6875,
            "hourly": {}
        })))
        .mount(&server)
        .await;

    let result = lookup_for(&server).lookup(TOKYO).await;

    assert!(
        matches!(result, Err(LookupError::Network(ref msg)) if msg.contains("temperature_2m")),
        "got {result:?}"
    );
}

#[tokio::test]
async fn slow_forecast_times_out_as_network_error() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "latitude": 35.7,
                    "longitude": 139.6875,
                    "hourly": {"temperature_2m": [20.0], "time": ["2024-05-01T00:00"]}
                }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = Config {
        forecast_base_url: server.uri(),
        geocoding_base_url: server.uri(),
        timeout_ms: Some(200),
        ..Config::default()
    };
    let lookup = WeatherLookup::from_config(&config).expect("valid config");

    match lookup.lookup(TOKYO).await {
        Err(LookupError::Network(msg)) => {
            assert!(msg.contains("request to forecast failed"), "got {msg}");
            assert!(msg.contains("timed out"), "got {msg}");
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_reading_for_the_last_hour_is_no_data() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;
    mount_forecast(&server, serde_json::json!([18.2, null]), serde_json::json!(["a", "b"])).await;

    let result = lookup_for(&server).lookup(TOKYO).await;

    assert_eq!(result, Err(LookupError::NoData));
}

#[tokio::test]
async fn earlier_gaps_do_not_break_the_lookup() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;
    mount_forecast(&server, serde_json::json!([null, 3.5]), serde_json::json!(["a", "b"])).await;

    assert_eq!(lookup_for(&server).lookup(TOKYO).await, Ok(3.5));
}

#[tokio::test]
async fn geocoder_outage_is_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let result = lookup_for(&server).lookup(TOKYO).await;

    assert!(matches!(result, Err(LookupError::Network(ref msg)) if msg.contains("geocoding")));
}

#[tokio::test]
async fn repeated_lookups_give_the_same_result() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;
    mount_forecast(&server, serde_json::json!([5.5, 7.25]), serde_json::json!(["a", "b"])).await;

    let lookup = lookup_for(&server);
    let first = lookup.lookup(TOKYO).await;
    let second = lookup.lookup(TOKYO).await;

    assert_eq!(first, Ok(7.25));
    assert_eq!(first, second);
}

#[tokio::test]
async fn concurrent_lookups_are_independent() {
    let server = MockServer::start().await;
    mount_tokyo_geocode(&server).await;
    mount_forecast(&server, serde_json::json!([1.5, 2.5]), serde_json::json!([])).await;

    let lookup = std::sync::Arc::new(lookup_for(&server));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lookup = lookup.clone();
            tokio::spawn(async move { lookup.lookup(TOKYO).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.expect("task completes"), Ok(2.5));
    }
}
