//! End-to-end tests: configuration → wiring → AMap over HTTP (wiremock)

use std::time::{Duration, Instant};

use application::{ApplicationError, ToolCall};
use integration_amap::AmapConfig;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use infrastructure::{AppConfig, RetryConfig, build_map_tools};

const BELL_TOWER: &str = "108.947040,34.259430";
const PAGODA: &str = "108.964177,34.218490";
const MUSLIM_QUARTER: &str = "108.940000,34.265000";

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        amap: AmapConfig::for_testing(&server.uri()),
        retry: RetryConfig::new(1, 5, 2.0, 2).without_jitter(),
        ..AppConfig::default()
    }
}

fn geocode_body(location: &str) -> String {
    format!(
        r#"{{"status": "1", "info": "OK", "infocode": "10000", "count": "1",
            "geocodes": [{{"formatted_address": "陕西省西安市", "location": "{location}", "level": "兴趣点"}}]}}"#
    )
}

const NO_MATCH: &str =
    r#"{"status": "1", "info": "OK", "infocode": "10000", "count": "0", "geocodes": []}"#;

fn distance_body(distances: [u64; 3]) -> String {
    let results: Vec<String> = distances
        .iter()
        .enumerate()
        .map(|(i, d)| {
            format!(
                r#"{{"origin_id": "{}", "dest_id": "1", "distance": "{d}", "duration": "{}"}}"#,
                i + 1,
                d / 10
            )
        })
        .collect();
    format!(
        r#"{{"status": "1", "info": "OK", "infocode": "10000", "count": "3", "results": [{}]}}"#,
        results.join(",")
    )
}

async fn mount_geocode(server: &MockServer, address: &str, body: String) {
    Mock::given(method("GET"))
        .and(path("/v3/geocode/geo"))
        .and(query_param("address", address))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_column(server: &MockServer, destination: &str, distances: [u64; 3]) {
    Mock::given(method("GET"))
        .and(path("/v3/distance"))
        .and(query_param("destination", destination))
        .and(query_param("type", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(distance_body(distances)))
        .mount(server)
        .await;
}

/// Geocodes for 钟楼, 大雁塔, 回民街; Atlantis has no match
async fn mount_places(server: &MockServer) {
    mount_geocode(server, "钟楼", geocode_body(BELL_TOWER)).await;
    mount_geocode(server, "大雁塔", geocode_body(PAGODA)).await;
    mount_geocode(server, "回民街", geocode_body(MUSLIM_QUARTER)).await;
    mount_geocode(server, "Atlantis", NO_MATCH.to_string()).await;
}

fn optimize_call(destinations: &[&str]) -> ToolCall {
    serde_json::from_value(serde_json::json!({
        "tool": "optimize_route",
        "origin": "钟楼",
        "destinations": destinations,
    }))
    .unwrap()
}

#[tokio::test]
async fn unresolvable_destination_is_dropped_and_noted() {
    let server = MockServer::start().await;
    mount_places(&server).await;
    // Columns over [钟楼, 大雁塔, 回民街]
    mount_column(&server, BELL_TOWER, [0, 5_000, 800]).await;
    mount_column(&server, PAGODA, [5_000, 0, 5_600]).await;
    mount_column(&server, MUSLIM_QUARTER, [800, 5_600, 0]).await;

    let tools = build_map_tools(&config_for(&server)).unwrap();
    let reply = tools
        .dispatch(
            optimize_call(&["大雁塔", "Atlantis", "回民街"]),
            &CancellationToken::new(),
        )
        .await;

    assert!(reply.success, "{}", reply.text);
    assert!(reply.text.contains("钟楼 -> 回民街 -> 大雁塔"));
    assert!(reply.text.contains("Total Distance: 6400 meters"));
    assert!(reply.text.contains("Note: skipped 'Atlantis' (location not found)"));
    assert_eq!(reply.data["order"], serde_json::json!(["钟楼", "回民街", "大雁塔"]));
    assert_eq!(reply.data["dropped"][0]["name"], "Atlantis");

    let columns = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/v3/distance")
        .count();
    assert_eq!(columns, 3);
}

#[tokio::test]
async fn failed_matrix_column_fails_the_route() {
    let server = MockServer::start().await;
    mount_places(&server).await;
    mount_column(&server, BELL_TOWER, [0, 5_000, 800]).await;
    mount_column(&server, MUSLIM_QUARTER, [800, 5_600, 0]).await;
    Mock::given(method("GET"))
        .and(path("/v3/distance"))
        .and(query_param("destination", PAGODA))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let tools = build_map_tools(&config_for(&server)).unwrap();
    let err = tools
        .optimize_route(
            "钟楼",
            &["大雁塔".to_string(), "回民街".to_string()],
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::MatrixBuild { column: 1, .. }), "{err:?}");
}

#[tokio::test]
async fn transient_geocode_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/geocode/geo"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_geocode(&server, "钟楼", geocode_body(BELL_TOWER)).await;

    let tools = build_map_tools(&config_for(&server)).unwrap();
    let found = tools.resolve_coordinates("钟楼").await.unwrap();

    assert_eq!(found.to_provider_string(), BELL_TOWER);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn repeated_geocodes_are_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/geocode/geo"))
        .and(query_param("address", "钟楼"))
        .respond_with(ResponseTemplate::new(200).set_body_string(geocode_body(BELL_TOWER)))
        .expect(1)
        .mount(&server)
        .await;

    let tools = build_map_tools(&config_for(&server)).unwrap();
    for _ in 0..3 {
        assert!(tools.resolve_coordinates("钟楼").await.is_ok());
    }
}

#[tokio::test]
async fn two_stop_route_skips_the_matrix() {
    let server = MockServer::start().await;
    mount_places(&server).await;
    Mock::given(method("GET"))
        .and(path("/v3/distance"))
        .and(query_param("origins", BELL_TOWER))
        .and(query_param("destination", PAGODA))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status": "1", "info": "OK", "infocode": "10000", "count": "1",
                "results": [{"origin_id": "1", "dest_id": "1", "distance": "5230", "duration": "960"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let tools = build_map_tools(&config_for(&server)).unwrap();
    let route = tools
        .optimize_route("钟楼", &["大雁塔".to_string()], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(route.visit_names(), vec!["钟楼", "大雁塔"]);
    assert_eq!(route.total_cost, 5_230);
}

#[tokio::test]
async fn transit_estimate_uses_default_city() {
    let server = MockServer::start().await;
    mount_places(&server).await;
    Mock::given(method("GET"))
        .and(path("/v3/direction/transit/integrated"))
        .and(query_param("city", "西安"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status": "1", "info": "OK", "infocode": "10000", "count": "1",
                "route": {"distance": "6100", "taxi_cost": "18",
                    "transits": [{"cost": "2", "duration": "1800", "walking_distance": "700", "distance": "6100",
                        "segments": [{"bus": {"buslines": [{"name": "地铁2号线(北客站--常宁宫)"}]}, "railway": []}]}]}}"#,
        ))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.amap.default_city = Some("西安".to_string());
    let tools = build_map_tools(&config).unwrap();

    let segment = tools
        .estimate_travel("钟楼", "大雁塔", domain::TravelMode::Transit, None)
        .await
        .unwrap();
    assert_eq!(segment.duration_seconds, 1_800);
    assert_eq!(segment.monetary_cost, Some(2.0));
}

#[tokio::test]
async fn missing_key_fails_before_any_request() {
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    config.amap.api_key = None;

    let err = build_map_tools(&config).unwrap_err();
    assert!(matches!(err, ApplicationError::MissingCredential(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_api_key_aborts_the_route() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/geocode/geo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status": "0", "info": "INVALID_USER_KEY", "infocode": "10001"}"#,
        ))
        .mount(&server)
        .await;

    let tools = build_map_tools(&config_for(&server)).unwrap();
    let reply = tools
        .dispatch(optimize_call(&["大雁塔", "回民街"]), &CancellationToken::new())
        .await;

    assert!(!reply.success);
    assert_eq!(reply.error_code.as_deref(), Some("INVALID_CREDENTIAL"));
    assert!(reply.text.contains("INVALID_USER_KEY"), "{}", reply.text);
    assert!(server.received_requests().await.unwrap().len() <= 3);
}

#[tokio::test]
async fn cancelling_abandons_a_slow_estimate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/geocode/geo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(geocode_body(BELL_TOWER))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let tools = build_map_tools(&config_for(&server)).unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let reply = tools
        .dispatch(
            serde_json::from_value(serde_json::json!({
                "tool": "estimate_travel",
                "origin": "钟楼",
                "destination": "大雁塔",
            }))
            .unwrap(),
            &cancel,
        )
        .await;

    assert!(!reply.success);
    assert_eq!(reply.error_code.as_deref(), Some("CANCELLED"));
    assert!(started.elapsed() < Duration::from_secs(1));
}
