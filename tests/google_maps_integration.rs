//! Integration tests for the geo-fix stage against a mocked Google Maps API
//!
//! Covers key rotation on quota errors and the full JSON-lines flow.

use profile_geofix::{
    Coordinates, Credential, GeocodeResolver, GoogleMapsGeocoder, JsonLinesPipeline,
    ProfileGeoFixer, ProfileLocation, ResolutionOutcome, ResolverConfig,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

fn keys(names: &[&str]) -> Vec<Credential> {
    names.iter().map(|n| Credential::new(*n)).collect()
}

fn resolver(server: &MockServer, names: &[&str], sentinel: bool) -> GeocodeResolver {
    let timeout = Duration::from_secs(2);
    let geocoder = GoogleMapsGeocoder::new(&server.uri(), timeout).unwrap();
    let config = ResolverConfig::new(sentinel).call_timeout(timeout);
    GeocodeResolver::new(keys(names), Arc::new(geocoder), config).unwrap()
}

fn found(lat: f64, lng: f64) -> ResolutionOutcome {
    ResolutionOutcome::Found(Coordinates::new(lat, lng))
}

fn paris() -> serde_json::Value {
    json!({
        "status": "OK",
        "results": [{
            "formatted_address": "Paris, France",
            "geometry": { "location": { "lat": 48.8566, "lng": 2.3522 } }
        }]
    })
}

/// Exhausted key is rotated away and the lookup retried with the next one
#[tokio::test]
async fn test_quota_exhausted_key_is_rotated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .and(query_param("key", "key-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OVER_DAILY_LIMIT",
            "results": [],
            "error_message": "You have exceeded your daily request quota for this API."
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .and(query_param("key", "key-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = resolver(&server, &["key-a", "key-b", "key-c"], false);

    let first = resolver.resolve(&ProfileLocation::new("Paris")).await;
    assert_eq!(first, found(48.8566, 2.3522));
    assert_eq!(resolver.pool().active_index(), 1);

    // Second record goes straight to key-b
    let second = resolver.resolve(&ProfileLocation::new("Paris")).await;
    assert_eq!(second, found(48.8566, 2.3522));
}

/// Two quota errors in a row give up on the record but keep the rotation
#[tokio::test]
async fn test_double_quota_gives_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OVER_QUERY_LIMIT",
            "results": []
        })))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = resolver(&server, &["key-a", "key-b"], true);

    let outcome = resolver.resolve(&ProfileLocation::new("Paris")).await;
    assert_eq!(outcome, ResolutionOutcome::NotFound);
    assert_eq!(resolver.pool().active_index(), 1);
}

/// No match with the sentinel enabled yields (-1, -1)
#[tokio::test]
async fn test_zero_results_with_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .and(query_param("address", "Nowhereville"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver(&server, &["key-a"], true);

    let outcome = resolver.resolve(&ProfileLocation::new("Nowhereville")).await;
    assert_eq!(outcome, ResolutionOutcome::Found(Coordinates::SENTINEL));
}

/// Provider outage degrades to NotFound instead of failing
#[tokio::test]
async fn test_server_error_degrades_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver(&server, &["key-a", "key-b"], true);

    let outcome = resolver.resolve(&ProfileLocation::new("Paris")).await;
    assert_eq!(outcome, ResolutionOutcome::NotFound);
    assert_eq!(resolver.pool().active_index(), 0);
}

/// Records with coordinates never reach the provider
#[tokio::test]
async fn test_known_coordinates_make_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = resolver(&server, &["key-a"], false);

    let loc = ProfileLocation::new("Paris").with_coordinates(1.0, 2.0);
    let outcome = resolver.resolve(&loc).await;
    assert_eq!(outcome, found(1.0, 2.0));

    let outcome = resolver.resolve(&ProfileLocation::default()).await;
    assert_eq!(outcome, ResolutionOutcome::Skipped);
}

/// Full stream: every record comes out, only the resolvable one is fixed
#[tokio::test]
async fn test_pipeline_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .and(query_param("address", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .and(query_param("address", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let fixer = ProfileGeoFixer::new(Arc::new(resolver(&server, &["key-a"], false)));
    let pipeline = JsonLinesPipeline::new(fixer, 4);

    let input = r#"{"username":"amelie","location":"Paris"}
{"username":"aquaman","location":"Atlantis"}
{"username":"ghost"}
"#;
    let mut out = Vec::new();

    let stats = pipeline.run(input.as_bytes(), &mut out).await.unwrap();
    assert_eq!(stats.forwarded, 3);
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.invalid, 0);

    let records: Vec<serde_json::Value> = std::str::from_utf8(&out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(
        records[0],
        json!({"username": "amelie", "location": "Paris", "latitude": 48.8566, "longitude": 2.3522})
    );
    let aquaman = json!({"username": "aquaman", "location": "Atlantis"});
    assert_eq!(records[1], aquaman);
    assert_eq!(records[2], json!({"username": "ghost"}));
}
