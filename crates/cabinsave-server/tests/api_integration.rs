//! End-to-end tests for the HTTP API with mocked upstream providers.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use cabinsave_core::{Config, GeocodingConfig, WeatherConfig};
use cabinsave_server::{create_router, AppState};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> Router {
    let config = Config {
        geocoding: GeocodingConfig {
            url: format!("{}/search", server.uri()),
            ..GeocodingConfig::default()
        },
        weather: WeatherConfig {
            archive_url: format!("{}/v1/archive", server.uri()),
            timeout_secs: None,
        },
        ..Config::default()
    };
    create_router(AppState::from_config(&config).unwrap())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let (status, body) = send(app_for(&server), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_geocode_returns_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Hemsedal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "lat": "60.8630",
            "lon": "8.5530",
            "display_name": "Hemsedal, Buskerud, Norge",
            "address": { "village": "Hemsedal", "country": "Norge" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(app_for(&server), get("/geocode?q=Hemsedal")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!([{ "name": "Hemsedal, Norge", "lat": 60.863, "lon": 8.553 }])
    );
}

#[tokio::test]
async fn test_geocode_falls_back_when_provider_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (status, body) = send(app_for(&server), get("/geocode?q=geilo")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Geilo"]);
}

#[tokio::test]
async fn test_geocode_blank_query_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for uri in ["/geocode", "/geocode?q=", "/geocode?q=%20%20"] {
        let (status, body) = send(app_for(&server), get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }
}

#[tokio::test]
async fn test_frost_requires_coordinates() {
    let server = MockServer::start().await;

    for uri in ["/frost", "/frost?lat=61.2", "/frost?lat=&lon=8.9"] {
        let (status, body) = send(app_for(&server), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "lat og lon kreves");
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_frost_rejects_invalid_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send(app_for(&server), get("/frost?lat=abc&lon=8.9")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Ugyldige koordinater");
}

#[tokio::test]
async fn test_frost_estimate() {
    let server = MockServer::start().await;
    let times = season_dates(150);
    let temps = vec![serde_json::json!(-4.0); 150];

    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("latitude", "61.2489"))
        .and(query_param("longitude", "8.9091"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": { "time": times, "temperature_2m_mean": temps }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(app_for(&server), get("/frost?lat=61.2489&lon=8.9091")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestedWinterMonths"], 5);
    assert_eq!(body["frostDays"], 150);
    assert_eq!(body["note"], cabinsave_weather::NOTE_BASED_ON_DATA);
}

#[tokio::test]
async fn test_frost_upstream_failure_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, body) = send(app_for(&server), get("/frost?lat=60.0&lon=9.0")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestedWinterMonths"], 4);
    assert!(body["frostDays"].is_null());
    assert_eq!(body["note"], cabinsave_weather::NOTE_NO_DATA);
}

#[tokio::test]
async fn test_calculate_report() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/calculate")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "winterMonths": 4,
                "floorAreaM2": 100.0,
                "cabinAgeClass": "normal",
                "priceMode": "standard"
            })
            .to_string(),
        ))
        .unwrap();

    let (status, body) = send(app_for(&server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["frostProtectionKwh"], 7500.0);
    assert_eq!(body["formattedSaving"], "3\u{a0}664");
    assert_eq!(body["pricePerKwh"], 0.5);
}

fn post_calculate(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/calculate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_calculate_tolerates_unknown_age_and_whole_float_months() {
    let server = MockServer::start().await;
    let request = post_calculate(serde_json::json!({
        "winterMonths": 4.0,
        "floorAreaM2": 100.0,
        "cabinAgeClass": "ancient"
    }));

    let (status, body) = send(app_for(&server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baselineKwhPerM2"], 75.0);
    assert_eq!(body["frostProtectionKwh"], 7500.0);
    assert_eq!(body["cabinAgeLabel"], "Ikke valgt");
}

#[tokio::test]
async fn test_calculate_bad_body_is_json_400() {
    let server = MockServer::start().await;

    let (status, body) = send(
        app_for(&server),
        post_calculate(serde_json::json!({ "winterMonths": 4, "floorAreaM2": "100" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    let (status, body) = send(
        app_for(&server),
        post_calculate(serde_json::json!({ "winterMonths": 4.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

/// Consecutive dates from 2024-11-01 as ISO strings.
fn season_dates(n: usize) -> Vec<String> {
    const DAYS: [u32; 5] = [30, 31, 31, 28, 31];
    let months = [(2024, 11), (2024, 12), (2025, 1), (2025, 2), (2025, 3)];
    months
        .iter()
        .zip(DAYS)
        .flat_map(|(&(y, m), days)| (1..=days).map(move |d| format!("{y}-{m:02}-{d:02}")))
        .take(n)
        .collect()
}
