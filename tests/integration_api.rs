//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use v2g_fleet::api::{AppState, router};
use v2g_fleet::config::ScenarioConfig;
use v2g_fleet::fleet;

/// Generate the oxford fleet and return the API state.
fn build_api_state() -> Arc<AppState> {
    let scenario = ScenarioConfig::oxford();
    let fleet = fleet::generate(&scenario.fleet).expect("oxford fleet params are valid");
    Arc::new(AppState { scenario, fleet })
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn scenario_endpoint_echoes_config() {
    let app = router(build_api_state());
    let req = Request::builder()
        .uri("/scenario")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["fleet"]["count"], 1000);
    assert_eq!(json["fleet"]["seed"], 42);
    assert_eq!(json["allocation"]["max_distance_km"], 20.0);
}

#[tokio::test]
async fn fleet_endpoint_matches_generator() {
    let state = build_api_state();
    let expected = state.fleet.len();
    let app = router(state);
    let req = Request::builder()
        .uri("/fleet")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json.as_array().map(Vec::len), Some(expected));
}

#[tokio::test]
async fn allocate_charge_reports_full_delivery() {
    let app = router(build_api_state());
    let resp = app
        .oneshot(post_json("/allocate", r#"{"delta_kwh": 120.0}"#.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["allocation"]["direction"], "charge");
    assert_eq!(json["allocation"]["status"], "allocated");
    let delivered = json["report"]["delivered_kwh"].as_f64().unwrap();
    assert!((delivered - 120.0).abs() < 1e-6);
}

#[tokio::test]
async fn allocate_rejects_missing_delta() {
    let app = router(build_api_state());
    let resp = app
        .oneshot(post_json("/allocate", "{}".to_string()))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn dispatch_derives_shortfall_from_forecasts() {
    let app = router(build_api_state());
    let body = serde_json::json!({
        "day_ahead": {
            "timestamp": "2024-07-03T00:00:00+00:00",
            "predictions": [
                {"power_kw": 2000.0}, {"power_kw": 2400.0}, {"power_kw": 2800.0}, {"power_kw": 3000.0}
            ]
        },
        "rolling": {
            "timestamp": "2024-07-03T11:45:00+00:00",
            "predictions": [
                {"power_kw": 1800.0}, {"power_kw": 2000.0}, {"power_kw": 2200.0}
            ]
        }
    });
    let resp = app
        .oneshot(post_json("/dispatch", body.to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    // planned = (2200 + 2600) / 4 = 1200, current = (1900 + 2100) / 4 = 1000
    let delta = json["delta_kwh"].as_f64().unwrap();
    assert!((delta - -200.0).abs() < 1e-9);
    assert_eq!(json["allocation"]["direction"], "discharge");
    // -(1.2 * 0.1 * 0.05) + 0.05 * 0.1 + 2 * 0.1 * 199.95
    let value = json["value"].as_f64().unwrap();
    assert!((value - 39.989).abs() < 1e-6, "value: {value}");
    assert!(json["report"]["eligible_count"].as_u64().unwrap() > 0);
}
