#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{Request, StatusCode},
    Router,
};
use energy_s::api_server::ApiServer;
use energy_s::registry::ModelName;
use energy_s::util::config::{GatewayConfig, MissingModelPolicy};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Three bands on `feature`: class 1 up to `low`, class 2 up to `high`,
/// class 0 above.
fn three_band(feature: i64, low: f64, high: f64) -> Value {
    json!({
        "children_left": [1, -1, 3, -1, -1],
        "children_right": [2, -1, 4, -1, -1],
        "feature": [feature, -2, feature, -2, -2],
        "threshold": [low, -2.0, high, -2.0, -2.0],
        "value": [
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0]
        ]
    })
}

/// Artifact documents with hand-checkable outputs:
///
/// - pax = 1000.4 + 100 * is_hari_kerja - 50 * is_libur
/// - terminal = 100 + 0.5 * pax + 10 * suhu_rata + 2 * suhu_max
/// - kantor = 50.126 + 200 * is_hari_kerja + 5 * suhu_rata + suhu_max
/// - area classifiers band the deviation at -10 and 10
/// - usage classifier bands the kWh delta at -10 and 5 and ships text labels
pub fn artifact(name: ModelName) -> Value {
    let model = match name {
        ModelName::Pax => json!({
            "linear_regressor": { "coef": [0.0, 0.0, 0.0, 100.0, -50.0], "intercept": 1000.4 }
        }),
        ModelName::Terminal => json!({
            "linear_regressor": { "coef": [0.5, 10.0, 2.0], "intercept": 100.0 }
        }),
        ModelName::Kantor => json!({
            "linear_regressor": { "coef": [200.0, 5.0, 1.0], "intercept": 50.126 }
        }),
        ModelName::TerminalClassifier | ModelName::KantorClassifier => json!({
            "decision_tree_classifier": {
                "classes": [0, 1, 2],
                "labels": null,
                "tree": three_band(2, -10.0, 10.0)
            }
        }),
        ModelName::UsageClassifier => json!({
            "random_forest_classifier": {
                "classes": [0, 1, 2],
                "labels": ["BOROS", "HEMAT", "NORMAL"],
                "trees": [three_band(0, -10.0, 5.0), three_band(0, -10.0, 5.0)]
            }
        }),
    };
    json!({ "feature_names": name.features(), "model": model })
}

/// Write every artifact except `skip` into a fresh directory and point a
/// config at it.
pub fn config_with(skip: &[ModelName], policy: MissingModelPolicy) -> (TempDir, GatewayConfig) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = GatewayConfig::default();
    config.models.dir = dir.path().to_path_buf();
    config.models.on_missing = policy;
    for name in ModelName::ALL {
        if skip.contains(&name) {
            continue;
        }
        let body = serde_json::to_vec_pretty(&artifact(name)).unwrap();
        std::fs::write(config.models.path_for(name), body).unwrap();
    }
    (dir, config)
}

pub fn router_with(skip: &[ModelName], policy: MissingModelPolicy) -> (TempDir, Router) {
    let (dir, config) = config_with(skip, policy);
    let server = ApiServer::new(&config).unwrap();
    (dir, Arc::new(server).create_api_router())
}

pub fn router() -> (TempDir, Router) {
    router_with(&[], MissingModelPolicy::Abort)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

pub async fn post_raw(app: &Router, uri: &str, body: Value) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, bytes) = post_raw(app, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub fn internal_error_body() -> Value {
    json!({
        "error": "Internal Server Error",
        "message": "Terjadi kesalahan internal pada server."
    })
}
