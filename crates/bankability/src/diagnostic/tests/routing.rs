use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::diagnostic::router::diagnostic_router;

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn scores_a_submission() {
    let (service, notifier) = build_service();
    let app = diagnostic_router(service);
    let form = serde_json::to_value(ideal_form()).expect("form serializes");

    let response = app
        .oneshot(post("/api/v1/diagnostics?today=2025-01-05", &form))
        .await
        .expect("request handled");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["global_score"]["total_score"], 100);
    assert_eq!(body["global_score"]["diagnostic"]["label"], "FEU VERT");
    assert_eq!(body["delay"]["points"], 10);
    assert_eq!(notifier.payloads().len(), 1);
}

#[tokio::test]
async fn accepts_native_json_numbers_and_booleans() {
    let (service, _) = build_service();
    let app = diagnostic_router(service);
    let mut form = serde_json::to_value(ideal_form()).expect("form serializes");
    form["montantHT"] = serde_json::json!(100_000_000);
    form["montantDemande"] = serde_json::json!(60_000_000.0);
    form["consent"] = serde_json::json!(true);

    let response = app
        .oneshot(post("/api/v1/diagnostics?today=2025-01-05", &form))
        .await
        .expect("request handled");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["global_score"]["total_score"], 100);
}

#[tokio::test]
async fn null_fields_are_scored_as_unanswered() {
    let (service, _) = build_service();
    let app = diagnostic_router(service);
    let mut form = serde_json::to_value(ideal_form()).expect("form serializes");
    form["valeurBien"] = Value::Null;
    form["tauxAvanceDemarrage"] = Value::Null;

    let response = app
        .oneshot(post("/api/v1/diagnostics?today=2025-01-05", &form))
        .await
        .expect("request handled");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["amount_coherence"]["forecast_advance"], 0.0);
    assert_eq!(body["global_score"]["breakdown"]["collateral"], 3);
    assert_eq!(body["global_score"]["total_score"], 93);
}

#[tokio::test]
async fn missing_fields_are_unprocessable() {
    let (service, notifier) = build_service();
    let app = diagnostic_router(service);
    let form = serde_json::json!({ "montantHT": "1000", "consent": "on" });

    let response = app
        .oneshot(post("/api/v1/diagnostics", &form))
        .await
        .expect("request handled");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"], "missing required fields");
    let missing: Vec<&str> = body["missing_fields"]
        .as_array()
        .expect("array of fields")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(
        missing,
        vec![
            "montantDemande",
            "dateSignatureOS",
            "dateFinPrevue",
            "typeMaitreOuvrage"
        ]
    );
    assert!(notifier.payloads().is_empty());
}

#[tokio::test]
async fn missing_consent_is_unprocessable() {
    let (service, _) = build_service();
    let app = diagnostic_router(service);
    let mut form = serde_json::to_value(ideal_form()).expect("form serializes");
    form["consent"] = Value::String(String::new());

    let response = app
        .oneshot(post("/api/v1/diagnostics?today=2025-01-05", &form))
        .await
        .expect("request handled");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("consent"));
}

#[tokio::test]
async fn malformed_today_is_a_bad_request() {
    let (service, notifier) = build_service();
    let app = diagnostic_router(service);
    let form = serde_json::to_value(ideal_form()).expect("form serializes");

    let response = app
        .oneshot(post("/api/v1/diagnostics?today=05/01/2025", &form))
        .await
        .expect("request handled");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("05/01/2025"));
    assert!(notifier.payloads().is_empty());
}
