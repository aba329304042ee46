use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::intake::intake_router;

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("json body")))
        .expect("request builds")
}

async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    (status, read_json_body(response).await)
}

async fn command(router: &axum::Router, session_id: &str, body: Value) -> (StatusCode, Value) {
    send(
        router,
        post(
            &format!("/api/v1/intake/sessions/{session_id}/commands"),
            body,
        ),
    )
    .await
}

#[tokio::test]
async fn open_session_returns_a_fresh_wizard() {
    let router = intake_router(registry(MemoryGateway::default()));

    let (status, body) = send(&router, post("/api/v1/intake/sessions", json!({}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["phase"], "selection");
    assert_eq!(body["phase_index"], 0);
    assert_eq!(body["selected_service"], Value::Null);
    assert_eq!(body["form"]["bottleSize"], "12.5kg");
}

#[tokio::test]
async fn commands_drive_the_wizard_to_confirmation() {
    let registry = registry(MemoryGateway::default());
    let router = intake_router(registry.clone());
    let (_, opened) = send(&router, post("/api/v1/intake/sessions", json!({}))).await;
    let id = opened["session_id"].as_str().expect("session id").to_string();

    let (status, body) = command(
        &router,
        &id,
        json!({ "action": "select_service", "service": "gas" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "details");
    assert_eq!(body["sub_step"], 1);
    assert_eq!(body["max_sub_steps"], 1);

    let (status, body) = command(&router, &id, json!({ "action": "advance" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "bottleBrand");
    assert_eq!(body["session"]["phase"], "details");

    for (field, value) in [
        ("bottleBrand", "Total"),
        ("contactName", "Jean"),
        ("contactPhone", "699000000"),
    ] {
        let (status, _) = command(
            &router,
            &id,
            json!({ "action": "set_field", "field": field, "value": value }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = command(&router, &id, json!({ "action": "advance" })).await;
    assert_eq!(body["phase"], "contact");

    let (status, body) = command(&router, &id, json!({ "action": "advance" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "confirmation");
    assert_eq!(body["phase_index"], 3);

    let stored = registry.gateway().requests();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].contact_phone, "699000000");
}

#[tokio::test]
async fn gateway_failure_maps_to_bad_gateway() {
    let router = intake_router(registry(OfflineGateway::default()));
    let (_, opened) = send(&router, post("/api/v1/intake/sessions", json!({}))).await;
    let id = opened["session_id"].as_str().expect("session id").to_string();

    for body in [
        json!({ "action": "select_service", "service": "other" }),
        json!({ "action": "set_field", "field": "details", "value": "Réparer un portail" }),
        json!({ "action": "advance" }),
        json!({ "action": "set_field", "field": "contactName", "value": "Jean" }),
        json!({ "action": "set_field", "field": "contactPhone", "value": "699000000" }),
    ] {
        let (status, _) = command(&router, &id, body).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = command(&router, &id, json!({ "action": "advance" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["session"]["phase"], "contact");
    assert_eq!(body["session"]["submitting"], false);
}

#[tokio::test]
async fn invalid_transitions_conflict() {
    let router = intake_router(registry(MemoryGateway::default()));
    let (_, opened) = send(&router, post("/api/v1/intake/sessions", json!({}))).await;
    let id = opened["session_id"].as_str().expect("session id").to_string();

    let (status, body) = command(&router, &id, json!({ "action": "retreat" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "cannot go back during the selection phase");
}

#[tokio::test]
async fn unknown_sessions_are_not_found() {
    let router = intake_router(registry(MemoryGateway::default()));

    let (status, body) = command(&router, "ses-404", json!({ "action": "advance" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["session_id"], "ses-404");

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/v1/intake/sessions/ses-404")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn closing_a_session_discards_it() {
    let registry = registry(MemoryGateway::default());
    let router = intake_router(registry.clone());
    let (_, opened) = send(&router, post("/api/v1/intake/sessions", json!({}))).await;
    let id = opened["session_id"].as_str().expect("session id").to_string();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/v1/intake/sessions/{id}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn quick_order_route_validates_and_submits() {
    let registry = registry(MemoryGateway::default());
    let router = intake_router(registry.clone());

    let (status, body) = send(
        &router,
        post(
            "/api/v1/requests/quick-order",
            json!({ "nom": "Awa", "telephone": "677112233", "service": "gas" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "description");

    let (status, body) = send(
        &router,
        post(
            "/api/v1/requests/quick-order",
            json!({
                "nom": "Awa",
                "telephone": "677112233",
                "service": "gas",
                "description": "Deux bouteilles",
                "adresse": "Bonapriso"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["payload"]["type"], "commande_generale");
    assert_eq!(registry.gateway().requests().len(), 1);
}
