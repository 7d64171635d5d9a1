use super::common::*;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::readiness::{
    readiness_router, AggregateReadinessReport, PropertyRecord, PropertyReadinessService,
    ReadinessEngine, Trade, TradeReadinessResult, UnknownTrade,
};
use crate::readiness::{engine_router, property_router, LocalReadinessSource};

fn post_record(uri: &str, record: &PropertyRecord) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(record).expect("record encodes"),
        ))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

#[tokio::test]
async fn aggregate_route_scores_posted_records() {
    let engine = Arc::new(ReadinessEngine::standard());
    let router = engine_router(engine.clone());

    let response = router
        .oneshot(post_record("/api/v1/readiness", &tracked_fields_record()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let report: AggregateReadinessReport =
        serde_json::from_value(json_body(response).await).expect("report decodes");
    let local = engine.aggregate(&tracked_fields_record());
    assert!(report.same_assessment(&local));
}

#[tokio::test]
async fn trade_route_matches_the_engine() {
    let engine = Arc::new(ReadinessEngine::standard());
    let router = engine_router(engine.clone());

    let response = router
        .oneshot(post_record(
            "/api/v1/readiness/trades/plumbing",
            &basics_only_record(),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let result: TradeReadinessResult =
        serde_json::from_value(json_body(response).await).expect("result decodes");
    assert_eq!(
        result,
        engine.trade_readiness(&basics_only_record(), Trade::Plumbing)
    );
}

#[tokio::test]
async fn unknown_trade_is_not_found() {
    let router = engine_router(Arc::new(ReadinessEngine::standard()));

    let response = router
        .oneshot(post_record(
            "/api/v1/readiness/trades/roofing",
            &empty_record(),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(
        body["error"],
        Value::String(UnknownTrade("roofing".to_string()).to_string())
    );
}

#[tokio::test]
async fn profiles_route_exposes_the_active_set() {
    let router = engine_router(Arc::new(ReadinessEngine::standard()));

    let response = router
        .oneshot(get("/api/v1/readiness/profiles"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["version"], "2024.1");
    assert_eq!(body["profiles"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["profiles"][0]["fields"][2]["presencePolicy"], "strict_array");
}

#[tokio::test]
async fn property_route_serves_stored_properties() {
    let (service, store, _) = build_service();
    store.put("prop-9", tracked_fields_record(), computed_at());
    let router = readiness_router(Arc::new(ReadinessEngine::standard()), service);

    let response = router
        .clone()
        .oneshot(get("/api/v1/properties/prop-9/readiness"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["readyCount"], 3);

    let response = router
        .clone()
        .oneshot(get("/api/v1/properties/prop-9/readiness/electrical"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["confidence"], 100);

    let response = router
        .oneshot(get("/api/v1/properties/unknown/readiness"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn property_trade_route_rejects_unknown_trades() {
    let (service, store, _) = build_service();
    store.put("prop-9", tracked_fields_record(), computed_at());

    let response = property_router(service)
        .oneshot(get("/api/v1/properties/prop-9/readiness/roofing"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_outage_is_service_unavailable() {
    let service = Arc::new(PropertyReadinessService::new(
        Arc::new(UnavailableStore),
        Arc::new(LocalReadinessSource::default()),
        8,
    ));

    let response = property_router(service)
        .oneshot(get("/api/v1/properties/prop-1/readiness"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
