use crate::infra::AppState;
use axum::body::Bytes;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use estimate_readiness::error::AppError;
use estimate_readiness::readiness::{
    readiness_router, AggregateReadinessReport, PropertyReadinessService, PropertyRecord,
    PropertyStore, ReadinessEngine, ReadinessSource, Trade, TradeReadinessResult,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_readiness_routes<S, R>(
    engine: Arc<ReadinessEngine>,
    service: Arc<PropertyReadinessService<S, R>>,
) -> axum::Router
where
    S: PropertyStore + 'static,
    R: ReadinessSource + 'static,
{
    readiness_router(engine, service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/score", axum::routing::post(score_endpoint))
        .route("/api/v1/score/:trade", axum::routing::post(score_trade_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Scores a posted record through the configured backend, which may be a
/// remote readiness service.
pub(crate) async fn score_endpoint(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Result<Json<AggregateReadinessReport>, AppError> {
    let record: PropertyRecord = serde_json::from_slice(&body)?;
    let report = state.backend.aggregate_readiness(&record).await?;
    Ok(Json(report))
}

pub(crate) async fn score_trade_endpoint(
    Extension(state): Extension<AppState>,
    Path(trade): Path<String>,
    body: Bytes,
) -> Result<Json<TradeReadinessResult>, AppError> {
    let trade: Trade = trade.parse()?;
    let record: PropertyRecord = serde_json::from_slice(&body)?;
    let result = state.backend.trade_readiness(&record, trade).await?;
    Ok(Json(result))
}
