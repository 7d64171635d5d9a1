use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{AggregateReadinessReport, PropertyId, PropertyRecord, Trade};
use super::profiles::ProfileSet;
use super::service::{PropertyReadinessService, ReadinessServiceError};
use super::source::ReadinessSource;
use super::store::PropertyStore;
use super::ReadinessEngine;

/// Routes computing readiness for records posted by the caller.
///
/// These are the endpoints a [`super::RemoteReadinessSource`] talks to.
pub fn engine_router(engine: Arc<ReadinessEngine>) -> Router {
    Router::new()
        .route("/api/v1/readiness", post(aggregate_handler))
        .route("/api/v1/readiness/trades/:trade", post(trade_handler))
        .route("/api/v1/readiness/profiles", get(profiles_handler))
        .with_state(engine)
}

/// Routes computing readiness for properties held in a store.
pub fn property_router<S, R>(service: Arc<PropertyReadinessService<S, R>>) -> Router
where
    S: PropertyStore + 'static,
    R: ReadinessSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/properties/:property_id/readiness",
            get(property_handler::<S, R>),
        )
        .route(
            "/api/v1/properties/:property_id/readiness/:trade",
            get(property_trade_handler::<S, R>),
        )
        .with_state(service)
}

pub fn readiness_router<S, R>(
    engine: Arc<ReadinessEngine>,
    service: Arc<PropertyReadinessService<S, R>>,
) -> Router
where
    S: PropertyStore + 'static,
    R: ReadinessSource + 'static,
{
    engine_router(engine).merge(property_router(service))
}

pub(crate) async fn aggregate_handler(
    State(engine): State<Arc<ReadinessEngine>>,
    Json(record): Json<PropertyRecord>,
) -> Json<AggregateReadinessReport> {
    Json(engine.aggregate(&record))
}

pub(crate) async fn trade_handler(
    State(engine): State<Arc<ReadinessEngine>>,
    Path(trade): Path<String>,
    Json(record): Json<PropertyRecord>,
) -> Response {
    match trade.parse::<Trade>() {
        Ok(trade) => {
            let result = engine.trade_readiness(&record, trade);
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(error) => unknown_trade(error),
    }
}

pub(crate) async fn profiles_handler(
    State(engine): State<Arc<ReadinessEngine>>,
) -> Json<ProfileSet> {
    Json(engine.profiles().clone())
}

pub(crate) async fn property_handler<S, R>(
    State(service): State<Arc<PropertyReadinessService<S, R>>>,
    Path(property_id): Path<String>,
) -> Response
where
    S: PropertyStore + 'static,
    R: ReadinessSource + 'static,
{
    let id = PropertyId(property_id);
    match service.readiness(&id).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn property_trade_handler<S, R>(
    State(service): State<Arc<PropertyReadinessService<S, R>>>,
    Path((property_id, trade)): Path<(String, String)>,
) -> Response
where
    S: PropertyStore + 'static,
    R: ReadinessSource + 'static,
{
    let trade = match trade.parse::<Trade>() {
        Ok(trade) => trade,
        Err(error) => return unknown_trade(error),
    };

    let id = PropertyId(property_id);
    match service.trade_readiness(&id, trade).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(error) => service_error(error),
    }
}

fn unknown_trade(error: super::UnknownTrade) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn service_error(error: ReadinessServiceError) -> Response {
    let status = match &error {
        ReadinessServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ReadinessServiceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        ReadinessServiceError::Source(_) => StatusCode::BAD_GATEWAY,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
