use crate::config::ConfigError;
use crate::readiness::{ProfileError, ReadinessSourceError, StoreError, UnknownTrade};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Profiles(ProfileError),
    Readiness(ReadinessSourceError),
    Store(StoreError),
    Record(serde_json::Error),
    Encode(serde_json::Error),
    Trade(UnknownTrade),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Profiles(err) => write!(f, "profile error: {}", err),
            AppError::Readiness(err) => write!(f, "readiness error: {}", err),
            AppError::Store(err) => write!(f, "{}", err),
            AppError::Record(err) => write!(f, "invalid property record: {}", err),
            AppError::Encode(err) => write!(f, "failed to encode output: {}", err),
            AppError::Trade(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Profiles(err) => Some(err),
            AppError::Readiness(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Record(err) => Some(err),
            AppError::Encode(err) => Some(err),
            AppError::Trade(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Record(_) | AppError::Trade(_) => StatusCode::BAD_REQUEST,
            AppError::Readiness(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Profiles(_)
            | AppError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ProfileError> for AppError {
    fn from(value: ProfileError) -> Self {
        Self::Profiles(value)
    }
}

impl From<ReadinessSourceError> for AppError {
    fn from(value: ReadinessSourceError) -> Self {
        Self::Readiness(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// JSON errors converted with `?` come from decoding caller input; output
/// encoding failures are wrapped explicitly with [`AppError::Encode`].
impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Record(value)
    }
}

impl From<UnknownTrade> for AppError {
    fn from(value: UnknownTrade) -> Self {
        Self::Trade(value)
    }
}
