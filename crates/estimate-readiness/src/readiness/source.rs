use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

use super::domain::{AggregateReadinessReport, PropertyRecord, Trade, TradeReadinessResult};
use super::ReadinessEngine;

/// Anything able to answer readiness questions for a property record.
///
/// The local engine and the remote service both implement this contract and
/// must agree on every answer.
pub trait ReadinessSource: Send + Sync {
    fn trade_readiness(
        &self,
        record: &PropertyRecord,
        trade: Trade,
    ) -> impl Future<Output = Result<TradeReadinessResult, ReadinessSourceError>> + Send;

    fn aggregate_readiness(
        &self,
        record: &PropertyRecord,
    ) -> impl Future<Output = Result<AggregateReadinessReport, ReadinessSourceError>> + Send;
}

/// Error raised when a readiness source cannot produce an answer.
#[derive(Debug, thiserror::Error)]
pub enum ReadinessSourceError {
    #[error("failed to build readiness client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("readiness service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("readiness service returned {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("readiness response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

/// In-process source backed by a [`ReadinessEngine`].
#[derive(Debug, Clone, Default)]
pub struct LocalReadinessSource {
    engine: ReadinessEngine,
}

impl LocalReadinessSource {
    pub fn new(engine: ReadinessEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ReadinessEngine {
        &self.engine
    }
}

impl ReadinessSource for LocalReadinessSource {
    async fn trade_readiness(
        &self,
        record: &PropertyRecord,
        trade: Trade,
    ) -> Result<TradeReadinessResult, ReadinessSourceError> {
        Ok(self.engine.trade_readiness(record, trade))
    }

    async fn aggregate_readiness(
        &self,
        record: &PropertyRecord,
    ) -> Result<AggregateReadinessReport, ReadinessSourceError> {
        Ok(self.engine.aggregate(record))
    }
}

/// HTTP client for a server exposing the readiness routes.
#[derive(Debug, Clone)]
pub struct RemoteReadinessSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteReadinessSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ReadinessSourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReadinessSourceError::Client)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_record<T: DeserializeOwned>(
        &self,
        url: String,
        record: &PropertyRecord,
    ) -> Result<T, ReadinessSourceError> {
        tracing::debug!(%url, "requesting remote readiness");

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(ReadinessSourceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::warn!(%url, status = status.as_u16(), "remote readiness request failed");
            return Err(ReadinessSourceError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(ReadinessSourceError::Decode)
    }
}

impl ReadinessSource for RemoteReadinessSource {
    async fn trade_readiness(
        &self,
        record: &PropertyRecord,
        trade: Trade,
    ) -> Result<TradeReadinessResult, ReadinessSourceError> {
        let url = format!("{}/api/v1/readiness/trades/{}", self.base_url, trade);
        self.post_record(url, record).await
    }

    async fn aggregate_readiness(
        &self,
        record: &PropertyRecord,
    ) -> Result<AggregateReadinessReport, ReadinessSourceError> {
        let url = format!("{}/api/v1/readiness", self.base_url);
        self.post_record(url, record).await
    }
}

/// Source selected at startup: local computation or the remote service.
#[derive(Debug, Clone)]
pub enum ReadinessBackend {
    Local(LocalReadinessSource),
    Remote(RemoteReadinessSource),
}

impl ReadinessBackend {
    /// Remote when a base URL is configured, otherwise the local engine.
    pub fn select(
        engine: ReadinessEngine,
        remote_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ReadinessSourceError> {
        match remote_url {
            Some(url) => Ok(Self::Remote(RemoteReadinessSource::new(url, timeout)?)),
            None => Ok(Self::Local(LocalReadinessSource::new(engine))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Remote(_) => "remote",
        }
    }
}

impl ReadinessSource for ReadinessBackend {
    async fn trade_readiness(
        &self,
        record: &PropertyRecord,
        trade: Trade,
    ) -> Result<TradeReadinessResult, ReadinessSourceError> {
        match self {
            Self::Local(source) => source.trade_readiness(record, trade).await,
            Self::Remote(source) => source.trade_readiness(record, trade).await,
        }
    }

    async fn aggregate_readiness(
        &self,
        record: &PropertyRecord,
    ) -> Result<AggregateReadinessReport, ReadinessSourceError> {
        match self {
            Self::Local(source) => source.aggregate_readiness(record).await,
            Self::Remote(source) => source.aggregate_readiness(record).await,
        }
    }
}
