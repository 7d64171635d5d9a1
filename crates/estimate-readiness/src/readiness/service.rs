use chrono::{DateTime, Utc};
use moka::future::Cache;
use std::sync::Arc;
use tracing::{debug, info};

use super::domain::{AggregateReadinessReport, PropertyId, Trade, TradeReadinessResult};
use super::source::{ReadinessSource, ReadinessSourceError};
use super::store::{PropertyStore, StoreError, StoredProperty};

type ReportKey = (PropertyId, DateTime<Utc>);

/// Service composing a property store, a readiness source and a report cache.
///
/// Reports are cached per property and last-modified stamp, so an edit to the
/// property naturally misses the cache and triggers a recomputation.
pub struct PropertyReadinessService<S, R> {
    store: Arc<S>,
    source: Arc<R>,
    reports: Cache<ReportKey, AggregateReadinessReport>,
}

impl<S, R> PropertyReadinessService<S, R>
where
    S: PropertyStore + 'static,
    R: ReadinessSource + 'static,
{
    pub fn new(store: Arc<S>, source: Arc<R>, cache_capacity: u64) -> Self {
        Self {
            store,
            source,
            reports: Cache::new(cache_capacity),
        }
    }

    /// Aggregate readiness for a stored property, served from cache when fresh.
    pub async fn readiness(
        &self,
        property_id: &PropertyId,
    ) -> Result<AggregateReadinessReport, ReadinessServiceError> {
        let property = self.fetch(property_id)?;
        let key = (property.id.clone(), property.last_modified);

        if let Some(report) = self.reports.get(&key).await {
            debug!(property_id = %property.id, "readiness cache hit");
            return Ok(report);
        }

        let report = self.source.aggregate_readiness(&property.record).await?;
        info!(
            property_id = %property.id,
            overall_score = report.overall_score,
            ready_count = report.ready_count,
            "readiness computed"
        );

        self.reports.insert(key, report.clone()).await;
        Ok(report)
    }

    /// Readiness for a single trade of a stored property.
    pub async fn trade_readiness(
        &self,
        property_id: &PropertyId,
        trade: Trade,
    ) -> Result<TradeReadinessResult, ReadinessServiceError> {
        let property = self.fetch(property_id)?;
        let result = self.source.trade_readiness(&property.record, trade).await?;
        Ok(result)
    }

    fn fetch(&self, property_id: &PropertyId) -> Result<StoredProperty, ReadinessServiceError> {
        self.store
            .fetch(property_id)?
            .ok_or_else(|| ReadinessServiceError::NotFound(property_id.clone()))
    }
}

/// Error raised by the property readiness service.
#[derive(Debug, thiserror::Error)]
pub enum ReadinessServiceError {
    #[error("property {0} not found")]
    NotFound(PropertyId),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Source(#[from] ReadinessSourceError),
}
