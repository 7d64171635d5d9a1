use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{PropertyId, PropertyRecord};

/// Property snapshot returned by a store, stamped with its last modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProperty {
    pub id: PropertyId,
    pub record: PropertyRecord,
    pub last_modified: DateTime<Utc>,
}

/// Storage abstraction supplying property records by identifier.
///
/// The engine never writes through this trait; callers use `last_modified`
/// to decide when a cached readiness report is stale.
pub trait PropertyStore: Send + Sync {
    fn fetch(&self, id: &PropertyId) -> Result<Option<StoredProperty>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("property store unavailable: {0}")]
    Unavailable(String),
}
