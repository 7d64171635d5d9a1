//! Trade readiness scoring for HVAC, Plumbing and Electrical estimates.
//!
//! A [`ReadinessEngine`] applies a [`ProfileSet`] to a [`PropertyRecord`]:
//! each trade profile lists weighted fields, every field resolves a dotted
//! path and runs its presence policy, and the weighted ratio of supplied
//! fields becomes that trade's confidence. The engine is synchronous and
//! holds no mutable state; the store, cache and remote seams around it live
//! in [`store`], [`service`] and [`source`].

mod aggregator;
mod calculator;
pub mod domain;
pub mod formatter;
pub mod policy;
pub mod profiles;
pub mod resolver;
pub mod router;
pub mod service;
pub mod source;
pub mod store;

#[cfg(test)]
mod tests;

pub use calculator::calculate;
pub use domain::{
    AggregateReadinessReport, CompletenessBreakdown, FieldSpec, FieldTier, PropertyId,
    PropertyRecord, ReadinessStatus, Trade, TradeReadinessResult, UnknownTrade,
    BASIC_COMPLETENESS, PARTIAL_THRESHOLD, READY_THRESHOLD,
};
pub use formatter::{format_missing_field, format_missing_fields};
pub use policy::PresencePolicy;
pub use profiles::{ProfileError, ProfileSet, TradeProfile, STANDARD_PROFILE_VERSION};
pub use router::{engine_router, property_router, readiness_router};
pub use service::{PropertyReadinessService, ReadinessServiceError};
pub use source::{
    LocalReadinessSource, ReadinessBackend, ReadinessSource, ReadinessSourceError,
    RemoteReadinessSource,
};
pub use store::{PropertyStore, StoreError, StoredProperty};

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

/// Stateless scorer that applies a profile set to property records.
#[derive(Debug, Clone)]
pub struct ReadinessEngine {
    profiles: Arc<ProfileSet>,
}

impl ReadinessEngine {
    pub fn new(profiles: ProfileSet) -> Self {
        Self {
            profiles: Arc::new(profiles),
        }
    }

    pub fn standard() -> Self {
        Self::new(ProfileSet::standard())
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    pub fn trade_readiness(&self, record: &PropertyRecord, trade: Trade) -> TradeReadinessResult {
        calculate(record, self.profiles.profile(trade))
    }

    pub fn aggregate(&self, record: &PropertyRecord) -> AggregateReadinessReport {
        self.aggregate_at(record, Utc::now())
    }

    /// Aggregate with an explicit computation stamp.
    pub fn aggregate_at(
        &self,
        record: &PropertyRecord,
        computed_at: DateTime<Utc>,
    ) -> AggregateReadinessReport {
        let per_trade: BTreeMap<Trade, TradeReadinessResult> = Trade::ordered()
            .into_iter()
            .map(|trade| (trade, self.trade_readiness(record, trade)))
            .collect();

        aggregator::assemble_report(per_trade, computed_at)
    }
}

impl Default for ReadinessEngine {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_engine() -> &'static ReadinessEngine {
    static ENGINE: OnceLock<ReadinessEngine> = OnceLock::new();
    ENGINE.get_or_init(ReadinessEngine::standard)
}

/// Score one trade with the standard profiles.
pub fn calculate_trade_readiness(record: &PropertyRecord, trade: Trade) -> TradeReadinessResult {
    standard_engine().trade_readiness(record, trade)
}

/// Score every trade with the standard profiles.
pub fn calculate_aggregate_readiness(record: &PropertyRecord) -> AggregateReadinessReport {
    standard_engine().aggregate(record)
}
