use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::policy::PresencePolicy;

/// Identifier wrapper for properties held by a property store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loosely typed property data as supplied by the property store.
///
/// The engine only ever reads a record; unknown keys and unexpected value
/// types are tolerated and simply count as "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyRecord(Value);

impl PropertyRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for PropertyRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Estimate categories scored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trade {
    Hvac,
    Plumbing,
    Electrical,
}

impl Trade {
    pub const fn ordered() -> [Self; 3] {
        [Self::Hvac, Self::Plumbing, Self::Electrical]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hvac => "HVAC",
            Self::Plumbing => "Plumbing",
            Self::Electrical => "Electrical",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hvac => "hvac",
            Self::Plumbing => "plumbing",
            Self::Electrical => "electrical",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Hvac => 0,
            Self::Plumbing => 1,
            Self::Electrical => 2,
        }
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trade {
    type Err = UnknownTrade;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hvac" => Ok(Self::Hvac),
            "plumbing" => Ok(Self::Plumbing),
            "electrical" => Ok(Self::Electrical),
            _ => Err(UnknownTrade(value.to_string())),
        }
    }
}

/// Raised when a caller names a trade the engine does not score.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trade '{0}', expected hvac, plumbing, or electrical")]
pub struct UnknownTrade(pub String);

/// Weighting class of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTier {
    Critical,
    Important,
    NiceToHave,
}

impl FieldTier {
    /// Whether an unsupplied field of this tier is reported as missing.
    pub const fn is_tracked(self) -> bool {
        matches!(self, Self::Critical | Self::Important)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Important => "Important",
            Self::NiceToHave => "Nice to Have",
        }
    }
}

/// Declarative description of one scored field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub path: String,
    pub weight: u32,
    pub tier: FieldTier,
    pub presence_policy: PresencePolicy,
}

impl FieldSpec {
    pub fn new(
        path: impl Into<String>,
        weight: u32,
        tier: FieldTier,
        presence_policy: PresencePolicy,
    ) -> Self {
        Self {
            path: path.into(),
            weight,
            tier,
            presence_policy,
        }
    }
}

/// Minimum confidence for [`ReadinessStatus::Ready`].
pub const READY_THRESHOLD: u8 = 80;
/// Minimum confidence for [`ReadinessStatus::Partial`].
pub const PARTIAL_THRESHOLD: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    Partial,
    Insufficient,
}

impl ReadinessStatus {
    pub const fn from_confidence(confidence: u8) -> Self {
        if confidence >= READY_THRESHOLD {
            Self::Ready
        } else if confidence >= PARTIAL_THRESHOLD {
            Self::Partial
        } else {
            Self::Insufficient
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Partial => "Partial",
            Self::Insufficient => "Insufficient",
        }
    }
}

/// Readiness of one trade for estimate generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReadinessResult {
    pub status: ReadinessStatus,
    pub confidence: u8,
    pub missing_fields: Vec<String>,
}

impl TradeReadinessResult {
    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}

/// Fixed completeness reported for the basic property details.
pub const BASIC_COMPLETENESS: u8 = 85;

/// Completeness percentages surfaced next to the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessBreakdown {
    pub basic: u8,
    pub hvac: u8,
    pub plumbing: u8,
    pub electrical: u8,
}

/// Combined readiness across every trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReadinessReport {
    pub per_trade: BTreeMap<Trade, TradeReadinessResult>,
    pub overall_score: u8,
    pub ready_count: u8,
    pub completeness: CompletenessBreakdown,
    pub computed_at: DateTime<Utc>,
}

impl AggregateReadinessReport {
    pub fn trade(&self, trade: Trade) -> Option<&TradeReadinessResult> {
        self.per_trade.get(&trade)
    }

    /// True when two reports differ only in their computation stamp.
    pub fn same_assessment(&self, other: &Self) -> bool {
        self.per_trade == other.per_trade
            && self.overall_score == other.overall_score
            && self.ready_count == other.ready_count
            && self.completeness == other.completeness
    }
}
