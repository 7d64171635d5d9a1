use tracing::{debug, warn};

use super::domain::{PropertyRecord, ReadinessStatus, TradeReadinessResult};
use super::profiles::TradeProfile;
use super::resolver::resolve;

/// Running weighted tally for one trade profile.
#[derive(Debug, Default)]
struct FieldTally {
    score: u64,
    max_score: u64,
    missing_fields: Vec<String>,
}

impl FieldTally {
    fn confidence(&self) -> u8 {
        if self.max_score == 0 {
            return 0;
        }
        let ratio = self.score as f64 / self.max_score as f64;
        (ratio * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Score a record against a single trade profile.
///
/// Every field weight counts toward the maximum; a field adds its weight to
/// the score only when its presence policy accepts the resolved value.
/// Unsupplied critical and important fields are listed, in profile order, as
/// missing. A profile without weight yields an insufficient result with zero
/// confidence.
pub fn calculate(record: &PropertyRecord, profile: &TradeProfile) -> TradeReadinessResult {
    let mut tally = FieldTally::default();

    for field in &profile.fields {
        let value = resolve(record, &field.path);
        let supplied = field.presence_policy.is_supplied(value);

        let weight = u64::from(field.weight);
        tally.max_score += weight;
        if supplied {
            tally.score += weight;
        } else if field.tier.is_tracked() {
            tally.missing_fields.push(field.path.clone());
        }
    }

    if tally.max_score == 0 {
        warn!(trade = %profile.trade, "trade profile has zero total weight");
    }

    let confidence = tally.confidence();
    let status = ReadinessStatus::from_confidence(confidence);

    debug!(
        trade = %profile.trade,
        score = tally.score,
        max_score = tally.max_score,
        confidence,
        status = status.label(),
        missing = tally.missing_fields.len(),
        "trade readiness calculated"
    );

    TradeReadinessResult {
        status,
        confidence,
        missing_fields: tally.missing_fields,
    }
}
