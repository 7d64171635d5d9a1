use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::domain::{
    AggregateReadinessReport, CompletenessBreakdown, Trade, TradeReadinessResult,
    BASIC_COMPLETENESS,
};

/// Combine per-trade results into the aggregate report.
///
/// Trades absent from `per_trade` count as zero confidence so the overall
/// score always averages over every trade the engine scores.
pub(crate) fn assemble_report(
    per_trade: BTreeMap<Trade, TradeReadinessResult>,
    computed_at: DateTime<Utc>,
) -> AggregateReadinessReport {
    let confidence_of = |trade: Trade| {
        per_trade
            .get(&trade)
            .map(|result| result.confidence)
            .unwrap_or(0)
    };

    let trades = Trade::ordered();
    let total: u32 = trades
        .iter()
        .map(|trade| u32::from(confidence_of(*trade)))
        .sum();
    let overall_score = (f64::from(total) / trades.len() as f64).round() as u8;

    let ready_count = per_trade.values().filter(|result| result.is_ready()).count() as u8;

    let completeness = CompletenessBreakdown {
        basic: BASIC_COMPLETENESS,
        hvac: confidence_of(Trade::Hvac),
        plumbing: confidence_of(Trade::Plumbing),
        electrical: confidence_of(Trade::Electrical),
    };

    AggregateReadinessReport {
        per_trade,
        overall_score,
        ready_count,
        completeness,
        computed_at,
    }
}
