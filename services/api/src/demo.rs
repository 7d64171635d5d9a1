use crate::infra::{load_record, sample_properties, InMemoryPropertyStore};
use clap::Args;
use estimate_readiness::config::AppConfig;
use estimate_readiness::error::AppError;
use estimate_readiness::readiness::{
    format_missing_fields, AggregateReadinessReport, LocalReadinessSource, ProfileSet, PropertyId,
    PropertyReadinessService, ReadinessBackend, ReadinessEngine, ReadinessSource, Trade,
    TradeReadinessResult,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a property record stored as JSON
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Score only this trade (hvac, plumbing or electrical)
    #[arg(long)]
    pub(crate) trade: Option<Trade>,
    /// Print the raw JSON result instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ProfilesArgs {
    /// Print the profile set as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { input, trade, json } = args;

    let config = AppConfig::load()?;
    let engine = ReadinessEngine::new(config.readiness.load_profiles()?);
    let backend = ReadinessBackend::select(
        engine,
        config.readiness.remote_url.as_deref(),
        config.readiness.remote_timeout,
    )?;
    let record = load_record(&input)?;

    match trade {
        Some(trade) => {
            let result = backend.trade_readiness(&record, trade).await?;
            if json {
                let encoded = serde_json::to_string_pretty(&result).map_err(AppError::Encode)?;
                println!("{encoded}");
            } else {
                println!("Estimate readiness for {}", input.display());
                print!("{}", render_trade(trade, &result));
            }
        }
        None => {
            let report = backend.aggregate_readiness(&record).await?;
            if json {
                let encoded = serde_json::to_string_pretty(&report).map_err(AppError::Encode)?;
                println!("{encoded}");
            } else {
                println!("Estimate readiness for {}", input.display());
                print!("{}", render_report(&report));
            }
        }
    }

    Ok(())
}

pub(crate) fn run_profiles(args: ProfilesArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let profiles = config.readiness.load_profiles()?;

    if args.json {
        let encoded = serde_json::to_string_pretty(&profiles).map_err(AppError::Encode)?;
        println!("{encoded}");
    } else {
        print!("{}", render_profiles(&profiles));
    }
    Ok(())
}

pub(crate) async fn run_demo() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = ReadinessEngine::new(config.readiness.load_profiles()?);

    println!("Estimate readiness demo");
    println!("Profile set {}", engine.profiles().version());

    let samples = sample_properties();
    for sample in &samples {
        println!("\n{} ({})", sample.id, sample.description);
        print!("{}", render_report(&engine.aggregate(&sample.record)));
    }

    println!("\nCached property readiness");
    let store = Arc::new(InMemoryPropertyStore::default());
    let service = PropertyReadinessService::new(
        store.clone(),
        Arc::new(LocalReadinessSource::new(engine)),
        config.readiness.cache_capacity,
    );

    let Some(sample) = samples.into_iter().nth(1) else {
        return Ok(());
    };
    let id = PropertyId(sample.id.to_string());
    store.upsert(sample.id, sample.record.clone())?;

    let first = match service.readiness(&id).await {
        Ok(report) => report,
        Err(err) => {
            println!("  Readiness unavailable: {}", err);
            return Ok(());
        }
    };
    let repeat = match service.readiness(&id).await {
        Ok(report) => report,
        Err(err) => {
            println!("  Readiness unavailable: {}", err);
            return Ok(());
        }
    };
    println!(
        "- {}: overall {}% computed at {} (repeat lookup served from cache: {})",
        id,
        first.overall_score,
        first.computed_at.to_rfc3339(),
        repeat.computed_at == first.computed_at
    );

    let mut updated = sample.record.into_inner();
    updated["electricalData"]["majorAppliances"] = json!(["range", "window_ac"]);
    updated["hvacData"]["ceilingHeight"] = json!(8);
    updated["hvacData"]["windowCount"] = json!(12);
    store.upsert(sample.id, updated.into())?;

    match service.readiness(&id).await {
        Ok(report) => println!(
            "- {} after site visit notes: overall {}% ({} of 3 trades ready)",
            id, report.overall_score, report.ready_count
        ),
        Err(err) => println!("  Readiness unavailable: {}", err),
    }

    Ok(())
}

pub(crate) fn render_trade(trade: Trade, result: &TradeReadinessResult) -> String {
    let missing = if result.missing_fields.is_empty() {
        "none".to_string()
    } else {
        format_missing_fields(&result.missing_fields).join(", ")
    };

    format!(
        "{}: {}% ({})\n  Missing: {}\n",
        trade.label(),
        result.confidence,
        result.status.label(),
        missing
    )
}

pub(crate) fn render_report(report: &AggregateReadinessReport) -> String {
    let completeness = &report.completeness;
    let mut out = format!(
        "Overall score: {}% ({}/3 trades ready)\n\
         Completeness: basic {}% | hvac {}% | plumbing {}% | electrical {}%\n",
        report.overall_score,
        report.ready_count,
        completeness.basic,
        completeness.hvac,
        completeness.plumbing,
        completeness.electrical
    );
    for trade in Trade::ordered() {
        if let Some(result) = report.trade(trade) {
            out.push_str(&render_trade(trade, result));
        }
    }
    out
}

fn render_profiles(profiles: &ProfileSet) -> String {
    let mut out = format!("Profile set {}\n", profiles.version());
    for profile in profiles.profiles() {
        out.push_str(&format!(
            "\n{} (max score {})\n",
            profile.trade.label(),
            profile.max_score()
        ));
        for field in &profile.fields {
            out.push_str(&format!(
                "- {} | weight {} | {} | {}\n",
                field.path,
                field.weight,
                field.tier.label(),
                field.presence_policy.label()
            ));
        }
    }
    out
}
