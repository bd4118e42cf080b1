use std::process::ExitCode;
use std::sync::Arc;

use etfsignal_core::{
    FeeCache, LiveMarketData, Orchestrator, RunReport, SnapshotStore, StorePaths, TradingDate,
};

use crate::cli::UpdateArgs;
use crate::error::CliError;
use crate::universe;

pub async fn run(args: &UpdateArgs, paths: &StorePaths, json: bool) -> Result<ExitCode, CliError> {
    let universe = universe::load(&args.universe)?;
    let as_of = match &args.as_of {
        Some(raw) => TradingDate::parse(raw)?,
        None => TradingDate::today(),
    };

    let fees = Arc::new(FeeCache::load(paths.fee_cache()));
    let market = Arc::new(LiveMarketData::with_defaults());
    let orchestrator = Orchestrator::new(market, Arc::clone(&fees)).with_workers(args.workers);

    // A batch where every fund failed is the only orchestrator error; it
    // propagates here and exits non-zero.
    let report = orchestrator.run(&universe, as_of).await?;

    // A store write failure is batch-fatal; the cache flush is not.
    let store = SnapshotStore::new(paths.history());
    store.upsert(&report.date.format_iso(), &report.rows)?;

    if let Err(error) = fees.flush() {
        tracing::warn!(%error, "fee cache flush failed; fees will be re-fetched next run");
    }

    render(&report, json)?;
    Ok(ExitCode::SUCCESS)
}

fn render(report: &RunReport, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "{}: {} funds updated, {} failed",
        report.date,
        report.succeeded(),
        report.failures.len()
    );
    for failure in &report.failures {
        println!("  failed {}: {}", failure.fund, failure.reason);
    }
    Ok(())
}
