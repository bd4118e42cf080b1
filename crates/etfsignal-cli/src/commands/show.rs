use std::process::ExitCode;

use etfsignal_core::{SnapshotRecord, SnapshotStore, StorePaths, TradingDate};

use crate::cli::ShowArgs;
use crate::error::CliError;

pub fn run(args: &ShowArgs, paths: &StorePaths, json: bool) -> Result<ExitCode, CliError> {
    let store = SnapshotStore::new(paths.history());

    let date = match &args.date {
        Some(raw) => TradingDate::parse(raw)?.format_iso(),
        None => match store.all_dates()?.pop() {
            Some(latest) => latest,
            None => {
                println!("no snapshots recorded yet");
                return Ok(ExitCode::SUCCESS);
            }
        },
    };

    let rows = store.read(&date)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(ExitCode::SUCCESS);
    }

    if rows.is_empty() {
        println!("no snapshot for {date}");
        return Ok(ExitCode::SUCCESS);
    }

    println!("snapshot {date} ({} funds)", rows.len());
    for row in &rows {
        println!("{}", format_row(row));
    }
    Ok(ExitCode::SUCCESS)
}

fn format_row(row: &SnapshotRecord) -> String {
    let close = row
        .latest_close
        .map(|value| format!("{value:.4}"))
        .unwrap_or_else(|| String::from("-"));
    let histogram = row
        .macd_histogram
        .map(|value| format!("{value:.4}"))
        .unwrap_or_else(|| String::from("-"));
    format!(
        "  {} {:<12} close={close} ma={} macd={histogram}",
        row.code, row.name, row.ma_relation
    )
}
