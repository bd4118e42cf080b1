use std::process::ExitCode;

use etfsignal_core::{SnapshotStore, StorePaths};

use crate::error::CliError;

pub fn run(paths: &StorePaths, json: bool) -> Result<ExitCode, CliError> {
    let store = SnapshotStore::new(paths.history());
    let dates = store.all_dates()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dates)?);
        return Ok(ExitCode::SUCCESS);
    }

    if dates.is_empty() {
        println!("no snapshots recorded yet");
    } else {
        for date in dates {
            println!("{date}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
