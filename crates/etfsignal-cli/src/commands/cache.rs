use std::process::ExitCode;

use etfsignal_core::{FeeCache, StorePaths};

use crate::error::CliError;

pub fn clear(paths: &StorePaths) -> Result<ExitCode, CliError> {
    let cache = FeeCache::load(paths.fee_cache());
    let dropped = cache.len();
    cache.clear();
    cache.flush()?;

    println!("fee cache cleared ({dropped} entries dropped)");
    Ok(ExitCode::SUCCESS)
}
