//! Fund universe loading.
//!
//! The universe is an ordered CSV of `code,name` lines maintained outside
//! this tool. Blank lines and `#` comments are skipped; the name column is
//! optional and falls back to the code.

use std::path::Path;

use etfsignal_core::{FundId, FundSpec};

use crate::error::CliError;

pub fn load(path: &Path) -> Result<Vec<FundSpec>, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|error| universe_error(path, error))?;

    let mut specs = Vec::new();
    for row in reader.records() {
        let record = row.map_err(|error| universe_error(path, error))?;
        let Some(code) = record.get(0) else {
            continue;
        };
        if code.is_empty() {
            continue;
        }

        let id = FundId::parse(code).map_err(|error| universe_error(path, error))?;
        let name = record.get(1).unwrap_or_default();
        specs.push(FundSpec::new(id, name));
    }

    if specs.is_empty() {
        return Err(CliError::Universe {
            path: path.display().to_string(),
            reason: String::from("no fund codes found"),
        });
    }

    Ok(specs)
}

fn universe_error(path: &Path, error: impl std::fmt::Display) -> CliError {
    CliError::Universe {
        path: path.display().to_string(),
        reason: error.to_string(),
    }
}
