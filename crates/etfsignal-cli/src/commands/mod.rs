mod cache;
mod dates;
mod show;
mod update;

use std::process::ExitCode;

use etfsignal_core::StorePaths;

use crate::cli::{CacheCommand, Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let paths = StorePaths::resolve(cli.home.clone());

    match &cli.command {
        Command::Update(args) => update::run(args, &paths, cli.json).await,
        Command::Show(args) => show::run(args, &paths, cli.json),
        Command::Dates => dates::run(&paths, cli.json),
        Command::Cache(args) => match &args.command {
            CacheCommand::Clear => cache::clear(&paths),
        },
    }
}
