//! Clausewright CLI: assemble draft agreements from a clause catalog and
//! free-text requirements.

mod commands;
mod display;

use std::process::ExitCode;

use clap::Parser;

use commands::Cli;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    tracing::info!("clausewright v{}", env!("CARGO_PKG_VERSION"));
    commands::run(cli)
}
