//! treefs shell entry point.

use anyhow::Result;
use clap::Parser;

use treefs_cli::cli::Cli;
use treefs_cli::repl;

fn main() -> Result<()> {
    let cli = Cli::parse();
    repl::init_logging(cli.verbose)?;
    repl::run(&cli)
}
