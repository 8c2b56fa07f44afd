#![allow(clippy::print_stdout)]

mod args;
mod commands;

use crate::args::Cli;
use anyhow::Result;
use bitf::kernel::RecordSchema;
use bitf_logger::{Logger, verbosity_level};
use clap::Parser;
use std::io::IsTerminal;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level(verbosity_level(cli.verbose))
        .ansi(std::io::stderr().is_terminal())
        .init()?;

    let schema = RecordSchema::load(Some(&cli.schema))?;
    let output = commands::run(&schema, cli.command, cli.json)?;
    println!("{output}");

    Ok(())
}
