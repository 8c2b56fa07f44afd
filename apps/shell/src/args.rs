//! # CLI Argument Definitions

use bitf::query::Dialect;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "bitf")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Inspect flag schemas, decode stored values and print SQL fragments")]
pub struct Cli {
    /// Schema file declaring the flag fields (TOML, JSON or YAML)
    #[arg(short, long, global = true, default_value = "flags.toml")]
    pub schema: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List declared fields and composites
    Fields {},
    /// Show the flags of a stored value (negative values are recovered)
    Decode {
        field: String,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Encode flag names into the integer to store
    Encode {
        field: String,
        /// Flags to set; none yields 0
        flags: Vec<String>,
    },
    /// Print the WHERE fragment testing one flag
    Filter {
        field: String,
        flag: String,
        /// Test that the flag is clear instead of set
        #[arg(long)]
        clear: bool,
        /// Table alias qualifying the column
        #[arg(long)]
        table: Option<String>,
        #[arg(long, default_value_t = Dialect::Generic)]
        dialect: Dialect,
    },
    /// Print the SET expression changing one flag in place
    Update {
        field: String,
        flag: String,
        #[arg(value_enum)]
        op: UpdateOp,
        #[arg(long)]
        table: Option<String>,
        #[arg(long, default_value_t = Dialect::Generic)]
        dialect: Dialect,
    },
    /// List `(name, label)` choices of a field
    Choices { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpdateOp {
    Set,
    Clear,
    Toggle,
}
