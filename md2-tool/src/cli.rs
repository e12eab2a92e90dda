//! Root CLI structure for md2-tool

use clap::Parser;

use crate::commands::md2::Md2Commands;

#[derive(Parser)]
#[command(name = "md2-tool")]
#[command(about = "Command-line tools for Quake 2 MD2 models", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Md2Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
