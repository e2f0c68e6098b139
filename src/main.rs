//! git-search - Search a git repository's history and tracked files
//!
//! git-search provides:
//! - Commit message search (latest match and recent history)
//! - Case-insensitive search across tracked file contents
//! - A summary of the most recent commit
//! - Interactive and single-query modes, with text or JSON output

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod flows;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
