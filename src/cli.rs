//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::backends::git::{GitBackend, DEFAULT_GIT_PROGRAM};
use crate::core::error::StartupError;
use crate::core::model::SearchQuery;
use crate::core::paths::resolve_repo_root;
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::core::util::command_exists;
use crate::flows::search::{Dispatcher, SearchSettings, DEFAULT_FILE_LIMIT, DEFAULT_HISTORY_LIMIT};
use crate::flows::session::Session;

/// git-search - search commit messages and tracked files of a git repository.
#[derive(Parser, Debug)]
#[command(name = "git-search")]
#[command(
    author,
    version,
    about,
    long_about = r#"git-search looks up a query in three places, in order:

1. the most recent commit whose message matches
2. the commit history (newest first)
3. the contents of tracked files

Matching is case-insensitive. Without --query, an interactive prompt reads one
query per line until 'quit', 'exit', 'q' or end of input.

Examples:
    git-search                          # Interactive mode in current directory
    git-search --query "bug fix"        # Search for 'bug fix'
    git-search --path /path/to/repo     # Use different repository
"#
)]
pub struct Cli {
    /// Path to the git repository.
    #[arg(
        long,
        env = "GIT_SEARCH_PATH",
        default_value = ".",
        value_name = "PATH",
        long_help = "Path to the git repository (defaults to the current directory).\n\n\
The directory must exist and contain a .git entry."
    )]
    pub path: PathBuf,

    /// Search query (if empty, enters interactive mode).
    #[arg(long, value_name = "QUERY")]
    pub query: Option<String>,

    /// Maximum commits listed by the history search.
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT, value_name = "N", value_parser = parse_limit)]
    pub history_limit: usize,

    /// Maximum lines listed by the file search.
    #[arg(long, default_value_t = DEFAULT_FILE_LIMIT, value_name = "N", value_parser = parse_limit)]
    pub file_limit: usize,

    /// Only show the latest matching commit if its hash starts with HASH.
    #[arg(
        long,
        value_name = "HASH",
        long_help = "Restrict the 'Latest Matching Commit' section to a commit whose hash\n\
starts with HASH. Without this option the most recent matching commit is\n\
always shown."
    )]
    pub highlight: Option<String>,

    /// Output format (text/json).
    #[arg(
        long,
        default_value = "text",
        value_name = "FORMAT",
        long_help = "Select the output format.\n\n\
Supported values:\n\
- text (default): human-readable report\n\
- json: one JSON object per line (last commit, then one report per query)"
    )]
    pub format: String,

    /// git executable to run.
    #[arg(long, env = "GIT_SEARCH_GIT", default_value = DEFAULT_GIT_PROGRAM, value_name = "PROGRAM")]
    pub git: String,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Result caps must be at least 1; `git log -0` would report "no matches"
fn parse_limit(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}

impl Cli {
    fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            history_limit: self.history_limit,
            file_limit: self.file_limit,
            highlight: self.highlight.clone().filter(|h| !h.trim().is_empty()),
        }
    }

    fn render_config(&self) -> Result<RenderConfig> {
        let format: OutputFormat = self.format.parse().map_err(anyhow::Error::msg)?;
        let color = !self.no_color && io::stdout().is_terminal();
        Ok(RenderConfig::new(format, color))
    }

    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}

/// Send diagnostics to stderr; RUST_LOG overrides the flag-derived level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_level());

    let render_config = cli.render_config()?;
    let renderer = Renderer::with_config(render_config);

    let root = resolve_repo_root(&cli.path)?;
    if !command_exists(&cli.git) {
        return Err(StartupError::ToolMissing(cli.git.clone()).into());
    }
    let backend = GitBackend::new(&root).with_program(&cli.git);
    info!(root = %backend.root().display(), git = %cli.git, "repository resolved");
    let dispatcher = Dispatcher::new(backend, cli.search_settings());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(banner) = renderer.repository_banner(&root) {
        writeln!(out, "{}", banner)?;
    }

    match dispatcher.last_commit() {
        Ok(commit) => writeln!(out, "{}", renderer.render_last_commit(&commit))?,
        Err(err) => {
            error!(%err, "error getting commit details");
            if let Some(line) = renderer.render_last_commit_error(&err) {
                writeln!(out, "{}", line)?;
            }
        }
    }

    let query = cli.query.as_deref().and_then(SearchQuery::new);
    if query.is_none() {
        if let Some(banner) = renderer.interactive_banner() {
            writeln!(out, "{}", banner)?;
        }
    }

    let mut session = Session::new(&dispatcher, &renderer, out);
    match query {
        Some(query) => session.run_one_shot(&query)?,
        None => session.run_interactive(io::stdin().lock())?,
    }
    debug!(queries = session.dispatches(), state = ?session.state(), "session ended");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["git-search"]);
        assert_eq!(cli.path, PathBuf::from("."));
        assert!(cli.query.is_none());
        assert_eq!(cli.format, "text");
        assert_eq!(cli.git, "git");
        assert_eq!(cli.search_settings(), SearchSettings::default());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_limits_and_highlight() {
        let cli = Cli::parse_from([
            "git-search",
            "--history-limit",
            "3",
            "--file-limit",
            "5",
            "--highlight",
            "64fc5dd7",
        ]);
        let settings = cli.search_settings();
        assert_eq!(settings.history_limit, 3);
        assert_eq!(settings.file_limit, 5);
        assert_eq!(settings.highlight.as_deref(), Some("64fc5dd7"));
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        assert!(Cli::try_parse_from(["git-search", "--history-limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["git-search", "--file-limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["git-search", "--file-limit", "x"]).is_err());
        let cli = Cli::try_parse_from(["git-search", "--file-limit", "1"]).unwrap();
        assert_eq!(cli.file_limit, 1);
    }

    #[test]
    fn test_blank_highlight_is_ignored() {
        let cli = Cli::parse_from(["git-search", "--highlight", " "]);
        assert!(cli.search_settings().highlight.is_none());
    }

    #[test]
    fn test_log_level_flags() {
        assert_eq!(Cli::parse_from(["git-search", "-v"]).log_level(), "debug");
        assert_eq!(Cli::parse_from(["git-search", "-q"]).log_level(), "error");
        assert!(Cli::try_parse_from(["git-search", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let cli = Cli::parse_from(["git-search", "--format", "yaml"]);
        assert!(cli.render_config().is_err());
    }
}
