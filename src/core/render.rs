//! Renderer module
//!
//! Renders search reports and commit details as console text or JSON lines.
//! Rendering only builds strings; callers decide where to write them.

use colored::Colorize;
use serde_json::json;
use std::fmt::Write;

use crate::core::error::BackendError;
use crate::core::model::{CommitRecord, FileMatch, SearchReport, Stage, StageKind, StageOutcome};
use crate::core::util::pluralize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" | "jsonl" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub color: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }
}

/// Renderer for reports and banners
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    fn is_text(&self) -> bool {
        self.config.format == OutputFormat::Text
    }

    fn header(&self, text: String) -> String {
        if self.config.color {
            text.as_str().bold().cyan().to_string()
        } else {
            text
        }
    }

    /// `Git repository: <root>` line (text only)
    pub fn repository_banner(&self, root: &std::path::Path) -> Option<String> {
        self.is_text()
            .then(|| format!("Git repository: {}", root.display()))
    }

    /// Heading printed before the interactive loop (text only)
    pub fn interactive_banner(&self) -> Option<String> {
        self.is_text().then(|| {
            format!(
                "{}\nYou can search for text in commit messages and file contents.",
                self.header("=== Interactive Search Mode ===".to_string())
            )
        })
    }

    /// Prompt written before each read (text only)
    pub fn prompt(&self) -> Option<&'static str> {
        self.is_text()
            .then_some("Enter search query (or 'quit' to exit): ")
    }

    /// Closing line (text only)
    pub fn farewell(&self) -> Option<&'static str> {
        self.is_text().then_some("Goodbye!")
    }

    /// Render the newest commit's details
    pub fn render_last_commit(&self, commit: &CommitRecord) -> String {
        match self.config.format {
            OutputFormat::Json => json!({ "last_commit": commit }).to_string(),
            OutputFormat::Text => self.render_last_commit_text(commit),
        }
    }

    /// Render a failed detail fetch. Text mode leaves this to the diagnostics stream.
    pub fn render_last_commit_error(&self, error: &BackendError) -> Option<String> {
        match self.config.format {
            OutputFormat::Json => {
                Some(json!({ "last_commit_error": error.to_string() }).to_string())
            }
            OutputFormat::Text => None,
        }
    }

    fn render_last_commit_text(&self, commit: &CommitRecord) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "{}",
            self.header("=== Last Commit Information ===".to_string())
        );
        let _ = writeln!(output, "Hash:    {}", commit.short_hash());
        match &commit.email {
            Some(email) => {
                let _ = writeln!(output, "Author:  {} <{}>", commit.author, email);
            }
            None => {
                let _ = writeln!(output, "Author:  {}", commit.author);
            }
        }
        let _ = writeln!(output, "Date:    {}", commit.date);
        let _ = writeln!(output, "Subject: {}", commit.subject);
        if let Some(body) = &commit.body {
            let _ = writeln!(output, "Body:    {}", body);
        }
        output
    }

    /// Render a full search report
    pub fn render_report(&self, report: &SearchReport) -> String {
        match self.config.format {
            OutputFormat::Json => {
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Text => self.render_report_text(report),
        }
    }

    fn render_report_text(&self, report: &SearchReport) -> String {
        let mut output = String::new();

        let _ = writeln!(
            output,
            "\n{}",
            self.header(format!("=== Search Results for: \"{}\" ===", report.query))
        );

        self.render_commit_stage(&mut output, &report.recent);
        self.render_commit_stage(&mut output, &report.history);
        self.render_file_stage(&mut output, &report.files);

        output
    }

    fn stage_header(&self, output: &mut String, kind: StageKind) {
        let _ = writeln!(
            output,
            "\n{}",
            self.header(format!("--- {} ---", kind.title()))
        );
    }

    fn render_commit_stage(&self, output: &mut String, stage: &Stage<CommitRecord>) {
        self.stage_header(output, stage.kind);

        match &stage.outcome {
            StageOutcome::Found { items, .. } => {
                for (i, commit) in items.iter().enumerate() {
                    let _ = writeln!(output, "{}", format_commit_line(i + 1, commit));
                }
                // A single-commit lookup always "fills" its cap of one
                if stage.outcome.is_truncated() && stage.kind != StageKind::RecentCommit {
                    let _ = writeln!(
                        output,
                        "... (showing first {})",
                        pluralize(stage.cap, "commit", "commits")
                    );
                }
            }
            StageOutcome::Empty => {
                let _ = writeln!(output, "No matches found in commit messages.");
            }
            StageOutcome::Failed { error } => {
                let _ = writeln!(output, "Search failed: {}", error);
            }
        }
    }

    fn render_file_stage(&self, output: &mut String, stage: &Stage<FileMatch>) {
        self.stage_header(output, stage.kind);

        match &stage.outcome {
            StageOutcome::Found { items, .. } => {
                for (i, file_match) in items.iter().enumerate() {
                    let _ = writeln!(output, "{}. {}", i + 1, file_match.as_str());
                }
                if stage.outcome.is_truncated() {
                    let _ = writeln!(
                        output,
                        "... (showing first {})",
                        pluralize(stage.cap, "match", "matches")
                    );
                }
            }
            StageOutcome::Empty => {
                let _ = writeln!(output, "No matches found in tracked files.");
            }
            StageOutcome::Failed { error } => {
                let _ = writeln!(output, "Search failed: {}", error);
            }
        }
    }
}

/// `N. [short-hash] subject - author (date)`
pub fn format_commit_line(ordinal: usize, commit: &CommitRecord) -> String {
    format!(
        "{}. [{}] {} - {} ({})",
        ordinal,
        commit.short_hash(),
        commit.subject,
        commit.author,
        commit.date
    )
}
