//! git integration
//!
//! Calls `git log` and `git grep` in the repository root and returns their raw
//! output lines.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::backends::parse::split_lines;
use crate::backends::SearchBackend;
use crate::core::error::BackendError;

/// Default program name for the git executable
pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// `git grep` exits with status 1 when nothing matched
const GREP_NO_MATCH_STATUS: i32 = 1;

const LAST_COMMIT_FORMAT: &str = "--pretty=format:%H|%an|%ae|%ad|%s|%b";
const HISTORY_FORMAT: &str = "--pretty=format:%H|%an|%ad|%s";

/// Searches a repository by shelling out to git
#[derive(Debug, Clone)]
pub struct GitBackend {
    root: PathBuf,
    program: String,
}

impl GitBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            program: DEFAULT_GIT_PROGRAM.to_string(),
        }
    }

    /// Use a different git executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, args: &[String]) -> Result<Output, BackendError> {
        debug!(program = %self.program, ?args, root = %self.root.display(), "running backend");

        let output = Command::new(&self.program)
            .current_dir(&self.root)
            .args(args)
            .output()
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        debug!(status = ?output.status.code(), bytes = output.stdout.len(), "backend finished");
        Ok(output)
    }
}

fn status_error(operation: &'static str, output: &Output) -> BackendError {
    BackendError::Status {
        operation,
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Map a `git grep` result to its lines, treating the no-match status as empty
fn grep_lines(output: &Output, limit: usize) -> Result<Vec<String>, BackendError> {
    let stdout = String::from_utf8_lossy(&output.stdout);

    if !output.status.success() {
        let no_match =
            output.status.code() == Some(GREP_NO_MATCH_STATUS) && stdout.trim().is_empty();
        if no_match {
            return Ok(Vec::new());
        }
        return Err(status_error("git grep", output));
    }

    let mut lines = split_lines(&stdout);
    lines.truncate(limit);
    Ok(lines)
}

impl SearchBackend for GitBackend {
    fn fetch_last_commit(&self) -> Result<String, BackendError> {
        let args = [
            "log".to_string(),
            "-1".to_string(),
            LAST_COMMIT_FORMAT.to_string(),
            "--date=short".to_string(),
        ];
        let output = self.run(&args)?;
        if !output.status.success() {
            return Err(status_error("git log", &output));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Err(BackendError::EmptyOutput {
                operation: "git log",
            });
        }
        Ok(stdout.into_owned())
    }

    fn search_commit_history(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, BackendError> {
        let args = [
            "log".to_string(),
            format!("--grep={}", query),
            "-i".to_string(),
            format!("-{}", limit),
            HISTORY_FORMAT.to_string(),
            "--date=short".to_string(),
        ];
        let output = self.run(&args)?;
        if !output.status.success() {
            return Err(status_error("git log", &output));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(split_lines(&stdout))
    }

    fn search_file_contents(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, BackendError> {
        let args = [
            "grep".to_string(),
            "--no-color".to_string(),
            "-n".to_string(),
            "-i".to_string(),
            "-F".to_string(),
            "-e".to_string(),
            query.to_string(),
        ];
        let output = self.run(&args)?;
        grep_lines(&output, limit)
    }
}
