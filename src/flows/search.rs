//! Search flow
//!
//! Runs one query through the three search stages in a fixed order:
//! 1) the most recent matching commit
//! 2) a broader commit-history search
//! 3) a tracked-file content search
//!
//! Stages are independent; a failure is recorded in the report and the
//! remaining stages still run.

use tracing::{debug, error};

use crate::backends::parse::{parse_commit_details, parse_file_matches, parse_history};
use crate::backends::SearchBackend;
use crate::core::error::BackendError;
use crate::core::model::{
    CommitRecord, FileMatch, SearchQuery, SearchReport, Stage, StageKind, StageOutcome,
};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const DEFAULT_FILE_LIMIT: usize = 20;

/// The recent-commit stage looks at a single commit
const RECENT_LIMIT: usize = 1;

/// Limits and filters applied to every query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub history_limit: usize,
    pub file_limit: usize,
    /// Only show the recent commit if its hash starts with this prefix
    pub highlight: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            file_limit: DEFAULT_FILE_LIMIT,
            highlight: None,
        }
    }
}

/// Fans a query out to the backend and collects the results
pub struct Dispatcher<B> {
    backend: B,
    settings: SearchSettings,
}

impl<B: SearchBackend> Dispatcher<B> {
    pub fn new(backend: B, settings: SearchSettings) -> Self {
        Self { backend, settings }
    }

    /// Details of the newest commit. Malformed output fails the whole fetch.
    pub fn last_commit(&self) -> Result<CommitRecord, BackendError> {
        let raw = self.backend.fetch_last_commit()?;
        Ok(parse_commit_details(&raw)?)
    }

    /// Run every stage for `query`
    pub fn dispatch(&self, query: &SearchQuery) -> SearchReport {
        debug!(query = %query, "dispatching search");

        let recent = Stage::new(
            StageKind::RecentCommit,
            RECENT_LIMIT,
            self.recent_commit(query),
        );
        let history = Stage::new(
            StageKind::CommitHistory,
            self.settings.history_limit,
            self.commit_history(query),
        );
        let files = Stage::new(
            StageKind::FileContents,
            self.settings.file_limit,
            self.file_contents(query),
        );

        SearchReport {
            query: query.clone(),
            recent,
            history,
            files,
        }
    }

    fn recent_commit(&self, query: &SearchQuery) -> StageOutcome<CommitRecord> {
        let lines = match self
            .backend
            .search_commit_history(query.as_str(), RECENT_LIMIT)
        {
            Ok(lines) => lines,
            Err(err) => return stage_failed(StageKind::RecentCommit, err),
        };

        let mut commits = parse_history(&lines);
        if let Some(prefix) = &self.settings.highlight {
            commits.retain(|commit| matches_prefix(&commit.hash, prefix));
        }
        StageOutcome::from_items(commits, RECENT_LIMIT)
    }

    fn commit_history(&self, query: &SearchQuery) -> StageOutcome<CommitRecord> {
        let limit = self.settings.history_limit;
        match self.backend.search_commit_history(query.as_str(), limit) {
            Ok(lines) => {
                let mut commits = parse_history(&lines);
                commits.truncate(limit);
                StageOutcome::from_items(commits, limit)
            }
            Err(err) => stage_failed(StageKind::CommitHistory, err),
        }
    }

    fn file_contents(&self, query: &SearchQuery) -> StageOutcome<FileMatch> {
        let limit = self.settings.file_limit;
        match self.backend.search_file_contents(query.as_str(), limit) {
            Ok(mut lines) => {
                lines.truncate(limit);
                StageOutcome::from_items(parse_file_matches(lines), limit)
            }
            Err(err) => stage_failed(StageKind::FileContents, err),
        }
    }
}

fn stage_failed<T>(kind: StageKind, err: BackendError) -> StageOutcome<T> {
    error!(stage = kind.title(), %err, "search stage failed");
    StageOutcome::failed(err)
}

fn matches_prefix(hash: &str, prefix: &str) -> bool {
    hash.to_ascii_lowercase()
        .starts_with(&prefix.trim().to_ascii_lowercase())
}
