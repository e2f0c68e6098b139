//! Search result model
//!
//! Every backend lookup is normalized into these fixed-shape records before
//! a report is assembled or rendered.

use serde::{Deserialize, Serialize};

/// Number of hex characters shown for abbreviated commit hashes
pub const SHORT_HASH_LEN: usize = 8;

/// A user query: trimmed and never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Returns `None` for blank input
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single commit as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Calendar day, as printed by `--date=short`
    pub date: String,

    pub subject: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl CommitRecord {
    /// First eight characters of the hash, or the whole hash if shorter
    pub fn short_hash(&self) -> &str {
        self.hash.get(..SHORT_HASH_LEN).unwrap_or(&self.hash)
    }
}

/// One `path:line:content` line from a file search, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMatch(pub String);

impl FileMatch {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which lookup a stage performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    RecentCommit,
    CommitHistory,
    FileContents,
}

impl StageKind {
    /// Header shown above the stage's results
    pub fn title(&self) -> &'static str {
        match self {
            StageKind::RecentCommit => "Latest Matching Commit",
            StageKind::CommitHistory => "Commit Messages",
            StageKind::FileContents => "File Contents",
        }
    }
}

/// Result of one stage: items, nothing, or a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StageOutcome<T> {
    Found { items: Vec<T>, truncated: bool },
    Empty,
    Failed { error: String },
}

impl<T> StageOutcome<T> {
    /// Build an outcome from a capped result list.
    ///
    /// Reaching the cap marks the list as truncated, since the backend may
    /// have had more to return.
    pub fn from_items(items: Vec<T>, cap: usize) -> Self {
        if items.is_empty() {
            StageOutcome::Empty
        } else {
            let truncated = items.len() == cap;
            StageOutcome::Found { items, truncated }
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        StageOutcome::Failed {
            error: error.to_string(),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            StageOutcome::Found { items, .. } => items,
            _ => &[],
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, StageOutcome::Found { truncated: true, .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed { .. })
    }
}

/// A stage together with the cap it ran under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage<T> {
    pub kind: StageKind,
    pub cap: usize,
    pub outcome: StageOutcome<T>,
}

impl<T> Stage<T> {
    pub fn new(kind: StageKind, cap: usize, outcome: StageOutcome<T>) -> Self {
        Self { kind, cap, outcome }
    }
}

/// Combined results of one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    pub query: SearchQuery,
    pub recent: Stage<CommitRecord>,
    pub history: Stage<CommitRecord>,
    pub files: Stage<FileMatch>,
}

impl SearchReport {
    /// Number of stages that failed
    pub fn failed_stages(&self) -> usize {
        [
            self.recent.outcome.is_failed(),
            self.history.outcome.is_failed(),
            self.files.outcome.is_failed(),
        ]
        .iter()
        .filter(|failed| **failed)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(hash: &str) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            author: "Ada".to_string(),
            email: None,
            date: "2024-01-02".to_string(),
            subject: "fix bug".to_string(),
            body: None,
        }
    }

    #[test]
    fn test_search_query_trims() {
        let query = SearchQuery::new("  fix bug \n").unwrap();
        assert_eq!(query.as_str(), "fix bug");
        assert_eq!(query.to_string(), "fix bug");
    }

    #[test]
    fn test_search_query_rejects_blank() {
        assert!(SearchQuery::new("").is_none());
        assert!(SearchQuery::new("   \t").is_none());
    }

    #[test]
    fn test_short_hash() {
        assert_eq!(commit("abc12345deadbeef").short_hash(), "abc12345");
        assert_eq!(commit("abc12345").short_hash(), "abc12345");
    }

    #[test]
    fn test_short_hash_shorter_than_prefix() {
        assert_eq!(commit("abc").short_hash(), "abc");
    }

    #[test]
    fn test_truncated_when_cap_reached() {
        let outcome = StageOutcome::from_items(vec![1, 2, 3], 3);
        assert!(outcome.is_truncated());
        assert_eq!(outcome.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_not_truncated_below_cap() {
        let outcome = StageOutcome::from_items(vec![1, 2], 3);
        assert!(!outcome.is_truncated());
    }

    #[test]
    fn test_empty_outcome() {
        let outcome: StageOutcome<u8> = StageOutcome::from_items(Vec::new(), 10);
        assert_eq!(outcome, StageOutcome::Empty);
        assert!(outcome.items().is_empty());
        assert!(!outcome.is_truncated());
    }

    #[test]
    fn test_failed_outcome() {
        let outcome: StageOutcome<u8> = StageOutcome::failed("boom");
        assert!(outcome.is_failed());
        assert_eq!(
            outcome,
            StageOutcome::Failed {
                error: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_stage_outcome_serialization() {
        let outcome = StageOutcome::from_items(vec![FileMatch("a.rs:1:x".to_string())], 20);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["items"][0], "a.rs:1:x");
        assert_eq!(json["truncated"], false);

        let failed: StageOutcome<FileMatch> = StageOutcome::failed("boom");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn test_commit_record_skips_missing_optionals() {
        let json = serde_json::to_value(commit("abc12345")).unwrap();
        assert!(json.get("email").is_none());
        assert!(json.get("body").is_none());
        assert_eq!(json["subject"], "fix bug");
    }

    #[test]
    fn test_failed_stages() {
        let report = SearchReport {
            query: SearchQuery::new("fix").unwrap(),
            recent: Stage::new(StageKind::RecentCommit, 1, StageOutcome::Empty),
            history: Stage::new(StageKind::CommitHistory, 10, StageOutcome::failed("x")),
            files: Stage::new(StageKind::FileContents, 20, StageOutcome::failed("y")),
        };
        assert_eq!(report.failed_stages(), 2);
    }
}
