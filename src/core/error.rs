//! Error types
//!
//! Startup errors are fatal; backend and parse errors are scoped to a single
//! stage or record and never end an interactive session.

use std::path::PathBuf;

use thiserror::Error;

/// A line of backend output that does not have the expected shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected at least {expected} fields, found {found}: {line:?}")]
    MissingFields {
        expected: usize,
        found: usize,
        line: String,
    },

    #[error("commit hash is empty: {line:?}")]
    EmptyHash { line: String },
}

/// A backend lookup that could not run to completion
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation} failed with {}: {stderr}", describe_status(.code))]
    Status {
        operation: &'static str,
        /// `None` when the process was killed by a signal
        code: Option<i32>,
        stderr: String,
    },

    #[error("{operation} produced no output")]
    EmptyOutput { operation: &'static str },

    #[error("unexpected output format: {0}")]
    Parse(#[from] ParseError),
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "no exit status".to_string(),
    }
}

/// Conditions that stop the program before any search runs
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("error resolving path {}: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("directory does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("{0} is not installed or not on PATH")]
    ToolMissing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = ParseError::MissingFields {
            expected: 5,
            found: 3,
            line: "a|b|c".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "expected at least 5 fields, found 3: \"a|b|c\""
        );
    }

    #[test]
    fn test_backend_error_message() {
        let err = BackendError::Status {
            operation: "git grep",
            code: Some(2),
            stderr: "fatal: bad pattern".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "git grep failed with exit status 2: fatal: bad pattern"
        );

        let killed = BackendError::Status {
            operation: "git log",
            code: None,
            stderr: String::new(),
        };
        assert_eq!(killed.to_string(), "git log failed with no exit status: ");
    }

    #[test]
    fn test_parse_error_converts_to_backend_error() {
        let err: BackendError = ParseError::EmptyHash {
            line: "|a|b|c".to_string(),
        }
        .into();
        assert!(matches!(err, BackendError::Parse(_)));
    }
}
