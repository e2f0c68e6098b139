//! Normalizes pipe-delimited `git log` output into commit records

use tracing::warn;

use crate::core::error::ParseError;
use crate::core::model::{CommitRecord, FileMatch};

/// Field separator used in every `--pretty=format:` string
pub const FIELD_SEPARATOR: char = '|';

/// `hash|author|date|subject`
const HISTORY_FIELDS: usize = 4;

/// `hash|author|email|date|subject|body`, body optional
const DETAIL_FIELDS: usize = 5;
const DETAIL_FIELDS_WITH_BODY: usize = 6;

/// Split raw output into non-empty lines. Blank output gives no lines.
pub fn split_lines(raw: &str) -> Vec<String> {
    raw.trim()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect()
}

fn check_fields(line: &str, fields: &[&str], expected: usize) -> Result<(), ParseError> {
    if fields.len() < expected {
        return Err(ParseError::MissingFields {
            expected,
            found: fields.len(),
            line: line.to_string(),
        });
    }
    if fields[0].is_empty() {
        return Err(ParseError::EmptyHash {
            line: line.to_string(),
        });
    }
    Ok(())
}

/// Parse one `hash|author|date|subject` line.
///
/// The subject is the last field, so a subject containing `|` survives intact.
pub fn parse_history_line(line: &str) -> Result<CommitRecord, ParseError> {
    let fields: Vec<&str> = line.splitn(HISTORY_FIELDS, FIELD_SEPARATOR).collect();
    check_fields(line, &fields, HISTORY_FIELDS)?;

    Ok(CommitRecord {
        hash: fields[0].to_string(),
        author: fields[1].to_string(),
        email: None,
        date: fields[2].to_string(),
        subject: fields[3].to_string(),
        body: None,
    })
}

/// Parse history lines, skipping malformed ones
pub fn parse_history(lines: &[String]) -> Vec<CommitRecord> {
    lines
        .iter()
        .filter_map(|line| match parse_history_line(line) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(%err, "skipping malformed commit line");
                None
            }
        })
        .collect()
}

/// Parse the single-commit detail record. Any malformation fails the whole record.
pub fn parse_commit_details(raw: &str) -> Result<CommitRecord, ParseError> {
    let trimmed = raw.trim();
    let fields: Vec<&str> = trimmed
        .splitn(DETAIL_FIELDS_WITH_BODY, FIELD_SEPARATOR)
        .collect();
    check_fields(trimmed, &fields, DETAIL_FIELDS)?;

    let body = fields
        .get(DETAIL_FIELDS)
        .map(|body| body.trim())
        .filter(|body| !body.is_empty())
        .map(|body| body.to_string());

    Ok(CommitRecord {
        hash: fields[0].to_string(),
        author: fields[1].to_string(),
        email: Some(fields[2].to_string()),
        date: fields[3].to_string(),
        subject: fields[4].to_string(),
        body,
    })
}

/// File matches are opaque; each line becomes one match
pub fn parse_file_matches(lines: Vec<String>) -> Vec<FileMatch> {
    lines.into_iter().map(FileMatch).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_blank_output() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("  \n\n ").is_empty());
    }

    #[test]
    fn test_split_lines_skips_blank_lines() {
        let lines = split_lines("a\n\nb\n");
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_history_line() {
        let record =
            parse_history_line("abc12345deadbeef|Ada Lovelace|2024-01-02|fix bug").unwrap();
        assert_eq!(record.hash, "abc12345deadbeef");
        assert_eq!(record.author, "Ada Lovelace");
        assert_eq!(record.date, "2024-01-02");
        assert_eq!(record.subject, "fix bug");
        assert_eq!(record.email, None);
        assert_eq!(record.body, None);
    }

    #[test]
    fn test_subject_is_fourth_field_exactly() {
        let record = parse_history_line("abc|me|2024-01-02|  spaced subject ").unwrap();
        assert_eq!(record.subject, "  spaced subject ");
    }

    #[test]
    fn test_subject_keeps_separator() {
        let record = parse_history_line("abc|me|2024-01-02|a | b").unwrap();
        assert_eq!(record.subject, "a | b");
    }

    #[test]
    fn test_parse_history_line_too_few_fields() {
        let err = parse_history_line("abc|me|2024-01-02").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingFields {
                expected: 4,
                found: 3,
                line: "abc|me|2024-01-02".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_history_line_empty_hash() {
        let err = parse_history_line("|me|2024-01-02|subject").unwrap_err();
        assert!(matches!(err, ParseError::EmptyHash { .. }));
    }

    #[test]
    fn test_parse_history_skips_bad_lines() {
        let lines = vec![
            "aaa|one|2024-01-01|first".to_string(),
            "garbage".to_string(),
            "bbb|two|2024-01-02|second".to_string(),
        ];
        let records = parse_history(&lines);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].subject, "first");
        assert_eq!(records[1].subject, "second");
    }

    #[test]
    fn test_parse_commit_details_with_body() {
        let raw = "abc12345ff|Ada|ada@example.com|2024-01-02|fix bug|longer\nexplanation\n";
        let record = parse_commit_details(raw).unwrap();
        assert_eq!(record.email.as_deref(), Some("ada@example.com"));
        assert_eq!(record.date, "2024-01-02");
        assert_eq!(record.subject, "fix bug");
        assert_eq!(record.body.as_deref(), Some("longer\nexplanation"));
    }

    #[test]
    fn test_parse_commit_details_without_body() {
        let record = parse_commit_details("abc|Ada|ada@example.com|2024-01-02|fix bug|").unwrap();
        assert_eq!(record.body, None);

        let record = parse_commit_details("abc|Ada|ada@example.com|2024-01-02|fix bug").unwrap();
        assert_eq!(record.subject, "fix bug");
        assert_eq!(record.body, None);
    }

    #[test]
    fn test_parse_commit_details_body_keeps_separator() {
        let record = parse_commit_details("abc|Ada|a@b.c|2024-01-02|s|x | y").unwrap();
        assert_eq!(record.body.as_deref(), Some("x | y"));
    }

    #[test]
    fn test_parse_commit_details_three_fields_fails() {
        let err = parse_commit_details("abc|Ada|2024-01-02").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingFields {
                expected: 5,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_file_matches_verbatim() {
        let matches = parse_file_matches(vec!["src/a.rs:3:// TODO: x|y".to_string()]);
        assert_eq!(matches[0].as_str(), "src/a.rs:3:// TODO: x|y");
    }
}
