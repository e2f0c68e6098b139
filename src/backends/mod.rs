//! Backends module - External tool integrations
//!
//! Provides:
//! - git: subprocess-backed search over a git repository
//! - parse: normalization of raw backend output into records

pub mod git;
pub mod parse;

use crate::core::error::BackendError;

/// The three lookups a search needs from a version-control backend.
///
/// Implementations return raw output; normalization happens in [`parse`].
pub trait SearchBackend {
    /// Raw `hash|author|email|date|subject|body` record of the newest commit
    fn fetch_last_commit(&self) -> Result<String, BackendError>;

    /// Up to `limit` `hash|author|date|subject` lines whose message matches
    /// `query` case-insensitively, newest first
    fn search_commit_history(&self, query: &str, limit: usize)
        -> Result<Vec<String>, BackendError>;

    /// Up to `limit` `path:line:content` lines from tracked files matching
    /// `query` case-insensitively. No matches is an empty list, not an error.
    fn search_file_contents(&self, query: &str, limit: usize)
        -> Result<Vec<String>, BackendError>;
}

impl<B: SearchBackend + ?Sized> SearchBackend for &B {
    fn fetch_last_commit(&self) -> Result<String, BackendError> {
        (**self).fetch_last_commit()
    }

    fn search_commit_history(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, BackendError> {
        (**self).search_commit_history(query, limit)
    }

    fn search_file_contents(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, BackendError> {
        (**self).search_file_contents(query, limit)
    }
}
