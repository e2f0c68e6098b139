//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Search result model (CommitRecord, FileMatch, SearchReport)
//! - Error types
//! - Rendering for text and JSON output
//! - Repository root resolution
//! - Common utilities

pub mod error;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
