//! Flows module - Higher-level workflows built on the backends
//!
//! Provides:
//! - search: multi-stage query dispatch producing a SearchReport
//! - session: interactive and one-shot query loops

pub mod search;
pub mod session;
