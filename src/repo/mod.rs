//! Single-writer contact repository and live-query APIs.

/// Repository handle and command loop implementation.
pub mod handle;
