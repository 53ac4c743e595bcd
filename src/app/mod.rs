//! Application state holder: the single UI-observable snapshot and its
//! mutation entry points.

/// Handle and command loop implementation.
pub mod handle;
/// Snapshot type observed by presentation screens.
pub mod state;
